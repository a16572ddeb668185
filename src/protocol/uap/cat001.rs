//! CAT001 (Monoradar Target Reports, Edition 1.1) UAP.
use crate::core::{Category, DataFieldDescriptor, ItemShape};
use crate::infra::codec::traits::Field;
use crate::protocol::fields::cat021::TargetReportDescriptor;
use crate::protocol::fields::cat048::{MeasuredPositionPolar, Mode3ACode};
use crate::protocol::fields::common::{DataSourceIdentifier, FractionalSigned};
use crate::protocol::uap::Uap;

const FIELDS: &[DataFieldDescriptor] = &[
    DataFieldDescriptor {
        frn: 1,
        item_id: "I001/010",
        description: "Data Source Identifier",
        shape: ItemShape::Fixed(2),
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 2,
        item_id: "I001/020",
        description: "Target Report Descriptor",
        shape: ItemShape::Extended,
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 3,
        item_id: "I001/040",
        description: "Measured Position in Polar Coordinates",
        shape: ItemShape::Fixed(4),
        mandatory: false,
    },
    DataFieldDescriptor {
        frn: 4,
        item_id: "I001/070",
        description: "Mode-3/A Code",
        shape: ItemShape::Fixed(2),
        mandatory: false,
    },
    DataFieldDescriptor {
        frn: 5,
        item_id: "I001/090",
        description: "Flight Level",
        shape: ItemShape::Fixed(2),
        mandatory: false,
    },
];

fn factory(id: &'static str) -> Option<Box<dyn Field>> {
    match id {
        "I001/010" => Some(Box::<DataSourceIdentifier>::default()),
        "I001/020" => Some(Box::<TargetReportDescriptor>::default()),
        "I001/040" => Some(Box::<MeasuredPositionPolar>::default()),
        "I001/070" => Some(Box::<Mode3ACode>::default()),
        "I001/090" => Some(Box::new(FractionalSigned::new(16, 0.25))),
        _ => None,
    }
}

/// Build the CAT001 UAP. The field table above is fixed at compile time
/// and known to satisfy `Uap::new`'s ordering invariants, so a
/// construction failure here would indicate a bug in this module, not a
/// caller error.
pub fn uap() -> Uap {
    Uap::new(Category(1), "1.1", FIELDS, factory, None).expect("CAT001 UAP table is well-formed")
}
