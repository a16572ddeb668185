//! CAT021 (ADS-B Target Reports, Edition 2.1) UAP.
use crate::core::{Category, DataFieldDescriptor, ItemShape};
use crate::infra::codec::traits::Field;
use crate::protocol::fields::cat021::{ModeSMbData, PositionWgs84, TargetIdentification, TargetReportDescriptor};
use crate::protocol::fields::common::{Address24, DataSourceIdentifier};
use crate::protocol::uap::Uap;

const FIELDS: &[DataFieldDescriptor] = &[
    DataFieldDescriptor {
        frn: 1,
        item_id: "I021/010",
        description: "Data Source Identifier",
        shape: ItemShape::Fixed(2),
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 2,
        item_id: "I021/040",
        description: "Target Report Descriptor",
        shape: ItemShape::Extended,
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 3,
        item_id: "I021/080",
        description: "Target Address",
        shape: ItemShape::Fixed(3),
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 4,
        item_id: "I021/130",
        description: "Position in WGS-84 Coordinates",
        shape: ItemShape::Fixed(6),
        mandatory: false,
    },
    DataFieldDescriptor {
        frn: 5,
        item_id: "I021/170",
        description: "Target Identification",
        shape: ItemShape::Fixed(6),
        mandatory: false,
    },
    DataFieldDescriptor {
        frn: 6,
        item_id: "I021/250",
        description: "Mode S MB Data",
        shape: ItemShape::Repetitive { element_octets: 8 },
        mandatory: false,
    },
];

fn factory(id: &'static str) -> Option<Box<dyn Field>> {
    match id {
        "I021/010" => Some(Box::<DataSourceIdentifier>::default()),
        "I021/040" => Some(Box::<TargetReportDescriptor>::default()),
        "I021/080" => Some(Box::<Address24>::default()),
        "I021/130" => Some(Box::<PositionWgs84>::default()),
        "I021/170" => Some(Box::<TargetIdentification>::default()),
        "I021/250" => Some(Box::<ModeSMbData>::default()),
        _ => None,
    }
}

/// See [`crate::protocol::uap::cat001::uap`] for why `expect` is safe here.
pub fn uap() -> Uap {
    Uap::new(Category(21), "2.1", FIELDS, factory, None).expect("CAT021 UAP table is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_successfully() {
        let uap = uap();
        assert_eq!(uap.category(), Category(21));
        assert!(uap.is_mandatory("I021/080"));
    }
}
