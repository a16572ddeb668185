//! CAT063 (Sensor Status Reports, Edition 1.3) UAP. Every item here reuses a
//! generic pattern already in `protocol::fields::common`: SAC/SIC pairs,
//! a signed fractional bias, and a Compound sub-FSPEC container.
use crate::core::{Category, DataFieldDescriptor, ItemShape};
use crate::infra::codec::traits::Field;
use crate::protocol::fields::common::{CompoundGeneric, DataSourceIdentifier, FractionalSigned, SubItemDescriptor};
use crate::protocol::uap::Uap;

const FIELDS: &[DataFieldDescriptor] = &[
    DataFieldDescriptor {
        frn: 1,
        item_id: "I063/010",
        description: "Data Source Identifier",
        shape: ItemShape::Fixed(2),
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 2,
        item_id: "I063/015",
        description: "Sensor Identifier",
        shape: ItemShape::Fixed(2),
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 3,
        item_id: "I063/060",
        description: "Sensor Configuration and Status",
        shape: ItemShape::Compound,
        mandatory: false,
    },
    DataFieldDescriptor {
        frn: 4,
        item_id: "I063/070",
        description: "Time Stamping Bias",
        shape: ItemShape::Fixed(2),
        mandatory: false,
    },
];

/// Sensor Configuration and Status sub-items: CON/PSR/SSR/MDS availability
/// octet and a spare/reserved status octet.
static SENSOR_STATUS_SUBS: &[SubItemDescriptor] = &[
    SubItemDescriptor {
        frn: 1,
        name: "CON/PSR/SSR/MDS Status",
        octets: 1,
    },
    SubItemDescriptor {
        frn: 2,
        name: "Reserved Status",
        octets: 1,
    },
];

fn factory(id: &'static str) -> Option<Box<dyn Field>> {
    match id {
        "I063/010" => Some(Box::<DataSourceIdentifier>::default()),
        "I063/015" => Some(Box::<DataSourceIdentifier>::default()),
        "I063/060" => Some(Box::new(CompoundGeneric::new(SENSOR_STATUS_SUBS))),
        "I063/070" => Some(Box::new(FractionalSigned::new(16, 1.0))),
        _ => None,
    }
}

/// See [`crate::protocol::uap::cat001::uap`] for why `expect` is safe here.
pub fn uap() -> Uap {
    Uap::new(Category(63), "1.3", FIELDS, factory, None).expect("CAT063 UAP table is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_successfully() {
        let uap = uap();
        assert_eq!(uap.category(), Category(63));
        assert!(uap.is_mandatory("I063/015"));
    }
}
