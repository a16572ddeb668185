//! CAT002 (Monoradar Service Messages, Edition 1.0) UAP.
use crate::core::{Category, DataFieldDescriptor, ItemShape};
use crate::infra::codec::traits::Field;
use crate::protocol::fields::common::{DataSourceIdentifier, FractionalUnsigned, StatusByte};
use crate::protocol::uap::Uap;

const FIELDS: &[DataFieldDescriptor] = &[
    DataFieldDescriptor {
        frn: 1,
        item_id: "I002/010",
        description: "Data Source Identifier",
        shape: ItemShape::Fixed(2),
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 2,
        item_id: "I002/000",
        description: "Message Type",
        shape: ItemShape::Fixed(1),
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 3,
        item_id: "I002/020",
        description: "Sector Number",
        shape: ItemShape::Fixed(1),
        mandatory: false,
    },
    DataFieldDescriptor {
        frn: 4,
        item_id: "I002/030",
        description: "Time of Day",
        shape: ItemShape::Fixed(3),
        mandatory: false,
    },
    DataFieldDescriptor {
        frn: 5,
        item_id: "I002/041",
        description: "Antenna Rotation Period",
        shape: ItemShape::Fixed(2),
        mandatory: false,
    },
];

fn factory(id: &'static str) -> Option<Box<dyn Field>> {
    match id {
        "I002/010" => Some(Box::<DataSourceIdentifier>::default()),
        "I002/000" => Some(Box::<StatusByte>::default()),
        "I002/020" => Some(Box::new(FractionalUnsigned::new(8, 360.0 / 256.0))),
        "I002/030" => Some(Box::new(FractionalUnsigned::new(24, 1.0 / 128.0))),
        "I002/041" => Some(Box::new(FractionalUnsigned::new(16, 1.0 / 128.0))),
        _ => None,
    }
}

/// See [`crate::protocol::uap::cat001::uap`] for why `expect` is safe here.
pub fn uap() -> Uap {
    Uap::new(Category(2), "1.0", FIELDS, factory, None).expect("CAT002 UAP table is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_successfully() {
        let uap = uap();
        assert_eq!(uap.category(), Category(2));
        assert!(uap.is_mandatory("I002/000"));
    }
}
