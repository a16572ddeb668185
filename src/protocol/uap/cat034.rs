//! CAT034 (Monoradar Service Messages, Edition 1.27) UAP.
use crate::core::{Category, DataFieldDescriptor, ItemShape};
use crate::infra::codec::traits::Field;
use crate::protocol::fields::common::{CompoundGeneric, DataSourceIdentifier, StatusByte, SubItemDescriptor};
use crate::protocol::uap::Uap;

const FIELDS: &[DataFieldDescriptor] = &[
    DataFieldDescriptor {
        frn: 1,
        item_id: "I034/010",
        description: "Data Source Identifier",
        shape: ItemShape::Fixed(2),
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 2,
        item_id: "I034/000",
        description: "Message Type",
        shape: ItemShape::Fixed(1),
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 3,
        item_id: "I034/020",
        description: "Position Data",
        shape: ItemShape::Compound,
        mandatory: false,
    },
    DataFieldDescriptor {
        frn: 4,
        item_id: "I034/050",
        description: "System Configuration and Status",
        shape: ItemShape::Compound,
        mandatory: false,
    },
];

/// Position Data sub-items: Polar Position (Rho/Theta pair, 4 octets)
/// and Height (2 octets).
static POSITION_DATA_SUBS: &[SubItemDescriptor] = &[
    SubItemDescriptor {
        frn: 1,
        name: "Polar Position",
        octets: 4,
    },
    SubItemDescriptor {
        frn: 2,
        name: "Height",
        octets: 2,
    },
];

/// System Configuration and Status sub-items: COM channel status (1
/// octet) and PSR/SSR status (1 octet).
static SYSTEM_STATUS_SUBS: &[SubItemDescriptor] = &[
    SubItemDescriptor {
        frn: 1,
        name: "COM Status",
        octets: 1,
    },
    SubItemDescriptor {
        frn: 2,
        name: "PSR/SSR Status",
        octets: 1,
    },
];

fn factory(id: &'static str) -> Option<Box<dyn Field>> {
    match id {
        "I034/010" => Some(Box::<DataSourceIdentifier>::default()),
        "I034/000" => Some(Box::<StatusByte>::default()),
        "I034/020" => Some(Box::new(CompoundGeneric::new(POSITION_DATA_SUBS))),
        "I034/050" => Some(Box::new(CompoundGeneric::new(SYSTEM_STATUS_SUBS))),
        _ => None,
    }
}

/// See [`crate::protocol::uap::cat001::uap`] for why `expect` is safe here.
pub fn uap() -> Uap {
    Uap::new(Category(34), "1.27", FIELDS, factory, None).expect("CAT034 UAP table is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_successfully() {
        let uap = uap();
        assert_eq!(uap.category(), Category(34));
    }
}
