//! Static category metadata. Consulted by [`crate::protocol::datablock`] for
//! the `blockable` rule and surfaced to callers for diagnostics; never
//! consulted by the codec kernel itself.
use crate::core::{Category, CategoryInfo};

/// Metadata for every category this crate ships a UAP for. Categories not
/// listed here can still be decoded if the caller registers a custom UAP
/// with the `Decoder`; this table only backs [`lookup`].
const CATEGORIES: &[CategoryInfo] = &[
    CategoryInfo {
        category: Category(1),
        name: "Monoradar Target Reports",
        description: "Plot and track reports from a single monoradar sensor",
        version: "1.1",
        blockable: true,
    },
    CategoryInfo {
        category: Category(2),
        name: "Monoradar Service Messages",
        description: "North marker, sector crossing, and status messages from a monoradar sensor",
        version: "1.0",
        blockable: true,
    },
    CategoryInfo {
        category: Category(21),
        name: "ADS-B Target Reports",
        description: "Extended squitter target reports from ADS-B-equipped aircraft",
        version: "2.1",
        blockable: false,
    },
    CategoryInfo {
        category: Category(34),
        name: "Monoradar Service Messages",
        description: "North marker, sector crossing, and system status messages, Edition 1.27 framing",
        version: "1.27",
        blockable: true,
    },
    CategoryInfo {
        category: Category(48),
        name: "Monoradar Target Reports",
        description: "Combined primary/secondary monoradar target reports",
        version: "1.31",
        blockable: true,
    },
    CategoryInfo {
        category: Category(63),
        name: "Sensor Status Reports",
        description: "Multi-sensor data fusion sensor status and configuration reports",
        version: "1.3",
        blockable: false,
    },
];

/// Look up the static metadata for `category`, if this crate ships it.
pub fn lookup(category: Category) -> Option<CategoryInfo> {
    CATEGORIES
        .iter()
        .find(|info| info.category == category)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_category() {
        let info = lookup(Category(48)).unwrap();
        assert_eq!(info.name, "Monoradar Target Reports");
        assert!(info.blockable);
    }

    #[test]
    fn lookup_unknown_category_is_none() {
        assert!(lookup(Category(200)).is_none());
    }

    #[test]
    fn cat021_and_cat063_are_non_blockable() {
        assert!(!lookup(Category(21)).unwrap().blockable);
        assert!(!lookup(Category(63)).unwrap().blockable);
    }
}
