//! Defines the "data contract" between the UAP tables (the scribe) and the
//! shape engine / record layer (the interpreter).
//!
//! The UAP modules under [`crate::protocol::uap`] build static
//! [`DataFieldDescriptor`] tables that implement this contract; the engine
//! in [`crate::infra::codec::engine`] consumes those descriptors to parse
//! or build record bytes without knowing anything about a specific category.

/// An 8-bit ASTERIX category code. Valid range is 1..=255; 0 is never a
/// legal category and is rejected at every construction site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category(pub u8);

impl Category {
    /// Build a category, rejecting the reserved value 0.
    pub fn new(value: u8) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Raw numeric value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// `true` for every non-zero category.
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Category {
    /// Render as `"CATnnn"`, matching the textual form used in
    /// EUROCONTROL documents and diagnostics.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CAT{:03}", self.0)
    }
}

/// Diagnostics-only metadata about a category. Never consulted by the
/// codec kernel except for the `blockable` flag, which `DataBlock` enforces.
#[derive(Debug, Clone, Copy)]
pub struct CategoryInfo {
    pub category: Category,
    pub name: &'static str,
    pub description: &'static str,
    /// EUROCONTROL specification edition, e.g. `"1.31"`.
    pub version: &'static str,
    /// Whether multiple records of this category may legally share one
    /// Data Block. Categories standardized after Edition 2.2 are
    /// non-blockable by convention.
    pub blockable: bool,
}

/// Tagged shape of a data item's wire representation. See `SPEC_FULL.md`
/// §4.2 for the exact framing rules of each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemShape {
    /// Always exactly `n` octets.
    Fixed(u16),
    /// FX-chained octets, 7 data bits each, until FX = 0.
    Extended,
    /// Length-prefixed; the first octet counts itself.
    Explicit,
    /// Count-prefixed array of `element_octets`-byte elements.
    Repetitive { element_octets: u16 },
    /// Nested sub-FSPEC followed by sub-items in sub-UAP order.
    Compound,
}

/// Static descriptor for one UAP slot ("data field" in EUROCONTROL
/// terminology). FRN order on the wire equals the order these descriptors
/// appear in a [`crate::protocol::uap::Uap`]'s field table.
#[derive(Debug, Clone, Copy)]
pub struct DataFieldDescriptor {
    /// Field Reference Number. FSPEC reaches 49 data bits across 7
    /// octets before an 8th, all-FX octet would be needed; no shipped
    /// category in this crate uses one, but the type permits it.
    pub frn: u8,
    /// Item identifier as printed in EUROCONTROL documents, e.g.
    /// `"I021/080"`, `"I048/230"`, or `"SP048"` / `"RE048"` for the special
    /// purpose / reserved expansion items.
    pub item_id: &'static str,
    /// Short human description, diagnostics only.
    pub description: &'static str,
    pub shape: ItemShape,
    pub mandatory: bool,
}

impl DataFieldDescriptor {
    /// Fixed-shape byte length, or `None` for every other shape. Used by
    /// the forward-compatibility skip when a receiver's UAP lacks this
    /// slot's item id.
    pub fn fixed_length_octets(&self) -> Option<u16> {
        match self.shape {
            ItemShape::Fixed(n) => Some(n),
            _ => None,
        }
    }
}
