//! The `Field` trait contract: every concrete data-item implementation
//! (e.g. the CAT048 Target Report Descriptor, the CAT021 ICAO Address)
//! satisfies this so the shape engine and `Record` never need to know
//! which category they're handling.
use crate::error::{DecodeError, EncodingError, ValidationError};
use crate::infra::codec::bits::{BitReader, BitWriter};

/// A single decoded scalar or composite carried by a data item. Concrete
/// `Field` implementations expose their contents through this tagged sum
/// rather than through a trait object, so the engine and `Record` can move
/// values around without dynamic dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    /// A fixed-point quantity stored as its raw integer plus the LSB scale
    /// that converts it to a physical unit (e.g. CAT048 range is LSB =
    /// 1/256 NM).
    Scaled { raw: i64, lsb: f64 },
    Bytes(Vec<u8>),
    Text(String),
    /// Output of a Repetitive-shaped item: one `FieldValue` per element.
    Repetitive(Vec<FieldValue>),
    /// Output of a Compound-shaped item: one entry per present sub-item,
    /// keyed by sub-item id.
    Compound(Vec<(&'static str, FieldValue)>),
}

/// Extra context the shape engine passes alongside a decode/encode call.
/// Most shapes need nothing beyond the bytes themselves; `Repetitive` is
/// the exception, since the element count lives in a length octet the
/// engine reads before the Field ever sees the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeHint {
    /// Fixed, Extended, Explicit, and Compound items carry no extra hint.
    Plain,
    /// Repetitive items: `count` elements follow, each `element_octets`
    /// wide (the element width is already known to the Field from its own
    /// descriptor, not threaded through the hint).
    Repetitive { count: usize },
}

/// Implemented by every concrete data-item payload. The shape engine
/// (`infra::codec::engine`) frames the item's length according to its
/// `ItemShape`; the `Field` only ever reads or writes its own payload
/// bytes through the supplied bit cursor.
pub trait Field: Send + Sync {
    /// Populate `self` from `reader`, consuming exactly the bits the shape
    /// engine has made available for this item.
    fn decode(&mut self, reader: &mut BitReader<'_>, hint: ShapeHint) -> Result<(), DecodeError>;

    /// Write `self`'s payload to `writer`.
    fn encode(&self, writer: &mut BitWriter<'_>, hint: ShapeHint) -> Result<(), EncodingError>;

    /// Number of octets this field occupies when its shape is `Fixed`, or
    /// the per-element width when nested inside a `Repetitive` item.
    /// Fields backing `Extended`, `Explicit`, or `Compound` items report
    /// their current encoded size; the engine uses it to size scratch
    /// buffers before the real write.
    fn encoded_len(&self) -> usize;

    /// Element count for a `Repetitive` item. Only meaningful when the
    /// owning descriptor's shape is `Repetitive`; other shapes ignore it.
    fn repetition_count(&self) -> usize {
        0
    }

    /// Cross-field or range validation specific to this item. Called by
    /// `Record::set_data_item` and again before `Record::encode`.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Expose the decoded value for callers that want typed access without
    /// downcasting a concrete struct.
    fn value(&self) -> FieldValue;
}
