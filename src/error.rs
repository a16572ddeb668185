//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (bit-level buffer access,
//! FSPEC framing, record/block encode-decode, field validation).
use crate::core::Category;
use thiserror::Error;

/// Errors raised during bitwise buffer reads.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitReaderError {
    /// Attempted to read past the end of the buffer.
    #[error("attempted to read out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Requested more bits than the target type can hold.
    #[error("cannot read more than {max} bits, requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Cursor is not aligned on a byte boundary when required.
    #[error("non aligned bit, cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}

/// Errors raised during bitwise writes into a buffer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitWriterError {
    /// Attempted to write beyond the provided capacity.
    #[error("attempted to write out of bounds -> asked: {asked}, available: {available}")]
    OutOfBounds { asked: usize, available: usize },
    /// Field is too large for the provided type.
    #[error("cannot write more than {max} bits, requested: {asked}")]
    TooLongForType { max: u8, asked: u8 },
    /// Cursor is not aligned on a byte boundary when the operation requires it.
    #[error("non aligned bit, cursor: {cursor}")]
    NonAlignedBit { cursor: usize },
}

/// Errors raised by the FSPEC codec.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FspecError {
    /// `set_frn`/`get_frn` called with FRN 0, which is not addressable.
    #[error("FRN 0 is not a valid field reference number")]
    InvalidFrn,
    /// The FX chain reached 8 octets and the 8th still has FX = 1, or an
    /// encode was attempted with no data bits set.
    #[error("invalid FSPEC: {reason}")]
    Invalid { reason: &'static str },
    /// Source exhausted mid-chain.
    #[error("buffer too short while decoding FSPEC: needed at least {needed} bytes")]
    BufferTooShort { needed: usize },
}

/// Abstract error kind, shared by every contextual carrier below so
/// callers can dispatch on recovery strategy without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidMessage,
    InvalidLength,
    InvalidFspec,
    MandatoryField,
    InvalidCategory,
    UnknownCategory,
    UapNotDefined,
    UnknownDataItem,
    InvalidField,
    BufferTooShort,
    TruncatedMessage,
    CorruptData,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::InvalidMessage => "invalid message",
            ErrorKind::InvalidLength => "invalid length",
            ErrorKind::InvalidFspec => "invalid FSPEC",
            ErrorKind::MandatoryField => "mandatory field missing",
            ErrorKind::InvalidCategory => "invalid category",
            ErrorKind::UnknownCategory => "unknown category",
            ErrorKind::UapNotDefined => "UAP not defined",
            ErrorKind::UnknownDataItem => "unknown data item",
            ErrorKind::InvalidField => "invalid field",
            ErrorKind::BufferTooShort => "buffer too short",
            ErrorKind::TruncatedMessage => "truncated message",
            ErrorKind::CorruptData => "corrupt data",
        };
        f.write_str(s)
    }
}

/// Failure while decoding a Record, DataBlock, or an individual item.
/// Carries enough positional context for a caller to log and discard
/// the offending block.
#[derive(Error, Debug, Clone)]
#[error("decode error ({kind}) in {category:?} item {item_id:?} at byte {byte_position:?} (buffer size {buffer_size:?}): {cause}")]
pub struct DecodeError {
    pub kind: ErrorKind,
    pub category: Option<Category>,
    pub item_id: Option<&'static str>,
    pub byte_position: Option<usize>,
    pub buffer_size: Option<usize>,
    pub cause: String,
}

impl DecodeError {
    pub fn new(kind: ErrorKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            category: None,
            item_id: None,
            byte_position: None,
            buffer_size: None,
            cause: cause.into(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_item_id(mut self, item_id: &'static str) -> Self {
        self.item_id = Some(item_id);
        self
    }

    pub fn with_position(mut self, byte_position: usize) -> Self {
        self.byte_position = Some(byte_position);
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = Some(buffer_size);
        self
    }
}

impl From<FspecError> for DecodeError {
    fn from(e: FspecError) -> Self {
        let kind = match e {
            FspecError::BufferTooShort { .. } => ErrorKind::BufferTooShort,
            _ => ErrorKind::InvalidFspec,
        };
        DecodeError::new(kind, e.to_string())
    }
}

impl From<BitReaderError> for DecodeError {
    fn from(e: BitReaderError) -> Self {
        DecodeError::new(ErrorKind::BufferTooShort, e.to_string())
    }
}

/// Failure while encoding a Record, DataBlock, or an individual item.
#[derive(Error, Debug, Clone)]
#[error("encoding error ({kind}) in {category:?} item {item_id:?} at byte {byte_position:?}: {cause}")]
pub struct EncodingError {
    pub kind: ErrorKind,
    pub category: Option<Category>,
    pub item_id: Option<&'static str>,
    pub byte_position: Option<usize>,
    pub cause: String,
}

impl EncodingError {
    pub fn new(kind: ErrorKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            category: None,
            item_id: None,
            byte_position: None,
            cause: cause.into(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_item_id(mut self, item_id: &'static str) -> Self {
        self.item_id = Some(item_id);
        self
    }

    pub fn with_position(mut self, byte_position: usize) -> Self {
        self.byte_position = Some(byte_position);
        self
    }
}

impl From<FspecError> for EncodingError {
    fn from(e: FspecError) -> Self {
        EncodingError::new(ErrorKind::InvalidFspec, e.to_string())
    }
}

impl From<BitWriterError> for EncodingError {
    fn from(e: BitWriterError) -> Self {
        EncodingError::new(ErrorKind::InvalidMessage, e.to_string())
    }
}

impl From<DecodeError> for EncodingError {
    /// Lets `Record::encode` reuse `Uap::validate` (a `DecodeError` producer)
    /// without duplicating the mandatory-field / cross-field check.
    fn from(e: DecodeError) -> Self {
        let mut out = EncodingError::new(e.kind, e.cause);
        if let Some(category) = e.category {
            out = out.with_category(category);
        }
        if let Some(item_id) = e.item_id {
            out = out.with_item_id(item_id);
        }
        if let Some(position) = e.byte_position {
            out = out.with_position(position);
        }
        out
    }
}

/// Failure raised by a [`crate::infra::codec::traits::Field`]'s `validate`.
#[derive(Error, Debug, Clone)]
#[error("validation error: field {field} of data item {data_item} rejected value {value}: {reason}")]
pub struct ValidationError {
    pub data_item: &'static str,
    pub field: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl ValidationError {
    pub fn new(
        data_item: &'static str,
        field: &'static str,
        value: impl std::fmt::Debug,
        reason: &'static str,
    ) -> Self {
        Self {
            data_item,
            field,
            value: format!("{value:?}"),
            reason,
        }
    }
}

impl From<ValidationError> for DecodeError {
    fn from(e: ValidationError) -> Self {
        DecodeError::new(ErrorKind::InvalidField, e.to_string()).with_item_id(e.data_item)
    }
}

impl From<ValidationError> for EncodingError {
    fn from(e: ValidationError) -> Self {
        EncodingError::new(ErrorKind::InvalidField, e.to_string()).with_item_id(e.data_item)
    }
}
