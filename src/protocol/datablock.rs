//! Data Block framing: one octet category, a 16-bit big-endian total length,
//! then the concatenated bytes of one or more records of that category.
use std::sync::Arc;

use crate::core::Category;
use crate::error::{DecodeError, EncodingError, ErrorKind};
use crate::pool::{BufferPool, PooledBuffer};
use crate::protocol::category;
use crate::protocol::record::Record;
use crate::protocol::uap::Uap;

/// Number of header octets preceding the record bytes: category + 16-bit
/// length.
const HEADER_LEN: usize = 3;

/// A framed group of records sharing one category and UAP.
pub struct DataBlock {
    category: Category,
    uap: Arc<Uap>,
    records: Vec<Record>,
    buffer_pool: Option<Arc<dyn BufferPool>>,
}

impl DataBlock {
    /// Start an empty block for `category`, driven by `uap`.
    pub fn new(category: Category, uap: Arc<Uap>) -> Result<Self, DecodeError> {
        if !category.is_valid() {
            return Err(DecodeError::new(ErrorKind::InvalidCategory, "category 0 is not valid"));
        }
        if uap.category() != category {
            return Err(DecodeError::new(
                ErrorKind::InvalidMessage,
                format!("UAP is for {} but block was constructed for {category}", uap.category()),
            )
            .with_category(category));
        }
        Ok(Self {
            category,
            uap,
            records: Vec::new(),
            buffer_pool: None,
        })
    }

    /// Draw `encode`'s scratch buffer from `pool` instead of allocating a
    /// fresh `Vec` on every call.
    pub fn with_buffer_pool(mut self, pool: Arc<dyn BufferPool>) -> Self {
        self.buffer_pool = Some(pool);
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn uap(&self) -> &Arc<Uap> {
        &self.uap
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Append `record`. Rejects a second record when this block's category
    /// is not blockable, per the Edition-2.2-and-later rule that such
    /// categories carry exactly one record per Data Block.
    pub fn add_record(&mut self, record: Record) -> Result<(), EncodingError> {
        if record.category() != self.category {
            return Err(EncodingError::new(
                ErrorKind::InvalidCategory,
                format!("record category {} does not match block category {}", record.category(), self.category),
            )
            .with_category(self.category));
        }
        let blockable = category::lookup(self.category).map(|info| info.blockable).unwrap_or(true);
        if !blockable && !self.records.is_empty() {
            return Err(EncodingError::new(
                ErrorKind::InvalidMessage,
                format!("{} is not blockable: a Data Block may carry at most one record", self.category),
            )
            .with_category(self.category));
        }
        self.records.push(record);
        Ok(())
    }

    /// `true` if every record shares the same FSPEC bitmap (an "Assigned
    /// Structure Record Stream"). An empty or single-record block counts as
    /// true trivially.
    pub fn is_asrs(&self) -> bool {
        let mut records = self.records.iter();
        let Some(first) = records.next() else {
            return true;
        };
        records.all(|r| r.fspec_bytes() == first.fspec_bytes())
    }

    /// Upper-bound byte estimate: header plus each record's `estimate_size`.
    pub fn estimate_size(&self) -> usize {
        HEADER_LEN + self.records.iter().map(Record::estimate_size).sum::<usize>()
    }

    /// Write `CAT | LEN | records...`, patching `LEN` once the true length
    /// is known. When a buffer pool is configured, the output `Vec` is
    /// drawn from it instead of allocated fresh; the buffer is handed off
    /// to the caller rather than returned to the pool once filled.
    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        let mut pooled = self
            .buffer_pool
            .as_ref()
            .map(|pool| PooledBuffer::acquire(pool.as_ref(), self.estimate_size()));
        let mut owned = Vec::new();
        let out: &mut Vec<u8> = match &mut pooled {
            Some(guard) => guard.as_vec(),
            None => {
                owned.reserve(self.estimate_size());
                &mut owned
            }
        };

        out.push(self.category.value());
        out.extend_from_slice(&[0u8, 0u8]); // length placeholder

        for record in &self.records {
            record.encode(out)?;
        }

        let total = out.len();
        if total > u16::MAX as usize {
            return Err(EncodingError::new(
                ErrorKind::InvalidLength,
                format!("Data Block length {total} exceeds the 16-bit length field"),
            )
            .with_category(self.category));
        }
        out[1..3].copy_from_slice(&(total as u16).to_be_bytes());

        Ok(match pooled {
            Some(guard) => guard.into_inner(),
            None => owned,
        })
    }

    /// Replace this block's records by decoding `bytes` from the start of a
    /// Data Block (the category octet). Requires the category to match this
    /// block's category and the declared length to equal `bytes.len()`.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<usize, DecodeError> {
        if bytes.len() < HEADER_LEN {
            return Err(DecodeError::new(
                ErrorKind::InvalidMessage,
                format!("Data Block shorter than the {HEADER_LEN}-octet header"),
            )
            .with_buffer_size(bytes.len()));
        }

        let cat = bytes[0];
        if cat != self.category.value() {
            return Err(DecodeError::new(
                ErrorKind::InvalidCategory,
                format!("byte stream category {cat} does not match block category {}", self.category),
            )
            .with_category(self.category));
        }

        let declared_len = u16::from_be_bytes([bytes[1], bytes[2]]) as usize;
        if declared_len != bytes.len() {
            return Err(DecodeError::new(
                ErrorKind::InvalidLength,
                format!("declared length {declared_len} does not match buffer length {}", bytes.len()),
            )
            .with_category(self.category)
            .with_buffer_size(bytes.len()));
        }

        self.records.clear();
        let mut offset = HEADER_LEN;
        while offset < declared_len {
            let mut record = Record::new(self.category, Arc::clone(&self.uap))?;
            let consumed = record.decode(&bytes[offset..]).map_err(|e| e.with_position(offset))?;
            offset += consumed;
            self.records.push(record);
        }
        if offset != declared_len {
            return Err(DecodeError::new(
                ErrorKind::InvalidMessage,
                "final record overran the declared Data Block length",
            )
            .with_category(self.category)
            .with_position(offset));
        }
        Ok(declared_len)
    }

    /// Deep copy: every record is cloned via `Record::try_clone`.
    pub fn try_clone(&self) -> Result<Self, DecodeError> {
        let mut records = Vec::with_capacity(self.records.len());
        for record in &self.records {
            records.push(record.try_clone()?);
        }
        Ok(Self {
            category: self.category,
            uap: Arc::clone(&self.uap),
            records,
            buffer_pool: self.buffer_pool.clone(),
        })
    }
}
