//! Thin convenience wrapper over `Record` + `DataBlock` for the common case
//! of emitting a single record: `set_data_item` for each item, wrap in one
//! `DataBlock`, encode to bytes.
use std::sync::Arc;

use crate::error::EncodingError;
use crate::infra::codec::traits::Field;
use crate::protocol::datablock::DataBlock;
use crate::protocol::record::Record;
use crate::protocol::uap::Uap;

/// Builds one Data Block containing one Record from a UAP and a list of
/// `(item_id, field)` pairs. Equivalent to
/// `Record::set_data_item` x n, `DataBlock::add_record`, `DataBlock::encode`,
/// spelled out as a single call for callers that don't need the
/// intermediate `Record`/`DataBlock` handles.
pub struct Encoder {
    uap: Arc<Uap>,
}

impl Encoder {
    pub fn new(uap: Arc<Uap>) -> Self {
        Self { uap }
    }

    pub fn uap(&self) -> &Arc<Uap> {
        &self.uap
    }

    /// Populate a record with `items`, frame it in a single-record Data
    /// Block, and return its wire bytes.
    pub fn build(&self, items: Vec<(&'static str, Box<dyn Field>)>) -> Result<Vec<u8>, EncodingError> {
        let category = self.uap.category();
        let mut record = Record::new(category, Arc::clone(&self.uap))?;
        for (id, field) in items {
            record.set_data_item(id, field)?;
        }
        let mut block = DataBlock::new(category, Arc::clone(&self.uap))?;
        block.add_record(record)?;
        block.encode()
    }
}
