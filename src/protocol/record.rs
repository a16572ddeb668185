//! A single ASTERIX record: one category's data items keyed by item id,
//! driven by a shared, immutable [`Uap`].
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{Category, ItemShape};
use crate::error::{DecodeError, EncodingError, ErrorKind};
use crate::infra::codec::bits::{BitReader, BitWriter};
use crate::infra::codec::engine;
use crate::infra::codec::fspec::Fspec;
use crate::infra::codec::traits::Field;
use crate::protocol::uap::Uap;

/// One record: the FSPEC presence bitmap plus the items it marks present.
/// Every key in `items` must name a slot in `uap`.
pub struct Record {
    category: Category,
    uap: Arc<Uap>,
    fspec: Fspec,
    items: HashMap<&'static str, Box<dyn Field>>,
}

impl Record {
    /// Create an empty record. Rejects a UAP whose category does not
    /// match `category`.
    pub fn new(category: Category, uap: Arc<Uap>) -> Result<Self, DecodeError> {
        if !category.is_valid() {
            return Err(DecodeError::new(ErrorKind::InvalidCategory, "category 0 is not valid"));
        }
        if uap.category() != category {
            return Err(DecodeError::new(
                ErrorKind::InvalidMessage,
                format!(
                    "UAP is for {} but record was constructed for {category}",
                    uap.category()
                ),
            )
            .with_category(category));
        }
        Ok(Self {
            category,
            uap,
            fspec: Fspec::new(),
            items: HashMap::new(),
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn uap(&self) -> &Arc<Uap> {
        &self.uap
    }

    /// Store `field` under `id`, validating it and setting its FSPEC bit.
    /// Rejects an id this record's UAP does not declare.
    pub fn set_data_item(&mut self, id: &'static str, field: Box<dyn Field>) -> Result<(), DecodeError> {
        let descriptor = self.uap.field_by_id(id).ok_or_else(|| {
            DecodeError::new(ErrorKind::UnknownDataItem, format!("{id} is not declared by this UAP"))
                .with_category(self.category)
                .with_item_id(id)
        })?;
        field.validate().map_err(DecodeError::from)?;
        self.fspec.set_frn(descriptor.frn)?;
        self.items.insert(id, field);
        Ok(())
    }

    pub fn get_data_item(&self, id: &str) -> Option<&dyn Field> {
        self.items.get(id).map(|b| b.as_ref())
    }

    pub fn has_data_item(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Raw FSPEC octets, used by `DataBlock::is_asrs` to compare presence
    /// bitmaps across records without re-deriving them from item ids.
    pub fn fspec_bytes(&self) -> &[u8] {
        self.fspec.octets()
    }

    /// Total bytes this record would need to encode: the FSPEC plus, for
    /// each present slot, its fixed length or (for variable-length shapes)
    /// a conservative 4-byte placeholder. Diagnostic only — `encode`
    /// derives the real buffer size from each `Field`'s own `encoded_len`.
    pub fn estimate_size(&self) -> usize {
        self.fspec.size().max(1)
            + self
                .uap
                .fields()
                .iter()
                .filter(|d| self.fspec.get_frn(d.frn))
                .map(|d| d.fixed_length_octets().map(|n| n as usize).unwrap_or(4))
                .sum::<usize>()
    }

    /// Drop every item and the FSPEC, retaining category and UAP.
    pub fn reset(&mut self) {
        self.items.clear();
        self.fspec.reset();
    }

    /// Write FSPEC followed by each present item, in UAP FRN order.
    /// Runs `uap.validate` first, so a record missing a mandatory item
    /// never reaches the wire half-written.
    pub fn encode(&self, sink: &mut Vec<u8>) -> Result<usize, EncodingError> {
        self.uap.validate(self)?;

        let mut fspec_bytes = Vec::new();
        self.fspec.encode(&mut fspec_bytes)?;
        sink.extend_from_slice(&fspec_bytes);

        let capacity = self
            .uap
            .fields()
            .iter()
            .filter(|d| self.fspec.get_frn(d.frn))
            .map(|d| {
                self.items
                    .get(d.item_id)
                    .map(|f| f.encoded_len() + 2)
                    .unwrap_or(0)
            })
            .sum::<usize>()
            .max(1);
        let mut buf = vec![0u8; capacity];
        let written_bytes;
        {
            let mut writer = BitWriter::new(&mut buf);
            for descriptor in self.uap.fields() {
                if !self.fspec.get_frn(descriptor.frn) {
                    continue;
                }
                let field = self.items.get(descriptor.item_id).ok_or_else(|| {
                    EncodingError::new(
                        ErrorKind::InvalidMessage,
                        format!("FRN {} is set but item {} is missing", descriptor.frn, descriptor.item_id),
                    )
                    .with_category(self.category)
                    .with_item_id(descriptor.item_id)
                })?;
                engine::encode_item(descriptor.shape, &mut writer, field.as_ref()).map_err(|e| {
                    e.with_category(self.category).with_item_id(descriptor.item_id)
                })?;
            }
            written_bytes = (writer.bit_cursor() + 7) / 8;
        }
        sink.extend_from_slice(&buf[..written_bytes]);
        Ok(fspec_bytes.len() + written_bytes)
    }

    /// Replace this record's contents by decoding `bytes` from the start
    /// of a record (the FSPEC octets). Returns the number of bytes
    /// consumed. Unknown item ids on a `Fixed` slot are skipped for
    /// forward compatibility; any other shape fails the decode.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<usize, DecodeError> {
        self.items.clear();
        self.fspec.reset();

        let fspec_len = self
            .fspec
            .decode(bytes)
            .map_err(DecodeError::from)
            .map_err(|e| e.with_category(self.category))?;

        let mut reader = BitReader::new(&bytes[fspec_len..]);
        let mut consumed = fspec_len;

        for descriptor in self.uap.fields() {
            if !self.fspec.get_frn(descriptor.frn) {
                continue;
            }
            match self.uap.create_data_item(descriptor.item_id) {
                Ok(mut field) => {
                    let n = engine::decode_item(descriptor.shape, &mut reader, field.as_mut())
                        .map_err(|e| {
                            e.with_category(self.category)
                                .with_item_id(descriptor.item_id)
                                .with_position(consumed)
                        })?;
                    field.validate().map_err(DecodeError::from)?;
                    self.items.insert(descriptor.item_id, field);
                    consumed += n;
                }
                Err(_) => match descriptor.fixed_length_octets() {
                    Some(n) => {
                        reader.read_slice(n as usize)?;
                        consumed += n as usize;
                        log::debug!(
                            "{}: skipping unimplemented Fixed item {} ({n} octets) for forward compatibility",
                            self.category,
                            descriptor.item_id
                        );
                    }
                    None => {
                        return Err(DecodeError::new(
                            ErrorKind::UnknownDataItem,
                            format!(
                                "item {} is variable-length and not implemented; cannot skip",
                                descriptor.item_id
                            ),
                        )
                        .with_category(self.category)
                        .with_item_id(descriptor.item_id)
                        .with_position(consumed));
                    }
                },
            }
        }

        self.uap.validate(self)?;
        Ok(consumed)
    }

    /// Deep copy via encode-then-decode into a fresh record, guaranteeing
    /// independence without per-`Field`-variant `Clone` boilerplate.
    pub fn try_clone(&self) -> Result<Self, DecodeError> {
        let mut bytes = Vec::new();
        self.encode(&mut bytes).map_err(|e| {
            DecodeError::new(e.kind, e.cause)
                .with_category(self.category)
        })?;
        let mut clone = Record::new(self.category, Arc::clone(&self.uap))?;
        clone.decode(&bytes)?;
        Ok(clone)
    }

    /// Item ids currently present, unordered.
    pub fn item_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.items.keys().copied()
    }
}
