//! Multi-block byte-stream decoding: a UAP registry, one-shot decode of a
//! single Data Block, a reader-driven variant, a streaming variant with a
//! bounded internal buffer, a best-effort frame scanner for noisy sources,
//! and a parallel batch helper.
use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};

use crate::core::Category;
use crate::error::{DecodeError, ErrorKind};
use crate::pool::BufferPool;
use crate::protocol::datablock::DataBlock;
use crate::protocol::uap::Uap;

/// Default ceiling on `stream_decode`'s internal buffer: once more than
/// this many bytes have accumulated without completing a block, decoding
/// fails rather than growing without bound.
const DEFAULT_MAX_BUFFER_SIZE: usize = 1024 * 1024;

/// Header length shared with [`crate::protocol::datablock::DataBlock`]:
/// category octet plus 16-bit length.
const HEADER_LEN: usize = 3;

/// Callback signature for [`Decoder::stream_decode`]. Boxed so callers can
/// pass a closure that captures state (e.g. a channel sender) without the
/// decoder needing a generic parameter for every call site.
pub type DecodeCallback<'a> = dyn FnMut(DataBlock) -> Result<(), DecodeError> + 'a;

/// Decodes ASTERIX byte streams against a registry of per-category UAPs.
/// The registry is built once and is read-only afterwards; `decode`,
/// `decode_all`, and `extract_messages` take `&self` and are freely
/// callable from multiple threads. `stream_decode` serializes concurrent
/// callers on the same `Decoder` through an internal mutex so framing
/// stays consistent.
pub struct Decoder {
    registry: HashMap<Category, Arc<Uap>>,
    max_buffer_size: usize,
    stream_buffer: Mutex<Vec<u8>>,
    buffer_pool: Option<Arc<dyn BufferPool>>,
}

impl Decoder {
    /// Build a decoder with no registered categories. Use
    /// [`Decoder::register_uap`] or [`Decoder::with_uaps`] to populate it.
    pub fn new() -> Self {
        Self {
            registry: HashMap::new(),
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            stream_buffer: Mutex::new(Vec::new()),
            buffer_pool: None,
        }
    }

    /// Build a decoder pre-registered with every UAP in `uaps`.
    pub fn with_uaps(uaps: impl IntoIterator<Item = Uap>) -> Self {
        let mut decoder = Self::new();
        for uap in uaps {
            decoder.register_uap(uap);
        }
        decoder
    }

    /// Override the default 1 MiB ceiling on `stream_decode`'s internal
    /// buffer.
    pub fn with_max_buffer_size(mut self, max_buffer_size: usize) -> Self {
        self.max_buffer_size = max_buffer_size;
        self
    }

    /// Draw `stream_decode`'s accumulation buffer from `pool` instead of a
    /// plain heap allocation, and release it back on drop.
    pub fn with_buffer_pool(mut self, pool: Arc<dyn BufferPool>) -> Self {
        self.stream_buffer = Mutex::new(pool.acquire(0));
        self.buffer_pool = Some(pool);
        self
    }

    /// Register (or replace) the UAP for its category.
    pub fn register_uap(&mut self, uap: Uap) {
        self.registry.insert(uap.category(), Arc::new(uap));
    }

    fn uap_for(&self, category: Category) -> Result<&Arc<Uap>, DecodeError> {
        self.registry.get(&category).ok_or_else(|| {
            DecodeError::new(ErrorKind::UapNotDefined, format!("no UAP registered for {category}"))
                .with_category(category)
        })
    }

    /// Decode a single Data Block from `bytes`. The first octet selects the
    /// category and therefore the UAP; an unregistered category is a
    /// decode error rather than a silent skip.
    pub fn decode(&self, bytes: &[u8]) -> Result<DataBlock, DecodeError> {
        let cat_byte = *bytes
            .first()
            .ok_or_else(|| DecodeError::new(ErrorKind::InvalidMessage, "empty buffer has no category octet"))?;
        let category = Category::new(cat_byte)
            .ok_or_else(|| DecodeError::new(ErrorKind::InvalidCategory, "category 0 is not valid"))?;
        let uap = self.uap_for(category)?;
        let mut block = DataBlock::new(category, Arc::clone(uap))?;
        block.decode(bytes)?;
        Ok(block)
    }

    /// Decode every consecutive Data Block in `bytes`, slicing each by its
    /// own declared length. A truncated trailing block is reported as a
    /// `TruncatedMessage` error alongside the blocks already parsed.
    pub fn decode_all(&self, bytes: &[u8]) -> (Vec<DataBlock>, Option<DecodeError>) {
        let mut blocks = Vec::new();
        let mut offset = 0usize;
        while offset < bytes.len() {
            if bytes.len() - offset < HEADER_LEN {
                return (
                    blocks,
                    Some(
                        DecodeError::new(ErrorKind::TruncatedMessage, "trailing bytes too short for a header")
                            .with_position(offset)
                            .with_buffer_size(bytes.len()),
                    ),
                );
            }
            let declared_len = u16::from_be_bytes([bytes[offset + 1], bytes[offset + 2]]) as usize;
            if declared_len < HEADER_LEN || offset + declared_len > bytes.len() {
                return (
                    blocks,
                    Some(
                        DecodeError::new(ErrorKind::TruncatedMessage, "declared block length overruns the buffer")
                            .with_position(offset)
                            .with_buffer_size(bytes.len()),
                    ),
                );
            }
            match self.decode(&bytes[offset..offset + declared_len]) {
                Ok(block) => blocks.push(block),
                Err(e) => return (blocks, Some(e)),
            }
            offset += declared_len;
        }
        (blocks, None)
    }

    /// Read exactly one Data Block from `reader`: the 3-octet header
    /// first, then the declared remainder.
    pub fn decode_from<R: Read>(&self, reader: &mut R) -> Result<DataBlock, DecodeError> {
        let mut header = [0u8; HEADER_LEN];
        reader.read_exact(&mut header).map_err(|e| {
            DecodeError::new(ErrorKind::BufferTooShort, format!("failed to read Data Block header: {e}"))
        })?;
        let declared_len = u16::from_be_bytes([header[1], header[2]]) as usize;
        if declared_len < HEADER_LEN {
            return Err(DecodeError::new(
                ErrorKind::InvalidMessage,
                "declared Data Block length is shorter than the header itself",
            ));
        }
        let mut rest = vec![0u8; declared_len - HEADER_LEN];
        reader.read_exact(&mut rest).map_err(|e| {
            DecodeError::new(ErrorKind::BufferTooShort, format!("failed to read Data Block body: {e}"))
                .with_buffer_size(declared_len - HEADER_LEN)
        })?;
        let mut full = Vec::with_capacity(declared_len);
        full.extend_from_slice(&header);
        full.extend_from_slice(&rest);
        self.decode(&full)
    }

    /// Read from `reader` in chunks, accumulating into an internal buffer,
    /// and invoke `callback` once per complete Data Block as soon as it is
    /// available. A partial tail is retained between calls. Growing past
    /// `max_buffer_size` without completing a block fails rather than
    /// consuming memory without bound.
    pub fn stream_decode<R: Read>(&self, reader: &mut R, callback: &mut DecodeCallback<'_>) -> Result<(), DecodeError> {
        let mut scratch = [0u8; 4096];
        let mut buffer = self.stream_buffer.lock().expect("stream buffer mutex poisoned");

        loop {
            let n = reader
                .read(&mut scratch)
                .map_err(|e| DecodeError::new(ErrorKind::BufferTooShort, format!("stream read failed: {e}")))?;
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&scratch[..n]);
            if buffer.len() > self.max_buffer_size {
                let size = buffer.len();
                buffer.clear();
                return Err(DecodeError::new(
                    ErrorKind::BufferTooShort,
                    format!("stream buffer exceeded max_buffer_size ({size} bytes accumulated)"),
                ));
            }

            loop {
                if buffer.len() < HEADER_LEN {
                    break;
                }
                let declared_len = u16::from_be_bytes([buffer[1], buffer[2]]) as usize;
                if declared_len < HEADER_LEN || buffer.len() < declared_len {
                    break;
                }
                let block_bytes: Vec<u8> = buffer.drain(..declared_len).collect();
                let block = self.decode(&block_bytes)?;
                callback(block)?;
            }
        }
        Ok(())
    }

    /// Best-effort scan for ASTERIX frames embedded in a noisy byte source:
    /// at each offset, accept a `{category, length}` header if the category
    /// is registered and the declared length fits within the remaining
    /// buffer; otherwise advance one octet and try again.
    pub fn extract_messages<'a>(&self, bytes: &'a [u8]) -> Vec<&'a [u8]> {
        let mut messages = Vec::new();
        let mut offset = 0usize;
        while offset + HEADER_LEN <= bytes.len() {
            let cat_byte = bytes[offset];
            let declared_len = u16::from_be_bytes([bytes[offset + 1], bytes[offset + 2]]) as usize;
            let looks_valid = Category::new(cat_byte)
                .map(|c| self.registry.contains_key(&c))
                .unwrap_or(false)
                && declared_len >= HEADER_LEN
                && offset + declared_len <= bytes.len();
            if looks_valid {
                messages.push(&bytes[offset..offset + declared_len]);
                offset += declared_len;
            } else {
                offset += 1;
            }
        }
        messages
    }

    /// Fan independent `decode` calls for each of `messages` across a
    /// `rayon` thread pool. Every call reads a disjoint input and writes a
    /// disjoint result slot, so no additional synchronization is needed
    /// beyond the registry already being read-only. Returns the aligned
    /// results (a `None` slot marks a failed index) plus the first error
    /// encountered, if any.
    pub fn decode_parallel(&self, messages: &[&[u8]]) -> (Vec<Option<DataBlock>>, Option<DecodeError>) {
        use rayon::prelude::*;

        let outcomes: Vec<Result<DataBlock, DecodeError>> =
            messages.par_iter().map(|bytes| self.decode(bytes)).collect();

        let mut first_error = None;
        let results = outcomes
            .into_iter()
            .map(|outcome| match outcome {
                Ok(block) => Some(block),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                    None
                }
            })
            .collect();
        (results, first_error)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Decoder {
    fn drop(&mut self) {
        if let Some(pool) = &self.buffer_pool {
            let buffer = std::mem::take(&mut *self.stream_buffer.lock().expect("stream buffer mutex poisoned"));
            pool.release(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::fields::cat021::TargetReportDescriptor;
    use crate::protocol::fields::common::{Address24, DataSourceIdentifier};
    use crate::protocol::record::Record;
    use crate::protocol::uap::cat021;
    use std::io::Cursor;

    fn sample_block_bytes() -> Vec<u8> {
        let uap = Arc::new(cat021::uap());
        let mut record = Record::new(Category(21), Arc::clone(&uap)).unwrap();
        record
            .set_data_item("I021/010", Box::new(DataSourceIdentifier { sac: 4, sic: 5 }))
            .unwrap();
        record
            .set_data_item("I021/040", Box::new(TargetReportDescriptor::default()))
            .unwrap();
        record
            .set_data_item("I021/080", Box::new(Address24 { value: 0x112233 }))
            .unwrap();
        let mut block = DataBlock::new(Category(21), uap).unwrap();
        block.add_record(record).unwrap();
        block.encode().unwrap()
    }

    #[test]
    fn decode_unknown_category_fails() {
        let decoder = Decoder::new();
        let err = decoder.decode(&[21, 0, 3]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UapNotDefined);
    }

    #[test]
    fn decode_invalid_category_zero_fails() {
        let decoder = Decoder::with_uaps([cat021::uap()]);
        let err = decoder.decode(&[0, 0, 3]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCategory);
    }

    #[test]
    fn decode_known_category_round_trips() {
        let decoder = Decoder::with_uaps([cat021::uap()]);
        let bytes = sample_block_bytes();
        let block = decoder.decode(&bytes).unwrap();
        assert_eq!(block.record_count(), 1);
    }

    #[test]
    fn decode_all_splits_consecutive_blocks() {
        let decoder = Decoder::with_uaps([cat021::uap()]);
        let one = sample_block_bytes();
        let mut both = one.clone();
        both.extend_from_slice(&one);
        let (blocks, err) = decoder.decode_all(&both);
        assert!(err.is_none());
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn decode_all_reports_truncated_tail() {
        let decoder = Decoder::with_uaps([cat021::uap()]);
        let mut bytes = sample_block_bytes();
        bytes.truncate(bytes.len() - 1);
        let (blocks, err) = decoder.decode_all(&bytes);
        assert!(blocks.is_empty());
        assert!(matches!(err.unwrap().kind, ErrorKind::TruncatedMessage));
    }

    #[test]
    fn decode_from_reader_consumes_exact_length() {
        let decoder = Decoder::with_uaps([cat021::uap()]);
        let bytes = sample_block_bytes();
        let mut cursor = Cursor::new(bytes);
        let block = decoder.decode_from(&mut cursor).unwrap();
        assert_eq!(block.record_count(), 1);
    }

    #[test]
    fn stream_decode_emits_each_block_once() {
        let decoder = Decoder::with_uaps([cat021::uap()]);
        let one = sample_block_bytes();
        let mut both = one.clone();
        both.extend_from_slice(&one);
        let mut cursor = Cursor::new(both);
        let mut seen = 0usize;
        decoder
            .stream_decode(&mut cursor, &mut |_block| {
                seen += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn stream_decode_draws_accumulation_buffer_from_pool() {
        use crate::pool::VecPool;

        let pool = Arc::new(VecPool::new());
        let decoder = Decoder::with_uaps([cat021::uap()]).with_buffer_pool(pool);
        let bytes = sample_block_bytes();
        let mut cursor = Cursor::new(bytes);
        let mut seen = 0usize;
        decoder
            .stream_decode(&mut cursor, &mut |_block| {
                seen += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, 1);
    }

    #[test]
    fn extract_messages_skips_noise_bytes() {
        let decoder = Decoder::with_uaps([cat021::uap()]);
        let block = sample_block_bytes();
        let mut noisy = vec![0xFF, 0xEE, 0xDD];
        noisy.extend_from_slice(&block);
        let found = decoder.extract_messages(&noisy);
        assert_eq!(found, vec![block.as_slice()]);
    }

    #[test]
    fn decode_parallel_aligns_results_to_input_indices() {
        let decoder = Decoder::with_uaps([cat021::uap()]);
        let good = sample_block_bytes();
        let bad = vec![0u8, 0, 3];
        let messages: Vec<&[u8]> = vec![&good, &bad, &good];
        let (results, err) = decoder.decode_parallel(&messages);
        assert!(err.is_some());
        assert!(results[0].is_some());
        assert!(results[1].is_none());
        assert!(results[2].is_some());
    }
}
