//! Generic item-shape engine. A single pair of functions, parameterized by
//! [`ItemShape`], frames every data item's length on the wire and hands the
//! payload bytes to a [`Field`] implementation — mirroring the teacher's
//! descriptor-driven `serialize`/`deserialize_into` pair, but keyed on shape
//! rather than on a generated struct's field table.
use crate::core::ItemShape;
use crate::error::{DecodeError, EncodingError, ErrorKind};
use crate::infra::codec::bits::{BitReader, BitWriter};
use crate::infra::codec::traits::{Field, ShapeHint};

/// Maximum octets an Extended (FX-chained) item may span before the chain
/// is considered malformed. No shipped category's Extended items need
/// more than a handful of extension octets.
const MAX_EXTENDED_OCTETS: usize = 8;

/// Decode one data item according to `shape`, reading from `reader` and
/// filling `field`. Returns the number of octets consumed.
pub fn decode_item(
    shape: ItemShape,
    reader: &mut BitReader<'_>,
    field: &mut dyn Field,
) -> Result<usize, DecodeError> {
    match shape {
        ItemShape::Fixed(n) => {
            let slice = reader.read_slice(n as usize)?;
            let mut sub = BitReader::new(slice);
            field.decode(&mut sub, ShapeHint::Plain)?;
            Ok(n as usize)
        }
        ItemShape::Extended => {
            let bytes = read_fx_chain(reader)?;
            let mut sub = BitReader::new(&bytes);
            field.decode(&mut sub, ShapeHint::Plain)?;
            Ok(bytes.len())
        }
        ItemShape::Explicit => {
            let len_octet = reader.read_u8(8)?;
            if len_octet == 0 {
                return Err(DecodeError::new(
                    ErrorKind::InvalidLength,
                    "Explicit item length octet cannot be zero",
                ));
            }
            let payload_len = len_octet as usize - 1;
            let slice = reader.read_slice(payload_len)?;
            let mut sub = BitReader::new(slice);
            field.decode(&mut sub, ShapeHint::Plain)?;
            Ok(len_octet as usize)
        }
        ItemShape::Repetitive { element_octets } => {
            let count = reader.read_u8(8)? as usize;
            let payload_len = count * element_octets as usize;
            let slice = reader.read_slice(payload_len)?;
            let mut sub = BitReader::new(slice);
            field.decode(&mut sub, ShapeHint::Repetitive { count })?;
            Ok(1 + payload_len)
        }
        ItemShape::Compound => {
            // Compound items are self-describing: a sub-FSPEC followed by
            // sub-items in sub-UAP order. The Field owns both the sub-FSPEC
            // decode and the sub-item loop, since the set of sub-items is
            // fixed per concrete Compound field, not generic over `shape`.
            let start = reader.bit_cursor();
            field.decode(reader, ShapeHint::Plain)?;
            Ok((reader.bit_cursor() - start) / 8)
        }
    }
}

/// Encode one data item according to `shape`, writing to `writer`. Returns
/// the number of octets written.
pub fn encode_item(
    shape: ItemShape,
    writer: &mut BitWriter<'_>,
    field: &dyn Field,
) -> Result<usize, EncodingError> {
    match shape {
        ItemShape::Fixed(n) => {
            let mut buf = vec![0u8; n as usize];
            let mut sub = BitWriter::new(&mut buf);
            field.encode(&mut sub, ShapeHint::Plain)?;
            writer.write_slice(&buf)?;
            Ok(n as usize)
        }
        ItemShape::Extended => {
            let mut buf = vec![0u8; field.encoded_len().max(1)];
            let mut sub = BitWriter::new(&mut buf);
            field.encode(&mut sub, ShapeHint::Plain)?;
            let written = (sub.bit_cursor() + 7) / 8;
            writer.write_slice(&buf[..written])?;
            Ok(written)
        }
        ItemShape::Explicit => {
            let payload_len = field.encoded_len();
            let total_len = payload_len + 1;
            if total_len > u8::MAX as usize {
                return Err(EncodingError::new(
                    ErrorKind::InvalidLength,
                    "Explicit item payload exceeds 254 octets",
                ));
            }
            writer.write_u8(total_len as u8, 8)?;
            let mut buf = vec![0u8; payload_len];
            let mut sub = BitWriter::new(&mut buf);
            field.encode(&mut sub, ShapeHint::Plain)?;
            writer.write_slice(&buf)?;
            Ok(total_len)
        }
        ItemShape::Repetitive { element_octets } => {
            let count = field.repetition_count();
            if count > u8::MAX as usize {
                return Err(EncodingError::new(
                    ErrorKind::InvalidLength,
                    "Repetitive item has more than 255 elements",
                ));
            }
            writer.write_u8(count as u8, 8)?;
            let payload_len = count * element_octets as usize;
            let mut buf = vec![0u8; payload_len];
            let mut sub = BitWriter::new(&mut buf);
            field.encode(&mut sub, ShapeHint::Repetitive { count })?;
            writer.write_slice(&buf)?;
            Ok(1 + payload_len)
        }
        ItemShape::Compound => {
            let mut buf = vec![0u8; field.encoded_len()];
            let mut sub = BitWriter::new(&mut buf);
            field.encode(&mut sub, ShapeHint::Plain)?;
            let written = (sub.bit_cursor() + 7) / 8;
            writer.write_slice(&buf[..written])?;
            Ok(written)
        }
    }
}

/// Read an FX-chained octet sequence starting at the current cursor,
/// returning the raw octets (FX bits included — the Field interprets its
/// own first-octet layout and any extension-octet meaning). Stops at the
/// first octet whose LSB is 0.
pub(crate) fn read_fx_chain(reader: &mut BitReader<'_>) -> Result<Vec<u8>, DecodeError> {
    let mut octets = Vec::new();
    loop {
        let octet = reader.read_u8(8)?;
        octets.push(octet);
        if octet & 0x01 == 0 {
            break;
        }
        if octets.len() == MAX_EXTENDED_OCTETS {
            return Err(DecodeError::new(
                ErrorKind::InvalidMessage,
                "Extended item FX chain did not terminate",
            ));
        }
    }
    Ok(octets)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
