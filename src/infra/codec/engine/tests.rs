use super::*;
use crate::infra::codec::traits::FieldValue;

/// Minimal Field stand-in used to exercise the shape engine in isolation,
/// independent of any real category's item layout.
#[derive(Debug, Default, Clone, PartialEq)]
struct Probe {
    bytes: Vec<u8>,
}

impl Field for Probe {
    fn decode(&mut self, reader: &mut BitReader<'_>, hint: ShapeHint) -> Result<(), DecodeError> {
        let remaining_bytes = reader.bytes_remaining();
        self.bytes = reader.read_slice(remaining_bytes)?.to_vec();
        if let ShapeHint::Repetitive { count } = hint {
            // Element width is implied by total bytes / count for this probe.
            assert_eq!(self.bytes.len() % count.max(1), 0);
        }
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        writer.write_slice(&self.bytes)?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        self.bytes.len()
    }

    fn repetition_count(&self) -> usize {
        if self.bytes.is_empty() {
            0
        } else {
            self.bytes.len() / 2
        }
    }

    fn value(&self) -> FieldValue {
        FieldValue::Bytes(self.bytes.clone())
    }
}

#[test]
fn fixed_shape_round_trips() {
    let source = [0xAA, 0xBB, 0xCC];
    let mut reader = BitReader::new(&source);
    let mut field = Probe::default();
    let n = decode_item(ItemShape::Fixed(3), &mut reader, &mut field).unwrap();
    assert_eq!(n, 3);
    assert_eq!(field.bytes, vec![0xAA, 0xBB, 0xCC]);

    let mut buf = [0u8; 3];
    let mut writer = BitWriter::new(&mut buf);
    let written = encode_item(ItemShape::Fixed(3), &mut writer, &field).unwrap();
    assert_eq!(written, 3);
    assert_eq!(buf, source);
}

#[test]
fn fixed_shape_too_short_errors() {
    let source = [0xAAu8];
    let mut reader = BitReader::new(&source);
    let mut field = Probe::default();
    assert!(decode_item(ItemShape::Fixed(4), &mut reader, &mut field).is_err());
}

#[test]
fn extended_shape_reads_until_fx_clear() {
    // Three octets: first two with FX set, third with FX clear.
    let source = [0x03, 0x05, 0x08];
    let mut reader = BitReader::new(&source);
    let mut field = Probe::default();
    let n = decode_item(ItemShape::Extended, &mut reader, &mut field).unwrap();
    assert_eq!(n, 3);
    assert_eq!(field.bytes, vec![0x03, 0x05, 0x08]);
}

#[test]
fn extended_shape_rejects_unterminated_chain() {
    let source = [0xFFu8; 8];
    let mut reader = BitReader::new(&source);
    let mut field = Probe::default();
    assert!(decode_item(ItemShape::Extended, &mut reader, &mut field).is_err());
}

#[test]
fn explicit_shape_uses_length_prefix() {
    let source = [0x04, 0x11, 0x22, 0x33];
    let mut reader = BitReader::new(&source);
    let mut field = Probe::default();
    let n = decode_item(ItemShape::Explicit, &mut reader, &mut field).unwrap();
    assert_eq!(n, 4);
    assert_eq!(field.bytes, vec![0x11, 0x22, 0x33]);

    let mut buf = [0u8; 4];
    let mut writer = BitWriter::new(&mut buf);
    let written = encode_item(ItemShape::Explicit, &mut writer, &field).unwrap();
    assert_eq!(written, 4);
    assert_eq!(buf, source);
}

#[test]
fn explicit_shape_rejects_zero_length() {
    let source = [0x00u8, 0xFF];
    let mut reader = BitReader::new(&source);
    let mut field = Probe::default();
    assert!(decode_item(ItemShape::Explicit, &mut reader, &mut field).is_err());
}

#[test]
fn repetitive_shape_reads_count_then_elements() {
    // count = 2, element width = 2 octets each.
    let source = [0x02, 0x01, 0x02, 0x03, 0x04];
    let mut reader = BitReader::new(&source);
    let mut field = Probe::default();
    let n = decode_item(
        ItemShape::Repetitive { element_octets: 2 },
        &mut reader,
        &mut field,
    )
    .unwrap();
    assert_eq!(n, 5);
    assert_eq!(field.bytes, vec![0x01, 0x02, 0x03, 0x04]);

    let mut buf = [0u8; 5];
    let mut writer = BitWriter::new(&mut buf);
    let written = encode_item(
        ItemShape::Repetitive { element_octets: 2 },
        &mut writer,
        &field,
    )
    .unwrap();
    assert_eq!(written, 5);
    assert_eq!(buf, source);
}

#[test]
fn repetitive_shape_zero_count_is_one_octet() {
    let source = [0x00u8, 0xFF, 0xFF];
    let mut reader = BitReader::new(&source);
    let mut field = Probe::default();
    let n = decode_item(
        ItemShape::Repetitive { element_octets: 2 },
        &mut reader,
        &mut field,
    )
    .unwrap();
    assert_eq!(n, 1);
    assert!(field.bytes.is_empty());
}
