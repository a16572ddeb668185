//! Field shapes that recur across categories: SAC/SIC identifiers,
//! fractional fixed-point quantities, raw 24-bit addresses, a single status
//! byte, and the generic Compound sub-FSPEC container.
use crate::error::{DecodeError, EncodingError, ValidationError};
use crate::infra::codec::bits::{sign_extend, BitReader, BitWriter};
use crate::infra::codec::engine::read_fx_chain;
use crate::infra::codec::fspec::Fspec;
use crate::infra::codec::traits::{Field, FieldValue, ShapeHint};

/// Data Source Identifier: System Area Code + System Identification Code.
/// Shared by every category's first mandatory item (I0xx/010).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DataSourceIdentifier {
    pub sac: u8,
    pub sic: u8,
}

impl Field for DataSourceIdentifier {
    fn decode(&mut self, reader: &mut BitReader<'_>, _hint: ShapeHint) -> Result<(), DecodeError> {
        self.sac = reader.read_u8(8)?;
        self.sic = reader.read_u8(8)?;
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        writer.write_u8(self.sac, 8)?;
        writer.write_u8(self.sic, 8)?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        2
    }

    fn value(&self) -> FieldValue {
        FieldValue::Bytes(vec![self.sac, self.sic])
    }
}

/// Unsigned fractional quantity stored on `bits` bits (≤ 32) with a scale
/// `lsb` converting the raw integer to a physical unit, e.g. Rho's
/// LSB = 1/256 NM or Sector Number's LSB = 360/256 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionalUnsigned {
    pub raw: u32,
    bits: u8,
    lsb: f64,
}

impl FractionalUnsigned {
    pub fn new(bits: u8, lsb: f64) -> Self {
        Self { raw: 0, bits, lsb }
    }

    pub fn physical_value(&self) -> f64 {
        self.raw as f64 * self.lsb
    }

    pub fn set_physical_value(&mut self, value: f64) {
        self.raw = (value / self.lsb).round() as u32;
    }
}

impl Field for FractionalUnsigned {
    fn decode(&mut self, reader: &mut BitReader<'_>, _hint: ShapeHint) -> Result<(), DecodeError> {
        self.raw = reader.read_u32(self.bits)?;
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        writer.write_u32(self.raw, self.bits)?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        (self.bits as usize + 7) / 8
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !self.physical_value().is_finite() {
            return Err(ValidationError::new(
                "fractional field",
                "raw",
                self.raw,
                "non-finite physical value",
            ));
        }
        Ok(())
    }

    fn value(&self) -> FieldValue {
        FieldValue::Scaled {
            raw: self.raw as i64,
            lsb: self.lsb,
        }
    }
}

/// Signed two's-complement fractional quantity, e.g. Flight Level's
/// LSB = 1/4 FL or a WGS-84 latitude/longitude coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionalSigned {
    pub raw: i64,
    bits: u8,
    lsb: f64,
}

impl FractionalSigned {
    pub fn new(bits: u8, lsb: f64) -> Self {
        Self { raw: 0, bits, lsb }
    }

    pub fn physical_value(&self) -> f64 {
        self.raw as f64 * self.lsb
    }

    pub fn set_physical_value(&mut self, value: f64) {
        self.raw = (value / self.lsb).round() as i64;
    }
}

impl Field for FractionalSigned {
    fn decode(&mut self, reader: &mut BitReader<'_>, _hint: ShapeHint) -> Result<(), DecodeError> {
        let unsigned = reader.read_u64(self.bits)?;
        self.raw = sign_extend(unsigned, self.bits);
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        let mask = if self.bits >= 64 {
            u64::MAX
        } else {
            (1u64 << self.bits) - 1
        };
        writer.write_u64(self.raw as u64 & mask, self.bits)?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        (self.bits as usize + 7) / 8
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !self.physical_value().is_finite() {
            return Err(ValidationError::new(
                "fractional field",
                "raw",
                self.raw,
                "non-finite physical value",
            ));
        }
        Ok(())
    }

    fn value(&self) -> FieldValue {
        FieldValue::Scaled {
            raw: self.raw,
            lsb: self.lsb,
        }
    }
}

/// Plain 24-bit unsigned address: ICAO 24-bit target address, Mode S
/// aircraft address, or a sensor identifier depending on the owning item.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Address24 {
    pub value: u32,
}

impl Field for Address24 {
    fn decode(&mut self, reader: &mut BitReader<'_>, _hint: ShapeHint) -> Result<(), DecodeError> {
        self.value = reader.read_u32(24)?;
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        writer.write_u32(self.value, 24)?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        3
    }

    fn value(&self) -> FieldValue {
        FieldValue::U32(self.value)
    }
}

/// A single status/type octet accessed by masked sub-fields, e.g. Message
/// Type (I002/000) or the Communications/ACAS Capability and Flight Status
/// octet (I048/230).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusByte {
    pub raw: u8,
}

impl StatusByte {
    pub fn bits(&self, shift: u8, width: u8) -> u8 {
        let mask = ((1u16 << width) - 1) as u8;
        (self.raw >> shift) & mask
    }

    pub fn set_bits(&mut self, shift: u8, width: u8, value: u8) {
        let mask = ((1u16 << width) - 1) as u8;
        self.raw = (self.raw & !(mask << shift)) | ((value & mask) << shift);
    }
}

impl Field for StatusByte {
    fn decode(&mut self, reader: &mut BitReader<'_>, _hint: ShapeHint) -> Result<(), DecodeError> {
        self.raw = reader.read_u8(8)?;
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        writer.write_u8(self.raw, 8)?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }

    fn value(&self) -> FieldValue {
        FieldValue::U8(self.raw)
    }
}

/// Declares one sub-item slot of a [`CompoundGeneric`] item: its Field
/// Reference Number within the sub-FSPEC, diagnostic name, and fixed
/// octet width.
#[derive(Debug, Clone, Copy)]
pub struct SubItemDescriptor {
    pub frn: u8,
    pub name: &'static str,
    pub octets: u16,
}

/// Generic Compound item: a nested sub-FSPEC followed by fixed-width
/// sub-items in ascending FRN order. Representative of CAT034's Position
/// Data / System Configuration and Status and CAT063's Sensor
/// Configuration and Status — categories whose sub-items this crate does
/// not break out into individually typed structs.
#[derive(Debug, Clone)]
pub struct CompoundGeneric {
    descriptors: &'static [SubItemDescriptor],
    fspec: Fspec,
    values: Vec<(u8, Vec<u8>)>,
}

impl CompoundGeneric {
    pub fn new(descriptors: &'static [SubItemDescriptor]) -> Self {
        Self {
            descriptors,
            fspec: Fspec::new(),
            values: Vec::new(),
        }
    }

    /// Set the raw bytes for sub-item `frn`; length must match its
    /// descriptor width.
    pub fn set_sub_item(&mut self, frn: u8, bytes: Vec<u8>) -> Result<(), ValidationError> {
        let descriptor = self
            .descriptors
            .iter()
            .find(|d| d.frn == frn)
            .ok_or_else(|| {
                ValidationError::new("compound item", "frn", frn, "no such sub-item descriptor")
            })?;
        if bytes.len() != descriptor.octets as usize {
            return Err(ValidationError::new(
                "compound item",
                descriptor.name,
                bytes.len(),
                "sub-item byte length does not match its descriptor",
            ));
        }
        self.fspec.set_frn(frn).map_err(|_| {
            ValidationError::new("compound item", descriptor.name, frn, "invalid sub-item FRN")
        })?;
        self.values.retain(|(existing, _)| *existing != frn);
        self.values.push((frn, bytes));
        self.values.sort_by_key(|(frn, _)| *frn);
        Ok(())
    }

    pub fn sub_item(&self, frn: u8) -> Option<&[u8]> {
        self.values
            .iter()
            .find(|(f, _)| *f == frn)
            .map(|(_, bytes)| bytes.as_slice())
    }
}

impl Field for CompoundGeneric {
    fn decode(&mut self, reader: &mut BitReader<'_>, _hint: ShapeHint) -> Result<(), DecodeError> {
        let fspec_bytes = read_fx_chain(reader)?;
        self.fspec = Fspec::new();
        self.fspec.decode(&fspec_bytes)?;
        self.values.clear();

        for frn in self.fspec.present_frns() {
            let descriptor = self.descriptors.iter().find(|d| d.frn == frn).ok_or_else(|| {
                DecodeError::new(
                    crate::error::ErrorKind::UnknownDataItem,
                    format!("compound sub-item FRN {frn} has no descriptor"),
                )
            })?;
            let slice = reader.read_slice(descriptor.octets as usize)?;
            self.values.push((frn, slice.to_vec()));
        }
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        let mut fspec_bytes = Vec::new();
        self.fspec.encode(&mut fspec_bytes)?;
        writer.write_slice(&fspec_bytes)?;
        for (_, bytes) in &self.values {
            writer.write_slice(bytes)?;
        }
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        self.fspec.size().max(1) + self.values.iter().map(|(_, b)| b.len()).sum::<usize>()
    }

    fn value(&self) -> FieldValue {
        FieldValue::Compound(
            self.values
                .iter()
                .filter_map(|(frn, bytes)| {
                    self.descriptors
                        .iter()
                        .find(|d| d.frn == *frn)
                        .map(|d| (d.name, FieldValue::Bytes(bytes.clone())))
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_source_identifier_round_trips() {
        let field = DataSourceIdentifier { sac: 25, sic: 3 };
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        field.encode(&mut writer, ShapeHint::Plain).unwrap();
        assert_eq!(buf, [25, 3]);

        let mut decoded = DataSourceIdentifier::default();
        let mut reader = BitReader::new(&buf);
        decoded.decode(&mut reader, ShapeHint::Plain).unwrap();
        assert_eq!(decoded, field);
    }

    #[test]
    fn fractional_unsigned_rho_lsb() {
        let mut field = FractionalUnsigned::new(16, 1.0 / 256.0);
        field.set_physical_value(10.0);
        assert_eq!(field.raw, 2560);
        assert!((field.physical_value() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn fractional_signed_flight_level_round_trip() {
        let mut field = FractionalSigned::new(16, 0.25);
        field.set_physical_value(-25.0);
        let mut buf = [0u8; 2];
        let mut writer = BitWriter::new(&mut buf);
        field.encode(&mut writer, ShapeHint::Plain).unwrap();

        let mut decoded = FractionalSigned::new(16, 0.25);
        let mut reader = BitReader::new(&buf);
        decoded.decode(&mut reader, ShapeHint::Plain).unwrap();
        assert!((decoded.physical_value() - (-25.0)).abs() < 1e-9);
    }

    #[test]
    fn compound_generic_round_trips_present_sub_items() {
        static SUBS: &[SubItemDescriptor] = &[
            SubItemDescriptor {
                frn: 1,
                name: "Polar Position",
                octets: 4,
            },
            SubItemDescriptor {
                frn: 2,
                name: "Height",
                octets: 2,
            },
        ];
        let mut field = CompoundGeneric::new(SUBS);
        field.set_sub_item(2, vec![0x01, 0x02]).unwrap();

        let mut buf = vec![0u8; field.encoded_len()];
        let mut writer = BitWriter::new(&mut buf);
        field.encode(&mut writer, ShapeHint::Plain).unwrap();

        let mut decoded = CompoundGeneric::new(SUBS);
        let mut reader = BitReader::new(&buf);
        decoded.decode(&mut reader, ShapeHint::Plain).unwrap();
        assert_eq!(decoded.sub_item(2), Some([0x01, 0x02].as_slice()));
        assert_eq!(decoded.sub_item(1), None);
    }

    #[test]
    fn compound_generic_rejects_wrong_width() {
        static SUBS: &[SubItemDescriptor] = &[SubItemDescriptor {
            frn: 1,
            name: "Polar Position",
            octets: 4,
        }];
        let mut field = CompoundGeneric::new(SUBS);
        assert!(field.set_sub_item(1, vec![0x00]).is_err());
    }
}
