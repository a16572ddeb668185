//! Items specific to CAT021 (ADS-B Target Reports), plus the Target Report
//! Descriptor shared with CAT001/CAT048.
use crate::error::{DecodeError, EncodingError, ValidationError};
use crate::infra::codec::bits::{sign_extend, BitReader, BitWriter};
use crate::infra::codec::traits::{Field, FieldValue, ShapeHint};

/// Target Report Descriptor: an Extended (FX-chained) item whose first
/// octet carries TYP (3 bits), SIM, RDP, SPI, RAB, then FX. Extension
/// octets carry category-specific flags this crate does not decode
/// individually; they are retained as raw bytes for round-tripping.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TargetReportDescriptor {
    pub typ: u8,
    pub sim: bool,
    pub rdp: bool,
    pub spi: bool,
    pub rab: bool,
    extension_octets: Vec<u8>,
}

impl Field for TargetReportDescriptor {
    fn decode(&mut self, reader: &mut BitReader<'_>, _hint: ShapeHint) -> Result<(), DecodeError> {
        let first = reader.read_u8(8)?;
        self.typ = (first >> 5) & 0x07;
        self.sim = first & 0x10 != 0;
        self.rdp = first & 0x08 != 0;
        self.spi = first & 0x04 != 0;
        self.rab = first & 0x02 != 0;
        self.extension_octets.clear();
        let mut fx = first & 0x01 != 0;
        while fx {
            let octet = reader.read_u8(8)?;
            fx = octet & 0x01 != 0;
            self.extension_octets.push(octet);
        }
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        let fx = !self.extension_octets.is_empty();
        let mut first = (self.typ & 0x07) << 5;
        if self.sim {
            first |= 0x10;
        }
        if self.rdp {
            first |= 0x08;
        }
        if self.spi {
            first |= 0x04;
        }
        if self.rab {
            first |= 0x02;
        }
        if fx {
            first |= 0x01;
        }
        writer.write_u8(first, 8)?;
        for octet in &self.extension_octets {
            writer.write_u8(*octet, 8)?;
        }
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1 + self.extension_octets.len()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.typ > 0x07 {
            return Err(ValidationError::new(
                "I021/080",
                "typ",
                self.typ,
                "TYP field only occupies 3 bits",
            ));
        }
        Ok(())
    }

    fn value(&self) -> FieldValue {
        FieldValue::Compound(vec![
            ("TYP", FieldValue::U8(self.typ)),
            ("SIM", FieldValue::Bool(self.sim)),
            ("RDP", FieldValue::Bool(self.rdp)),
            ("SPI", FieldValue::Bool(self.spi)),
            ("RAB", FieldValue::Bool(self.rab)),
        ])
    }
}

/// Position in WGS-84 coordinates: 3-byte signed latitude followed by a
/// 3-byte signed longitude, both LSB = 180 / 2^23 degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PositionWgs84 {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

const WGS84_LSB: f64 = 180.0 / 8_388_608.0;

impl Field for PositionWgs84 {
    fn decode(&mut self, reader: &mut BitReader<'_>, _hint: ShapeHint) -> Result<(), DecodeError> {
        let lat_raw = sign_extend(reader.read_u32(24)? as u64, 24);
        let lon_raw = sign_extend(reader.read_u32(24)? as u64, 24);
        self.latitude_deg = lat_raw as f64 * WGS84_LSB;
        self.longitude_deg = lon_raw as f64 * WGS84_LSB;
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        let lat_raw = (self.latitude_deg / WGS84_LSB).round() as i64 as u32 & 0x00FF_FFFF;
        let lon_raw = (self.longitude_deg / WGS84_LSB).round() as i64 as u32 & 0x00FF_FFFF;
        writer.write_u32(lat_raw, 24)?;
        writer.write_u32(lon_raw, 24)?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        6
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(ValidationError::new(
                "I021/130",
                "latitude_deg",
                self.latitude_deg,
                "latitude out of range",
            ));
        }
        if !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err(ValidationError::new(
                "I021/130",
                "longitude_deg",
                self.longitude_deg,
                "longitude out of range",
            ));
        }
        Ok(())
    }

    fn value(&self) -> FieldValue {
        FieldValue::Compound(vec![
            ("latitude_deg", FieldValue::F64(self.latitude_deg)),
            ("longitude_deg", FieldValue::F64(self.longitude_deg)),
        ])
    }
}

const IA5_SIXBIT: [u8; 64] = [
    b' ', b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'J', b'K', b'L', b'M', b'N', b'O',
    b'P', b'Q', b'R', b'S', b'T', b'U', b'V', b'W', b'X', b'Y', b'Z', b' ', b' ', b' ', b' ', b' ',
    b' ', b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b' ', b' ', b' ', b' ', b' ',
    b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ', b' ',
];

/// Target Identification / callsign: eight characters packed 6 bits each
/// into 48 bits, using the ASTERIX restricted IA5 alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetIdentification {
    pub callsign: [u8; 8],
}

impl Default for TargetIdentification {
    fn default() -> Self {
        Self { callsign: [b' '; 8] }
    }
}

impl Field for TargetIdentification {
    fn decode(&mut self, reader: &mut BitReader<'_>, _hint: ShapeHint) -> Result<(), DecodeError> {
        for slot in self.callsign.iter_mut() {
            let code = reader.read_u8(6)?;
            *slot = IA5_SIXBIT[code as usize];
        }
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        for &ch in &self.callsign {
            let code = IA5_SIXBIT
                .iter()
                .position(|&c| c == ch)
                .unwrap_or(0) as u8;
            writer.write_u8(code, 6)?;
        }
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        6
    }

    fn value(&self) -> FieldValue {
        FieldValue::Text(String::from_utf8_lossy(&self.callsign).trim_end().to_string())
    }
}

/// One 8-octet BDS register: 56 bits of Mode S Comm-B data followed by
/// the BDS1/BDS2 register code.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BdsRegister {
    pub mb_data: [u8; 7],
    pub bds_code: u8,
}

/// Mode S MB Data: a Repetitive item of 8-octet BDS registers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ModeSMbData {
    pub registers: Vec<BdsRegister>,
}

impl Field for ModeSMbData {
    fn decode(&mut self, reader: &mut BitReader<'_>, hint: ShapeHint) -> Result<(), DecodeError> {
        let count = match hint {
            ShapeHint::Repetitive { count } => count,
            ShapeHint::Plain => 0,
        };
        self.registers.clear();
        for _ in 0..count {
            let mut mb_data = [0u8; 7];
            for byte in mb_data.iter_mut() {
                *byte = reader.read_u8(8)?;
            }
            let bds_code = reader.read_u8(8)?;
            self.registers.push(BdsRegister { mb_data, bds_code });
        }
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        for register in &self.registers {
            for byte in register.mb_data {
                writer.write_u8(byte, 8)?;
            }
            writer.write_u8(register.bds_code, 8)?;
        }
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        self.registers.len() * 8
    }

    fn repetition_count(&self) -> usize {
        self.registers.len()
    }

    fn value(&self) -> FieldValue {
        FieldValue::Repetitive(
            self.registers
                .iter()
                .map(|r| {
                    let mut bytes = r.mb_data.to_vec();
                    bytes.push(r.bds_code);
                    FieldValue::Bytes(bytes)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_report_descriptor_round_trips_without_extension() {
        let field = TargetReportDescriptor {
            typ: 3,
            sim: true,
            rdp: false,
            spi: true,
            rab: false,
            extension_octets: Vec::new(),
        };
        let mut buf = [0u8; 1];
        let mut writer = BitWriter::new(&mut buf);
        field.encode(&mut writer, ShapeHint::Plain).unwrap();
        assert_eq!(buf[0] & 0x01, 0);

        let mut decoded = TargetReportDescriptor::default();
        let mut reader = BitReader::new(&buf);
        decoded.decode(&mut reader, ShapeHint::Plain).unwrap();
        assert_eq!(decoded, field);
    }

    #[test]
    fn target_report_descriptor_round_trips_with_extension() {
        let field = TargetReportDescriptor {
            typ: 1,
            sim: false,
            rdp: true,
            spi: false,
            rab: true,
            extension_octets: vec![0xAA, 0xCC],
        };
        let mut buf = [0u8; 3];
        let mut writer = BitWriter::new(&mut buf);
        field.encode(&mut writer, ShapeHint::Plain).unwrap();

        let mut decoded = TargetReportDescriptor::default();
        let mut reader = BitReader::new(&buf);
        decoded.decode(&mut reader, ShapeHint::Plain).unwrap();
        assert_eq!(decoded, field);
    }

    #[test]
    fn position_wgs84_round_trips() {
        let mut field = PositionWgs84 {
            latitude_deg: 52.3,
            longitude_deg: -4.1,
        };
        let mut buf = [0u8; 6];
        let mut writer = BitWriter::new(&mut buf);
        field.encode(&mut writer, ShapeHint::Plain).unwrap();

        let mut decoded = PositionWgs84::default();
        let mut reader = BitReader::new(&buf);
        decoded.decode(&mut reader, ShapeHint::Plain).unwrap();
        assert!((decoded.latitude_deg - field.latitude_deg).abs() < 1e-4);
        assert!((decoded.longitude_deg - field.longitude_deg).abs() < 1e-4);
        field.validate().unwrap();
    }

    #[test]
    fn position_wgs84_pins_wire_bytes() {
        // 45.0 deg -> 45 / (180/2^23) = 2^23/4 = 0x200000.
        // -90.0 deg -> -(2^23/2) = -0x400000, 24-bit two's complement 0xC00000.
        let field = PositionWgs84 {
            latitude_deg: 45.0,
            longitude_deg: -90.0,
        };
        let mut buf = [0u8; 6];
        let mut writer = BitWriter::new(&mut buf);
        field.encode(&mut writer, ShapeHint::Plain).unwrap();
        assert_eq!(buf, [0x20, 0x00, 0x00, 0xC0, 0x00, 0x00]);
    }

    #[test]
    fn target_identification_pins_wire_bytes() {
        let mut field = TargetIdentification::default();
        field.callsign = *b"KLM1023 ";
        let mut buf = [0u8; 6];
        let mut writer = BitWriter::new(&mut buf);
        field.encode(&mut writer, ShapeHint::Plain).unwrap();
        assert_eq!(buf, [0x2C, 0xC3, 0x62, 0x86, 0x39, 0x00]);
    }

    #[test]
    fn target_identification_round_trips_callsign() {
        let mut field = TargetIdentification::default();
        field.callsign = *b"KLM1023 ";
        let mut buf = [0u8; 6];
        let mut writer = BitWriter::new(&mut buf);
        field.encode(&mut writer, ShapeHint::Plain).unwrap();

        let mut decoded = TargetIdentification::default();
        let mut reader = BitReader::new(&buf);
        decoded.decode(&mut reader, ShapeHint::Plain).unwrap();
        assert_eq!(decoded, field);
        assert_eq!(decoded.value(), FieldValue::Text("KLM1023".to_string()));
    }

    #[test]
    fn mode_s_mb_data_round_trips_repetitive_count() {
        let field = ModeSMbData {
            registers: vec![
                BdsRegister {
                    mb_data: [1, 2, 3, 4, 5, 6, 7],
                    bds_code: 0x40,
                },
                BdsRegister {
                    mb_data: [8, 9, 10, 11, 12, 13, 14],
                    bds_code: 0x51,
                },
            ],
        };
        let mut buf = vec![0u8; field.encoded_len()];
        let mut writer = BitWriter::new(&mut buf);
        field
            .encode(&mut writer, ShapeHint::Repetitive { count: 2 })
            .unwrap();

        let mut decoded = ModeSMbData::default();
        let mut reader = BitReader::new(&buf);
        decoded
            .decode(&mut reader, ShapeHint::Repetitive { count: 2 })
            .unwrap();
        assert_eq!(decoded, field);
    }
}
