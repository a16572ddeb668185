//! Items specific to CAT048 (and reused by CAT001): Mode-3/A Code and the
//! Measured Position in Polar Coordinates.
use crate::error::{DecodeError, EncodingError, ValidationError};
use crate::infra::codec::bits::{BitReader, BitWriter};
use crate::infra::codec::traits::{Field, FieldValue, ShapeHint};

/// Mode-3/A Code: V/G/L validity flags, a spare bit, and a 12-bit
/// transponder code conventionally rendered as four octal digits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Mode3ACode {
    pub validated: bool,
    pub garbled: bool,
    pub from_mode_3a: bool,
    pub code: u16,
}

impl Field for Mode3ACode {
    fn decode(&mut self, reader: &mut BitReader<'_>, _hint: ShapeHint) -> Result<(), DecodeError> {
        self.validated = reader.read_u8(1)? == 0;
        self.garbled = reader.read_u8(1)? == 1;
        self.from_mode_3a = reader.read_u8(1)? == 0;
        reader.advance(1)?;
        self.code = reader.read_u16(12)?;
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        writer.write_u8(u8::from(!self.validated), 1)?;
        writer.write_u8(u8::from(self.garbled), 1)?;
        writer.write_u8(u8::from(!self.from_mode_3a), 1)?;
        writer.write_u8(0, 1)?;
        writer.write_u16(self.code, 12)?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        2
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.code > 0o7777 {
            return Err(ValidationError::new(
                "I048/070",
                "code",
                self.code,
                "Mode-3/A code exceeds the 12-bit/four-octal-digit range",
            ));
        }
        Ok(())
    }

    fn value(&self) -> FieldValue {
        FieldValue::Text(format!("{:04o}", self.code))
    }
}

/// Measured Position in Polar Coordinates: 16-bit unsigned Rho (LSB =
/// 1/256 NM) and 16-bit unsigned Theta (LSB = 360/65536 degrees).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MeasuredPositionPolar {
    pub rho_nm: f64,
    pub theta_deg: f64,
}

const RHO_LSB: f64 = 1.0 / 256.0;
const THETA_LSB: f64 = 360.0 / 65_536.0;

impl Field for MeasuredPositionPolar {
    fn decode(&mut self, reader: &mut BitReader<'_>, _hint: ShapeHint) -> Result<(), DecodeError> {
        let rho_raw = reader.read_u16(16)?;
        let theta_raw = reader.read_u16(16)?;
        self.rho_nm = rho_raw as f64 * RHO_LSB;
        self.theta_deg = theta_raw as f64 * THETA_LSB;
        Ok(())
    }

    fn encode(&self, writer: &mut BitWriter<'_>, _hint: ShapeHint) -> Result<(), EncodingError> {
        let rho_raw = (self.rho_nm / RHO_LSB).round() as u16;
        let theta_raw = (self.theta_deg / THETA_LSB).round() as u16;
        writer.write_u16(rho_raw, 16)?;
        writer.write_u16(theta_raw, 16)?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        4
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.rho_nm < 0.0 || !self.rho_nm.is_finite() {
            return Err(ValidationError::new(
                "I048/040",
                "rho_nm",
                self.rho_nm,
                "Rho must be a non-negative, finite distance",
            ));
        }
        Ok(())
    }

    fn value(&self) -> FieldValue {
        FieldValue::Compound(vec![
            ("rho_nm", FieldValue::F64(self.rho_nm)),
            ("theta_deg", FieldValue::F64(self.theta_deg)),
        ])
    }
}
