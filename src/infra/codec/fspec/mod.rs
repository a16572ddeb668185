//! Field Specification (FSPEC): the chained presence bitmap that precedes
//! every record's data items. Each octet carries seven presence bits (one
//! per Field Reference Number) and a low-bit FX flag announcing whether a
//! further octet follows. Compound items reuse this same codec for their
//! nested sub-FSPEC.
use crate::error::FspecError;

/// Maximum number of FX-chained octets a single FSPEC may span. An 8th
/// octet with FX still set is a malformed chain.
const MAX_OCTETS: usize = 8;
/// Data bits carried per octet (bit 0x01 is reserved for FX).
const DATA_BITS_PER_OCTET: u8 = 7;

/// In-memory presence bitmap. Stores the octets exactly as they appear (or
/// will appear) on the wire, so a decoded FSPEC re-encodes byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fspec {
    octets: Vec<u8>,
}

impl Fspec {
    /// Start with no octets and no bits set.
    pub fn new() -> Self {
        Self { octets: Vec::new() }
    }

    /// Mark a Field Reference Number present, extending the chain as needed
    /// and setting FX on every octet up to and including the new one.
    pub fn set_frn(&mut self, frn: u8) -> Result<(), FspecError> {
        if frn == 0 {
            return Err(FspecError::InvalidFrn);
        }
        let byte_index = ((frn - 1) / DATA_BITS_PER_OCTET) as usize;
        let bit = (frn - 1) % DATA_BITS_PER_OCTET;
        if byte_index >= MAX_OCTETS {
            return Err(FspecError::Invalid {
                reason: "FRN exceeds the 8-octet FX chain limit",
            });
        }

        if self.octets.len() <= byte_index {
            self.octets.resize(byte_index + 1, 0);
        }
        // Every non-terminal octet up to this one now has a successor, so
        // its FX bit must be set; the new terminal octet's FX stays 0.
        for octet in self.octets[..byte_index].iter_mut() {
            *octet |= 0x01;
        }
        self.octets[byte_index] |= 0x80 >> bit;
        Ok(())
    }

    /// Whether `frn` is present. Returns `false` for FRN 0 and for any FRN
    /// beyond the current chain length rather than erroring, since "not yet
    /// extended that far" and "explicitly absent" are indistinguishable to
    /// a caller that only wants a presence check.
    pub fn get_frn(&self, frn: u8) -> bool {
        if frn == 0 {
            return false;
        }
        let byte_index = ((frn - 1) / DATA_BITS_PER_OCTET) as usize;
        let bit = (frn - 1) % DATA_BITS_PER_OCTET;
        match self.octets.get(byte_index) {
            Some(octet) => octet & (0x80 >> bit) != 0,
            None => false,
        }
    }

    /// Octets currently held, in wire order.
    pub fn size(&self) -> usize {
        self.octets.len()
    }

    /// Raw octets currently held, FX bits included.
    pub fn octets(&self) -> &[u8] {
        &self.octets
    }

    /// Drop back to the empty state.
    pub fn reset(&mut self) {
        self.octets.clear();
    }

    /// `true` if any data bit (not FX) is set in any octet.
    pub fn has_data_bits(&self) -> bool {
        self.octets.iter().any(|o| o & 0xFE != 0)
    }

    /// Count of data bits set across the whole chain.
    pub fn bit_count(&self) -> u32 {
        self.octets.iter().map(|o| (o & 0xFE).count_ones()).sum()
    }

    /// Write the chain to `sink`. Rejects an FSPEC with no data bits set,
    /// since an encoder should never emit a record with no present items.
    pub fn encode(&self, sink: &mut Vec<u8>) -> Result<usize, FspecError> {
        if !self.has_data_bits() {
            return Err(FspecError::Invalid {
                reason: "cannot encode an FSPEC with no data bits set",
            });
        }
        sink.extend_from_slice(&self.octets);
        Ok(self.octets.len())
    }

    /// Read a chain from `source`, replacing any prior state. Returns the
    /// number of octets consumed.
    pub fn decode(&mut self, source: &[u8]) -> Result<usize, FspecError> {
        self.octets.clear();
        let mut count = 0usize;
        loop {
            let octet = *source
                .get(count)
                .ok_or(FspecError::BufferTooShort { needed: count + 1 })?;
            self.octets.push(octet);
            count += 1;
            if octet & 0x01 == 0 {
                break;
            }
            if count == MAX_OCTETS {
                return Err(FspecError::Invalid {
                    reason: "FX chain did not terminate within 8 octets",
                });
            }
        }
        Ok(count)
    }

    /// Iterate the FRNs currently set, in ascending order. The engine walks
    /// this to know which UAP slots to visit without re-deriving byte/bit
    /// arithmetic at each call site.
    pub fn present_frns(&self) -> impl Iterator<Item = u8> + '_ {
        self.octets.iter().enumerate().flat_map(|(byte_index, octet)| {
            (0..DATA_BITS_PER_OCTET).filter_map(move |bit| {
                if octet & (0x80 >> bit) != 0 {
                    Some(byte_index as u8 * DATA_BITS_PER_OCTET + bit + 1)
                } else {
                    None
                }
            })
        })
    }
}
