//! Thermal map header.

use byteorder::{BigEndian, ByteOrder};
use condor_common::BinaryReader;

use crate::{Error, Result};

/// Length of the header preceding the samples.
pub const THERMAL_HEADER_LEN: usize = 8;

/// Largest width or height the 24-bit header fields can hold.
pub const MAX_THERMAL_DIMENSION: u32 = 0xFF_FFFF;

/// Dimensions stored at the start of a thermal map.
///
/// Layout:
/// - bytes 0..3: width, 24-bit big-endian
/// - byte 3: padding
/// - bytes 4..7: height, 24-bit big-endian
/// - byte 7: padding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThermalHeader {
    pub width: u32,
    pub height: u32,
}

impl ThermalHeader {
    /// Parse the header from the start of a thermal map. Padding is ignored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < THERMAL_HEADER_LEN {
            return Err(Error::SizeMismatch {
                expected: THERMAL_HEADER_LEN,
                actual: data.len(),
            });
        }

        let mut reader = BinaryReader::new(data);
        let width = reader.read_u24_be()?;
        reader.advance(1);
        let height = reader.read_u24_be()?;

        Ok(Self { width, height })
    }

    /// Number of samples following the header.
    pub fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Serialize the header with zeroed padding.
    pub fn to_bytes(&self) -> Result<[u8; THERMAL_HEADER_LEN]> {
        if self.width > MAX_THERMAL_DIMENSION || self.height > MAX_THERMAL_DIMENSION {
            return Err(Error::ShapeMismatch {
                width: self.width,
                height: self.height,
                channels: 1,
            });
        }

        let mut bytes = [0u8; THERMAL_HEADER_LEN];
        BigEndian::write_u24(&mut bytes[0..3], self.width);
        BigEndian::write_u24(&mut bytes[4..7], self.height);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_padding() {
        let data = [0x00, 0x10, 0x00, 0xAA, 0x00, 0x08, 0x00, 0xBB];
        let header = ThermalHeader::parse(&data).unwrap();
        assert_eq!(header, ThermalHeader { width: 4096, height: 2048 });
        assert_eq!(header.sample_count(), 4096 * 2048);
    }

    #[test]
    fn test_parse_short_header() {
        assert!(matches!(
            ThermalHeader::parse(&[0, 0, 2, 0, 0]),
            Err(Error::SizeMismatch { expected: 8, actual: 5 })
        ));
    }

    #[test]
    fn test_to_bytes_layout() {
        let header = ThermalHeader { width: 0x01_0203, height: 2 };
        assert_eq!(header.to_bytes().unwrap(), [0x01, 0x02, 0x03, 0x00, 0x00, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn test_to_bytes_rejects_wide_dimension() {
        let header = ThermalHeader { width: 1 << 24, height: 1 };
        assert!(header.to_bytes().is_err());
    }
}
