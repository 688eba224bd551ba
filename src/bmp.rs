//! Decoder for the simplified 32-bit BMP layout used by thumbnail assets.
//!
//! Only the fixed 54-byte header is interpreted. Whatever lies between the
//! header and the declared pixel offset (a color table, usually empty) is
//! skipped, and the payload is taken verbatim as 4 bytes per pixel, bottom-up.
//! No compression or palette handling is performed.
use alloc::vec::Vec;
use log::{debug, warn};

use crate::error::{Error, Result};

pub const HEADER_SIZE: usize = 54;

/// How many bytes one source scanline occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowStride {
    /// `(width * 4) & !4`. Clears bit 2 of the row width instead of aligning it,
    /// so odd widths lose one pixel per row. Matches assets produced so far.
    #[default]
    Legacy,
    /// `width * 4`, the real size of an unpadded 32-bit row.
    Packed,
}

impl RowStride {
    pub fn row_bytes(self, width: u32) -> Option<u32> {
        let row = width.checked_mul(4)?;
        Some(match self {
            RowStride::Legacy => row & !4,
            RowStride::Packed => row,
        })
    }
}

/// Fields read from the fixed header. All values are little-endian on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    /// Offset 2. Informational only.
    pub file_size: u32,
    /// Offset 10.
    pub data_offset: u32,
    /// Offset 18.
    pub width: u32,
    /// Offset 22.
    pub height: u32,
    /// Offset 28. Informational only; pixels are always treated as 32-bit.
    pub bits_per_pixel: u16,
}

impl BmpHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::InvalidHeader("File too small"));
        }

        if bytes[0] != b'B' || bytes[1] != b'M' {
            // Not rejected: existing assets were never checked for the signature.
            warn!("bitmap header has no BM signature");
        }

        let header = BmpHeader {
            file_size: read_u32_le(bytes, 2)?,
            data_offset: read_u32_le(bytes, 10)?,
            width: read_u32_le(bytes, 18)?,
            height: read_u32_le(bytes, 22)?,
            bits_per_pixel: read_u16_le(bytes, 28)?,
        };

        if header.width == 0 || header.height == 0 {
            return Err(Error::InvalidHeader("Invalid dimensions"));
        }
        if (header.data_offset as usize) < HEADER_SIZE {
            return Err(Error::InvalidHeader("Pixel data overlaps header"));
        }
        if header.bits_per_pixel != 32 {
            debug!(
                "bitmap declares {} bits per pixel, reading as 32",
                header.bits_per_pixel
            );
        }

        Ok(header)
    }

    /// Bytes between the header and the pixel payload.
    pub fn gap_len(&self) -> usize {
        self.data_offset as usize - HEADER_SIZE
    }

    pub fn payload_len(&self, stride: RowStride) -> Result<usize> {
        let row = stride
            .row_bytes(self.width)
            .ok_or(Error::InvalidHeader("Row size overflow"))?;
        if stride == RowStride::Legacy && row != self.width * 4 {
            warn!(
                "legacy row mask drops 4 bytes per row for width {}",
                self.width
            );
        }
        row.checked_mul(self.height)
            .map(|len| len as usize)
            .ok_or(Error::InvalidHeader("Data size overflow"))
    }
}

/// Decoded header plus the raw pixel payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBitmap {
    pub header: BmpHeader,
    pub pixels: Vec<u8>,
}

impl RawBitmap {
    pub fn width(&self) -> u32 {
        self.header.width
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }
}

/// Decodes an in-memory bitmap.
pub fn decode(bytes: &[u8], stride: RowStride) -> Result<RawBitmap> {
    let header = BmpHeader::parse(bytes)?;
    let expected = header.payload_len(stride)?;
    debug!(
        "decoding {}x{} bitmap, {} gap bytes, {} payload bytes",
        header.width,
        header.height,
        header.gap_len(),
        expected
    );

    let start = header.data_offset as usize;
    let available = bytes.len().saturating_sub(start);
    if available < expected {
        return Err(Error::TruncatedPixelData {
            expected,
            available,
        });
    }

    Ok(RawBitmap {
        header,
        pixels: bytes[start..start + expected].to_vec(),
    })
}

/// Decodes a bitmap from a stream, consuming only header, gap and payload.
#[cfg(feature = "std")]
pub fn decode_reader<R: std::io::Read>(mut reader: R, stride: RowStride) -> Result<RawBitmap> {
    use std::io::{self, Read};

    let mut raw_header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut raw_header).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::InvalidHeader("File too small"),
        _ => Error::Io(e),
    })?;
    let header = BmpHeader::parse(&raw_header)?;

    let gap = header.gap_len() as u64;
    let skipped = io::copy(&mut (&mut reader).take(gap), &mut io::sink())?;
    log::trace!("skipped {skipped} of {gap} gap bytes");

    let expected = header.payload_len(stride)?;
    debug!(
        "decoding {}x{} bitmap, {} payload bytes",
        header.width, header.height, expected
    );

    let mut pixels = Vec::with_capacity(expected);
    reader.take(expected as u64).read_to_end(&mut pixels)?;
    if pixels.len() < expected {
        return Err(Error::TruncatedPixelData {
            expected,
            available: pixels.len(),
        });
    }

    Ok(RawBitmap { header, pixels })
}

/// Opens and decodes the bitmap at `path`.
#[cfg(feature = "std")]
pub fn decode_file<P: AsRef<std::path::Path>>(path: P, stride: RowStride) -> Result<RawBitmap> {
    let path = path.as_ref();
    debug!("reading bitmap {}", path.display());
    let file = std::fs::File::open(path)?;
    decode_reader(std::io::BufReader::new(file), stride)
}

#[inline]
fn read_u16_le(bytes: &[u8], offset: usize) -> Result<u16> {
    bytes
        .get(offset..offset + 2)
        .and_then(|s| s.try_into().ok())
        .map(u16::from_le_bytes)
        .ok_or(Error::InvalidHeader("Out of bounds read"))
}

#[inline]
fn read_u32_le(bytes: &[u8], offset: usize) -> Result<u32> {
    bytes
        .get(offset..offset + 4)
        .and_then(|s| s.try_into().ok())
        .map(u32::from_le_bytes)
        .ok_or(Error::InvalidHeader("Out of bounds read"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn bitmap(width: u32, height: u32, gap: usize, payload: &[u8]) -> Vec<u8> {
        let data_offset = (HEADER_SIZE + gap) as u32;
        let mut bytes = vec![0u8; HEADER_SIZE + gap];
        bytes[0] = b'B';
        bytes[1] = b'M';
        bytes[2..6].copy_from_slice(&(data_offset + payload.len() as u32).to_le_bytes());
        bytes[10..14].copy_from_slice(&data_offset.to_le_bytes());
        bytes[14..18].copy_from_slice(&40u32.to_le_bytes());
        bytes[18..22].copy_from_slice(&width.to_le_bytes());
        bytes[22..26].copy_from_slice(&height.to_le_bytes());
        bytes[26..28].copy_from_slice(&1u16.to_le_bytes());
        bytes[28..30].copy_from_slice(&32u16.to_le_bytes());
        // Marks the gap so a decoder that fails to skip it is caught.
        for b in &mut bytes[HEADER_SIZE..] {
            *b = 0xEE;
        }
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn legacy_stride_clears_bit_two() {
        assert_eq!(RowStride::Legacy.row_bytes(2), Some(8));
        assert_eq!(RowStride::Legacy.row_bytes(3), Some(8));
        assert_eq!(RowStride::Legacy.row_bytes(1), Some(0));
        assert_eq!(RowStride::Legacy.row_bytes(120), Some(480));
        assert_eq!(RowStride::Packed.row_bytes(3), Some(12));
        assert_eq!(RowStride::Packed.row_bytes(u32::MAX), None);
    }

    #[test]
    fn parses_header_fields() {
        let bytes = bitmap(2, 3, 8, &[0u8; 24]);
        let header = BmpHeader::parse(&bytes).unwrap();
        assert_eq!(header.width, 2);
        assert_eq!(header.height, 3);
        assert_eq!(header.data_offset, 62);
        assert_eq!(header.file_size, 86);
        assert_eq!(header.bits_per_pixel, 32);
        assert_eq!(header.gap_len(), 8);
    }

    #[test]
    fn skips_gap_and_reads_payload() {
        let payload: Vec<u8> = (0..16).collect();
        let decoded = decode(&bitmap(2, 2, 12, &payload), RowStride::Legacy).unwrap();
        assert_eq!(decoded.pixels, payload);
        assert_eq!((decoded.width(), decoded.height()), (2, 2));
    }

    #[test]
    fn legacy_stride_shortens_odd_rows() {
        let payload: Vec<u8> = (0..24).collect();
        let bytes = bitmap(3, 2, 0, &payload);
        let legacy = decode(&bytes, RowStride::Legacy).unwrap();
        assert_eq!(legacy.pixels, payload[..16]);
        let packed = decode(&bytes, RowStride::Packed).unwrap();
        assert_eq!(packed.pixels, payload);
    }

    #[test]
    fn missing_signature_is_tolerated() {
        let mut bytes = bitmap(1, 1, 0, &[1, 2, 3, 4]);
        bytes[0] = 0;
        assert!(decode(&bytes, RowStride::Packed).is_ok());
    }

    #[test]
    fn rejects_short_header() {
        assert!(matches!(
            BmpHeader::parse(&[0u8; 53]),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn rejects_zero_dimensions() {
        let bytes = bitmap(0, 4, 0, &[]);
        assert!(matches!(
            decode(&bytes, RowStride::Legacy),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn rejects_offset_inside_header() {
        let mut bytes = bitmap(1, 1, 0, &[0; 4]);
        bytes[10..14].copy_from_slice(&20u32.to_le_bytes());
        assert!(matches!(
            decode(&bytes, RowStride::Legacy),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn rejects_overflowing_size() {
        let bytes = bitmap(0x4000_0000, 0x10, 0, &[]);
        assert!(matches!(
            decode(&bytes, RowStride::Packed),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn reports_truncated_payload() {
        let bytes = bitmap(2, 2, 0, &[0u8; 10]);
        match decode(&bytes, RowStride::Legacy) {
            Err(Error::TruncatedPixelData {
                expected,
                available,
            }) => {
                assert_eq!(expected, 16);
                assert_eq!(available, 10);
            },
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn reader_matches_slice_decoder() {
        let payload: Vec<u8> = (0..32).collect();
        let bytes = bitmap(4, 2, 4, &payload);
        let from_slice = decode(&bytes, RowStride::Legacy).unwrap();
        let from_reader = decode_reader(&bytes[..], RowStride::Legacy).unwrap();
        assert_eq!(from_slice, from_reader);
    }

    #[cfg(feature = "std")]
    #[test]
    fn reader_reports_truncation() {
        let bytes = bitmap(2, 2, 0, &[0u8; 3]);
        assert!(matches!(
            decode_reader(&bytes[..], RowStride::Legacy),
            Err(Error::TruncatedPixelData {
                expected: 16,
                available: 3
            })
        ));
    }
}
