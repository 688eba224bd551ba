//! Owned 32-bit canvas laid out as a bottom-up device-independent bitmap.
use alloc::vec;
use alloc::vec::Vec;

use crate::bmp::HEADER_SIZE;
use crate::error::{Error, Result};
use crate::{Color, Framebuffer};

pub const DIB_HEADER_SIZE: usize = 40;
const FILE_HEADER_SIZE: usize = HEADER_SIZE - DIB_HEADER_SIZE;
const BI_RGB: u32 = 0;

/// `BITMAPINFOHEADER` describing a [`Canvas`].
///
/// The height is positive, so the first scanline in memory is the bottom row
/// on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DibHeader {
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub size_image: u32,
}

impl DibHeader {
    pub fn to_bytes(&self) -> [u8; DIB_HEADER_SIZE] {
        let mut out = [0u8; DIB_HEADER_SIZE];
        out[0..4].copy_from_slice(&(DIB_HEADER_SIZE as u32).to_le_bytes());
        out[4..8].copy_from_slice(&self.width.to_le_bytes());
        out[8..12].copy_from_slice(&self.height.to_le_bytes());
        out[12..14].copy_from_slice(&self.planes.to_le_bytes());
        out[14..16].copy_from_slice(&self.bit_count.to_le_bytes());
        out[16..20].copy_from_slice(&self.compression.to_le_bytes());
        out[20..24].copy_from_slice(&self.size_image.to_le_bytes());
        // Resolution and palette fields stay zero.
        out
    }
}

/// A `width` x `height` buffer of BGRA pixels, one scanline per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Allocates a zeroed canvas.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let invalid = Error::InvalidCanvas { width, height };
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(invalid);
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .filter(|&n| n <= u32::MAX as usize)
            .ok_or(invalid)?;

        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel at (`x`, `y`) in memory order.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let offset = self.offset(x, y)?;
        let px: [u8; 4] = self.pixels[offset..offset + 4].try_into().ok()?;
        Some(Color::from_u32(u32::from_le_bytes(px)))
    }

    pub fn dib_header(&self) -> DibHeader {
        DibHeader {
            width: self.width as i32,
            height: self.height as i32,
            planes: 1,
            bit_count: 32,
            compression: BI_RGB,
            size_image: self.pixels.len() as u32,
        }
    }

    /// `BITMAPINFOHEADER` followed by the pixels, as carried by `CF_DIB`.
    pub fn to_packed_dib(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(DIB_HEADER_SIZE + self.pixels.len());
        out.extend_from_slice(&self.dib_header().to_bytes());
        out.extend_from_slice(&self.pixels);
        out
    }

    /// A complete `.bmp` file with the pixel data right after the 54-byte header.
    pub fn to_bmp_bytes(&self) -> Vec<u8> {
        let file_size = (HEADER_SIZE + self.pixels.len()) as u32;
        let mut out = Vec::with_capacity(file_size as usize);
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&file_size.to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&(HEADER_SIZE as u32).to_le_bytes());
        debug_assert_eq!(out.len(), FILE_HEADER_SIZE);
        out.extend_from_slice(&self.to_packed_dib());
        out
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

impl Framebuffer for Canvas {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn write_pixel(&mut self, x: u32, y: u32, color: u32) -> bool {
        match self.offset(x, y) {
            Some(offset) => {
                self.pixels[offset..offset + 4].copy_from_slice(&color.to_le_bytes());
                true
            },
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmp::{decode, RowStride};

    #[test]
    fn rejects_empty_canvas() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(Error::InvalidCanvas {
                width: 0,
                height: 10
            })
        ));
        assert!(Canvas::new(10, 0).is_err());
        assert!(Canvas::new(u32::MAX, 1).is_err());
    }

    #[test]
    fn write_pixel_stores_bgra() {
        let mut canvas = Canvas::new(2, 2).unwrap();
        assert!(canvas.write_pixel(1, 0, Color::rgb(30, 20, 10).to_u32()));
        assert!(!canvas.write_pixel(2, 0, 0));
        assert_eq!(&canvas.as_bytes()[4..8], &[10, 20, 30, 255]);
        assert_eq!(canvas.pixel(1, 0), Some(Color::rgb(30, 20, 10)));
        assert_eq!(canvas.pixel(0, 2), None);
    }

    #[test]
    fn dib_header_layout() {
        let canvas = Canvas::new(3, 2).unwrap();
        let header = canvas.dib_header();
        assert_eq!(header.size_image, 24);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], &40u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &3i32.to_le_bytes());
        assert_eq!(&bytes[8..12], &2i32.to_le_bytes());
        assert_eq!(&bytes[12..14], &1u16.to_le_bytes());
        assert_eq!(&bytes[14..16], &32u16.to_le_bytes());
        assert_eq!(&bytes[16..20], &0u32.to_le_bytes());
    }

    #[test]
    fn packed_dib_is_header_then_pixels() {
        let mut canvas = Canvas::new(1, 1).unwrap();
        canvas.write_pixel(0, 0, Color::WHITE.to_u32());
        let dib = canvas.to_packed_dib();
        assert_eq!(dib.len(), DIB_HEADER_SIZE + 4);
        assert_eq!(&dib[DIB_HEADER_SIZE..], &[255, 255, 255, 255]);
    }

    #[test]
    fn bmp_file_decodes_back_to_pixels() {
        let mut canvas = Canvas::new(3, 2).unwrap();
        for (i, (x, y)) in [(0, 0), (2, 0), (1, 1)].into_iter().enumerate() {
            canvas.write_pixel(x, y, Color::rgb(i as u8, 7, 9).to_u32());
        }
        let bytes = canvas.to_bmp_bytes();
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(bytes.len(), 54 + 24);

        let decoded = decode(&bytes, RowStride::Packed).unwrap();
        assert_eq!(decoded.header.file_size as usize, bytes.len());
        assert_eq!(decoded.pixels, canvas.as_bytes());
    }
}
