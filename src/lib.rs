//! Centered icon compositing for taskbar thumbnails and live previews.
//!
//! A source bitmap is decoded from a simplified 54-byte-header BMP layout and
//! placed in the middle of a 32-bit BGRA canvas filled with a theme background.
//! The resulting [`Canvas`] is laid out exactly like a bottom-up
//! device-independent bitmap, so it can be handed to the OS without copying.
//!
//! File access lives behind the default `std` feature; everything else works
//! with `alloc` only.
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bmp;
pub mod canvas;
pub mod composite;
pub mod config;
pub mod error;
pub mod preview;

pub use bmp::{BmpHeader, RawBitmap, RowStride};
pub use canvas::{Canvas, DibHeader};
pub use composite::{composite, composite_into, CompositeRegion, Theme};
pub use config::ThumbnailOptions;
pub use error::{Error, Result};
pub use preview::{render_bitmap, ScreenRect, WindowPlacement};

#[cfg(feature = "std")]
pub use bmp::decode_file;
#[cfg(feature = "std")]
pub use preview::{live_preview, thumbnail};

/// A single pixel in BGRA memory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Reads the first three bytes of `bytes` as B, G, R. Alpha is forced opaque.
    #[inline]
    pub const fn opaque_from_bgr(bytes: &[u8; 4]) -> Self {
        Self {
            b: bytes[0],
            g: bytes[1],
            r: bytes[2],
            a: 255,
        }
    }

    pub const fn to_u32(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub const fn from_u32(value: u32) -> Self {
        Self {
            b: value as u8,
            g: (value >> 8) as u8,
            r: (value >> 16) as u8,
            a: (value >> 24) as u8,
        }
    }

    /// Memory representation of a 32-bit DIB pixel.
    pub const fn to_bgra(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const CHARCOAL: Color = Color::rgb(43, 43, 43);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    // Widened so a region hanging off the canvas edge cannot overflow.
    pub fn contains(&self, point: Point) -> bool {
        let (px, py) = (i64::from(point.x), i64::from(point.y));
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        px >= x && px < x + i64::from(self.width) && py >= y && py < y + i64::from(self.height)
    }

    /// Number of pixels of `self` that fall inside a `width` x `height` area anchored at the origin.
    pub fn visible_area(&self, width: u32, height: u32) -> u64 {
        let span = |start: i32, len: u32, limit: u32| -> u64 {
            let lo = i64::from(start).max(0);
            let hi = (i64::from(start) + i64::from(len)).min(i64::from(limit));
            (hi - lo).max(0) as u64
        };
        span(self.x, self.width, width) * span(self.y, self.height, height)
    }
}

/// A pixel sink addressed in canvas coordinates.
///
/// Pixels are packed as `0xAARRGGBB`, see [`Color::to_u32`].
pub trait Framebuffer {
    fn dimensions(&self) -> (u32, u32);

    /// Returns `false` when the coordinate lies outside the buffer.
    fn write_pixel(&mut self, x: u32, y: u32, color: u32) -> bool;

    fn flush(&mut self) -> core::result::Result<(), &'static str> {
        Ok(())
    }
}
