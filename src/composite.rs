//! Centers an icon's raw pixels on a solid background.
use log::debug;

use crate::canvas::Canvas;
use crate::error::{Error, Result};
use crate::{Color, Framebuffer, Point, Rect};

/// Background selection for the area around the icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// `"dark"` selects [`Theme::Dark`]; any other name falls back to light.
    pub fn from_name(name: &str) -> Self {
        if name == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub const fn background(self) -> Color {
        match self {
            Theme::Light => Color::WHITE,
            Theme::Dark => Color::CHARCOAL,
        }
    }
}

/// The rectangle that receives source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeRegion {
    pub rect: Rect,
}

impl CompositeRegion {
    /// Starts at `canvas / 2 - icon / 2` on each axis, floor division per term.
    /// The origin goes negative when the icon is larger than the canvas.
    pub fn centered(canvas_width: u32, canvas_height: u32, icon_width: u32, icon_height: u32) -> Self {
        // Each half fits in i32, so their difference does too.
        let x = (canvas_width / 2) as i32 - (icon_width / 2) as i32;
        let y = (canvas_height / 2) as i32 - (icon_height / 2) as i32;
        Self {
            rect: Rect::new(x, y, icon_width, icon_height),
        }
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        match (i32::try_from(x), i32::try_from(y)) {
            (Ok(x), Ok(y)) => self.rect.contains(Point::new(x, y)),
            _ => false,
        }
    }

    /// Source bytes consumed when compositing onto a `width` x `height` canvas.
    pub fn required_source_len(&self, width: u32, height: u32) -> u64 {
        self.rect.visible_area(width, height) * 4
    }
}

/// Composites into an existing framebuffer and returns the region used.
///
/// Rows are walked top to bottom in memory order and columns left to right.
/// Every pixel inside the region takes the next 4 source bytes as B, G, R with
/// alpha forced to 255; the source cursor only advances inside the region.
/// Every other pixel gets `background`, also fully opaque.
pub fn composite_into<F: Framebuffer>(
    framebuffer: &mut F,
    icon_width: u32,
    icon_height: u32,
    source: &[u8],
    background: Color,
) -> Result<CompositeRegion> {
    let (width, height) = framebuffer.dimensions();
    let region = CompositeRegion::centered(width, height, icon_width, icon_height);

    let required = region.required_source_len(width, height);
    if (source.len() as u64) < required {
        return Err(Error::SourceBufferTooSmall {
            required,
            available: source.len(),
        });
    }
    debug!(
        "compositing {icon_width}x{icon_height} icon at ({}, {}) onto {width}x{height} canvas",
        region.rect.x, region.rect.y
    );

    let background = Color {
        a: 255,
        ..background
    }
    .to_u32();
    let mut pixels = source.chunks_exact(4);

    for y in 0..height {
        for x in 0..width {
            let color = if region.contains(x, y) {
                // Length was checked against the visible region above.
                match pixels.next().and_then(|px| <&[u8; 4]>::try_from(px).ok()) {
                    Some(px) => Color::opaque_from_bgr(px).to_u32(),
                    None => background,
                }
            } else {
                background
            };
            framebuffer.write_pixel(x, y, color);
        }
    }

    Ok(region)
}

/// Builds a new canvas with the icon centered on `background`.
pub fn composite(
    canvas_width: u32,
    canvas_height: u32,
    icon_width: u32,
    icon_height: u32,
    source: &[u8],
    background: Color,
) -> Result<Canvas> {
    let mut canvas = Canvas::new(canvas_width, canvas_height)?;
    composite_into(&mut canvas, icon_width, icon_height, source, background)?;
    Ok(canvas)
}
