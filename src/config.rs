//! Options shared by the thumbnail and live-preview entry points.
use crate::bmp::RowStride;
use crate::composite::Theme;

/// Edge length of the square icon placed on every canvas.
pub const DEFAULT_ICON_SIZE: u32 = 120;

/// Controls how a source bitmap is decoded and composited.
///
/// # Examples
///
/// ```rust
/// use thumbcanvas::{RowStride, Theme, ThumbnailOptions};
///
/// let options = ThumbnailOptions::new()
///     .with_theme_name("dark")
///     .with_row_stride(RowStride::Packed);
/// assert_eq!(options.theme, Theme::Dark);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailOptions {
    /// Width of the centered icon region in pixels
    pub icon_width: u32,
    /// Height of the centered icon region in pixels
    pub icon_height: u32,
    /// Background behind the icon
    pub theme: Theme,
    /// Scanline sizing used when reading the source payload
    pub row_stride: RowStride,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            icon_width: DEFAULT_ICON_SIZE,
            icon_height: DEFAULT_ICON_SIZE,
            theme: Theme::Light,
            row_stride: RowStride::Legacy,
        }
    }
}

impl ThumbnailOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_icon_size(mut self, width: u32, height: u32) -> Self {
        self.icon_width = width;
        self.icon_height = height;
        self
    }

    #[inline]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Same as [`with_theme`](Self::with_theme) with [`Theme::from_name`].
    #[inline]
    pub fn with_theme_name(self, name: &str) -> Self {
        self.with_theme(Theme::from_name(name))
    }

    #[inline]
    pub fn with_row_stride(mut self, stride: RowStride) -> Self {
        self.row_stride = stride;
        self
    }
}
