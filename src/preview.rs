//! Canvas construction for taskbar thumbnails and live previews.
//!
//! A thumbnail canvas is exactly the icon size. A live-preview canvas takes the
//! size the window would have when restored, so the icon ends up centered in
//! the preview the shell shows while hovering the taskbar button.
use crate::bmp::RawBitmap;
use crate::canvas::Canvas;
use crate::composite::composite;
use crate::config::ThumbnailOptions;
use crate::error::Result;

/// Edge coordinates in screen space, right and bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }
}

/// Placement of a top-level window as reported by the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowPlacement {
    /// Position of the window in its restored state.
    pub normal_position: ScreenRect,
    /// Set when the window returns to maximized after being minimized.
    pub restore_to_maximized: bool,
    /// Work area of the monitor holding `normal_position`, if known.
    pub monitor_work_area: Option<ScreenRect>,
}

impl WindowPlacement {
    /// Rectangle the preview should cover.
    pub fn preview_rect(&self) -> ScreenRect {
        match (self.restore_to_maximized, self.monitor_work_area) {
            (true, Some(work_area)) => work_area,
            (true, None) => ScreenRect::default(),
            (false, _) => self.normal_position,
        }
    }

    /// Canvas size for a live preview, or `None` when the rectangle is empty.
    pub fn preview_size(&self) -> Option<(u32, u32)> {
        let rect = self.preview_rect();
        let width = u32::try_from(rect.width()).ok().filter(|&w| w > 0)?;
        let height = u32::try_from(rect.height()).ok().filter(|&h| h > 0)?;
        Some((width, height))
    }
}

/// Composites an already decoded bitmap onto a `width` x `height` canvas.
pub fn render_bitmap(
    bitmap: &RawBitmap,
    width: u32,
    height: u32,
    options: &ThumbnailOptions,
) -> Result<Canvas> {
    composite(
        width,
        height,
        options.icon_width,
        options.icon_height,
        &bitmap.pixels,
        options.theme.background(),
    )
}

/// Icon-sized canvas for the taskbar thumbnail.
#[cfg(feature = "std")]
pub fn thumbnail<P: AsRef<std::path::Path>>(path: P, options: &ThumbnailOptions) -> Result<Canvas> {
    let bitmap = crate::bmp::decode_file(path, options.row_stride)?;
    render_bitmap(&bitmap, options.icon_width, options.icon_height, options)
}

/// Window-sized canvas for the live preview.
///
/// Returns `Ok(None)` without touching the file when the placement has no area.
#[cfg(feature = "std")]
pub fn live_preview<P: AsRef<std::path::Path>>(
    path: P,
    placement: &WindowPlacement,
    options: &ThumbnailOptions,
) -> Result<Option<Canvas>> {
    let Some((width, height)) = placement.preview_size() else {
        log::debug!("window placement {placement:?} has no area, skipping live preview");
        return Ok(None);
    };
    let bitmap = crate::bmp::decode_file(path, options.row_stride)?;
    render_bitmap(&bitmap, width, height, options).map(Some)
}
