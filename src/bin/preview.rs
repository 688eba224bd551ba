//! Shows a composited thumbnail canvas in a desktop window, or writes it as a BMP.
use std::path::PathBuf;

use clap::Parser;
use minifb::{Key, Window, WindowOptions};
use thumbcanvas::{composite_into, decode_file, Framebuffer, RowStride, ThumbnailOptions};

#[derive(Parser, Debug)]
#[command(name = "thumbcanvas-preview", about = "Preview a thumbnail canvas")]
struct Args {
    /// Source bitmap
    input: PathBuf,

    /// Canvas width, defaults to the icon width
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height, defaults to the icon height
    #[arg(long)]
    height: Option<u32>,

    #[arg(long, default_value_t = thumbcanvas::config::DEFAULT_ICON_SIZE)]
    icon_width: u32,

    #[arg(long, default_value_t = thumbcanvas::config::DEFAULT_ICON_SIZE)]
    icon_height: u32,

    /// "dark" or anything else for the light background
    #[arg(long, default_value = "light")]
    theme: String,

    /// Read source rows as width * 4 bytes instead of the legacy mask
    #[arg(long)]
    packed_rows: bool,

    /// Write the canvas to this .bmp file instead of opening a window
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Window-backed framebuffer. Canvas rows are bottom-up, the window is top-down.
struct WindowFramebuffer {
    window: Window,
    buffer: Vec<u32>,
    width: u32,
    height: u32,
}

impl Framebuffer for WindowFramebuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn write_pixel(&mut self, x: u32, y: u32, color: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let row = (self.height - 1 - y) as usize;
        self.buffer[row * self.width as usize + x as usize] = color;
        true
    }

    fn flush(&mut self) -> Result<(), &'static str> {
        self.window
            .update_with_buffer(&self.buffer, self.width as usize, self.height as usize)
            .map_err(|_| "Failed to update window")
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let stride = if args.packed_rows {
        RowStride::Packed
    } else {
        RowStride::Legacy
    };
    let options = ThumbnailOptions::new()
        .with_icon_size(args.icon_width, args.icon_height)
        .with_theme_name(&args.theme)
        .with_row_stride(stride);
    let width = args.width.unwrap_or(options.icon_width);
    let height = args.height.unwrap_or(options.icon_height);

    let bitmap = decode_file(&args.input, options.row_stride)?;

    if let Some(out) = args.out {
        let canvas = thumbcanvas::render_bitmap(&bitmap, width, height, &options)?;
        std::fs::write(&out, canvas.to_bmp_bytes())?;
        println!("wrote {}x{} canvas to {}", width, height, out.display());
        return Ok(());
    }

    let mut window = Window::new(
        "thumbcanvas preview - ESC to exit",
        width as usize,
        height as usize,
        WindowOptions::default(),
    )?;
    window.set_target_fps(30);

    let mut framebuffer = WindowFramebuffer {
        window,
        buffer: vec![0; width as usize * height as usize],
        width,
        height,
    };
    composite_into(
        &mut framebuffer,
        options.icon_width,
        options.icon_height,
        &bitmap.pixels,
        options.theme.background(),
    )?;

    while framebuffer.window.is_open() && !framebuffer.window.is_key_down(Key::Escape) {
        framebuffer.flush()?;
    }

    Ok(())
}
