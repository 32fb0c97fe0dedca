use crate::draw::model::{BlendMode, Color};
use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;

/// Persistent per-monitor pixel buffer. Straight (non-premultiplied) RGBA,
/// fully transparent when created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(color.to_rgba_array())),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let Rgba([r, g, b, a]) = *self.image.get_pixel(x, y);
        Color::rgba(r, g, b, a)
    }

    pub fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|px| px.0[3] == 0)
    }

    pub fn blend(&mut self, x: u32, y: u32, color: Color, mode: BlendMode) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let px = self.image.get_pixel_mut(x, y);
        let out = match mode {
            BlendMode::Clear => Color::TRANSPARENT,
            BlendMode::SourceOver => {
                let Rgba([r, g, b, a]) = *px;
                source_over(Color::rgba(r, g, b, a), color)
            }
        };
        *px = Rgba(out.to_rgba_array());
    }

    /// Row-major RGBA bytes of a sub-rectangle, clipped to the canvas.
    pub fn region_rgba(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<u8> {
        let x1 = (x + width).min(self.width());
        let y1 = (y + height).min(self.height());
        if x >= x1 || y >= y1 {
            return Vec::new();
        }
        let mut bytes = Vec::with_capacity(((x1 - x) * (y1 - y) * 4) as usize);
        let stride = self.width() as usize * 4;
        let raw = self.image.as_raw();
        for row in y..y1 {
            let start = row as usize * stride + x as usize * 4;
            let end = row as usize * stride + x1 as usize * 4;
            bytes.extend_from_slice(&raw[start..end]);
        }
        bytes
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create save folder {}", parent.display()))?;
        }
        self.image
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("write png {}", path.display()))
    }
}

fn source_over(bottom: Color, top: Color) -> Color {
    let sa = top.a as f32 / 255.0;
    let da = bottom.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= f32::EPSILON {
        return Color::TRANSPARENT;
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Color {
        r: blend(top.r, bottom.r),
        g: blend(top.g, bottom.g),
        b: blend(top.b, bottom.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}
