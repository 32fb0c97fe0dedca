use serde::{Deserialize, Serialize};

pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const RED: Self = Self::rgba(255, 0, 0, 255);
    pub const GREEN: Self = Self::rgba(0, 255, 0, 255);
    pub const BLUE: Self = Self::rgba(0, 0, 255, 255);
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Color {
    fn from(value: [u8; 4]) -> Self {
        Self::rgba(value[0], value[1], value[2], value[3])
    }
}

impl From<Color> for [u8; 4] {
    fn from(value: Color) -> Self {
        value.to_rgba_array()
    }
}

/// How a stroke's covered pixels combine with the canvas underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    SourceOver,
    Clear,
}

/// Which of the two historical drawing models an overlay uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeMode {
    /// Live preview while dragging, smoothed curve committed on release.
    #[default]
    Smoothed,
    /// Every pointer-move segment is committed to the canvas as it arrives.
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushSettings {
    pub color: Color,
    pub size: u32,
    pub eraser: bool,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Color::rgba(255, 0, 0, 220),
            size: 8,
            eraser: false,
        }
    }
}

impl BrushSettings {
    pub fn blend_mode(&self) -> BlendMode {
        if self.eraser {
            BlendMode::Clear
        } else {
            BlendMode::SourceOver
        }
    }

    pub fn set_size(&mut self, size: u32) {
        self.size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    pub fn adjust_size(&mut self, delta: i32) {
        let next = (self.size as i64 + delta as i64)
            .clamp(MIN_BRUSH_SIZE as i64, MAX_BRUSH_SIZE as i64);
        self.size = next as u32;
    }

    pub fn mode_label(&self) -> &'static str {
        if self.eraser {
            "Eraser"
        } else {
            "Brush"
        }
    }
}
