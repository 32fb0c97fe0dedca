use crate::draw::history::MAX_UNDO;
use crate::draw::model::{BrushSettings, Color, StrokeMode};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "opendraw_settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Depth of each overlay's undo stack.
    #[serde(default = "default_max_undo")]
    pub max_undo: usize,
    #[serde(default = "default_brush_size")]
    pub brush_size: u32,
    #[serde(default = "default_brush_color")]
    pub brush_color: Color,
    #[serde(default)]
    pub stroke_mode: StrokeMode,
    #[serde(default = "default_true")]
    pub show_info_label: bool,
    /// Use pen pressure when the input device reports it.
    #[serde(default = "default_true")]
    pub enable_pressure: bool,
    /// Start the control panel targeting every overlay at once.
    #[serde(default)]
    pub broadcast_by_default: bool,
    /// Folder for auto-numbered saves. If `None`, the desktop is used.
    #[serde(default)]
    pub save_dir: Option<PathBuf>,
    /// Enable toast notifications in the control panel.
    #[serde(default = "default_true")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
}

fn default_max_undo() -> usize {
    MAX_UNDO
}

fn default_brush_size() -> u32 {
    BrushSettings::default().size
}

fn default_brush_color() -> Color {
    BrushSettings::default().color
}

fn default_true() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            max_undo: default_max_undo(),
            brush_size: default_brush_size(),
            brush_color: default_brush_color(),
            stroke_mode: StrokeMode::default(),
            show_info_label: true,
            enable_pressure: true,
            broadcast_by_default: false,
            save_dir: None,
            enable_toasts: true,
            toast_duration: default_toast_duration(),
        }
    }
}

pub fn settings_path_from_exe_path(exe_path: &Path) -> anyhow::Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> anyhow::Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}

impl Settings {
    /// Loads settings from `path`. A missing or empty file yields the defaults;
    /// the file is never written back.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("deserialize settings file {}", path.display()))
    }

    pub fn brush(&self) -> BrushSettings {
        let mut brush = BrushSettings {
            color: self.brush_color,
            ..BrushSettings::default()
        };
        brush.set_size(self.brush_size);
        brush
    }
}
