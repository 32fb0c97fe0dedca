use std::path::{Path, PathBuf};

pub const DEFAULT_FILE_STEM: &str = "opendraw";

pub fn numbered_filename(index: u32) -> String {
    format!("{DEFAULT_FILE_STEM}_{index}.png")
}

/// First `opendraw_<n>.png` in `dir` that does not exist yet, counting from 1.
pub fn next_default_path(dir: &Path) -> PathBuf {
    let mut index = 1;
    loop {
        let candidate = dir.join(numbered_filename(index));
        if !candidate.exists() {
            return candidate;
        }
        index += 1;
    }
}

/// Desktop when it exists, otherwise the working directory. A configured
/// folder wins over both.
pub fn default_save_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    dirs_next::desktop_dir()
        .filter(|dir| dir.is_dir())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Suggested path shown in the save dialog.
pub fn dialog_suggestion(dir: &Path) -> PathBuf {
    dir.join(format!("{DEFAULT_FILE_STEM}.png"))
}

/// When one chosen path is saved for several overlays at once, each one gets
/// its own `<stem>_<n>.png` next to it so nothing is overwritten.
pub fn path_for_overlay(chosen: &Path, position: usize, count: usize) -> PathBuf {
    if count <= 1 {
        return chosen.to_path_buf();
    }
    let stem = chosen
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_FILE_STEM.to_string());
    chosen.with_file_name(format!("{stem}_{}.png", position + 1))
}
