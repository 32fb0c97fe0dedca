use std::path::{Path, PathBuf};

/// Outcome of asking the user where to save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveChoice {
    Path(PathBuf),
    Cancelled,
    /// No native dialog on this platform; callers fall back to the default path.
    Unavailable,
}

#[cfg(target_os = "windows")]
pub fn pick_save_path(suggestion: &Path) -> SaveChoice {
    let mut dialog = rfd::FileDialog::new().add_filter("PNG image", &["png"]);
    if let Some(dir) = suggestion.parent() {
        dialog = dialog.set_directory(dir);
    }
    if let Some(name) = suggestion.file_name() {
        dialog = dialog.set_file_name(name.to_string_lossy());
    }
    match dialog.save_file() {
        Some(path) => SaveChoice::Path(with_png_extension(path)),
        None => SaveChoice::Cancelled,
    }
}

#[cfg(not(target_os = "windows"))]
pub fn pick_save_path(_suggestion: &Path) -> SaveChoice {
    SaveChoice::Unavailable
}

/// Appends `.png` when the user typed a bare name.
pub fn with_png_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("png")
    }
}
