use opendraw::draw::model::{Color, StrokeMode};
use opendraw::draw::monitor::MonitorRect;
use opendraw::draw::overlay::{Overlay, OverlayId, OverlayOptions};
use opendraw::settings::{Settings, SETTINGS_FILE_NAME};
use tempfile::tempdir;

#[test]
fn empty_file_yields_documented_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    std::fs::write(&path, "").unwrap();
    let settings = Settings::load(&path).unwrap();

    assert!(!settings.debug_logging);
    assert_eq!(settings.max_undo, 30);
    assert_eq!(settings.brush_size, 8);
    assert_eq!(settings.brush_color, Color::rgba(255, 0, 0, 220));
    assert_eq!(settings.stroke_mode, StrokeMode::Smoothed);
    assert!(settings.show_info_label);
    assert!(settings.enable_pressure);
    assert!(!settings.broadcast_by_default);
    assert_eq!(settings.save_dir, None);
    assert!(settings.enable_toasts);
    assert_eq!(settings.toast_duration, 3.0);
}

#[test]
fn settings_seed_overlay_brush_and_history_depth() {
    let settings = Settings {
        brush_size: 20,
        max_undo: 2,
        show_info_label: false,
        ..Settings::default()
    };
    let mut overlay = Overlay::new(
        OverlayId(0),
        MonitorRect {
            width: 16,
            height: 16,
            ..MonitorRect::default()
        },
        &OverlayOptions::from_settings(&settings),
    );
    assert_eq!(overlay.brush().size, 20);
    assert!(!overlay.info_visible());

    for _ in 0..4 {
        overlay.pointer_down((8.5, 8.5), None);
        overlay.pointer_up();
    }
    assert_eq!(overlay.history().undo_len(), 2);
}
