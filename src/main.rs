use anyhow::anyhow;
use eframe::egui;
use opendraw::draw::monitor::monitors_or_fallback;
use opendraw::draw::overlay::{OverlayOptions, OverlaySet};
use opendraw::draw::passthrough::platform_controller;
use opendraw::gui::{OpenDrawApp, CONTROL_PANEL_TITLE};
use opendraw::logging;
use opendraw::settings::{resolve_settings_path, Settings};
use opendraw::tray::Tray;

fn load_settings() -> (Settings, Option<anyhow::Error>) {
    let loaded = resolve_settings_path().and_then(|path| Settings::load(&path));
    match loaded {
        Ok(settings) => (settings, None),
        Err(err) => (Settings::default(), Some(err)),
    }
}

fn main() -> anyhow::Result<()> {
    let (settings, settings_error) = load_settings();
    logging::init(settings.debug_logging);
    if let Some(err) = settings_error {
        tracing::warn!(error = %format!("{err:#}"), "using default settings");
    }

    let monitors = monitors_or_fallback();
    let overlays = OverlaySet::from_monitors(&monitors, &OverlayOptions::from_settings(&settings));
    tracing::info!(
        overlays = overlays.len(),
        mode = ?settings.stroke_mode,
        "starting OpenDraw"
    );

    let tray = Tray::install();
    let app = OpenDrawApp::new(overlays, platform_controller(), settings, tray);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(CONTROL_PANEL_TITLE)
            .with_inner_size([420.0, 200.0])
            .with_min_inner_size([360.0, 160.0])
            .with_always_on_top(),
        ..Default::default()
    };

    eframe::run_native(
        CONTROL_PANEL_TITLE,
        native_options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|err| anyhow!("failed to start the control panel: {err}"))
}
