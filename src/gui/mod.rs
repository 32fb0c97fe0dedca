mod control_panel;
mod file_dialog;
mod overlay_view;

pub use control_panel::{panel_brush_values, target_label, PanelAction, ALL_MONITORS_LABEL};
pub use file_dialog::{pick_save_path, with_png_extension, SaveChoice};
pub use overlay_view::{key_code, key_modifiers, to_canvas, PenState};

use crate::draw::keyboard::KeyCommand;
use crate::draw::overlay::{
    CommandContext, CommandReport, ControlCommand, ControlTarget, OverlaySet,
};
use crate::draw::passthrough::InputPassthroughController;
use crate::draw::save::{default_save_dir, dialog_suggestion};
use crate::settings::Settings;
use crate::tray::{self, Tray};
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::time::Duration;

pub const CONTROL_PANEL_TITLE: &str = "OpenDraw Controls";
const TRAY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Closing the control panel while a tray icon exists hides it; the tray
/// brings it back.
fn close_to_tray_commands() -> [egui::ViewportCommand; 2] {
    [
        egui::ViewportCommand::CancelClose,
        egui::ViewportCommand::Visible(false),
    ]
}

pub struct OpenDrawApp {
    overlays: OverlaySet,
    target: ControlTarget,
    controller: Box<dyn InputPassthroughController>,
    settings: Settings,
    textures: Vec<Option<egui::TextureHandle>>,
    pens: Vec<PenState>,
    overlays_visible: bool,
    toasts: Toasts,
    tray: Option<Tray>,
    quit_requested: bool,
}

impl OpenDrawApp {
    pub fn new(
        overlays: OverlaySet,
        controller: Box<dyn InputPassthroughController>,
        settings: Settings,
        tray: Option<Tray>,
    ) -> Self {
        let target = match overlays.first_id() {
            Some(id) if !settings.broadcast_by_default => ControlTarget::Overlay(id),
            _ => ControlTarget::All,
        };
        let count = overlays.len();
        Self {
            overlays,
            target,
            controller,
            settings,
            textures: (0..count).map(|_| None).collect(),
            pens: vec![PenState::default(); count],
            overlays_visible: true,
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
            tray,
            quit_requested: false,
        }
    }

    fn add_toast(&mut self, kind: ToastKind, text: String) {
        if !self.settings.enable_toasts {
            return;
        }
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default()
                .duration_in_seconds(self.settings.toast_duration as f64),
        });
    }

    fn report(&mut self, reports: Vec<CommandReport>) {
        for report in reports {
            match report {
                CommandReport::Saved { overlay, path } => self.add_toast(
                    ToastKind::Success,
                    format!("Saved {overlay} to {}", path.display()),
                ),
                CommandReport::SaveFailed { overlay, error } => {
                    self.add_toast(ToastKind::Error, format!("Saving {overlay} failed: {error}"))
                }
                CommandReport::ClickThroughFailed { overlay, error } => self.add_toast(
                    ToastKind::Warning,
                    format!("Click-through on {overlay} failed: {error}"),
                ),
            }
        }
    }

    fn apply(&mut self, target: ControlTarget, command: ControlCommand) -> Vec<CommandReport> {
        let ctx = CommandContext {
            controller: self.controller.as_ref(),
            save_dir: self.settings.save_dir.as_deref(),
        };
        self.overlays.apply(target, command, &ctx)
    }

    fn save_from_panel(&mut self) {
        let dir = default_save_dir(self.settings.save_dir.as_deref());
        let command = match pick_save_path(&dialog_suggestion(&dir)) {
            SaveChoice::Path(path) => ControlCommand::Save(Some(path)),
            SaveChoice::Unavailable => ControlCommand::Save(None),
            SaveChoice::Cancelled => return,
        };
        let reports = self.apply(self.target, command);
        self.report(reports);
    }

    fn set_overlays_visible(&mut self, visible: bool) {
        self.overlays_visible = visible;
        if visible {
            // Hidden viewports are destroyed; the recreated windows start
            // without click-through and need the full canvas again.
            for overlay in self.overlays.iter_mut() {
                overlay.invalidate_passthrough();
                overlay.mark_full_damage();
            }
        } else {
            for overlay in self.overlays.iter_mut() {
                overlay.pointer_up();
            }
        }
    }

    fn handle_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::Command(command) => {
                let reports = self.apply(self.target, command);
                self.report(reports);
            }
            PanelAction::Save => self.save_from_panel(),
            PanelAction::ToggleOverlays => self.set_overlays_visible(!self.overlays_visible),
        }
    }

    fn handle_tray(&mut self, ctx: &egui::Context) {
        let requests = tray::take_requests();
        if requests.show_controls {
            ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
            ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
            ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        }
        if requests.quit {
            self.quit_requested = true;
        }
    }

    fn show_overlays(&mut self, ctx: &egui::Context) {
        if !self.overlays_visible {
            return;
        }
        let mut keys = Vec::new();
        let mut hide = false;
        for ((overlay, texture), pen) in self
            .overlays
            .iter_mut()
            .zip(self.textures.iter_mut())
            .zip(self.pens.iter_mut())
        {
            let frame = overlay_view::show(ctx, overlay, texture, pen);
            hide |= frame.close_requested;
            keys.extend(frame.keys.into_iter().map(|key| (overlay.id(), key)));
            overlay.sync_passthrough(self.controller.as_ref());
        }

        for (id, key) in keys {
            match key {
                KeyCommand::Quit => {
                    self.quit_requested = true;
                    continue;
                }
                KeyCommand::ToggleOverlays => {
                    hide = true;
                    continue;
                }
                _ => {}
            }
            let command_ctx = CommandContext {
                controller: self.controller.as_ref(),
                save_dir: self.settings.save_dir.as_deref(),
            };
            // Keyboard saves are reported through the log only.
            let _ = self.overlays.apply_key(id, key, &command_ctx);
        }
        if hide {
            self.set_overlays_visible(false);
        }
    }
}

impl eframe::App for OpenDrawApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_tray(ctx);

        if ctx.input(|i| i.viewport().close_requested()) && !self.quit_requested {
            if self.tray.is_some() {
                for command in close_to_tray_commands() {
                    ctx.send_viewport_cmd(command);
                }
            } else {
                self.quit_requested = true;
            }
        }

        let actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                control_panel::show(ui, &self.overlays, &mut self.target, self.overlays_visible)
            })
            .inner;
        for action in actions {
            self.handle_panel_action(action);
        }

        self.show_overlays(ctx);
        self.toasts.show(ctx);

        if self.quit_requested {
            tracing::info!("quitting");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        if self.overlays.is_drawing() {
            ctx.request_repaint();
        } else if self.tray.is_some() {
            ctx.request_repaint_after(TRAY_POLL_INTERVAL);
        }
    }
}
