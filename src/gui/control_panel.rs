use crate::draw::model::Color;
use crate::draw::overlay::{ControlCommand, ControlTarget, OverlaySet};
use eframe::egui;

pub const PANEL_MIN_SIZE: u32 = 1;
pub const PANEL_MAX_SIZE: u32 = 150;
pub const ALL_MONITORS_LABEL: &str = "All monitors";

/// What the user asked for on this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    Command(ControlCommand),
    /// Ask for a destination, then save.
    Save,
    ToggleOverlays,
}

pub fn target_label(overlays: &OverlaySet, target: ControlTarget) -> String {
    match target {
        ControlTarget::All => ALL_MONITORS_LABEL.to_string(),
        ControlTarget::Overlay(id) => overlays
            .get(id)
            .map(|overlay| overlay.name().to_string())
            .unwrap_or_else(|| format!("Monitor {}", id.0 + 1)),
    }
}

/// Brush size and color shown by the widgets: those of the first targeted overlay.
pub fn panel_brush_values(overlays: &OverlaySet, target: ControlTarget) -> Option<(u32, Color)> {
    let id = *overlays.targets(target).first()?;
    let brush = overlays.get(id)?.brush();
    Some((brush.size, brush.color))
}

pub fn show(
    ui: &mut egui::Ui,
    overlays: &OverlaySet,
    target: &mut ControlTarget,
    overlays_visible: bool,
) -> Vec<PanelAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.label("Target");
        egui::ComboBox::from_id_source("opendraw_target")
            .selected_text(target_label(overlays, *target))
            .show_ui(ui, |ui| {
                for overlay in overlays.iter() {
                    ui.selectable_value(
                        &mut *target,
                        ControlTarget::Overlay(overlay.id()),
                        overlay.name(),
                    );
                }
                ui.selectable_value(&mut *target, ControlTarget::All, ALL_MONITORS_LABEL);
            });
    });

    ui.horizontal(|ui| {
        if ui.button("Toggle Click-through").clicked() {
            actions.push(PanelAction::Command(ControlCommand::ToggleClickThrough));
        }
        let label = if overlays_visible {
            "Hide overlays"
        } else {
            "Show overlays"
        };
        if ui.button(label).clicked() {
            actions.push(PanelAction::ToggleOverlays);
        }
    });

    let (size, color) = panel_brush_values(overlays, *target).unwrap_or_default();

    ui.horizontal(|ui| {
        if ui.button("Brush").clicked() {
            actions.push(PanelAction::Command(ControlCommand::SetBrush));
        }
        if ui.button("Eraser").clicked() {
            actions.push(PanelAction::Command(ControlCommand::SetEraser));
        }
        ui.label("Color");
        let mut rgba = color.to_rgba_array();
        if ui.color_edit_button_srgba_unmultiplied(&mut rgba).changed() {
            actions.push(PanelAction::Command(ControlCommand::SetColor(Color::from(
                rgba,
            ))));
        }
    });

    ui.horizontal(|ui| {
        ui.label("Size");
        let mut value = size.clamp(PANEL_MIN_SIZE, PANEL_MAX_SIZE);
        if ui
            .add(egui::Slider::new(&mut value, PANEL_MIN_SIZE..=PANEL_MAX_SIZE))
            .changed()
        {
            actions.push(PanelAction::Command(ControlCommand::SetSize(value)));
        }
    });

    ui.horizontal(|ui| {
        if ui.button("Undo").clicked() {
            actions.push(PanelAction::Command(ControlCommand::Undo));
        }
        if ui.button("Redo").clicked() {
            actions.push(PanelAction::Command(ControlCommand::Redo));
        }
        if ui.button("Clear").clicked() {
            actions.push(PanelAction::Command(ControlCommand::Clear));
        }
        if ui.button("Save").clicked() {
            actions.push(PanelAction::Save);
        }
    });

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::monitor::MonitorRect;
    use crate::draw::overlay::{OverlayId, OverlayOptions};

    fn two_monitors() -> OverlaySet {
        let first = MonitorRect {
            x: 0,
            y: 0,
            width: 16,
            height: 9,
            scale_factor: 1.0,
        };
        let second = MonitorRect { x: 16, ..first };
        OverlaySet::from_monitors(&[first, second], &OverlayOptions::default())
    }

    #[test]
    fn labels_name_the_selected_monitor_or_broadcast() {
        let overlays = two_monitors();
        assert_eq!(
            target_label(&overlays, ControlTarget::Overlay(OverlayId(1))),
            "Monitor 2 (16x9)"
        );
        assert_eq!(target_label(&overlays, ControlTarget::All), ALL_MONITORS_LABEL);
    }

    #[test]
    fn widgets_follow_first_targeted_overlay() {
        let mut overlays = two_monitors();
        if let Some(overlay) = overlays.get_mut(OverlayId(1)) {
            overlay.brush_mut().set_size(42);
        }
        assert_eq!(
            panel_brush_values(&overlays, ControlTarget::Overlay(OverlayId(1))).map(|v| v.0),
            Some(42)
        );
        assert_eq!(
            panel_brush_values(&overlays, ControlTarget::All).map(|v| v.0),
            Some(8)
        );
    }
}
