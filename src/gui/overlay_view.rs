use crate::draw::canvas::Canvas;
use crate::draw::keyboard::{map_key, KeyCode, KeyCommand, KeyModifiers};
use crate::draw::overlay::{Damage, Overlay};
use crate::draw::stroke::Point;
use eframe::egui;

const INFO_LABEL_OFFSET: f32 = 10.0;

/// Input that survives between frames for one overlay window.
#[derive(Debug, Default, Clone, Copy)]
pub struct PenState {
    /// Latest force reported by a touch/pen device, if any.
    pub pressure: Option<f32>,
}

#[derive(Debug, Default)]
pub struct OverlayFrame {
    pub keys: Vec<KeyCommand>,
    pub close_requested: bool,
}

pub fn viewport_id(overlay: &Overlay) -> egui::ViewportId {
    egui::ViewportId::from_hash_of(overlay.window_title())
}

pub fn viewport_builder(overlay: &Overlay) -> egui::ViewportBuilder {
    let monitor = overlay.monitor();
    let (x, y) = monitor.logical_origin();
    let (width, height) = monitor.logical_size();
    egui::ViewportBuilder::default()
        .with_title(overlay.window_title())
        .with_position([x, y])
        .with_inner_size([width, height])
        .with_decorations(false)
        .with_transparent(true)
        .with_always_on_top()
        .with_taskbar(false)
}

/// Maps a window position to canvas pixels, snapped to pixel centers.
pub fn to_canvas(pos: egui::Pos2, rect: egui::Rect, canvas_size: (u32, u32)) -> Point {
    let (width, height) = canvas_size;
    let sx = if rect.width() > 0.0 {
        width as f32 / rect.width()
    } else {
        1.0
    };
    let sy = if rect.height() > 0.0 {
        height as f32 / rect.height()
    } else {
        1.0
    };
    let x = ((pos.x - rect.min.x) * sx).floor() + 0.5;
    let y = ((pos.y - rect.min.y) * sy).floor() + 0.5;
    (x, y)
}

pub fn key_code(key: egui::Key) -> KeyCode {
    match key {
        egui::Key::B => KeyCode::B,
        egui::Key::C => KeyCode::C,
        egui::Key::D => KeyCode::D,
        egui::Key::E => KeyCode::E,
        egui::Key::G => KeyCode::G,
        egui::Key::H => KeyCode::H,
        egui::Key::Q => KeyCode::Q,
        egui::Key::R => KeyCode::R,
        egui::Key::S => KeyCode::S,
        egui::Key::T => KeyCode::T,
        egui::Key::W => KeyCode::W,
        egui::Key::Y => KeyCode::Y,
        egui::Key::Z => KeyCode::Z,
        egui::Key::Num1 => KeyCode::Num1,
        egui::Key::Num2 => KeyCode::Num2,
        egui::Key::Plus => KeyCode::Plus,
        egui::Key::Equals => KeyCode::Equals,
        egui::Key::Minus => KeyCode::Minus,
        _ => KeyCode::Other,
    }
}

pub fn key_modifiers(modifiers: egui::Modifiers) -> KeyModifiers {
    KeyModifiers {
        ctrl: modifiers.ctrl || modifiers.command,
        shift: modifiers.shift,
    }
}

fn color_image(canvas: &Canvas) -> egui::ColorImage {
    let (width, height) = canvas.size();
    egui::ColorImage::from_rgba_unmultiplied([width as usize, height as usize], canvas.as_raw())
}

/// Uploads whatever changed since the last frame and returns the texture to paint.
fn sync_texture(
    ctx: &egui::Context,
    overlay: &mut Overlay,
    slot: &mut Option<egui::TextureHandle>,
) -> egui::TextureId {
    let damage = overlay.take_damage();
    let canvas = overlay.display_canvas();
    let options = egui::TextureOptions::NEAREST;

    let handle = slot.get_or_insert_with(|| {
        ctx.load_texture(
            format!("{}-canvas", overlay.window_title()),
            color_image(canvas),
            options,
        )
    });

    match damage {
        Damage::None => {}
        Damage::Full => handle.set(color_image(canvas), options),
        Damage::Rect(rect) => {
            if let Some(rect) = rect.clamp(canvas.width(), canvas.height()) {
                let (x, y) = (rect.x as u32, rect.y as u32);
                let (w, h) = (rect.width as u32, rect.height as u32);
                let bytes = canvas.region_rgba(x, y, w, h);
                let image =
                    egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &bytes);
                handle.set_partial([x as usize, y as usize], image, options);
            }
        }
    }
    handle.id()
}

fn handle_event(
    event: &egui::Event,
    overlay: &mut Overlay,
    pen: &mut PenState,
    rect: egui::Rect,
    frame: &mut OverlayFrame,
) {
    let size = overlay.canvas().size();
    match event {
        egui::Event::Touch { phase, force, .. } => match phase {
            egui::TouchPhase::End | egui::TouchPhase::Cancel => pen.pressure = None,
            _ => pen.pressure = *force,
        },
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            ..
        } => {
            if *pressed {
                if rect.contains(*pos) {
                    overlay.pointer_down(to_canvas(*pos, rect, size), pen.pressure);
                }
            } else {
                overlay.pointer_up();
            }
        }
        egui::Event::PointerMoved(pos) => {
            if overlay.is_drawing() {
                overlay.pointer_move(to_canvas(*pos, rect, size), pen.pressure);
            }
        }
        egui::Event::PointerGone => {
            overlay.pointer_up();
        }
        egui::Event::Key {
            key,
            pressed: true,
            modifiers,
            ..
        } => {
            if let Some(command) = map_key(key_code(*key), key_modifiers(*modifiers)) {
                frame.keys.push(command);
            }
        }
        _ => {}
    }
}

fn show_info_label(ctx: &egui::Context, overlay: &Overlay) {
    egui::Area::new(egui::Id::new((overlay.window_title(), "info")))
        .fixed_pos(egui::pos2(INFO_LABEL_OFFSET, INFO_LABEL_OFFSET))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(egui::Color32::from_black_alpha(140))
                .rounding(6.0)
                .inner_margin(6.0)
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(overlay.info_text()).color(egui::Color32::WHITE));
                });
        });
}

/// Shows one overlay window for this frame: routes its input into the
/// overlay, uploads canvas changes, and paints.
pub fn show(
    ctx: &egui::Context,
    overlay: &mut Overlay,
    texture: &mut Option<egui::TextureHandle>,
    pen: &mut PenState,
) -> OverlayFrame {
    ctx.show_viewport_immediate(viewport_id(overlay), viewport_builder(overlay), |ctx, _class| {
        let mut frame = OverlayFrame::default();
        let rect = ctx.screen_rect();
        let events = ctx.input(|i| i.events.clone());
        for event in &events {
            handle_event(event, overlay, pen, rect, &mut frame);
        }
        frame.close_requested = ctx.input(|i| i.viewport().close_requested());
        if frame.close_requested {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }

        let texture_id = sync_texture(ctx, overlay, texture);
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.painter().image(
                    texture_id,
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            });
        if overlay.info_visible() {
            show_info_label(ctx, overlay);
        }
        frame
    })
}
