use crate::draw::canvas::Canvas;
use crate::draw::history::{SnapshotHistory, MAX_UNDO};
use crate::draw::keyboard::KeyCommand;
use crate::draw::model::{BrushSettings, Color, StrokeMode};
use crate::draw::monitor::{monitor_name, MonitorRect};
use crate::draw::passthrough::{InputPassthroughController, PassthroughEffect};
use crate::draw::render::{
    render_pieces, render_segment, render_stroke, union_dirty, Coverage, DirtyRect,
};
use crate::draw::save::{default_save_dir, next_default_path, path_for_overlay};
use crate::draw::stroke::{normalize_pressure, PathPiece, Point, Sample, Stroke, DEFAULT_PRESSURE};
use crate::settings::Settings;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const OVERLAY_TITLE_PREFIX: &str = "OpenDraw Overlay";

/// Handle of one overlay inside an [`OverlaySet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub usize);

/// Which overlays a control-panel command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlTarget {
    Overlay(OverlayId),
    All,
}

/// Region of the displayed image that changed since the last upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Damage {
    #[default]
    None,
    Rect(DirtyRect),
    Full,
}

impl Damage {
    fn add(self, rect: Option<DirtyRect>) -> Self {
        match (self, rect) {
            (Damage::Full, _) => Damage::Full,
            (current, None) => current,
            (Damage::None, Some(rect)) => Damage::Rect(rect),
            (Damage::Rect(prev), Some(rect)) => Damage::Rect(prev.union(rect)),
        }
    }
}

/// Per-overlay values seeded from the settings file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayOptions {
    pub brush: BrushSettings,
    pub stroke_mode: StrokeMode,
    pub max_undo: usize,
    pub show_info_label: bool,
    pub enable_pressure: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            brush: BrushSettings::default(),
            stroke_mode: StrokeMode::default(),
            max_undo: MAX_UNDO,
            show_info_label: true,
            enable_pressure: true,
        }
    }
}

impl OverlayOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            brush: settings.brush(),
            stroke_mode: settings.stroke_mode,
            max_undo: settings.max_undo,
            show_info_label: settings.show_info_label,
            enable_pressure: settings.enable_pressure,
        }
    }
}

struct ActiveStroke {
    stroke: Stroke,
    coverage: Coverage,
    /// Smoothed mode draws into a copy of the canvas until pointer-up.
    preview: Option<Canvas>,
}

pub struct Overlay {
    id: OverlayId,
    name: String,
    window_title: String,
    monitor: MonitorRect,
    canvas: Canvas,
    brush: BrushSettings,
    stroke_mode: StrokeMode,
    history: SnapshotHistory<Canvas>,
    active: Option<ActiveStroke>,
    click_through: bool,
    passthrough_synced: bool,
    info_visible: bool,
    enable_pressure: bool,
    damage: Damage,
}

impl Overlay {
    pub fn new(id: OverlayId, monitor: MonitorRect, options: &OverlayOptions) -> Self {
        let name = monitor_name(id.0, &monitor);
        let window_title = format!("{OVERLAY_TITLE_PREFIX} {}", id.0 + 1);
        tracing::info!(
            overlay = %name,
            x = monitor.x,
            y = monitor.y,
            "creating overlay"
        );
        Self {
            id,
            name,
            window_title,
            monitor,
            canvas: Canvas::new(monitor.width, monitor.height),
            brush: options.brush,
            stroke_mode: options.stroke_mode,
            history: SnapshotHistory::with_capacity(options.max_undo),
            active: None,
            click_through: false,
            passthrough_synced: true,
            info_visible: options.show_info_label,
            enable_pressure: options.enable_pressure,
            damage: Damage::Full,
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unique native window title, used to locate the window for click-through.
    pub fn window_title(&self) -> &str {
        &self.window_title
    }

    pub fn monitor(&self) -> MonitorRect {
        self.monitor
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut BrushSettings {
        &mut self.brush
    }

    pub fn history(&self) -> &SnapshotHistory<Canvas> {
        &self.history
    }

    pub fn click_through(&self) -> bool {
        self.click_through
    }

    pub fn info_visible(&self) -> bool {
        self.info_visible
    }

    pub fn set_info_visible(&mut self, visible: bool) {
        self.info_visible = visible;
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    /// What the overlay should show right now: the live preview while a
    /// smoothed stroke is in progress, the committed canvas otherwise.
    pub fn display_canvas(&self) -> &Canvas {
        self.active
            .as_ref()
            .and_then(|active| active.preview.as_ref())
            .unwrap_or(&self.canvas)
    }

    pub fn take_damage(&mut self) -> Damage {
        std::mem::take(&mut self.damage)
    }

    pub fn mark_full_damage(&mut self) {
        self.damage = Damage::Full;
    }

    pub fn info_text(&self) -> String {
        format!(
            "{} | {} | Size: {} | Click-through: {}\nKeys: B/E/C/S +/- T Q H | Ctrl+Z/Y undo/redo",
            self.name,
            self.brush.mode_label(),
            self.brush.size,
            if self.click_through { "ON" } else { "OFF" }
        )
    }

    fn sample(&self, pos: Point, pressure: Option<f32>) -> Sample {
        let pressure = if self.enable_pressure {
            normalize_pressure(pressure)
        } else {
            DEFAULT_PRESSURE
        };
        Sample::new(pos, pressure)
    }

    /// Starts a stroke. Returns `false` when the overlay ignores pointer input.
    pub fn pointer_down(&mut self, pos: Point, pressure: Option<f32>) -> bool {
        if self.click_through {
            return false;
        }
        if self.active.is_some() {
            self.finish_stroke();
        }
        self.push_undo();

        let sample = self.sample(pos, pressure);
        let (width, height) = self.canvas.size();
        let mut coverage = Coverage::new(width, height);
        let dot = [PathPiece::Dot {
            center: sample.pos,
            pressure: sample.pressure,
        }];
        let (preview, dirty) = match self.stroke_mode {
            StrokeMode::Smoothed => {
                let mut preview = self.canvas.clone();
                let dirty = render_pieces(&mut preview, &mut coverage, &dot, &self.brush);
                (Some(preview), dirty)
            }
            StrokeMode::Direct => {
                let dirty = render_pieces(&mut self.canvas, &mut coverage, &dot, &self.brush);
                (None, dirty)
            }
        };
        self.damage = self.damage.add(dirty);
        self.active = Some(ActiveStroke {
            stroke: Stroke::begin(sample),
            coverage,
            preview,
        });
        true
    }

    pub fn pointer_move(&mut self, pos: Point, pressure: Option<f32>) -> bool {
        let sample = self.sample(pos, pressure);
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let Some(previous) = active.stroke.last() else {
            return false;
        };
        if previous.pos == sample.pos {
            return false;
        }
        active.stroke.push(sample);
        let target = match active.preview.as_mut() {
            Some(preview) => preview,
            None => &mut self.canvas,
        };
        let dirty = render_segment(target, &mut active.coverage, previous, sample, &self.brush);
        self.damage = self.damage.add(dirty);
        true
    }

    pub fn pointer_up(&mut self) -> bool {
        if self.active.is_none() {
            return false;
        }
        self.finish_stroke();
        true
    }

    fn finish_stroke(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        if active.preview.is_some() {
            // The preview was drawn with raw segments; the committed curve
            // replaces it, so both footprints need repainting.
            let committed = render_stroke(&mut self.canvas, active.stroke.samples(), &self.brush);
            self.damage = self
                .damage
                .add(union_dirty(active.coverage.bounds(), committed));
        }
    }

    pub fn push_undo(&mut self) {
        self.history.push_undo(&self.canvas);
    }

    pub fn undo(&mut self) -> bool {
        self.finish_stroke();
        let changed = self.history.undo(&mut self.canvas);
        tracing::debug!(overlay = %self.name, changed, "undo");
        if changed {
            self.damage = Damage::Full;
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        self.finish_stroke();
        let changed = self.history.redo(&mut self.canvas);
        tracing::debug!(overlay = %self.name, changed, "redo");
        if changed {
            self.damage = Damage::Full;
        }
        changed
    }

    /// Clears the canvas. The previous content stays reachable through undo.
    pub fn clear(&mut self) {
        self.finish_stroke();
        self.push_undo();
        self.canvas.clear();
        self.damage = Damage::Full;
    }

    /// Records the flag regardless of the native outcome; a native failure is
    /// logged and returned.
    pub fn set_click_through(
        &mut self,
        enabled: bool,
        controller: &dyn InputPassthroughController,
    ) -> Result<PassthroughEffect> {
        if enabled {
            self.finish_stroke();
        }
        self.click_through = enabled;
        tracing::info!(overlay = %self.name, enabled, "click-through changed");
        match controller.apply(&self.window_title, enabled) {
            Ok(effect) => {
                self.passthrough_synced = true;
                Ok(effect)
            }
            Err(err) => {
                self.passthrough_synced = false;
                tracing::warn!(overlay = %self.name, error = %err, "native click-through failed");
                Err(err)
            }
        }
    }

    /// Forgets that the native window carries the current click-through state,
    /// e.g. after the window was destroyed and recreated.
    pub fn invalidate_passthrough(&mut self) {
        self.passthrough_synced = !self.click_through;
    }

    /// Reapplies the click-through flag until the native window accepts it.
    pub fn sync_passthrough(&mut self, controller: &dyn InputPassthroughController) {
        if self.passthrough_synced {
            return;
        }
        match controller.apply(&self.window_title, self.click_through) {
            Ok(_) => self.passthrough_synced = true,
            Err(err) => {
                tracing::debug!(overlay = %self.name, error = %err, "click-through not applied yet")
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.canvas.save_png(path)
    }
}

/// Commands the control panel and keyboard shortcuts issue against overlays.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    SetBrush,
    SetEraser,
    SetColor(Color),
    SetSize(u32),
    AdjustSize(i32),
    Undo,
    Redo,
    Clear,
    ToggleClickThrough,
    ToggleInfoLabel,
    /// `None` saves to the auto-numbered default path.
    Save(Option<PathBuf>),
}

impl ControlCommand {
    /// Overlay-level command for a shortcut. Quitting and hiding the
    /// overlays are handled by the app.
    pub fn from_key(command: KeyCommand) -> Option<Self> {
        Some(match command {
            KeyCommand::Brush => ControlCommand::SetBrush,
            KeyCommand::Eraser => ControlCommand::SetEraser,
            KeyCommand::Clear => ControlCommand::Clear,
            KeyCommand::Save => ControlCommand::Save(None),
            KeyCommand::AdjustSize(delta) => ControlCommand::AdjustSize(delta),
            KeyCommand::SetSize(size) => ControlCommand::SetSize(size),
            KeyCommand::SetColor(color) => ControlCommand::SetColor(color),
            KeyCommand::ToggleClickThrough => ControlCommand::ToggleClickThrough,
            KeyCommand::ToggleInfoLabel => ControlCommand::ToggleInfoLabel,
            KeyCommand::Undo => ControlCommand::Undo,
            KeyCommand::Redo => ControlCommand::Redo,
            KeyCommand::Quit | KeyCommand::ToggleOverlays => return None,
        })
    }
}

pub struct CommandContext<'a> {
    pub controller: &'a dyn InputPassthroughController,
    /// Configured folder for auto-numbered saves.
    pub save_dir: Option<&'a Path>,
}

/// Outcomes worth telling the user about.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandReport {
    Saved { overlay: String, path: PathBuf },
    SaveFailed { overlay: String, error: String },
    ClickThroughFailed { overlay: String, error: String },
}

pub struct OverlaySet {
    overlays: Vec<Overlay>,
}

impl OverlaySet {
    pub fn from_monitors(monitors: &[MonitorRect], options: &OverlayOptions) -> Self {
        let overlays = monitors
            .iter()
            .enumerate()
            .map(|(index, monitor)| Overlay::new(OverlayId(index), *monitor, options))
            .collect();
        Self { overlays }
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(id.0)
    }

    pub fn get_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        self.overlays.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Overlay> {
        self.overlays.iter_mut()
    }

    pub fn first_id(&self) -> Option<OverlayId> {
        self.overlays.first().map(Overlay::id)
    }

    pub fn is_drawing(&self) -> bool {
        self.overlays.iter().any(Overlay::is_drawing)
    }

    /// Overlays addressed by `target`; an unknown id addresses nothing.
    pub fn targets(&self, target: ControlTarget) -> Vec<OverlayId> {
        match target {
            ControlTarget::Overlay(id) if id.0 < self.overlays.len() => vec![id],
            ControlTarget::Overlay(_) => Vec::new(),
            ControlTarget::All => self.overlays.iter().map(Overlay::id).collect(),
        }
    }

    pub fn apply(
        &mut self,
        target: ControlTarget,
        command: ControlCommand,
        ctx: &CommandContext<'_>,
    ) -> Vec<CommandReport> {
        let ids = self.targets(target);
        let Some(&first) = ids.first() else {
            return Vec::new();
        };
        // Toggles broadcast a single new state so overlays never drift apart.
        let toggled_click_through = self.overlays[first.0].click_through;
        let toggled_info = self.overlays[first.0].info_visible;
        let count = ids.len();
        let mut reports = Vec::new();

        for (position, id) in ids.into_iter().enumerate() {
            let overlay = &mut self.overlays[id.0];
            match &command {
                ControlCommand::SetBrush => overlay.brush.eraser = false,
                ControlCommand::SetEraser => overlay.brush.eraser = true,
                ControlCommand::SetColor(color) => overlay.brush.color = *color,
                ControlCommand::SetSize(size) => overlay.brush.set_size(*size),
                ControlCommand::AdjustSize(delta) => overlay.brush.adjust_size(*delta),
                ControlCommand::Undo => {
                    overlay.undo();
                }
                ControlCommand::Redo => {
                    overlay.redo();
                }
                ControlCommand::Clear => overlay.clear(),
                ControlCommand::ToggleClickThrough => {
                    if let Err(err) =
                        overlay.set_click_through(!toggled_click_through, ctx.controller)
                    {
                        reports.push(CommandReport::ClickThroughFailed {
                            overlay: overlay.name.clone(),
                            error: format!("{err:#}"),
                        });
                    }
                }
                ControlCommand::ToggleInfoLabel => overlay.set_info_visible(!toggled_info),
                ControlCommand::Save(chosen) => {
                    let path = match chosen {
                        Some(chosen) => path_for_overlay(chosen, position, count),
                        None => next_default_path(&default_save_dir(ctx.save_dir)),
                    };
                    reports.push(save_overlay(overlay, path));
                }
            }
        }
        reports
    }

    /// Applies a shortcut pressed on overlay `id`. Returns `None` for the
    /// app-level shortcuts.
    pub fn apply_key(
        &mut self,
        id: OverlayId,
        command: KeyCommand,
        ctx: &CommandContext<'_>,
    ) -> Option<Vec<CommandReport>> {
        let command = ControlCommand::from_key(command)?;
        Some(self.apply(ControlTarget::Overlay(id), command, ctx))
    }
}

fn save_overlay(overlay: &Overlay, path: PathBuf) -> CommandReport {
    match overlay.save_to(&path) {
        Ok(()) => {
            tracing::info!(overlay = %overlay.name, path = %path.display(), "saved snapshot");
            CommandReport::Saved {
                overlay: overlay.name.clone(),
                path,
            }
        }
        Err(err) => {
            tracing::error!(
                overlay = %overlay.name,
                path = %path.display(),
                error = %format!("{err:#}"),
                "save failed"
            );
            CommandReport::SaveFailed {
                overlay: overlay.name.clone(),
                error: format!("{err:#}"),
            }
        }
    }
}
