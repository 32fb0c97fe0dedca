use anyhow::{anyhow, Context, Result};

/// Physical-pixel bounds of one display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub scale_factor: f32,
}

impl Default for MonitorRect {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
            scale_factor: 1.0,
        }
    }
}

impl MonitorRect {
    /// Top-left corner in logical points, as the windowing toolkit expects.
    pub fn logical_origin(&self) -> (f32, f32) {
        let scale = self.safe_scale();
        (self.x as f32 / scale, self.y as f32 / scale)
    }

    pub fn logical_size(&self) -> (f32, f32) {
        let scale = self.safe_scale();
        (self.width as f32 / scale, self.height as f32 / scale)
    }

    fn safe_scale(&self) -> f32 {
        if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        }
    }
}

pub fn monitor_name(index: usize, rect: &MonitorRect) -> String {
    format!("Monitor {} ({}x{})", index + 1, rect.width, rect.height)
}

pub fn enumerate_monitors() -> Result<Vec<MonitorRect>> {
    let screens = screenshots::Screen::all().context("enumerate displays")?;
    let monitors: Vec<MonitorRect> = screens
        .iter()
        .map(|screen| {
            let info = screen.display_info;
            MonitorRect {
                x: info.x,
                y: info.y,
                width: info.width,
                height: info.height,
                scale_factor: info.scale_factor,
            }
        })
        .filter(|rect| rect.width > 0 && rect.height > 0)
        .collect();
    if monitors.is_empty() {
        return Err(anyhow!("no displays reported"));
    }
    Ok(monitors)
}

/// Monitors to cover, falling back to one default-sized display when the
/// platform cannot enumerate them.
pub fn monitors_or_fallback() -> Vec<MonitorRect> {
    match enumerate_monitors() {
        Ok(monitors) => monitors,
        Err(err) => {
            tracing::warn!(error = %err, "falling back to a single default monitor");
            vec![MonitorRect::default()]
        }
    }
}
