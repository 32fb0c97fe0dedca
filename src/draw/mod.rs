pub mod canvas;
pub mod history;
pub mod keyboard;
pub mod model;
pub mod monitor;
pub mod overlay;
pub mod passthrough;
pub mod render;
pub mod save;
pub mod stroke;

pub use monitor::MonitorRect;
pub use overlay::{
    CommandContext, CommandReport, ControlCommand, ControlTarget, Overlay, OverlayId,
    OverlayOptions, OverlaySet,
};
