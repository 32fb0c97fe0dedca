pub mod draw;
pub mod gui;
pub mod logging;
pub mod settings;
pub mod tray;
