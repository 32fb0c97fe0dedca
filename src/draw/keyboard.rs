use crate::draw::model::Color;

pub const SIZE_STEP: i32 = 2;
pub const SMALL_SIZE_PRESET: u32 = 4;
pub const LARGE_SIZE_PRESET: u32 = 16;

/// Toolkit-neutral key identity. The GUI layer translates its own key events
/// into these before mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    B,
    C,
    D,
    E,
    G,
    H,
    Q,
    R,
    S,
    T,
    W,
    Y,
    Z,
    Num1,
    Num2,
    Plus,
    Equals,
    Minus,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyModifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
    };
    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Brush,
    Eraser,
    Clear,
    Save,
    AdjustSize(i32),
    SetSize(u32),
    SetColor(Color),
    ToggleClickThrough,
    /// Hides every overlay window; handled by the app, not an overlay.
    ToggleOverlays,
    Quit,
    ToggleInfoLabel,
    Undo,
    Redo,
}

pub fn map_key(key: KeyCode, modifiers: KeyModifiers) -> Option<KeyCommand> {
    if modifiers.ctrl && modifiers.shift {
        return match key {
            KeyCode::R => Some(KeyCommand::SetColor(Color::RED)),
            KeyCode::B => Some(KeyCommand::SetColor(Color::BLUE)),
            KeyCode::W => Some(KeyCommand::SetColor(Color::WHITE)),
            KeyCode::G => Some(KeyCommand::SetColor(Color::GREEN)),
            KeyCode::Num1 => Some(KeyCommand::SetSize(SMALL_SIZE_PRESET)),
            KeyCode::Num2 => Some(KeyCommand::SetSize(LARGE_SIZE_PRESET)),
            KeyCode::C => Some(KeyCommand::Clear),
            KeyCode::T => Some(KeyCommand::ToggleClickThrough),
            KeyCode::D => Some(KeyCommand::ToggleOverlays),
            _ => None,
        };
    }

    if modifiers.ctrl {
        return match key {
            KeyCode::Z => Some(KeyCommand::Undo),
            KeyCode::Y => Some(KeyCommand::Redo),
            _ => None,
        };
    }

    match key {
        KeyCode::B => Some(KeyCommand::Brush),
        KeyCode::E => Some(KeyCommand::Eraser),
        KeyCode::C => Some(KeyCommand::Clear),
        KeyCode::S => Some(KeyCommand::Save),
        KeyCode::Plus | KeyCode::Equals => Some(KeyCommand::AdjustSize(SIZE_STEP)),
        KeyCode::Minus => Some(KeyCommand::AdjustSize(-SIZE_STEP)),
        KeyCode::T => Some(KeyCommand::ToggleClickThrough),
        KeyCode::Q => Some(KeyCommand::Quit),
        KeyCode::H => Some(KeyCommand::ToggleInfoLabel),
        _ => None,
    }
}
