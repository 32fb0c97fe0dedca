use anyhow::Result;

pub const EX_STYLE_LAYERED: u32 = 0x0008_0000;
pub const EX_STYLE_TRANSPARENT: u32 = 0x0000_0020;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassthroughEffect {
    /// The native window now lets pointer input fall through (or captures it again).
    Native,
    /// No native call exists on this platform; only the overlay's own flag changed.
    DisplayOnly,
}

/// Capability for making an overlay window transparent to pointer input while
/// it stays visually on top.
pub trait InputPassthroughController {
    fn apply(&self, window_title: &str, enabled: bool) -> Result<PassthroughEffect>;

    fn is_native(&self) -> bool;
}

/// Extended-style bits after toggling click-through. Enabling also forces the
/// layered bit, which the transparent bit needs to take effect.
pub fn compose_ex_style(current: u32, enabled: bool) -> u32 {
    if enabled {
        current | EX_STYLE_LAYERED | EX_STYLE_TRANSPARENT
    } else {
        current & !EX_STYLE_TRANSPARENT
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DisplayOnlyPassthrough;

impl InputPassthroughController for DisplayOnlyPassthrough {
    fn apply(&self, window_title: &str, enabled: bool) -> Result<PassthroughEffect> {
        tracing::debug!(
            window = window_title,
            enabled,
            "click-through is display-only on this platform"
        );
        Ok(PassthroughEffect::DisplayOnly)
    }

    fn is_native(&self) -> bool {
        false
    }
}

#[cfg(windows)]
pub use platform::Win32Passthrough;

#[cfg(windows)]
pub fn platform_controller() -> Box<dyn InputPassthroughController> {
    Box::new(Win32Passthrough)
}

#[cfg(not(windows))]
pub fn platform_controller() -> Box<dyn InputPassthroughController> {
    Box::new(DisplayOnlyPassthrough)
}

#[cfg(windows)]
mod platform {
    use super::{compose_ex_style, InputPassthroughController, PassthroughEffect};
    use anyhow::{anyhow, Result};
    use windows::core::PCWSTR;
    use windows::Win32::UI::WindowsAndMessaging::{
        FindWindowW, GetWindowLongPtrW, SetWindowLongPtrW, GWL_EXSTYLE,
    };

    fn widestring(value: &str) -> Vec<u16> {
        use std::os::windows::ffi::OsStrExt;
        std::ffi::OsStr::new(value)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect()
    }

    /// Flips `WS_EX_TRANSPARENT` on the overlay's top-level window, located by
    /// its unique title.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct Win32Passthrough;

    impl InputPassthroughController for Win32Passthrough {
        fn apply(&self, window_title: &str, enabled: bool) -> Result<PassthroughEffect> {
            let title = widestring(window_title);
            let hwnd = unsafe { FindWindowW(PCWSTR::null(), PCWSTR(title.as_ptr())) }
                .map_err(|err| anyhow!("overlay window {window_title:?} not found: {err}"))?;
            if hwnd.0.is_null() {
                return Err(anyhow!("overlay window {window_title:?} not found"));
            }

            let current = unsafe { GetWindowLongPtrW(hwnd, GWL_EXSTYLE) } as u32;
            let next = compose_ex_style(current, enabled);
            if next != current {
                unsafe {
                    SetWindowLongPtrW(hwnd, GWL_EXSTYLE, next as isize);
                }
            }
            Ok(PassthroughEffect::Native)
        }

        fn is_native(&self) -> bool {
            true
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabling_sets_layered_and_transparent_bits() {
        let style = compose_ex_style(0x0000_0008, true);
        assert_ne!(style & EX_STYLE_LAYERED, 0);
        assert_ne!(style & EX_STYLE_TRANSPARENT, 0);
        assert_ne!(style & 0x0000_0008, 0);
    }

    #[test]
    fn disabling_clears_only_transparent_bit() {
        let enabled = compose_ex_style(0, true);
        let disabled = compose_ex_style(enabled, false);
        assert_eq!(disabled & EX_STYLE_TRANSPARENT, 0);
        assert_ne!(disabled & EX_STYLE_LAYERED, 0);
    }

    #[test]
    fn display_only_controller_reports_no_native_effect() {
        let controller = DisplayOnlyPassthrough;
        assert!(!controller.is_native());
        assert_eq!(
            controller.apply("OpenDraw Overlay 1", true).expect("apply"),
            PassthroughEffect::DisplayOnly
        );
    }
}
