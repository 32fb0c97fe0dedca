//! Notification-area icon with "Show Controls" and "Quit" entries.
//!
//! The icon's window procedure runs on the UI thread inside the winit message
//! pump; it only flips the atomics below, which the app drains every frame.

use std::sync::atomic::{AtomicBool, Ordering};

pub const TRAY_TOOLTIP: &str = "OpenDraw";

static SHOW_CONTROLS: AtomicBool = AtomicBool::new(false);
static QUIT: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrayRequests {
    pub show_controls: bool,
    pub quit: bool,
}

pub fn request_show_controls() {
    SHOW_CONTROLS.store(true, Ordering::SeqCst);
}

pub fn request_quit() {
    QUIT.store(true, Ordering::SeqCst);
}

/// Returns and resets the pending requests.
pub fn take_requests() -> TrayRequests {
    TrayRequests {
        show_controls: SHOW_CONTROLS.swap(false, Ordering::SeqCst),
        quit: QUIT.swap(false, Ordering::SeqCst),
    }
}

#[cfg(windows)]
pub use platform::Tray;

#[cfg(not(windows))]
pub struct Tray;

#[cfg(not(windows))]
impl Tray {
    pub fn install() -> Option<Self> {
        tracing::debug!("no tray icon on this platform");
        None
    }
}

#[cfg(windows)]
mod platform {
    use super::{request_quit, request_show_controls, TRAY_TOOLTIP};
    use std::sync::Once;
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, WPARAM};
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::UI::Shell::{
        Shell_NotifyIconW, NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NOTIFYICONDATAW,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        AppendMenuW, CreatePopupMenu, CreateWindowExW, DefWindowProcW, DestroyMenu,
        DestroyWindow, GetCursorPos, LoadIconW, RegisterClassW, SetForegroundWindow,
        TrackPopupMenu, IDI_APPLICATION, MF_STRING, TPM_BOTTOMALIGN, TPM_LEFTALIGN,
        WINDOW_EX_STYLE, WINDOW_STYLE, WM_APP, WM_COMMAND, WM_LBUTTONUP, WM_RBUTTONUP, WNDCLASSW,
    };

    const TRAY_ID: u32 = 1;
    const WM_TRAY_CALLBACK: u32 = WM_APP + 1;
    const MENU_SHOW_CONTROLS: usize = 1001;
    const MENU_QUIT: usize = 1002;

    fn widestring(value: &str) -> Vec<u16> {
        use std::os::windows::ffi::OsStrExt;
        std::ffi::OsStr::new(value)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect()
    }

    unsafe fn show_menu(hwnd: HWND) {
        let Ok(menu) = (unsafe { CreatePopupMenu() }) else {
            return;
        };
        let show = widestring("Show Controls");
        let quit = widestring("Quit");
        unsafe {
            let _ = AppendMenuW(menu, MF_STRING, MENU_SHOW_CONTROLS, PCWSTR(show.as_ptr()));
            let _ = AppendMenuW(menu, MF_STRING, MENU_QUIT, PCWSTR(quit.as_ptr()));
            // The menu only dismisses on outside clicks when its owner is foreground.
            let _ = SetForegroundWindow(hwnd);
            let mut pt = POINT::default();
            let _ = GetCursorPos(&mut pt);
            let _ = TrackPopupMenu(
                menu,
                TPM_LEFTALIGN | TPM_BOTTOMALIGN,
                pt.x,
                pt.y,
                0,
                hwnd,
                None,
            );
            let _ = DestroyMenu(menu);
        }
    }

    unsafe extern "system" fn tray_wndproc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            WM_TRAY_CALLBACK => {
                match (lparam.0 & 0xffff) as u32 {
                    WM_LBUTTONUP => {
                        tracing::info!("tray: show controls");
                        request_show_controls();
                    }
                    WM_RBUTTONUP => unsafe { show_menu(hwnd) },
                    _ => {}
                }
                LRESULT(0)
            }
            WM_COMMAND => {
                match wparam.0 & 0xffff {
                    MENU_SHOW_CONTROLS => {
                        tracing::info!("tray: show controls");
                        request_show_controls();
                    }
                    MENU_QUIT => {
                        tracing::info!("tray: quit");
                        request_quit();
                    }
                    _ => {}
                }
                LRESULT(0)
            }
            _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
        }
    }

    fn icon_data(hwnd: HWND) -> NOTIFYICONDATAW {
        NOTIFYICONDATAW {
            cbSize: std::mem::size_of::<NOTIFYICONDATAW>() as u32,
            hWnd: hwnd,
            uID: TRAY_ID,
            ..Default::default()
        }
    }

    /// Hidden owner window plus its notification-area icon. Dropping it
    /// removes the icon.
    #[derive(Debug)]
    pub struct Tray {
        hwnd: HWND,
    }

    impl Tray {
        pub fn install() -> Option<Self> {
            static REGISTER_CLASS: Once = Once::new();
            let class_name = widestring("OpenDrawTray");
            let hinstance = match unsafe { GetModuleHandleW(PCWSTR::null()) } {
                Ok(hinstance) => hinstance,
                Err(err) => {
                    tracing::warn!(error = %err, "tray icon unavailable");
                    return None;
                }
            };

            REGISTER_CLASS.call_once(|| unsafe {
                let wc = WNDCLASSW {
                    hInstance: hinstance.into(),
                    lpszClassName: PCWSTR(class_name.as_ptr()),
                    lpfnWndProc: Some(tray_wndproc),
                    ..Default::default()
                };
                let _ = RegisterClassW(&wc);
            });

            let title = widestring(TRAY_TOOLTIP);
            let hwnd = match unsafe {
                CreateWindowExW(
                    WINDOW_EX_STYLE::default(),
                    PCWSTR(class_name.as_ptr()),
                    PCWSTR(title.as_ptr()),
                    WINDOW_STYLE::default(),
                    0,
                    0,
                    0,
                    0,
                    None,
                    None,
                    hinstance,
                    None,
                )
            } {
                Ok(hwnd) => hwnd,
                Err(err) => {
                    tracing::warn!(error = %err, "tray window creation failed");
                    return None;
                }
            };

            let mut nid = icon_data(hwnd);
            nid.uFlags = NIF_MESSAGE | NIF_ICON | NIF_TIP;
            nid.uCallbackMessage = WM_TRAY_CALLBACK;
            nid.hIcon = unsafe { LoadIconW(None, IDI_APPLICATION) }.unwrap_or_default();
            let tip: Vec<u16> = TRAY_TOOLTIP.encode_utf16().collect();
            let len = tip.len().min(nid.szTip.len() - 1);
            nid.szTip[..len].copy_from_slice(&tip[..len]);

            if !unsafe { Shell_NotifyIconW(NIM_ADD, &nid) }.as_bool() {
                tracing::warn!("tray icon could not be added");
                unsafe {
                    let _ = DestroyWindow(hwnd);
                }
                return None;
            }
            tracing::info!("tray icon installed");
            Some(Self { hwnd })
        }
    }

    impl Drop for Tray {
        fn drop(&mut self) {
            let nid = icon_data(self.hwnd);
            unsafe {
                let _ = Shell_NotifyIconW(NIM_DELETE, &nid);
                let _ = DestroyWindow(self.hwnd);
            }
        }
    }
}
