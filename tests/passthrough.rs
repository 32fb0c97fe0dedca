use opendraw::draw::monitor::MonitorRect;
use opendraw::draw::overlay::{Overlay, OverlayId, OverlayOptions};
use opendraw::draw::passthrough::{
    DisplayOnlyPassthrough, InputPassthroughController, PassthroughEffect,
};

#[test]
fn display_only_toggle_records_flag_without_native_effect() {
    let mut overlay = Overlay::new(OverlayId(0), MonitorRect::default(), &OverlayOptions::default());
    let effect = overlay.set_click_through(true, &DisplayOnlyPassthrough).unwrap();
    assert_eq!(effect, PassthroughEffect::DisplayOnly);
    assert!(overlay.click_through());
    assert!(overlay.info_text().contains("Click-through: ON"));

    overlay.set_click_through(false, &DisplayOnlyPassthrough).unwrap();
    assert!(!overlay.click_through());
}

#[test]
fn overlay_window_titles_are_unique() {
    let options = OverlayOptions::default();
    let a = Overlay::new(OverlayId(0), MonitorRect::default(), &options);
    let b = Overlay::new(OverlayId(1), MonitorRect::default(), &options);
    assert_ne!(a.window_title(), b.window_title());
}

#[cfg(not(windows))]
#[test]
fn platform_controller_is_display_only_off_windows() {
    assert!(!opendraw::draw::passthrough::platform_controller().is_native());
}

#[cfg(windows)]
#[test]
fn platform_controller_is_native_on_windows() {
    assert!(opendraw::draw::passthrough::platform_controller().is_native());
}

#[test]
fn display_only_controller_never_fails() {
    let controller: &dyn InputPassthroughController = &DisplayOnlyPassthrough;
    assert!(controller.apply("no such window", false).is_ok());
}
