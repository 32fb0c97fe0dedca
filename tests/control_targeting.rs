use opendraw::draw::model::Color;
use opendraw::draw::monitor::MonitorRect;
use opendraw::draw::overlay::{
    CommandContext, CommandReport, ControlCommand, ControlTarget, OverlayId, OverlayOptions,
    OverlaySet,
};
use opendraw::draw::passthrough::DisplayOnlyPassthrough;
use tempfile::tempdir;

fn monitors(count: i32) -> Vec<MonitorRect> {
    (0..count)
        .map(|i| MonitorRect {
            x: i * 32,
            y: 0,
            width: 32,
            height: 24,
            scale_factor: 1.0,
        })
        .collect()
}

fn ctx() -> CommandContext<'static> {
    CommandContext {
        controller: &DisplayOnlyPassthrough,
        save_dir: None,
    }
}

#[test]
fn selected_target_changes_only_that_overlay() {
    let mut set = OverlaySet::from_monitors(&monitors(3), &OverlayOptions::default());
    set.apply(
        ControlTarget::Overlay(OverlayId(1)),
        ControlCommand::SetColor(Color::BLUE),
        &ctx(),
    );
    let colors: Vec<Color> = set.iter().map(|o| o.brush().color).collect();
    assert_eq!(colors[1], Color::BLUE);
    assert_ne!(colors[0], Color::BLUE);
    assert_ne!(colors[2], Color::BLUE);
}

#[test]
fn broadcast_reaches_every_overlay() {
    let mut set = OverlaySet::from_monitors(&monitors(3), &OverlayOptions::default());
    set.apply(ControlTarget::All, ControlCommand::SetEraser, &ctx());
    set.apply(ControlTarget::All, ControlCommand::SetSize(40), &ctx());
    assert!(set.iter().all(|o| o.brush().eraser && o.brush().size == 40));
}

#[test]
fn broadcast_toggle_uses_one_shared_state() {
    let mut set = OverlaySet::from_monitors(&monitors(2), &OverlayOptions::default());
    set.apply(
        ControlTarget::Overlay(OverlayId(1)),
        ControlCommand::ToggleClickThrough,
        &ctx(),
    );
    set.apply(ControlTarget::All, ControlCommand::ToggleClickThrough, &ctx());
    assert!(set.iter().all(|o| o.click_through()));
}

#[test]
fn clear_and_undo_only_touch_targeted_overlay() {
    let mut set = OverlaySet::from_monitors(&monitors(2), &OverlayOptions::default());
    for id in [OverlayId(0), OverlayId(1)] {
        let overlay = set.get_mut(id).unwrap();
        overlay.pointer_down((10.5, 10.5), None);
        overlay.pointer_up();
    }
    set.apply(ControlTarget::Overlay(OverlayId(0)), ControlCommand::Clear, &ctx());
    assert!(set.get(OverlayId(0)).unwrap().canvas().is_blank());
    assert!(!set.get(OverlayId(1)).unwrap().canvas().is_blank());

    set.apply(ControlTarget::Overlay(OverlayId(0)), ControlCommand::Undo, &ctx());
    assert!(!set.get(OverlayId(0)).unwrap().canvas().is_blank());
}

#[test]
fn broadcast_save_writes_one_file_per_overlay() {
    let dir = tempdir().unwrap();
    let mut set = OverlaySet::from_monitors(&monitors(2), &OverlayOptions::default());
    let chosen = dir.path().join("notes.png");
    let reports = set.apply(ControlTarget::All, ControlCommand::Save(Some(chosen)), &ctx());

    assert_eq!(reports.len(), 2);
    assert!(reports
        .iter()
        .all(|r| matches!(r, CommandReport::Saved { .. })));
    assert!(dir.path().join("notes_1.png").exists());
    assert!(dir.path().join("notes_2.png").exists());
}

#[test]
fn default_saves_number_files_in_configured_dir() {
    let dir = tempdir().unwrap();
    let mut set = OverlaySet::from_monitors(&monitors(2), &OverlayOptions::default());
    let ctx = CommandContext {
        controller: &DisplayOnlyPassthrough,
        save_dir: Some(dir.path()),
    };
    set.apply(ControlTarget::All, ControlCommand::Save(None), &ctx);
    assert!(dir.path().join("opendraw_1.png").exists());
    assert!(dir.path().join("opendraw_2.png").exists());
}

#[test]
fn failed_save_is_reported_not_fatal() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"not a folder").unwrap();
    let mut set = OverlaySet::from_monitors(&monitors(1), &OverlayOptions::default());
    let reports = set.apply(
        ControlTarget::All,
        ControlCommand::Save(Some(blocker.join("out.png"))),
        &ctx(),
    );
    assert!(matches!(reports[..], [CommandReport::SaveFailed { .. }]));
}
