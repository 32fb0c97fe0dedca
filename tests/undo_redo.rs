use opendraw::draw::canvas::Canvas;
use opendraw::draw::history::SnapshotHistory;
use opendraw::draw::model::{BlendMode, Color};

fn canvas_with_mark(x: u32) -> Canvas {
    let mut canvas = Canvas::new(8, 8);
    canvas.blend(x, 0, Color::RED, BlendMode::SourceOver);
    canvas
}

#[test]
fn pushes_over_capacity_evict_oldest_snapshot() {
    let mut history = SnapshotHistory::with_capacity(3);
    for x in 0..5 {
        history.push_undo(&canvas_with_mark(x));
    }
    assert_eq!(history.undo_len(), 3);
    assert_eq!(history.oldest(), Some(&canvas_with_mark(2)));
}

#[test]
fn undo_then_redo_restores_canvas_bit_for_bit() {
    let mut history = SnapshotHistory::with_capacity(30);
    let mut current = Canvas::new(8, 8);
    history.push_undo(&current);
    current.blend(3, 3, Color::rgba(10, 200, 30, 77), BlendMode::SourceOver);
    let edited = current.clone();

    assert!(history.undo(&mut current));
    assert!(current.is_blank());
    assert!(history.redo(&mut current));
    assert_eq!(current, edited);
}

#[test]
fn redo_with_empty_stack_changes_nothing() {
    let mut history: SnapshotHistory<Canvas> = SnapshotHistory::with_capacity(30);
    let mut current = canvas_with_mark(1);
    assert!(!history.redo(&mut current));
    assert_eq!(current, canvas_with_mark(1));
}

#[test]
fn new_edit_after_undo_discards_redo() {
    let mut history = SnapshotHistory::with_capacity(30);
    let mut current = Canvas::new(8, 8);
    history.push_undo(&current);
    current = canvas_with_mark(1);
    assert!(history.undo(&mut current));
    assert_eq!(history.redo_len(), 1);

    history.push_undo(&current);
    assert_eq!(history.redo_len(), 0);
    assert!(!history.redo(&mut current));
}
