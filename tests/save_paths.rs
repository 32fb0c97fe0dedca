use opendraw::draw::canvas::Canvas;
use opendraw::draw::model::Color;
use opendraw::draw::save::{next_default_path, path_for_overlay};
use std::path::Path;
use tempfile::tempdir;

#[test]
fn next_save_skips_existing_first_file() {
    let dir = tempdir().unwrap();
    Canvas::filled(2, 2, Color::RED)
        .save_png(&dir.path().join("opendraw_1.png"))
        .unwrap();
    assert_eq!(next_default_path(dir.path()), dir.path().join("opendraw_2.png"));
}

#[test]
fn saved_png_keeps_transparency() {
    let dir = tempdir().unwrap();
    let path = next_default_path(dir.path());
    let mut canvas = Canvas::new(4, 4);
    canvas.blend(
        1,
        1,
        Color::rgba(0, 255, 0, 200),
        opendraw::draw::model::BlendMode::SourceOver,
    );
    canvas.save_png(&path).unwrap();

    let image = image::open(&path).unwrap().to_rgba8();
    assert_eq!(image.get_pixel(1, 1).0, [0, 255, 0, 200]);
    assert_eq!(image.get_pixel(0, 0).0[3], 0);
}

#[test]
fn single_overlay_keeps_chosen_name() {
    let chosen = Path::new("/tmp/shots/board.png");
    assert_eq!(path_for_overlay(chosen, 0, 1), chosen);
}
