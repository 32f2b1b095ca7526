use std::path::PathBuf;

use svg_frames::{
    Anchor, FramesError, RenderOverrides, RenderSession, ResvgBackend, Rgba, file_uri,
};

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "svg_frames_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

const RED_SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20">
  <rect x="0" y="0" width="20" height="20" fill="#ff0000"/>
</svg>"##;

const EMPTY_SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20"></svg>"##;

fn write_svg(name: &str, svg: &str) -> (PathBuf, String) {
    let dir = temp_dir(name);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("doc.svg");
    std::fs::write(&path, svg).unwrap();
    let uri = file_uri(&path);
    (dir, uri)
}

fn render_first(uri: &str, overrides: RenderOverrides) -> image::RgbaImage {
    let mut session = RenderSession::open(ResvgBackend::new(), uri, 25, overrides.assemble()).unwrap();
    let frame = session.render_frame(0).expect("frame 0 should render");
    session.close();
    image::load_from_memory_with_format(&frame.png, image::ImageFormat::Png)
        .unwrap()
        .to_rgba8()
}

#[test]
fn intrinsic_size_without_overrides() {
    let (dir, uri) = write_svg("resvg_intrinsic", RED_SQUARE);
    let img = render_first(&uri, RenderOverrides::default());
    assert_eq!(img.dimensions(), (20, 20));
    assert_eq!(img.get_pixel(10, 10).0, [255, 0, 0, 255]);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn border_fills_uncovered_canvas_and_anchor_positions_document() {
    let (dir, uri) = write_svg("resvg_anchor", RED_SQUARE);
    let white = Rgba::WHITE;

    let start = render_first(
        &uri,
        RenderOverrides {
            width: 60,
            height: 20,
            anchor: Anchor::Start,
            border: Some(white),
            ..Default::default()
        },
    );
    assert_eq!(start.dimensions(), (60, 20));
    assert_eq!(start.get_pixel(5, 10).0, [255, 0, 0, 255]);
    assert_eq!(start.get_pixel(50, 10).0, [255, 255, 255, 255]);

    let center = render_first(
        &uri,
        RenderOverrides {
            width: 60,
            height: 20,
            border: Some(white),
            ..Default::default()
        },
    );
    assert_eq!(center.get_pixel(5, 10).0, [255, 255, 255, 255]);
    assert_eq!(center.get_pixel(30, 10).0, [255, 0, 0, 255]);
    assert_eq!(center.get_pixel(55, 10).0, [255, 255, 255, 255]);

    let end = render_first(
        &uri,
        RenderOverrides {
            width: 60,
            height: 20,
            anchor: Anchor::End,
            ..Default::default()
        },
    );
    assert_eq!(end.get_pixel(5, 10).0[3], 0);
    assert_eq!(end.get_pixel(55, 10).0, [255, 0, 0, 255]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn background_fills_only_the_document_area() {
    let (dir, uri) = write_svg("resvg_background", EMPTY_SQUARE);
    let img = render_first(
        &uri,
        RenderOverrides {
            width: 60,
            height: 20,
            background: Some(Rgba::BLACK),
            ..Default::default()
        },
    );
    assert_eq!(img.get_pixel(30, 10).0, [0, 0, 0, 255]);
    assert_eq!(img.get_pixel(5, 10).0[3], 0);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn frames_are_deterministic_across_indices() {
    let (dir, uri) = write_svg("resvg_deterministic", RED_SQUARE);
    let mut session = RenderSession::open(ResvgBackend::new(), &uri, 10, None).unwrap();
    let a = session.render_frame(0).unwrap();
    let b = session.render_frame(9).unwrap();
    assert_eq!(a.png, b.png);
    assert_eq!(b.index, 9);
    assert!(!a.is_empty());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unreadable_documents_fail_to_load() {
    let missing = RenderSession::open(ResvgBackend::new(), "file:///definitely/not/here.svg", 25, None);
    assert!(matches!(missing, Err(FramesError::DocumentLoad { .. })));

    let remote = RenderSession::open(ResvgBackend::new(), "http://example.invalid/a.svg", 25, None);
    assert!(matches!(remote, Err(FramesError::DocumentLoad { .. })));

    let (dir, uri) = write_svg("resvg_garbage", "<svg");
    let garbage = RenderSession::open(ResvgBackend::new(), &uri, 25, None);
    assert!(matches!(garbage, Err(FramesError::DocumentLoad { .. })));
    std::fs::remove_dir_all(&dir).ok();
}
