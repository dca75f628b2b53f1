#![cfg(feature = "state-persistence")]

//! End-to-end persistence: a session shuts down into storage and the next
//! session picks up window geometry and theme spacing from it.

use std::collections::BTreeMap;
use std::fs;

use imkit_core::geometry::{Point, Sides, Size};
use imkit_core::router::PointerRouter;
use imkit_layout::WindowGeometry;
use imkit_runtime::{FileStorage, MemoryStorage, StateRegistry, StorageError, StoredEntry, UiSession};
use proptest::prelude::*;
use tempfile::TempDir;

const SURFACE: Size = Size::new(1280.0, 720.0);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn draw(session: &mut UiSession, router: &mut PointerRouter, title: &str) {
    let mut open = true;
    let mut frame = session.frame(router, SURFACE);
    frame.begin_panel(title, &mut open, |ui| ui.text("body"));
    frame.finish();
}

#[test]
fn moved_window_reopens_where_it_was_left() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("state").join("session.json");

    let mut session = UiSession::default();
    let mut router = PointerRouter::new();
    draw(&mut session, &mut router, "Tools");
    router.press(Point::new(50.0, 10.0));
    router.drag(Point::new(90.0, 40.0));
    draw(&mut session, &mut router, "Tools");
    session.theme_mut().button_inset = Sides::all(6.0);

    let mut registry = StateRegistry::with_file(&path);
    assert!(session.shutdown(&mut registry).unwrap());
    assert!(path.exists());

    let mut registry = StateRegistry::with_file(&path);
    assert_eq!(registry.load().unwrap(), 2);
    let mut next = UiSession::default();
    let report = next.restore(&registry);
    assert_eq!((report.windows, report.theme, report.skipped), (1, true, 0));

    let mut router = PointerRouter::new();
    draw(&mut next, &mut router, "Tools");
    let window = next.window("Tools").expect("restored window");
    assert_eq!(
        window.geometry,
        WindowGeometry::new(Point::new(40.0, 30.0), Size::new(500.0, 400.0))
    );
    assert_eq!(next.theme().button_inset, Sides::all(6.0));
}

#[test]
fn windows_not_opened_this_run_are_kept() {
    let mut registry = StateRegistry::in_memory();

    let mut first = UiSession::default();
    first.record_geometry("Log", WindowGeometry::new(Point::new(1.0, 1.0), Size::new(10.0, 10.0)));
    first.persist(&mut registry).unwrap();
    assert_eq!(registry.len(), 2);

    // second run only opens "Main"
    let mut second = UiSession::default();
    second.restore(&registry);
    let mut router = PointerRouter::new();
    draw(&mut second, &mut router, "Main");
    let written = second.persist(&mut registry).unwrap();
    assert_eq!(written, 3);
    assert!(registry.get("window::Log").is_some());
    assert!(registry.get("window::Main").is_some());

    // flushing twice writes once
    assert!(registry.flush().unwrap());
    assert!(!registry.flush().unwrap());
}

#[test]
fn partly_corrupt_file_restores_what_it_can() {
    init_tracing();
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("session.json");
    fs::write(
        &path,
        r#"{
  "format_version": 1,
  "entries": {
    "window::Good": { "version": 1, "data_base64": "eyJ4Ijo0MC4wLCJ5IjozMC4wLCJ3aWR0aCI6MjUwLjAsImhlaWdodCI6MTUwLjB9" },
    "window::NotBase64": { "version": 1, "data_base64": "@@@" },
    "window::NotJson": { "version": 1, "data_base64": "bm90IGpzb24=" },
    "theme::spacing": { "version": 7, "data_base64": "e30=" }
  }
}"#,
    )
    .unwrap();

    let mut registry = StateRegistry::new(Box::new(FileStorage::new(&path)));
    assert_eq!(registry.load().unwrap(), 3);
    let mut session = UiSession::default();
    let report = session.restore(&registry);
    assert_eq!(report.windows, 1);
    assert_eq!(report.skipped, 2);
    assert!(!report.theme);
    assert_eq!(
        session.saved_geometry("Good"),
        Some(WindowGeometry::new(Point::new(40.0, 30.0), Size::new(250.0, 150.0)))
    );
}

#[test]
fn unreadable_file_leaves_session_on_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("session.json");
    fs::write(&path, "{ truncated").unwrap();

    let mut registry = StateRegistry::with_file(&path);
    assert!(matches!(registry.load(), Err(StorageError::Serialization(_))));
    let mut session = UiSession::default();
    let report = session.restore(&registry);
    assert_eq!(report.windows + report.skipped, 0);

    // shutting down overwrites the bad file with a good one
    assert!(session.shutdown(&mut registry).unwrap());
    let mut reread = StateRegistry::with_file(&path);
    assert_eq!(reread.load().unwrap(), 1);
    assert!(reread.get("theme::spacing").is_some());
}

#[test]
fn seeded_memory_backend_feeds_restore() {
    let storage = MemoryStorage::with_entries([StoredEntry {
        key: "window::Seeded".into(),
        version: 1,
        data: br#"{"x":3.0,"y":4.0,"width":5.0,"height":6.0}"#.to_vec(),
    }]);
    let mut registry = StateRegistry::new(Box::new(storage));
    registry.load().unwrap();
    let mut session = UiSession::default();
    assert_eq!(session.restore(&registry).windows, 1);
    assert_eq!(registry.stats().entry_count, 1);
    assert!(!registry.stats().dirty);
}

/// Quarter-unit coordinates, as produced by drags on a scaled surface.
fn coord(lo: i32, hi: i32) -> impl Strategy<Value = f32> {
    (lo * 4..hi * 4).prop_map(|q| q as f32 / 4.0)
}

fn geometry() -> impl Strategy<Value = WindowGeometry> {
    (coord(-2000, 2000), coord(-2000, 2000), coord(0, 4000), coord(0, 4000))
        .prop_map(|(x, y, w, h)| WindowGeometry::new(Point::new(x, y), Size::new(w, h)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_saved_geometry_survives_a_file_round_trip(
        windows in prop::collection::btree_map("[A-Za-z][A-Za-z0-9 #:]{0,11}", geometry(), 0..6),
    ) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");

        let mut first = UiSession::default();
        for (title, g) in &windows {
            first.record_geometry(title, *g);
        }
        let mut registry = StateRegistry::with_file(&path);
        prop_assert!(first.shutdown(&mut registry).unwrap());

        let mut registry = StateRegistry::with_file(&path);
        prop_assert_eq!(registry.load().unwrap(), windows.len() + 1);
        let mut next = UiSession::default();
        let report = next.restore(&registry);
        prop_assert_eq!(report.windows, windows.len());
        prop_assert_eq!(report.skipped, 0);

        let restored: BTreeMap<String, WindowGeometry> = windows
            .keys()
            .filter_map(|t| next.saved_geometry(t).map(|g| (t.clone(), g)))
            .collect();
        prop_assert_eq!(restored, windows);
    }
}
