//! Multi-frame widget interaction tests.
//!
//! Each test renders a frame so the router learns hit regions, feeds pointer
//! or key input at the laid-out rectangles, and checks what the next frame's
//! widget calls report.

use imkit_core::draw::DrawList;
use imkit_core::event::{EditKey, EventSource};
use imkit_core::geometry::{Point, Rect, Sides};
use imkit_core::router::PointerRouter;
use imkit_layout::Arranged;
use imkit_widgets::{TextFieldState, Theme, Ui, UiContext};

fn frame(cx: &mut UiContext, router: &mut PointerRouter, body: impl FnOnce(&mut Ui<'_>)) -> Arranged {
    themed_frame(cx, router, &Theme::default(), body)
}

fn themed_frame(
    cx: &mut UiContext,
    router: &mut PointerRouter,
    theme: &Theme,
    body: impl FnOnce(&mut Ui<'_>),
) -> Arranged {
    cx.begin_frame(theme);
    {
        let mut ui = cx.ui(&mut *router);
        body(&mut ui);
    }
    let mut out = DrawList::new();
    let arranged = cx.finish(&mut *router, Rect::new(0.0, 0.0, 400.0, 300.0), &mut out);
    router.finish_frame();
    arranged
}

fn rect_of(arranged: &Arranged, key: &str) -> Rect {
    arranged
        .placements
        .iter()
        .find(|p| p.key == key)
        .map(|p| p.rect)
        .unwrap_or_else(|| panic!("no placement for {key}"))
}

fn center(r: Rect) -> Point {
    Point::new(r.x + r.width / 2.0, r.y + r.height / 2.0)
}

#[test]
fn button_click_reports_once() {
    let mut cx = UiContext::new("root");
    let mut router = PointerRouter::new();
    let arranged = frame(&mut cx, &mut router, |ui| {
        assert!(!ui.button("OK"));
    });
    let at = center(rect_of(&arranged, "OKbutton"));
    router.press(at);
    router.release(at);

    let mut clicked = false;
    frame(&mut cx, &mut router, |ui| clicked = ui.button("OK"));
    assert!(clicked);

    frame(&mut cx, &mut router, |ui| clicked = ui.button("OK"));
    assert!(!clicked);
}

#[test]
fn typing_into_focused_field_updates_bound_string() {
    let mut cx = UiContext::new("root");
    let mut router = PointerRouter::new();
    let mut name = String::from("Bob");
    let arranged = frame(&mut cx, &mut router, |ui| {
        ui.input_text("Name", &mut name);
    });
    router.press(center(rect_of(&arranged, "Nameinputtext")));
    router.release(center(rect_of(&arranged, "Nameinputtext")));
    router.key(EditKey::Insert("!".into()));

    let mut edited = false;
    frame(&mut cx, &mut router, |ui| edited = ui.input_text("Name", &mut name));
    assert!(edited);
    assert_eq!(name, "Bob!");
}

#[test]
fn external_text_change_keeps_cursor_column() {
    let mut cx = UiContext::new("root");
    let mut router = PointerRouter::new();
    let mut text = String::from("hello world");
    frame(&mut cx, &mut router, |ui| {
        ui.input_text("T", &mut text);
    });
    cx.cache_mut()
        .get_mut::<TextFieldState>("Tinputtext")
        .expect("field state")
        .cursor = 5;

    text = String::from("HELLO WORLD!!");
    frame(&mut cx, &mut router, |ui| {
        assert!(!ui.input_text("T", &mut text));
    });
    let state = cx.cache().get::<TextFieldState>("Tinputtext").cloned();
    assert_eq!(
        state,
        Some(TextFieldState {
            buffer: "HELLO WORLD!!".into(),
            cursor: 5
        })
    );
}

#[test]
fn slider_press_maps_onto_last_frame_rect() {
    let mut cx = UiContext::new("root");
    let mut router = PointerRouter::new();
    let mut volume = 0.0;
    let arranged = frame(&mut cx, &mut router, |ui| {
        ui.slider_float("Vol", &mut volume, 0.0, 10.0);
    });
    let r = rect_of(&arranged, "Volsliderfloat");
    router.press(Point::new(r.x + r.width * 0.5, r.y + 1.0));

    let mut changed = false;
    frame(&mut cx, &mut router, |ui| {
        changed = ui.slider_float("Vol", &mut volume, 0.0, 10.0);
    });
    assert!(changed);
    assert!((volume - 5.0).abs() < 1e-3, "volume = {volume}");
}

/// Wide side insets, as the theme editor can set them.
fn padded_theme() -> Theme {
    Theme {
        widget_inset: Sides::new(2.0, 20.0, 2.0, 30.0),
        ..Theme::default()
    }
}

#[test]
fn slider_press_ignores_side_inset() {
    let theme = padded_theme();
    let mut cx = UiContext::new("root");
    let mut router = PointerRouter::new();
    let mut level = 0.0;
    let arranged = themed_frame(&mut cx, &mut router, &theme, |ui| {
        ui.slider_float("Level", &mut level, 0.0, 8.0);
    });
    let track = rect_of(&arranged, "Levelsliderfloat").inner(theme.widget_inset);
    // thumb is 10 wide; its centre travels width - 10
    let x = track.x + 5.0 + (track.width - 10.0) * 0.25;
    router.press(Point::new(x, track.y + 1.0));

    themed_frame(&mut cx, &mut router, &theme, |ui| {
        assert!(ui.slider_float("Level", &mut level, 0.0, 8.0));
    });
    assert!((level - 2.0).abs() < 1e-3, "level = {level}");
}

#[test]
fn field_press_ignores_side_inset() {
    let theme = padded_theme();
    let mut cx = UiContext::new("root");
    let mut router = PointerRouter::new();
    let mut text = String::from("abcdef");
    let arranged = themed_frame(&mut cx, &mut router, &theme, |ui| {
        ui.input_text("T", &mut text);
    });
    let field = rect_of(&arranged, "Tinputtext").inner(theme.widget_inset);
    // 4 units of padding before the first glyph
    let x = field.x + 4.0 + 2.0 * theme.char_width;
    router.press(Point::new(x, field.y + field.height / 2.0));

    themed_frame(&mut cx, &mut router, &theme, |ui| {
        ui.input_text("T", &mut text);
    });
    let cursor = cx.cache().get::<TextFieldState>("Tinputtext").map(|s| s.cursor);
    assert_eq!(cursor, Some(2));
}

#[test]
fn drag_float_follows_horizontal_delta() {
    let mut cx = UiContext::new("root");
    let mut router = PointerRouter::new();
    let mut speed = 1.0;
    let arranged = frame(&mut cx, &mut router, |ui| {
        ui.drag_float("Speed", &mut speed, 0.5, 0.0, 100.0);
    });
    let at = center(rect_of(&arranged, "Speeddragfloat"));
    router.press(at);
    router.drag(Point::new(at.x + 10.0, at.y));
    router.drag(Point::new(at.x + 14.0, at.y + 30.0));

    frame(&mut cx, &mut router, |ui| {
        assert!(ui.drag_float("Speed", &mut speed, 0.5, 0.0, 100.0));
    });
    assert!((speed - 8.0).abs() < 1e-6, "speed = {speed}");
}

#[test]
fn drag_int_clamps_to_range() {
    let mut cx = UiContext::new("root");
    let mut router = PointerRouter::new();
    let mut count = 3i64;
    let arranged = frame(&mut cx, &mut router, |ui| {
        ui.drag_int("Count", &mut count, 1.0, 0, 5);
    });
    let at = center(rect_of(&arranged, "Countdragint"));
    router.press(at);
    router.drag(Point::new(at.x + 50.0, at.y));

    frame(&mut cx, &mut router, |ui| {
        ui.drag_int("Count", &mut count, 1.0, 0, 5);
    });
    assert_eq!(count, 5);
}

#[test]
fn color_edit_lays_out_sliders_label_and_swatch() {
    let mut cx = UiContext::new("root");
    let mut router = PointerRouter::new();
    let mut rgb = [1.0, 0.5, 0.0];
    let mut items = 0;
    frame(&mut cx, &mut router, |ui| {
        ui.color_edit3("Tint", &mut rgb);
        items = ui.item_count();
    });
    // three slider rows of two, then label + swatch
    assert_eq!(items, 8);
    assert!(cx.cache().contains("R##Tintcoloreditsliderfloat"));
    assert!(cx.cache().collisions().is_empty());
}

#[test]
fn duplicate_labels_share_state_and_both_render() {
    let mut cx = UiContext::new("root");
    let mut router = PointerRouter::new();
    let mut items = 0;
    frame(&mut cx, &mut router, |ui| {
        ui.button("Same");
        ui.button("Same");
        items = ui.item_count();
    });
    assert_eq!(items, 2);
    assert_eq!(cx.cache().collisions().len(), 1);
    assert_eq!(cx.cache().len(), 1);
}
