//! End-to-end editing scenarios driven through the canvas.

use geodraft_core::camera::ViewRect;
use geodraft_core::geometry::{self, GeometryError};
use geodraft_core::shapes::{Circle, HitContext, Line, PointShape, Polyline, Shape, ShapeKind};
use geodraft_core::tools::{CircleMode, ConstructMode, ToolKind, ToolOutcome};
use geodraft_core::{Canvas, Document, EditorSettings, FileStorage, Storage};
use kurbo::Point;
use tempfile::TempDir;

fn position(shape: &Shape) -> Point {
    shape.as_point().expect("point shape").position
}

#[test]
fn midpoint_of_two_clicked_points() {
    let mut canvas = Canvas::new();
    canvas.set_tool(ToolKind::Point);
    canvas.click_world(Point::new(0.0, 0.0));
    canvas.click_world(Point::new(2.0, 0.0));
    assert_eq!(canvas.document.len(), 2);

    canvas.set_tool(ToolKind::Construct(ConstructMode::Midpoint));
    canvas.click_world(Point::new(0.01, -0.01));
    canvas.click_world(Point::new(1.99, 0.02));
    assert_eq!(canvas.document.len(), 3);
    assert_eq!(position(&canvas.document.shapes()[2]), Point::new(1.0, 0.0));
}

#[test]
fn three_point_circle_passes_through_clicks() {
    let mut canvas = Canvas::new();
    canvas.set_tool(ToolKind::Circle(CircleMode::ThreePoints));
    let clicks = [Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(1.0, 1.0)];
    for p in clicks {
        canvas.click_world(p);
    }
    assert_eq!(canvas.document.len(), 1);
    let Shape::Circle(circle) = &canvas.document.shapes()[0] else {
        panic!("expected a circle");
    };
    for p in clicks {
        assert!((geometry::distance(circle.center, p) - circle.radius).abs() < 1e-4);
    }
}

#[test]
fn collinear_three_point_circle_commits_nothing() {
    assert_eq!(
        geometry::circumcircle(Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(3.0, 0.0)),
        Err(GeometryError::Collinear)
    );
    let mut canvas = Canvas::new();
    canvas.set_tool(ToolKind::Circle(CircleMode::ThreePoints));
    canvas.click_world(Point::new(0.0, 0.0));
    canvas.click_world(Point::new(1.0, 0.0));
    assert_eq!(canvas.click_world(Point::new(3.0, 0.0)), ToolOutcome::Discarded);
    assert!(canvas.document.is_empty());
    assert!(!canvas.history.can_undo());
}

#[test]
fn undo_cap_evicts_oldest_snapshots() {
    let settings = EditorSettings {
        max_undo: 60,
        ..Default::default()
    };
    let mut canvas = Canvas::with_settings(settings);
    canvas.set_tool(ToolKind::Point);
    for i in 0..61 {
        let outcome = canvas.click_world(Point::new(i as f64 * 0.1 - 1.9, 0.0));
        assert!(matches!(outcome, ToolOutcome::Commit(_)), "click {i} did not commit");
    }
    assert_eq!(canvas.document.len(), 61);
    assert_eq!(canvas.history.undo_len(), 60);

    for _ in 0..60 {
        assert!(canvas.undo());
    }
    // The snapshot taken before the first commit was evicted.
    assert!(!canvas.undo());
    assert_eq!(canvas.document.len(), 1);
    assert_eq!(position(&canvas.document.shapes()[0]), Point::new(-1.9, 0.0));
}

#[test]
fn undo_then_redo_is_identity() {
    let mut canvas = Canvas::new();
    canvas.set_tool(ToolKind::Circle(CircleMode::CenterThenPoint));
    canvas.click_world(Point::new(0.0, 0.0));
    canvas.click_world(Point::new(0.5, 0.5));
    let after = canvas.document.shapes().to_vec();
    assert!(canvas.undo());
    assert!(canvas.document.is_empty());
    assert!(canvas.redo());
    assert_eq!(canvas.document.shapes(), &after[..]);
}

#[test]
fn polyline_needs_two_vertices_to_commit() {
    let mut canvas = Canvas::new();
    canvas.set_tool(ToolKind::Polyline);
    canvas.click_world(Point::new(0.0, 0.0));
    assert_eq!(canvas.finish(), ToolOutcome::Discarded);
    assert!(canvas.document.is_empty());

    canvas.click_world(Point::new(0.0, 0.0));
    canvas.click_world(Point::new(1.0, 1.0));
    assert!(matches!(canvas.finish(), ToolOutcome::Commit(_)));
    assert_eq!(canvas.document.len(), 1);
    assert_eq!(canvas.document.shapes()[0].kind(), ShapeKind::Polyline);
}

#[test]
fn file_roundtrip_preserves_fields() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());

    let mut doc = Document::with_view(ViewRect::new(-3.5, 2.25, -1.0, 4.0).unwrap());
    doc.push(PointShape::new(Point::new(0.125, -0.75)).with_name("apex").with_size(8.0).into());
    doc.push(Line::segment(Point::new(-1.0, 0.5), Point::new(1.5, 0.25)).into());
    doc.push(Circle::new(Point::new(0.3, 0.3), 1.2).with_tessellation(64).into());
    doc.push(
        Polyline::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.5), Point::new(2.0, -0.5)])
            .unwrap()
            .into(),
    );

    storage.save("nested/drawing.txt", &doc).unwrap();
    let loaded = storage.load("nested/drawing.txt").unwrap();

    assert_eq!(loaded.view(), doc.view());
    assert_eq!(loaded.len(), doc.len());
    for (a, b) in doc.shapes().iter().zip(loaded.shapes()) {
        assert_eq!(a.kind(), b.kind());
        let (pa, pb) = (a.snap_points(), b.snap_points());
        assert_eq!(pa.len(), pb.len());
        for (p, q) in pa.iter().zip(&pb) {
            assert!(geometry::distance(*p, *q) < 1e-5);
        }
    }
    let Shape::Circle(c) = &loaded.shapes()[2] else {
        panic!("expected a circle");
    };
    assert!((c.radius - 1.2).abs() < 1e-5);
    assert_eq!(c.tessellation, 64);
    let p = loaded.shapes()[0].as_point().unwrap();
    assert_eq!(p.name.as_deref(), Some("apex"));
    assert!((p.display_size - 8.0).abs() < 1e-5);
}

#[test]
fn circle_distance_is_rotation_invariant() {
    let ctx = HitContext::new(ViewRect::default(), 0.01);
    let circle = Shape::from(Circle::new(Point::new(0.5, -0.5), 1.0));
    let p = Point::new(2.0, 0.25);
    let base = circle.distance_to(p, &ctx);
    assert!(base >= 0.0);
    for angle in [30.0, 90.0, 145.0, 270.0] {
        let rotated = geometry::rotate(p, Point::new(0.5, -0.5), angle);
        assert!((circle.distance_to(rotated, &ctx) - base).abs() < 1e-9);
    }
}

#[test]
fn point_tool_click_on_existing_shape_selects_it() {
    let mut canvas = Canvas::new();
    canvas.add_shape(Line::segment(Point::new(-1.0, 0.0), Point::new(1.0, 0.0)).into());
    assert_eq!(canvas.click_world(Point::new(0.3, 0.01)), ToolOutcome::Select(0));
    assert_eq!(canvas.document.len(), 1);
    assert_eq!(canvas.selection.selected(), Some(0));
}
