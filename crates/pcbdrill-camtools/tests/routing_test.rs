use pcbdrill_camtools::gerber::load_outline;
use pcbdrill_camtools::offset::{CavalierOffset, PolygonOffset};
use pcbdrill_camtools::outline_router::{classify, route_outline, ContourRole};
use pcbdrill_camtools::slot_router::{route_slot, SlotMethod};
use pcbdrill_core::{Bounds, Contour, MillingParams, Point, SlotCandidate, ToolMove};
use std::cell::Cell;

const OUTLINE: &str = include_str!("fixtures/outline.gbr");

/// Counts calls and never returns a ring.
#[derive(Default)]
struct CountingOffset {
    calls: Cell<usize>,
}

impl PolygonOffset for CountingOffset {
    fn offset(&self, _ring: &Contour, _distance: f64) -> Vec<Contour> {
        self.calls.set(self.calls.get() + 1);
        Vec::new()
    }
}

fn assert_bounds(b: &Bounds, min_x: f64, min_y: f64, max_x: f64, max_y: f64) {
    let eps = 1e-6;
    assert!((b.min_x - min_x).abs() < eps, "min_x {}", b.min_x);
    assert!((b.min_y - min_y).abs() < eps, "min_y {}", b.min_y);
    assert!((b.max_x - max_x).abs() < eps, "max_x {}", b.max_x);
    assert!((b.max_y - max_y).abs() < eps, "max_y {}", b.max_y);
}

/// XY extents visited by a move list.
fn move_bounds(moves: &[ToolMove]) -> Bounds {
    let mut b = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for m in moves {
        if let ToolMove::Linear {
            x: Some(x),
            y: Some(y),
            ..
        } = *m
        {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
    }
    b
}

#[test]
fn test_board_offset_outward() {
    let board = Contour::rectangle(0.0, 0.0, 100.0, 80.0).unwrap();
    let rings = CavalierOffset.offset(&board, 0.5);
    assert_eq!(rings.len(), 1);
    assert_bounds(&rings[0].bounds(), -0.5, -0.5, 100.5, 80.5);
}

#[test]
fn test_window_offset_inward() {
    let window = Contour::rectangle(20.0, 20.0, 80.0, 60.0).unwrap();
    let rings = CavalierOffset.offset(&window, -0.5);
    assert_eq!(rings.len(), 1);
    assert_bounds(&rings[0].bounds(), 20.5, 20.5, 79.5, 59.5);
}

#[test]
fn test_offset_ignores_input_orientation() {
    let window = Contour::rectangle(20.0, 20.0, 80.0, 60.0).unwrap();
    let rings = CavalierOffset.offset(&window.reversed(), -0.5);
    assert_eq!(rings.len(), 1);
    assert_bounds(&rings[0].bounds(), 20.5, 20.5, 79.5, 59.5);
}

#[test]
fn test_outline_compensates_each_side() {
    let contours = vec![
        Contour::rectangle(0.0, 0.0, 100.0, 80.0).unwrap(),
        Contour::rectangle(20.0, 20.0, 80.0, 60.0).unwrap(),
    ];
    let params = MillingParams::default();
    let routing = route_outline(&contours, 1.0, 1.6, &params, &CavalierOffset);

    assert_eq!(routing.routed, 2);
    assert_eq!(routing.skipped, 0);
    assert_bounds(&move_bounds(&routing.groups[0].moves), -0.5, -0.5, 100.5, 80.5);
    assert_bounds(&move_bounds(&routing.groups[1].moves), 20.5, 20.5, 79.5, 59.5);

    let deepest = routing.groups[0]
        .moves
        .iter()
        .filter_map(|m| m.z())
        .fold(f64::INFINITY, f64::min);
    assert_eq!(deepest, -1.6);
}

#[test]
fn test_vanishing_cutout_is_skipped() {
    let contours = vec![
        Contour::rectangle(0.0, 0.0, 100.0, 80.0).unwrap(),
        Contour::rectangle(50.0, 50.0, 50.8, 50.8).unwrap(),
    ];
    let routing = route_outline(&contours, 1.0, 1.0, &MillingParams::default(), &CavalierOffset);
    assert_eq!(routing.routed, 1);
    assert_eq!(routing.skipped, 1);
    assert_eq!(routing.warnings.len(), 1);
    assert!(routing.warnings[0].subject.contains("inner"));
}

#[test]
fn test_narrow_slot_never_offsets() {
    let params = MillingParams::default();
    let slot = SlotCandidate {
        start: Point::new(0.0, 0.0),
        end: Point::new(5.0, 0.0),
        tool_id: "T1".to_string(),
    };
    let offsetter = CountingOffset::default();

    for width in [0.5, 0.8, 1.0] {
        let routing = route_slot(&slot, width, &params, Some(&offsetter));
        assert_eq!(routing.method, SlotMethod::Centerline);
        assert!(routing.warning.is_none());
    }
    assert_eq!(offsetter.calls.get(), 0);
}

#[test]
fn test_empty_offset_falls_back_to_centerline() {
    let params = MillingParams::default();
    let slot = SlotCandidate {
        start: Point::new(0.0, 0.0),
        end: Point::new(0.0, 5.0),
        tool_id: "T4".to_string(),
    };
    let offsetter = CountingOffset::default();
    let routing = route_slot(&slot, 2.0, &params, Some(&offsetter));

    assert_eq!(offsetter.calls.get(), 1);
    assert_eq!(routing.method, SlotMethod::Centerline);
    assert!(routing.warning.is_some());
    assert_eq!(routing.moves[0], ToolMove::rapid_xy(0.0, 0.0));
}

#[test]
fn test_wide_slot_ring_inside_slot() {
    let params = MillingParams::default();
    let slot = SlotCandidate {
        start: Point::new(10.0, 10.0),
        end: Point::new(16.0, 10.0),
        tool_id: "T2".to_string(),
    };
    let routing = route_slot(&slot, 2.0, &params, Some(&CavalierOffset));
    assert_eq!(routing.method, SlotMethod::Offset);

    // Bit center stays half a bit inside the 2 mm wide slot
    let b = move_bounds(&routing.moves);
    assert!((b.min_x - 9.5).abs() < 1e-2);
    assert!((b.max_x - 16.5).abs() < 1e-2);
    assert!((b.min_y - 9.5).abs() < 1e-2);
    assert!((b.max_y - 10.5).abs() < 1e-2);
}

#[test]
fn test_gerber_outline_layer() {
    let geometry = load_outline(OUTLINE).unwrap();
    assert_eq!(geometry.contours.len(), 2);
    assert!(geometry.warnings.is_empty());

    let roles = classify(&geometry.contours);
    assert_eq!(roles.iter().filter(|r| **r == ContourRole::Outer).count(), 1);
    assert_eq!(roles.iter().filter(|r| **r == ContourRole::Inner).count(), 1);

    let mut areas: Vec<f64> = geometry.contours.iter().map(|c| c.area()).collect();
    areas.sort_by(f64::total_cmp);
    // 60 x 40 window in a 100 x 80 board, whatever the file scale
    assert!((areas[1] / areas[0] - 8000.0 / 2400.0).abs() < 1e-6);
}

#[test]
fn test_gerber_without_format_fails() {
    assert!(load_outline("G04 nothing*\nM02*\n").is_err());
}
