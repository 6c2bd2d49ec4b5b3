//! Alignment guides and snapping of a moving box against the scene.
//!
//! Each box exposes three anchors per axis: start, center and end
//! (left/centerX/right horizontally, top/centerY/bottom vertically).
//! While hovering, every anchor pair closer than the guide threshold
//! produces a [`Guide`]. On drop, each axis is corrected independently by
//! the offset of one anchor pair closer than the snap threshold, falling
//! back to the canvas center.

use crate::item::{Geometry, Item, ItemId};
use crate::scene::Scene;
use kurbo::{Line, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Distance below which a guide is shown while hovering.
pub const GUIDE_THRESHOLD: f64 = 6.0;

/// Distance below which an axis is snapped on drop.
pub const SNAP_THRESHOLD: f64 = 5.0;

/// What a moving box may align to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapMode {
    /// No guides and no snapping.
    None,
    /// Other items only.
    Items,
    /// The canvas center only.
    Canvas,
    /// Items, then the canvas center.
    #[default]
    All,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Items,
            SnapMode::Items => SnapMode::Canvas,
            SnapMode::Canvas => SnapMode::All,
            SnapMode::All => SnapMode::None,
        }
    }

    pub fn snaps_to_items(self) -> bool {
        matches!(self, SnapMode::Items | SnapMode::All)
    }

    pub fn snaps_to_canvas(self) -> bool {
        matches!(self, SnapMode::Canvas | SnapMode::All)
    }

    pub fn is_enabled(self) -> bool {
        self != SnapMode::None
    }
}

/// How to choose between several anchor pairs within the snap threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapPolicy {
    /// The first qualifying pair in paint order wins.
    FirstMatch,
    /// The pair with the smallest distance wins; ties keep the earlier one.
    #[default]
    Nearest,
}

/// One of the three alignment points of a box along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Center,
    End,
}

impl Anchor {
    /// Start coordinate of a box of length `extent` whose anchor sits at `position`.
    pub fn start_for(self, position: f64, extent: f64) -> f64 {
        match self {
            Anchor::Start => position,
            Anchor::Center => position - extent / 2.0,
            Anchor::End => position - extent,
        }
    }
}

/// Direction of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// A line of constant x.
    Vertical,
    /// A line of constant y.
    Horizontal,
}

/// What a guide or snap aligned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideSource {
    Item(ItemId),
    CanvasCenter,
}

/// A transient alignment line shown while dragging.
#[derive(Debug, Clone, PartialEq)]
pub struct Guide {
    pub orientation: Orientation,
    /// x for vertical guides, y for horizontal ones.
    pub position: f64,
    /// Extent along the line, covering both boxes involved.
    pub start: f64,
    pub end: f64,
    /// Anchor distance that produced the guide.
    pub distance: f64,
    pub source: GuideSource,
}

impl Guide {
    /// The guide as a drawable line segment.
    pub fn line(&self) -> Line {
        match self.orientation {
            Orientation::Vertical => Line::new(
                Point::new(self.position, self.start),
                Point::new(self.position, self.end),
            ),
            Orientation::Horizontal => Line::new(
                Point::new(self.start, self.position),
                Point::new(self.end, self.position),
            ),
        }
    }
}

/// The correction applied to one axis on drop.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSnap {
    pub source: GuideSource,
    pub moving: Anchor,
    pub target: Anchor,
    /// Coordinate the moving anchor is aligned to.
    pub position: f64,
    /// Signed distance from the moving anchor to `position`.
    pub offset: f64,
}

/// Result of snapping a box on drop.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// Corrected top-left corner.
    pub point: Point,
    pub snapped_x: Option<AxisSnap>,
    pub snapped_y: Option<AxisSnap>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: None,
            snapped_y: None,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x.is_some() || self.snapped_y.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn anchors(self, rect: Rect) -> [(Anchor, f64); 3] {
        let (start, end) = match self {
            Axis::X => (rect.x0, rect.x1),
            Axis::Y => (rect.y0, rect.y1),
        };
        [
            (Anchor::Start, start),
            (Anchor::Center, (start + end) / 2.0),
            (Anchor::End, end),
        ]
    }

    fn center(self, rect: Rect) -> f64 {
        match self {
            Axis::X => (rect.x0 + rect.x1) / 2.0,
            Axis::Y => (rect.y0 + rect.y1) / 2.0,
        }
    }

    /// Extent perpendicular to this axis, i.e. along a guide line.
    fn span(self, rect: Rect) -> (f64, f64) {
        match self {
            Axis::X => (rect.y0, rect.y1),
            Axis::Y => (rect.x0, rect.x1),
        }
    }

    fn orientation(self) -> Orientation {
        match self {
            Axis::X => Orientation::Vertical,
            Axis::Y => Orientation::Horizontal,
        }
    }
}

/// Thresholds and options for guide and snap computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapEngine {
    pub guide_threshold: f64,
    pub snap_threshold: f64,
    pub mode: SnapMode,
    pub policy: SnapPolicy,
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self {
            guide_threshold: GUIDE_THRESHOLD,
            snap_threshold: SNAP_THRESHOLD,
            mode: SnapMode::default(),
            policy: SnapPolicy::default(),
        }
    }
}

impl SnapEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guides for `moving` against every other resolved item and the canvas center.
    ///
    /// `exclude` is the id of the item being moved, if it is already on the canvas.
    /// `canvas` is the visible canvas region in world coordinates.
    pub fn guides(&self, scene: &Scene, moving: Rect, exclude: Option<&str>, canvas: Rect) -> Vec<Guide> {
        let mut guides = Vec::new();
        if !self.mode.is_enabled() {
            return guides;
        }

        let others = candidates(scene, exclude);
        for axis in [Axis::X, Axis::Y] {
            if self.mode.snaps_to_items() {
                for other in &others {
                    let target = other.bounds();
                    for (_, moving_value) in axis.anchors(moving) {
                        for (_, target_value) in axis.anchors(target) {
                            let distance = (moving_value - target_value).abs();
                            if distance < self.guide_threshold {
                                let (a0, a1) = axis.span(moving);
                                let (b0, b1) = axis.span(target);
                                guides.push(Guide {
                                    orientation: axis.orientation(),
                                    position: target_value,
                                    start: a0.min(b0),
                                    end: a1.max(b1),
                                    distance,
                                    source: GuideSource::Item(other.id.clone()),
                                });
                            }
                        }
                    }
                }
            }

            if self.mode.snaps_to_canvas() {
                let center = axis.center(canvas);
                let distance = (axis.center(moving) - center).abs();
                if distance < self.guide_threshold {
                    let (start, end) = axis.span(canvas);
                    guides.push(Guide {
                        orientation: axis.orientation(),
                        position: center,
                        start,
                        end,
                        distance,
                        source: GuideSource::CanvasCenter,
                    });
                }
            }
        }

        guides
    }

    /// Snap the top-left corner of `moving`, one axis at a time.
    pub fn snap(&self, scene: &Scene, moving: Rect, exclude: Option<&str>, canvas: Rect) -> SnapResult {
        self.snap_sized(scene, moving, moving.size(), exclude, canvas)
    }

    /// Snap an item's geometry.
    ///
    /// The corrected corner is derived from the item's own width and height,
    /// so an aligned center lands exactly on its target.
    pub fn snap_geometry(&self, scene: &Scene, moving: &Geometry, exclude: Option<&str>, canvas: Rect) -> SnapResult {
        self.snap_sized(scene, moving.bounds(), moving.size(), exclude, canvas)
    }

    fn snap_sized(&self, scene: &Scene, moving: Rect, size: Size, exclude: Option<&str>, canvas: Rect) -> SnapResult {
        let mut result = SnapResult::none(moving.origin());
        if !self.mode.is_enabled() {
            return result;
        }

        let others = candidates(scene, exclude);
        if let Some(snap) = self.snap_axis(Axis::X, moving, &others, canvas) {
            result.point.x = snap.moving.start_for(snap.position, size.width);
            result.snapped_x = Some(snap);
        }
        if let Some(snap) = self.snap_axis(Axis::Y, moving, &others, canvas) {
            result.point.y = snap.moving.start_for(snap.position, size.height);
            result.snapped_y = Some(snap);
        }

        if result.is_snapped() {
            log::debug!("Snapped {:?} to {:?}", moving.origin(), result.point);
        }
        result
    }

    fn snap_axis(&self, axis: Axis, moving: Rect, others: &[&Item], canvas: Rect) -> Option<AxisSnap> {
        let mut best: Option<AxisSnap> = None;

        if self.mode.snaps_to_items() {
            for other in others {
                for (moving_anchor, moving_value) in axis.anchors(moving) {
                    for (target_anchor, target_value) in axis.anchors(other.bounds()) {
                        let offset = target_value - moving_value;
                        if offset.abs() >= self.snap_threshold {
                            continue;
                        }
                        let candidate = AxisSnap {
                            source: GuideSource::Item(other.id.clone()),
                            moving: moving_anchor,
                            target: target_anchor,
                            position: target_value,
                            offset,
                        };
                        match self.policy {
                            SnapPolicy::FirstMatch => return Some(candidate),
                            SnapPolicy::Nearest => {
                                let closer = match &best {
                                    Some(current) => offset.abs() < current.offset.abs(),
                                    None => true,
                                };
                                if closer {
                                    best = Some(candidate);
                                }
                            }
                        }
                    }
                }
            }
        }

        if best.is_none() && self.mode.snaps_to_canvas() {
            let center = axis.center(canvas);
            let offset = center - axis.center(moving);
            if offset.abs() < self.snap_threshold {
                best = Some(AxisSnap {
                    source: GuideSource::CanvasCenter,
                    moving: Anchor::Center,
                    target: Anchor::Center,
                    position: center,
                    offset,
                });
            }
        }

        best
    }
}

/// Items other than `exclude` with usable dimensions, in paint order.
fn candidates<'a>(scene: &'a Scene, exclude: Option<&str>) -> Vec<&'a Item> {
    scene
        .ordered()
        .into_iter()
        .filter(|item| Some(item.id.as_str()) != exclude && item.geometry.is_resolved())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Geometry, ShapeKind};

    const CANVAS: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    fn shape(id: &str, left: f64, top: f64, width: f64, height: f64) -> Item {
        Item::shape(id, Geometry::new(left, top, width, height), ShapeKind::Rectangle).with_z_index(1)
    }

    fn scene_with_a() -> Scene {
        Scene::new().with(shape("A", 0.0, 0.0, 100.0, 50.0))
    }

    #[test]
    fn test_snap_mode_cycle() {
        assert_eq!(SnapMode::None.next(), SnapMode::Items);
        assert_eq!(SnapMode::All.next(), SnapMode::None);
        assert!(SnapMode::All.snaps_to_items() && SnapMode::All.snaps_to_canvas());
        assert!(!SnapMode::Canvas.snaps_to_items());
        assert!(!SnapMode::None.is_enabled());
    }

    #[test]
    fn test_edge_guide_when_adjacent() {
        let engine = SnapEngine::new();
        let moving = Rect::new(101.0, 0.0, 201.0, 50.0);
        let guides = engine.guides(&scene_with_a(), moving, Some("B"), CANVAS);

        let vertical: Vec<&Guide> = guides
            .iter()
            .filter(|g| g.orientation == Orientation::Vertical)
            .collect();
        assert_eq!(vertical.len(), 1);
        assert!((vertical[0].position - 100.0).abs() < f64::EPSILON);
        assert!((vertical[0].distance - 1.0).abs() < f64::EPSILON);
        assert_eq!(vertical[0].source, GuideSource::Item("A".into()));
        assert_eq!(vertical[0].line(), Line::new((100.0, 0.0), (100.0, 50.0)));

        // Top, center and bottom all line up.
        let horizontal = guides
            .iter()
            .filter(|g| g.orientation == Orientation::Horizontal)
            .count();
        assert_eq!(horizontal, 3);
    }

    #[test]
    fn test_drop_snaps_left_edge() {
        let engine = SnapEngine::new();
        let moving = Rect::new(101.0, 0.0, 201.0, 50.0);
        let result = engine.snap(&scene_with_a(), moving, Some("B"), CANVAS);
        assert!((result.point.x - 100.0).abs() < f64::EPSILON);
        assert!((result.point.y - 0.0).abs() < f64::EPSILON);

        let x = result.snapped_x.unwrap();
        assert_eq!(x.moving, Anchor::Start);
        assert_eq!(x.target, Anchor::End);
    }

    #[test]
    fn test_threshold_is_strict() {
        let engine = SnapEngine::new();
        // Exactly 6 away from A's right edge, nothing else close.
        let moving = Rect::new(106.0, 200.0, 136.0, 230.0);
        let guides = engine.guides(&scene_with_a(), moving, None, CANVAS);
        assert!(guides.is_empty());

        let result = engine.snap(&scene_with_a(), moving, None, CANVAS);
        assert!(!result.is_snapped());
        assert_eq!(result.point, Point::new(106.0, 200.0));
    }

    #[test]
    fn test_guide_span_covers_both_boxes() {
        let engine = SnapEngine::new();
        let moving = Rect::new(0.0, 200.0, 30.0, 260.0);
        let guides = engine.guides(&scene_with_a(), moving, None, CANVAS);
        let left = guides
            .iter()
            .find(|g| g.orientation == Orientation::Vertical && g.position == 0.0)
            .unwrap();
        assert!((left.start - 0.0).abs() < f64::EPSILON);
        assert!((left.end - 260.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_canvas_center_fallback() {
        let engine = SnapEngine::new();
        // Center x = 398, center y = 303.
        let moving = Rect::new(348.0, 253.0, 448.0, 353.0);
        let result = engine.snap(&Scene::new(), moving, None, CANVAS);
        assert_eq!(result.point, Point::new(350.0, 250.0));
        assert_eq!(result.snapped_x.map(|s| s.source), Some(GuideSource::CanvasCenter));

        let guides = engine.guides(&Scene::new(), moving, None, CANVAS);
        assert_eq!(guides.len(), 2);
        assert!(guides.iter().all(|g| g.source == GuideSource::CanvasCenter));
        let vertical = guides.iter().find(|g| g.orientation == Orientation::Vertical).unwrap();
        assert!((vertical.start - 0.0).abs() < f64::EPSILON);
        assert!((vertical.end - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_canvas_center_is_exact_for_fractional_geometry() {
        let engine = SnapEngine::new();
        let cases = [
            (396.0148, 10.0524),
            (397.3, 5.1),
            (395.123456789, 9.87654321),
            (351.77, 99.93),
            (401.0001, 0.3333),
        ];
        for (left, width) in cases {
            let geometry = Geometry::new(left, 120.0, width, 40.0);
            let result = engine.snap_geometry(&Scene::new(), &geometry, None, CANVAS);
            let snapped = geometry.moved_to(result.point);
            assert_eq!(
                result.snapped_x.as_ref().map(|s| &s.source),
                Some(&GuideSource::CanvasCenter)
            );
            assert_eq!(snapped.left + snapped.width / 2.0, 400.0, "left={left} width={width}");
        }
    }

    #[test]
    fn test_items_take_precedence_over_canvas() {
        let engine = SnapEngine::new();
        let scene = Scene::new().with(shape("C", 353.0, 0.0, 10.0, 10.0));
        // Center x = 398 is 2 from the canvas center; left 351 is 2 from C's left.
        let moving = Rect::new(351.0, 500.0, 445.0, 520.0);
        let result = engine.snap(&scene, moving, None, CANVAS);
        let x = result.snapped_x.unwrap();
        assert_eq!(x.source, GuideSource::Item("C".into()));
        assert!((result.point.x - 353.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_axes_snap_independently() {
        let engine = SnapEngine {
            mode: SnapMode::Items,
            ..SnapEngine::new()
        };
        let moving = Rect::new(102.0, 400.0, 150.0, 420.0);
        let result = engine.snap(&scene_with_a(), moving, None, CANVAS);
        assert!(result.snapped_x.is_some());
        assert!(result.snapped_y.is_none());
        assert_eq!(result.point, Point::new(100.0, 400.0));
    }

    #[test]
    fn test_excluded_and_unresolved_items_ignored() {
        let engine = SnapEngine::new();
        let scene = Scene::new()
            .with(shape("self", 0.0, 0.0, 100.0, 50.0))
            .with(shape("pending", 0.0, 0.0, 0.0, 0.0));
        let moving = Rect::new(2.0, 402.0, 102.0, 452.0);
        let result = engine.snap(&scene, moving, Some("self"), CANVAS);
        assert!(!result.is_snapped());
        assert!(engine.guides(&scene, moving, Some("self"), CANVAS).is_empty());
    }

    #[test]
    fn test_policy_nearest_vs_first_match() {
        // Paint order: far (z=1) then near (z=2).
        let scene = Scene::new()
            .with(shape("far", 104.0, 0.0, 10.0, 10.0).with_z_index(1))
            .with(shape("near", 100.5, 300.0, 10.0, 10.0).with_z_index(2));
        let moving = Rect::new(100.0, 500.0, 110.0, 510.0);

        let nearest = SnapEngine::new().snap(&scene, moving, None, CANVAS);
        assert_eq!(nearest.snapped_x.map(|s| s.source), Some(GuideSource::Item("near".into())));

        let first = SnapEngine {
            policy: SnapPolicy::FirstMatch,
            ..SnapEngine::new()
        }
        .snap(&scene, moving, None, CANVAS);
        assert_eq!(first.snapped_x.map(|s| s.source), Some(GuideSource::Item("far".into())));
    }

    #[test]
    fn test_mode_none_disables_everything() {
        let engine = SnapEngine {
            mode: SnapMode::None,
            ..SnapEngine::new()
        };
        let moving = Rect::new(101.0, 0.0, 201.0, 50.0);
        assert!(engine.guides(&scene_with_a(), moving, None, CANVAS).is_empty());
        assert!(!engine.snap(&scene_with_a(), moving, None, CANVAS).is_snapped());
    }
}
