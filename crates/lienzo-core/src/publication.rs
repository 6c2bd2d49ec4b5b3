//! Publication frame: the region of the canvas exposed as a public view.

use crate::item::Item;
use crate::scene::Scene;
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Rectangle selecting which items a published view shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PublicationFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PublicationFrame {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.left + self.width, self.top + self.height)
    }

    /// Whether the item's box lies entirely inside the frame.
    pub fn contains(&self, item: &Item) -> bool {
        let frame = self.rect();
        let bounds = item.bounds();
        bounds.x0 >= frame.x0 && bounds.y0 >= frame.y0 && bounds.x1 <= frame.x1 && bounds.y1 <= frame.y1
    }

    /// Items fully inside the frame, in paint order, with positions made
    /// relative to the frame's top-left corner.
    pub fn project(&self, scene: &Scene) -> Vec<Item> {
        let shift = Vec2::new(self.left, self.top);
        scene
            .ordered()
            .into_iter()
            .filter(|item| self.contains(item))
            .map(|item| {
                let mut item = item.clone();
                item.geometry = item.geometry.moved_to(item.geometry.origin() - shift);
                item
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Geometry, ShapeKind};
    use kurbo::Point;

    #[test]
    fn test_project_filters_and_rebases() {
        let scene = Scene::new()
            .with(Item::shape("inside", Geometry::new(120.0, 60.0, 50.0, 50.0), ShapeKind::Circle).with_z_index(2))
            .with(Item::text("edge", Geometry::new(100.0, 50.0, 10.0, 10.0), "x").with_z_index(1))
            .with(Item::text("straddles", Geometry::new(290.0, 60.0, 20.0, 10.0), "y"))
            .with(Item::text("outside", Geometry::new(0.0, 0.0, 10.0, 10.0), "z"));
        let frame = PublicationFrame::new(100.0, 50.0, 200.0, 100.0);

        let view = frame.project(&scene);
        let ids: Vec<&str> = view.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["edge", "inside"]);
        assert_eq!(view[0].geometry.origin(), Point::ZERO);
        assert_eq!(view[1].geometry.origin(), Point::new(20.0, 10.0));

        // The scene itself is untouched.
        assert_eq!(scene.get("inside").map(|item| item.geometry.left), Some(120.0));
    }

    #[test]
    fn test_from_rect_normalizes() {
        let frame = PublicationFrame::from_rect(Rect::new(50.0, 40.0, 10.0, 20.0));
        assert_eq!(frame, PublicationFrame::new(10.0, 20.0, 40.0, 20.0));
    }
}
