//! The scene: the mapping from item id to item.

use crate::item::{Item, ItemId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// All items currently on the canvas, keyed by id.
///
/// Every entry's key equals the item's own `id`. Iteration is by id;
/// use [`Scene::ordered`] for paint order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<ItemId, Item>")]
pub struct Scene {
    items: BTreeMap<ItemId, Item>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Insert or wholesale replace the item stored under `item.id`.
    /// Returns the previous value, if any.
    pub fn upsert(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.id.clone(), item)
    }

    /// Remove an item. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: &str) -> Option<Item> {
        self.items.remove(id)
    }

    /// Builder-style upsert used to derive a next scene value.
    pub fn with(mut self, item: Item) -> Self {
        self.upsert(item);
        self
    }

    /// Builder-style remove used to derive a next scene value.
    pub fn without(mut self, id: &str) -> Self {
        self.remove(id);
        self
    }

    /// All items, in id order.
    pub fn all(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.keys()
    }

    /// Items in paint order: ascending z-index, ties broken by id.
    pub fn ordered(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.values().collect();
        items.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        items
    }

    pub fn max_z(&self) -> Option<i64> {
        self.items.values().map(|item| item.z_index).max()
    }

    pub fn min_z(&self) -> Option<i64> {
        self.items.values().map(|item| item.z_index).min()
    }

    /// Items whose bounds contain `point`, front-most first.
    pub fn items_at_point(&self, point: Point) -> Vec<&Item> {
        let mut hits: Vec<&Item> = self
            .ordered()
            .into_iter()
            .filter(|item| item.bounds().contains(point))
            .collect();
        hits.reverse();
        hits
    }

    /// Union of all item bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.items
            .values()
            .map(Item::bounds)
            .reduce(|acc, rect| acc.union(rect))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Item> for Scene {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        let mut scene = Scene::new();
        for item in iter {
            scene.upsert(item);
        }
        scene
    }
}

// Stored keys are rebuilt from each item's own id.
impl From<BTreeMap<ItemId, Item>> for Scene {
    fn from(map: BTreeMap<ItemId, Item>) -> Self {
        map.into_values().collect()
    }
}

impl Serialize for Scene {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Geometry, ShapeKind};

    fn rect(id: &str, left: f64, z: i64) -> Item {
        Item::shape(id, Geometry::new(left, 0.0, 10.0, 10.0), ShapeKind::Rectangle).with_z_index(z)
    }

    #[test]
    fn test_upsert_replaces_wholesale() {
        let mut scene = Scene::new();
        assert!(scene.upsert(rect("a", 0.0, 1)).is_none());
        let previous = scene.upsert(rect("a", 50.0, 3));
        assert_eq!(previous.map(|item| item.z_index), Some(1));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get("a").map(|item| item.geometry.left), Some(50.0));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut scene = Scene::new().with(rect("a", 0.0, 1));
        assert!(scene.remove("missing").is_none());
        assert_eq!(scene.len(), 1);
        assert!(scene.remove("a").is_some());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_ordered_by_z_then_id() {
        let scene: Scene = vec![rect("c", 0.0, 2), rect("b", 0.0, 1), rect("a", 0.0, 2)]
            .into_iter()
            .collect();
        let ids: Vec<&str> = scene.ordered().iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(scene.max_z(), Some(2));
        assert_eq!(scene.min_z(), Some(1));
    }

    #[test]
    fn test_items_at_point_front_first() {
        let scene: Scene = vec![rect("back", 0.0, 1), rect("front", 5.0, 2)].into_iter().collect();
        let hits: Vec<&str> = scene
            .items_at_point(Point::new(7.0, 5.0))
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(hits, vec!["front", "back"]);
        assert!(scene.items_at_point(Point::new(100.0, 100.0)).is_empty());
    }

    #[test]
    fn test_bounds() {
        assert!(Scene::new().bounds().is_none());
        let scene: Scene = vec![rect("a", 0.0, 1), rect("b", 30.0, 1)].into_iter().collect();
        assert_eq!(scene.bounds(), Some(Rect::new(0.0, 0.0, 40.0, 10.0)));
    }

    #[test]
    fn test_deserialize_rekeys_by_item_id() {
        let json = r#"{
            "stale": {"id": "real", "type": "shape", "shapeType": "star",
                      "left": 0, "top": 0, "width": 10, "height": 10, "zIndex": 4}
        }"#;
        let scene: Scene = serde_json::from_str(json).unwrap();
        assert!(scene.get("stale").is_none());
        assert_eq!(scene.get("real").map(|item| item.z_index), Some(4));
    }

    #[test]
    fn test_serialize_as_map() {
        let scene = Scene::new().with(rect("a", 0.0, 1));
        let value = serde_json::to_value(&scene).unwrap();
        assert_eq!(value["a"]["id"], serde_json::json!("a"));
    }
}
