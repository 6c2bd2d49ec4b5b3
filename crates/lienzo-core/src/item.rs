//! Canvas items: geometry, variant payloads and palette templates.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

/// Opaque item identifier, unique within a scene.
pub type ItemId = String;

/// Open mapping of presentation attributes. The engine never interprets it.
pub type Style = Map<String, Value>;

/// Generate a fresh item identifier.
pub fn generate_id() -> ItemId {
    Uuid::new_v4().to_string()
}

/// Placement of an item on the canvas.
///
/// `left`/`top` locate the top-left corner before rotation is applied.
/// `rotation` is in degrees and is never normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
}

impl Geometry {
    /// Create an unrotated geometry.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            rotation: 0.0,
        }
    }

    /// Create a geometry of the given size with its top-left corner at `origin`.
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Axis-aligned bounding box, ignoring rotation.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.right(), self.bottom())
    }

    /// Same size, top-left corner moved to `origin`.
    pub fn moved_to(self, origin: Point) -> Self {
        Self {
            left: origin.x,
            top: origin.y,
            ..self
        }
    }

    /// Whether the dimensions are usable for alignment math.
    pub fn is_resolved(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Variant tag of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Text,
    Shape,
}

/// Geometric shape drawn by a shape item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Oval,
    Star,
}

impl ShapeKind {
    /// All shapes offered by the palette, in palette order.
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Triangle,
        ShapeKind::Oval,
        ShapeKind::Star,
    ];

    /// Size given to a freshly dropped shape.
    pub fn default_size(self) -> Size {
        match self {
            ShapeKind::Rectangle => Size::new(100.0, 80.0),
            ShapeKind::Circle | ShapeKind::Triangle | ShapeKind::Star => Size::new(100.0, 100.0),
            ShapeKind::Oval => Size::new(100.0, 60.0),
        }
    }

    /// Human-readable palette label.
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Oval => "Oval",
            ShapeKind::Star => "Star",
        }
    }
}

/// Variant-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text { content: String },
    Shape { shape_type: ShapeKind },
}

/// The unit placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    pub id: ItemId,
    pub geometry: Geometry,
    /// Paint order; higher paints later. Not required to be unique.
    pub z_index: i64,
    pub style: Style,
    pub payload: Payload,
}

impl Item {
    /// Create a text item.
    pub fn text(id: impl Into<ItemId>, geometry: Geometry, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            geometry,
            z_index: 0,
            style: Template::Text.default_style(),
            payload: Payload::Text {
                content: content.into(),
            },
        }
    }

    /// Create a shape item.
    pub fn shape(id: impl Into<ItemId>, geometry: Geometry, shape_type: ShapeKind) -> Self {
        Self {
            id: id.into(),
            geometry,
            z_index: 0,
            style: Template::Shape(shape_type).default_style(),
            payload: Payload::Shape { shape_type },
        }
    }

    /// Builder-style z-index setter.
    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn kind(&self) -> ItemKind {
        match self.payload {
            Payload::Text { .. } => ItemKind::Text,
            Payload::Shape { .. } => ItemKind::Shape,
        }
    }

    /// Text content, for text items.
    pub fn content(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text { content } => Some(content),
            Payload::Shape { .. } => None,
        }
    }

    /// Shape type, for shape items.
    pub fn shape_type(&self) -> Option<ShapeKind> {
        match self.payload {
            Payload::Shape { shape_type } => Some(shape_type),
            Payload::Text { .. } => None,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }
}

/// A palette entry that can be dragged onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "shape", rename_all = "lowercase")]
pub enum Template {
    Text,
    Shape(ShapeKind),
}

impl Template {
    /// Content given to new text items.
    pub const DEFAULT_TEXT: &'static str = "Text area";

    pub fn kind(self) -> ItemKind {
        match self {
            Template::Text => ItemKind::Text,
            Template::Shape(_) => ItemKind::Shape,
        }
    }

    pub fn default_size(self) -> Size {
        match self {
            Template::Text => Size::new(150.0, 50.0),
            Template::Shape(shape) => shape.default_size(),
        }
    }

    pub fn default_style(self) -> Style {
        let value = match self {
            Template::Text => json!({
                "fontFamily": "Arial",
                "fontSize": "16px",
                "color": "#000000",
            }),
            Template::Shape(_) => json!({
                "color": "#cccccc",
                "borderColor": "#333333",
                "borderWidth": 2,
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => Style::new(),
        }
    }

    /// Build a new item from this template.
    pub fn instantiate(self, id: ItemId, geometry: Geometry, z_index: i64) -> Item {
        let item = match self {
            Template::Text => Item::text(id, geometry, Self::DEFAULT_TEXT),
            Template::Shape(shape) => Item::shape(id, geometry, shape),
        };
        item.with_z_index(z_index)
    }
}

/// On-disk item shape: flat camelCase keys.
///
/// Earlier records spelled the position `left_pos`/`top_pos` and the text
/// payload `text`; both are still accepted on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    id: ItemId,
    #[serde(rename = "type")]
    kind: ItemKind,
    #[serde(alias = "left_pos")]
    left: f64,
    #[serde(alias = "top_pos")]
    top: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    rotation: f64,
    #[serde(default, alias = "z_index")]
    z_index: i64,
    #[serde(default)]
    style: Style,
    #[serde(default, alias = "text", skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, alias = "shape_type", skip_serializing_if = "Option::is_none")]
    shape_type: Option<ShapeKind>,
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        let payload = match record.kind {
            ItemKind::Text => Payload::Text {
                content: record.content.unwrap_or_default(),
            },
            ItemKind::Shape => Payload::Shape {
                shape_type: record.shape_type.unwrap_or_default(),
            },
        };
        Self {
            id: record.id,
            geometry: Geometry {
                left: record.left,
                top: record.top,
                width: record.width,
                height: record.height,
                rotation: record.rotation,
            },
            z_index: record.z_index,
            style: record.style,
            payload,
        }
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        let kind = item.kind();
        let (content, shape_type) = match item.payload {
            Payload::Text { content } => (Some(content), None),
            Payload::Shape { shape_type } => (None, Some(shape_type)),
        };
        Self {
            id: item.id,
            kind,
            left: item.geometry.left,
            top: item.geometry.top,
            width: item.geometry.width,
            height: item.geometry.height,
            rotation: item.geometry.rotation,
            z_index: item.z_index,
            style: item.style,
            content,
            shape_type,
        }
    }
}
