//! Drag sessions: moving existing items and dropping palette templates.

use crate::camera::Camera;
use crate::error::{EditorError, EditorResult};
use crate::item::{Geometry, ItemId, Template};
use crate::scene::Scene;
use crate::snap::{Guide, SnapEngine};
use kurbo::{Point, Rect, Vec2};

/// What is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub enum DragSubject {
    ExistingItem(ItemId),
    NewFromPalette(Template),
}

/// Where the pointer was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// The canvas surface.
    Canvas,
    /// The discard zone (trash).
    Discard,
    /// Anywhere else.
    Outside,
}

/// State of an in-progress drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub subject: DragSubject,
    /// Geometry of the subject when the drag began. For palette templates
    /// only the size is meaningful.
    pub origin: Geometry,
    /// Pointer position at the start of the drag, in screen coordinates.
    pub start_point: Point,
    /// Latest pointer position, in screen coordinates.
    pub current_point: Point,
}

impl DragSession {
    pub fn new(subject: DragSubject, origin: Geometry, start_point: Point) -> Self {
        Self {
            subject,
            origin,
            start_point,
            current_point: start_point,
        }
    }

    /// Pointer displacement since the drag began, in screen units.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Id of the dragged item, when moving an existing one.
    pub fn item_id(&self) -> Option<&str> {
        match &self.subject {
            DragSubject::ExistingItem(id) => Some(id),
            DragSubject::NewFromPalette(_) => None,
        }
    }

    /// Box the subject would occupy if dropped at the current pointer.
    ///
    /// Existing items follow the pointer displacement. New items are
    /// placed with their top-left corner under the pointer.
    pub fn prospective(&self, camera: &Camera) -> Geometry {
        match self.subject {
            DragSubject::ExistingItem(_) => {
                let shift = camera.screen_delta_to_world(self.delta());
                self.origin.moved_to(self.origin.origin() + shift)
            }
            DragSubject::NewFromPalette(_) => {
                self.origin.moved_to(camera.screen_to_world(self.current_point))
            }
        }
    }
}

/// Read-only inputs needed to compute guides and snapping.
#[derive(Debug, Clone, Copy)]
pub struct DragContext<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub engine: &'a SnapEngine,
    /// Visible canvas region in world coordinates.
    pub canvas: Rect,
}

/// Scene change to apply when a drag ends.
#[derive(Debug, Clone, PartialEq)]
pub enum DropAction {
    Move { id: ItemId, geometry: Geometry },
    Create { template: Template, geometry: Geometry },
    Remove { id: ItemId },
    Cancel,
}

/// Owns the drag state machine: idle, dragging, then dropped or cancelled.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
    guides: Vec<Guide>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Guides from the latest pointer update.
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    /// Start a drag. Fails if one is already in progress.
    pub fn begin(&mut self, subject: DragSubject, origin: Geometry, pointer: Point) -> EditorResult<()> {
        if self.session.is_some() {
            return Err(EditorError::DragInProgress);
        }
        log::debug!("Drag started: {:?} at {:?}", subject, pointer);
        self.session = Some(DragSession::new(subject, origin, pointer));
        self.guides.clear();
        Ok(())
    }

    /// Track the pointer and recompute guides for the prospective box.
    pub fn update(&mut self, pointer: Point, ctx: &DragContext<'_>) -> EditorResult<&[Guide]> {
        let session = self.session.as_mut().ok_or(EditorError::NoActiveDrag)?;
        session.current_point = pointer;
        let prospective = session.prospective(ctx.camera);
        self.guides = ctx
            .engine
            .guides(ctx.scene, prospective.bounds(), session.item_id(), ctx.canvas);
        Ok(&self.guides)
    }

    /// End the drag and decide what should happen to the scene.
    ///
    /// Guides are cleared whatever the outcome.
    pub fn finish(&mut self, pointer: Point, target: DropTarget, ctx: &DragContext<'_>) -> EditorResult<DropAction> {
        let mut session = self.session.take().ok_or(EditorError::NoActiveDrag)?;
        self.guides.clear();
        session.current_point = pointer;
        let prospective = session.prospective(ctx.camera);

        let action = match (target, session.subject) {
            (DropTarget::Outside, _) | (DropTarget::Discard, DragSubject::NewFromPalette(_)) => {
                DropAction::Cancel
            }
            (DropTarget::Discard, DragSubject::ExistingItem(id)) => DropAction::Remove { id },
            (DropTarget::Canvas, DragSubject::ExistingItem(id)) => {
                let snapped = ctx.engine.snap_geometry(ctx.scene, &prospective, Some(id.as_str()), ctx.canvas);
                DropAction::Move {
                    geometry: prospective.moved_to(snapped.point),
                    id,
                }
            }
            (DropTarget::Canvas, DragSubject::NewFromPalette(template)) => {
                let snapped = ctx.engine.snap_geometry(ctx.scene, &prospective, None, ctx.canvas);
                DropAction::Create {
                    template,
                    geometry: prospective.moved_to(snapped.point),
                }
            }
        };
        log::debug!("Drag finished on {:?}: {:?}", target, action);
        Ok(action)
    }

    /// Abort the drag without touching the scene. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        self.guides.clear();
        let was_active = self.session.take().is_some();
        if was_active {
            log::debug!("Drag cancelled");
        }
        was_active
    }
}
