//! The editor: scene history, drag sessions, item operations and change
//! notification.
//!
//! Every mutation of the scene goes through [`Editor`]. Undoable changes
//! are committed to the history; corrections such as measured sizes
//! replace the present in place. Either way the revision counter moves
//! and scene listeners are called, which is what drives auto-save.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::drag::{DragContext, DragController, DragSession, DragSubject, DropAction, DropTarget};
use crate::error::{EditorError, EditorResult};
use crate::history::{History, HistoryState, Undoable};
use crate::item::{Geometry, Item, ItemId, Payload, Style, generate_id};
use crate::publication::PublicationFrame;
use crate::scene::Scene;
use crate::shortcuts::{Command, ShortcutRegistry};
use crate::snap::{Guide, SnapEngine};
use crate::storage::ProjectRecord;
use kurbo::{Point, Rect, Size};
use serde_json::Value;
use std::fmt;

/// Name given to projects that have none.
pub const UNTITLED: &str = "Untitled";

/// Why the scene or project changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    Commit,
    Undo,
    Redo,
    Load,
    /// A size reported by the renderer; not undoable.
    Measure,
    /// Name or publication frame; the scene itself is unchanged.
    Details,
}

/// Passed to scene listeners after every change.
#[derive(Debug)]
pub struct SceneChange<'a> {
    pub revision: u64,
    pub cause: ChangeCause,
    pub scene: &'a Scene,
}

/// Callback invoked after every change.
pub type SceneListener = Box<dyn FnMut(&SceneChange<'_>)>;

/// What a finished drag did to the scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The item was moved or created and committed.
    Committed(ItemId),
    /// The item was dropped on the discard zone and removed.
    Removed(ItemId),
    /// Nothing changed.
    Cancelled,
}

pub struct Editor {
    name: String,
    history: History<Scene>,
    drag: DragController,
    snap: SnapEngine,
    camera: Camera,
    viewport: Size,
    min_item_size: f64,
    /// Next z-index for a palette drop. Never decreases.
    next_z: i64,
    revision: u64,
    selection: Option<ItemId>,
    publication: Option<PublicationFrame>,
    listeners: Vec<SceneListener>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("name", &self.name)
            .field("items", &self.scene().len())
            .field("past", &self.history.past_len())
            .field("future", &self.history.future_len())
            .field("revision", &self.revision)
            .field("dragging", &self.drag.is_active())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Editor {
    /// Create an editor with an empty scene.
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            name: UNTITLED.to_string(),
            history: History::new(Scene::new()).with_limit(config.history_limit),
            drag: DragController::new(),
            snap: config.snap_engine(),
            camera: Camera::new(),
            viewport: config.viewport,
            min_item_size: config.min_item_size,
            next_z: 1,
            revision: 0,
            selection: None,
            publication: None,
            listeners: Vec::new(),
        }
    }

    // --- Scene access ---------------------------------------------------

    /// The current scene.
    pub fn scene(&self) -> &Scene {
        self.history.present()
    }

    pub fn history(&self) -> &HistoryState<Scene> {
        self.history.state()
    }

    /// Incremented on every change that should be persisted.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name != self.name {
            self.name = name;
            self.changed(ChangeCause::Details);
        }
    }

    /// Register a listener called after every change.
    pub fn on_scene_change(&mut self, listener: impl FnMut(&SceneChange<'_>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // --- View -----------------------------------------------------------

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn snap_engine(&self) -> &SnapEngine {
        &self.snap
    }

    pub fn snap_engine_mut(&mut self) -> &mut SnapEngine {
        &mut self.snap
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// The visible canvas region in world coordinates.
    pub fn canvas_rect(&self) -> Rect {
        self.camera.visible_rect(self.viewport)
    }

    // --- Selection ------------------------------------------------------

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn select(&mut self, id: &str) -> EditorResult<()> {
        if !self.scene().contains(id) {
            return Err(EditorError::UnknownItem(id.to_string()));
        }
        self.selection = Some(id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selection.take().is_some()
    }

    // --- History --------------------------------------------------------

    /// Replace the whole history, e.g. with one loaded from storage.
    pub fn reset_history(&mut self, state: HistoryState<Scene>) {
        self.drag.cancel();
        self.history.reset(state);
        self.changed(ChangeCause::Load);
    }

    // --- Drag sessions --------------------------------------------------

    /// Start dragging an item or palette template at a screen position.
    pub fn begin_drag(&mut self, subject: DragSubject, pointer: Point) -> EditorResult<()> {
        let origin = match &subject {
            DragSubject::ExistingItem(id) => {
                self.scene()
                    .get(id)
                    .ok_or_else(|| EditorError::UnknownItem(id.clone()))?
                    .geometry
            }
            DragSubject::NewFromPalette(template) => {
                Geometry::from_origin_size(Point::ZERO, template.default_size())
            }
        };
        self.drag.begin(subject, origin, pointer)
    }

    /// Track the pointer; returns the guides to show.
    pub fn update_drag(&mut self, pointer: Point) -> EditorResult<&[Guide]> {
        let ctx = DragContext {
            scene: self.history.present(),
            camera: &self.camera,
            engine: &self.snap,
            canvas: self.camera.visible_rect(self.viewport),
        };
        self.drag.update(pointer, &ctx)
    }

    /// Release the pointer and apply the drop.
    pub fn end_drag(&mut self, pointer: Point, target: DropTarget) -> EditorResult<DragOutcome> {
        let action = {
            let ctx = DragContext {
                scene: self.history.present(),
                camera: &self.camera,
                engine: &self.snap,
                canvas: self.camera.visible_rect(self.viewport),
            };
            self.drag.finish(pointer, target, &ctx)?
        };

        let outcome = match action {
            DropAction::Cancel => DragOutcome::Cancelled,
            DropAction::Move { id, geometry } => match self.scene().get(&id) {
                Some(item) => {
                    // Only the position comes from the drop; size and rotation
                    // may have changed since the drag began.
                    let mut item = item.clone();
                    item.geometry = item.geometry.moved_to(geometry.origin());
                    let next = self.scene().clone().with(item);
                    self.commit_scene(next);
                    self.selection = Some(id.clone());
                    DragOutcome::Committed(id)
                }
                None => {
                    log::warn!("Dragged item {} vanished before drop", id);
                    DragOutcome::Cancelled
                }
            },
            DropAction::Create { template, geometry } => {
                let id = generate_id();
                let z_index = self.allocate_z();
                let item = template.instantiate(id.clone(), geometry, z_index);
                log::debug!("Created {:?} item {} at z {}", item.kind(), id, z_index);
                let next = self.scene().clone().with(item);
                self.commit_scene(next);
                self.selection = Some(id.clone());
                DragOutcome::Committed(id)
            }
            DropAction::Remove { id } => {
                if self.scene().contains(&id) {
                    let next = self.scene().clone().without(&id);
                    self.commit_scene(next);
                    DragOutcome::Removed(id)
                } else {
                    DragOutcome::Cancelled
                }
            }
        };
        Ok(outcome)
    }

    /// Abort the current drag. The scene is untouched.
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    /// Where the dragged subject would land without snapping.
    pub fn drag_preview(&self) -> Option<Geometry> {
        self.drag.session().map(|session| session.prospective(&self.camera))
    }

    /// Guides from the latest drag update.
    pub fn guides(&self) -> &[Guide] {
        self.drag.guides()
    }

    // --- Item operations ------------------------------------------------

    /// Set the item's z-index to the current maximum plus one.
    pub fn bring_to_front(&mut self, id: &str) -> EditorResult<bool> {
        let own = self.require(id)?.z_index;
        let z_index = self.scene().max_z().unwrap_or(own) + 1;
        self.update_item(id, |item| {
            item.z_index = z_index;
            Ok(())
        })
    }

    /// Set the item's z-index to the current minimum minus one.
    pub fn send_to_back(&mut self, id: &str) -> EditorResult<bool> {
        let own = self.require(id)?.z_index;
        let z_index = self.scene().min_z().unwrap_or(own) - 1;
        self.update_item(id, |item| {
            item.z_index = z_index;
            Ok(())
        })
    }

    /// Resize, keeping the top-left corner. Dimensions are clamped to the
    /// configured minimum.
    pub fn resize(&mut self, id: &str, size: Size) -> EditorResult<bool> {
        let min = self.min_item_size;
        self.update_item(id, |item| {
            item.geometry.width = size.width.max(min);
            item.geometry.height = size.height.max(min);
            Ok(())
        })
    }

    /// Move the top-left corner to a world position.
    pub fn move_to(&mut self, id: &str, origin: Point) -> EditorResult<bool> {
        self.update_item(id, |item| {
            item.geometry = item.geometry.moved_to(origin);
            Ok(())
        })
    }

    /// Set the rotation in degrees.
    pub fn rotate(&mut self, id: &str, degrees: f64) -> EditorResult<bool> {
        self.update_item(id, |item| {
            item.geometry.rotation = degrees;
            Ok(())
        })
    }

    /// Replace the item's style wholesale.
    pub fn set_style(&mut self, id: &str, style: Style) -> EditorResult<bool> {
        self.update_item(id, |item| {
            item.style = style;
            Ok(())
        })
    }

    /// Set a single style attribute.
    pub fn set_style_value(&mut self, id: &str, key: &str, value: Value) -> EditorResult<bool> {
        self.update_item(id, |item| {
            item.style.insert(key.to_string(), value);
            Ok(())
        })
    }

    /// Replace the content of a text item.
    pub fn set_text(&mut self, id: &str, content: impl Into<String>) -> EditorResult<bool> {
        let content = content.into();
        self.update_item(id, |item| match &mut item.payload {
            Payload::Text { content: current } => {
                *current = content;
                Ok(())
            }
            Payload::Shape { .. } => Err(EditorError::NotText(item.id.clone())),
        })
    }

    /// Remove an item.
    pub fn delete(&mut self, id: &str) -> EditorResult<()> {
        self.require(id)?;
        let next = self.scene().clone().without(id);
        self.commit_scene(next);
        Ok(())
    }

    /// Record the size the renderer measured for an item.
    ///
    /// The present is corrected in place: the change is persisted but
    /// cannot be undone on its own. Dimensions are clamped like [`Editor::resize`].
    pub fn report_measured_size(&mut self, id: &str, size: Size) -> EditorResult<bool> {
        let size = Size::new(size.width.max(self.min_item_size), size.height.max(self.min_item_size));
        let item = self.require(id)?;
        if item.geometry.size() == size {
            return Ok(false);
        }
        let mut item = item.clone();
        item.geometry.width = size.width;
        item.geometry.height = size.height;
        let next = self.scene().clone().with(item);
        self.history.replace_present(next);
        self.changed(ChangeCause::Measure);
        Ok(true)
    }

    // --- Publication ----------------------------------------------------

    pub fn publication_frame(&self) -> Option<&PublicationFrame> {
        self.publication.as_ref()
    }

    pub fn set_publication_frame(&mut self, frame: Option<PublicationFrame>) {
        if frame != self.publication {
            self.publication = frame;
            self.changed(ChangeCause::Details);
        }
    }

    /// Items visible in the published view, relative to the frame.
    pub fn publication_view(&self) -> Option<Vec<Item>> {
        self.publication.map(|frame| frame.project(self.scene()))
    }

    // --- Persistence ----------------------------------------------------

    /// Snapshot of everything that is persisted.
    pub fn to_record(&self) -> ProjectRecord {
        ProjectRecord::from_history(&self.name, self.history.state(), self.publication)
    }

    /// Replace the project with a stored record.
    pub fn load_record(&mut self, record: ProjectRecord) {
        let state = record.history();
        self.name = record.name;
        self.publication = record.publication_details;
        self.selection = None;
        self.reset_history(state);
    }

    // --- Commands -------------------------------------------------------

    /// Run a command. Returns whether anything happened.
    pub fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::Undo => Undoable::undo(self),
            Command::Redo => Undoable::redo(self),
            Command::DeleteSelection => match self.selection.clone() {
                Some(id) => self.delete(&id).is_ok(),
                None => false,
            },
            Command::BringToFront => match self.selection.clone() {
                Some(id) => self.bring_to_front(&id).unwrap_or(false),
                None => false,
            },
            Command::SendToBack => match self.selection.clone() {
                Some(id) => self.send_to_back(&id).unwrap_or(false),
                None => false,
            },
            Command::Cancel => self.cancel_drag() || self.clear_selection(),
        }
    }

    /// Dispatch a key event through the shortcut registry.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool) -> bool {
        match ShortcutRegistry::lookup(key, ctrl, shift) {
            Some(command) => self.execute(command),
            None => false,
        }
    }

    // --- Internals ------------------------------------------------------

    fn require(&self, id: &str) -> EditorResult<&Item> {
        self.scene()
            .get(id)
            .ok_or_else(|| EditorError::UnknownItem(id.to_string()))
    }

    /// z-index for a new item: above the scene and above every index
    /// previously handed to a new item.
    fn allocate_z(&mut self) -> i64 {
        let above_scene = self.scene().max_z().map_or(1, |z| z + 1);
        let z_index = self.next_z.max(above_scene);
        self.next_z = z_index + 1;
        z_index
    }

    fn update_item(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut Item) -> EditorResult<()>,
    ) -> EditorResult<bool> {
        let mut item = self.require(id)?.clone();
        edit(&mut item)?;
        let next = self.scene().clone().with(item);
        Ok(self.commit_scene(next))
    }

    fn commit_scene(&mut self, next: Scene) -> bool {
        if !self.history.commit(next) {
            return false;
        }
        self.changed(ChangeCause::Commit);
        true
    }

    fn changed(&mut self, cause: ChangeCause) {
        self.revision += 1;

        let stale = self
            .selection
            .as_deref()
            .is_some_and(|id| !self.history.present().contains(id));
        if stale {
            self.selection = None;
        }

        let change = SceneChange {
            revision: self.revision,
            cause,
            scene: self.history.present(),
        };
        for listener in self.listeners.iter_mut() {
            listener(&change);
        }
    }
}

impl Undoable<Scene> for Editor {
    /// Commit a caller-built next scene.
    fn commit(&mut self, next: Scene) -> bool {
        self.commit_scene(next)
    }

    fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        self.changed(ChangeCause::Undo);
        true
    }

    fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        self.changed(ChangeCause::Redo);
        true
    }

    fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
