//! Linear undo/redo history over whole-state snapshots.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Capability set shared by anything that records undoable changes.
pub trait Undoable<S> {
    /// Record `next` as the new present. Returns `false` when nothing changed.
    fn commit(&mut self, next: S) -> bool;

    /// Step back one commit. Returns `false` when there is nothing to undo.
    fn undo(&mut self) -> bool;

    /// Step forward one undone commit. Returns `false` when there is nothing to redo.
    fn redo(&mut self) -> bool;

    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;
}

/// Past, present and future snapshots.
///
/// `past` is oldest first; its last entry is the most recent predecessor.
/// `future` is nearest first; its first entry is what redo restores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryState<S> {
    pub past: VecDeque<S>,
    pub present: S,
    pub future: VecDeque<S>,
}

impl<S> HistoryState<S> {
    /// A state with no past or future.
    pub fn fresh(present: S) -> Self {
        Self {
            past: VecDeque::new(),
            present,
            future: VecDeque::new(),
        }
    }
}

/// Undo/redo manager.
///
/// Unbounded unless a limit is set, in which case the oldest past
/// snapshots are discarded first.
#[derive(Debug, Clone)]
pub struct History<S> {
    state: HistoryState<S>,
    limit: Option<usize>,
}

impl<S: Default> Default for History<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> History<S> {
    /// Create a history whose present is `present`.
    pub fn new(present: S) -> Self {
        Self {
            state: HistoryState::fresh(present),
            limit: None,
        }
    }

    /// Builder-style limit on the number of past snapshots kept.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.set_limit(limit);
        self
    }

    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.trim_past();
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn present(&self) -> &S {
        &self.state.present
    }

    pub fn state(&self) -> &HistoryState<S> {
        &self.state
    }

    pub fn into_state(self) -> HistoryState<S> {
        self.state
    }

    pub fn past_len(&self) -> usize {
        self.state.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.state.future.len()
    }

    /// Replace the whole history, e.g. after loading a project.
    pub fn reset(&mut self, state: HistoryState<S>) {
        self.state = state;
        self.trim_past();
    }

    /// Replace the present without recording a step.
    ///
    /// Used for corrections that must not be undoable, such as sizes
    /// reported back by the renderer.
    pub fn replace_present(&mut self, present: S) {
        self.state.present = present;
    }

    fn trim_past(&mut self) {
        if let Some(limit) = self.limit {
            while self.state.past.len() > limit {
                self.state.past.pop_front();
            }
        }
    }
}

impl<S: PartialEq> Undoable<S> for History<S> {
    fn commit(&mut self, next: S) -> bool {
        if next == self.state.present {
            return false;
        }
        let previous = std::mem::replace(&mut self.state.present, next);
        self.state.past.push_back(previous);
        self.state.future.clear();
        self.trim_past();
        true
    }

    fn undo(&mut self) -> bool {
        match self.state.past.pop_back() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.state.present, previous);
                self.state.future.push_front(current);
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        match self.state.future.pop_front() {
            Some(next) => {
                let current = std::mem::replace(&mut self.state.present, next);
                self.state.past.push_back(current);
                self.trim_past();
                true
            }
            None => false,
        }
    }

    fn can_undo(&self) -> bool {
        !self.state.past.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.state.future.is_empty()
    }
}
