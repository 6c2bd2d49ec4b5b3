//! Keyboard shortcut registry.

/// Editor command triggered by a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
    DeleteSelection,
    BringToFront,
    SendToBack,
    /// Abort the current drag, or clear the selection when idle.
    Cancel,
}

/// A keyboard shortcut definition.
///
/// `ctrl` matches either Control or the platform command key.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Whether a key event matches. Letter keys compare case-insensitively.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.ctrl == ctrl && self.shift == shift && self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, Command::Undo, "Undo"),
            Shortcut::new("Z", true, true, Command::Redo, "Redo"),
            Shortcut::new("Y", true, false, Command::Redo, "Redo"),
            Shortcut::new("]", true, false, Command::BringToFront, "Bring selection to front"),
            Shortcut::new("[", true, false, Command::SendToBack, "Send selection to back"),
            Shortcut::new("Delete", false, false, Command::DeleteSelection, "Delete selected item"),
            Shortcut::new("Backspace", false, false, Command::DeleteSelection, "Delete selected item"),
            Shortcut::new("Escape", false, false, Command::Cancel, "Cancel current action"),
        ]
    }

    /// Resolve a key event to a command.
    pub fn lookup(key: &str, ctrl: bool, shift: bool) -> Option<Command> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, ctrl, shift))
            .map(|shortcut| shortcut.command)
    }
}
