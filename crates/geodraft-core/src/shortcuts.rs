//! Keyboard shortcut registry.

use crate::input::Modifiers;

/// Editor action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Undo,
    Redo,
    /// Abandon the in-progress gesture.
    Cancel,
    DeleteSelected,
    /// Finish a polyline, or commit a parameter-driven tool.
    Confirm,
    /// Switch between Navigate and Draw modes.
    ToggleMode,
}

/// A keyboard shortcut definition.
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

    /// Whether a key press triggers this shortcut. Key names compare
    /// case-insensitively; Ctrl and Shift must match exactly.
    pub fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key) && self.ctrl == modifiers.ctrl && self.shift == modifiers.shift
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
            Shortcut::new("Escape", false, false, Command::Cancel, "Cancel current gesture"),
            Shortcut::new("Delete", false, false, Command::DeleteSelected, "Delete selected shape"),
            Shortcut::new("Backspace", false, false, Command::DeleteSelected, "Delete selected shape"),
            Shortcut::new("Enter", false, false, Command::Confirm, "Finish polyline / add shape"),
            Shortcut::new("P", false, false, Command::ToggleMode, "Toggle navigate/draw mode"),
        ]
    }

    /// Command bound to a key press, if any.
    pub fn lookup(key: &str, modifiers: Modifiers) -> Option<Command> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, modifiers))
            .map(|s| s.command)
    }

    /// One line per shortcut, for help output.
    pub fn describe_all() -> String {
        Self::all()
            .iter()
            .map(|s| format!("  {:20} {}", s.format(), s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
