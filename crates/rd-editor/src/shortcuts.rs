//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s, and those to
//! reducer `Action`s against the current editor state. Lives in Rust so the
//! browser bridge and tests share one table.

use crate::action::Action;
use crate::reducer::EditorState;

/// Distance moved by an arrow key, and by Shift + arrow.
const NUDGE: f64 = 1.0;
const NUDGE_LARGE: f64 = 10.0;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Delete,
    SelectAll,
    Deselect,
    Duplicate,
    Copy,
    Cut,
    Paste,

    // ── Arrange ──
    Group,
    Ungroup,
    SendBackward,
    BringForward,
    SendToBack,
    BringToFront,
    Nudge { dx: f64, dy: f64 },
}

/// Resolves key events into shortcut actions.
///
/// On macOS `meta` is ⌘; on other platforms `ctrl` plays the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"ArrowLeft"`).
    /// Returns `None` if the combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if let Some((dx, dy)) = arrow_direction(key) {
            if cmd {
                return None;
            }
            let step = if shift { NUDGE_LARGE } else { NUDGE };
            return Some(ShortcutAction::Nudge {
                dx: dx * step,
                dy: dy * step,
            });
        }

        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "g" | "G" => Some(ShortcutAction::Ungroup),
                "[" | "{" => Some(ShortcutAction::SendToBack),
                "]" | "}" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "c" | "C" => Some(ShortcutAction::Copy),
                "x" | "X" => Some(ShortcutAction::Cut),
                "v" | "V" => Some(ShortcutAction::Paste),
                "g" | "G" => Some(ShortcutAction::Group),
                "[" => Some(ShortcutAction::SendBackward),
                "]" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}

fn arrow_direction(key: &str) -> Option<(f64, f64)> {
    match key {
        "ArrowLeft" => Some((-1.0, 0.0)),
        "ArrowRight" => Some((1.0, 0.0)),
        "ArrowUp" => Some((0.0, -1.0)),
        "ArrowDown" => Some((0.0, 1.0)),
        _ => None,
    }
}

impl ShortcutAction {
    /// The reducer action this shortcut stands for in `state`.
    ///
    /// Z-order shortcuts need exactly one selected element.
    pub fn to_action(self, state: &EditorState) -> Option<Action> {
        let single = match state.selected.as_slice() {
            [id] => Some(*id),
            _ => None,
        };
        let action = match self {
            ShortcutAction::Undo => Action::Undo,
            ShortcutAction::Redo => Action::Redo,
            ShortcutAction::Delete => Action::DeleteSelected,
            ShortcutAction::SelectAll => Action::SelectAll,
            ShortcutAction::Deselect => Action::ClearSelection,
            ShortcutAction::Duplicate => Action::Duplicate,
            ShortcutAction::Copy => Action::Copy,
            ShortcutAction::Cut => Action::Cut,
            ShortcutAction::Paste => Action::Paste,
            ShortcutAction::Group => Action::GroupElements,
            ShortcutAction::Ungroup => Action::UngroupElements,
            ShortcutAction::SendBackward => Action::SendBackward { id: single? },
            ShortcutAction::BringForward => Action::BringForward { id: single? },
            ShortcutAction::SendToBack => Action::SendToBack { id: single? },
            ShortcutAction::BringToFront => Action::BringToFront { id: single? },
            ShortcutAction::Nudge { dx, dy } => Action::MoveSelected { dx, dy },
        };
        Some(action)
    }
}

impl EditorState {
    /// Resolve and dispatch a key event. Returns `true` if the state changed.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        let Some(shortcut) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return false;
        };
        match shortcut.to_action(self) {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }
}
