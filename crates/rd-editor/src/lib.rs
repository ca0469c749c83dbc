pub mod action;
pub mod history;
pub mod reducer;
pub mod selectors;
pub mod shortcuts;

pub use action::{Action, ElementUpdate};
pub use history::{Change, History, HistoryEntry};
pub use reducer::{EditorState, Selection};
pub use selectors::EditorSnapshot;
