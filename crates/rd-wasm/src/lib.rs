//! WASM bridge for RD: exposes the editor reducer to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. Actions come in as JSON
//! (`{"type": "...", "payload": {...}}`), state goes out as JSON.

use rd_core::model::Project;
use rd_editor::{Action, EditorState};
use serde_json::json;
use wasm_bindgen::prelude::*;

/// The browser-facing editor session.
///
/// All interaction from the page goes through this struct.
#[wasm_bindgen]
pub struct ResumeEditor {
    state: EditorState,
}

impl Default for ResumeEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ResumeEditor {
    /// Create a session on a fresh single-page project.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            state: EditorState::default(),
        }
    }

    /// Dispatch a JSON-encoded action.
    /// Returns `true` if the state changed, `false` on no-ops or bad JSON.
    pub fn dispatch(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Action>(json) {
            Ok(action) => self.state.dispatch(action),
            Err(err) => {
                log::debug!("unparseable action: {err}");
                false
            }
        }
    }

    /// Handle a keyboard shortcut. Returns `true` if the state changed.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        self.state.handle_key(key, ctrl, shift, alt, meta)
    }

    /// Full session snapshot: project, focus, history and zoom.
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.state.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// The project alone, in its persisted form.
    pub fn project_json(&self) -> String {
        self.state
            .project
            .to_json()
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the project with a JSON document.
    ///
    /// Returns `{"success":true,"error":null}` or
    /// `{"success":false,"error":"..."}`. On failure the session is
    /// left untouched.
    pub fn load_project(&mut self, json: &str) -> String {
        let result = Project::from_json(json).map(|project| {
            let config = self.state.config().clone();
            self.state = EditorState::new(project, config);
        });
        load_result(result.map_err(|e| e.to_string()))
    }

    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.can_redo()
    }

    /// Selected element ids as a JSON array.
    pub fn selected_ids(&self) -> String {
        serde_json::to_string(self.state.selected.as_slice()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Topmost visible element under a page-space point, or an empty string.
    pub fn element_at(&self, x: f64, y: f64) -> String {
        self.state
            .element_at(x, y)
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}

// ─── Standalone validation (no session needed) ───────────────────────────

/// Check a project document without loading it.
/// Returns the same `{success, error}` object as `load_project`.
#[wasm_bindgen]
pub fn validate_project(json: &str) -> String {
    load_result(Project::from_json(json).map(drop).map_err(|e| e.to_string()))
}

fn load_result(result: Result<(), String>) -> String {
    let value = match result {
        Ok(()) => json!({ "success": true, "error": null }),
        Err(error) => json!({ "success": false, "error": error }),
    };
    value.to_string()
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("RD WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn dispatch_json_action() {
        let mut editor = ResumeEditor::new();
        assert!(editor.dispatch(
            r#"{"type":"addElement","payload":{"type":"text","patch":{"content":"Hello"}}}"#
        ));
        assert!(editor.can_undo());
        assert!(!editor.can_redo());

        let snap = parse(&editor.snapshot_json());
        let elements = &snap["project"]["pages"][0]["elements"];
        assert_eq!(elements[0]["content"], "Hello");
        assert_eq!(elements[0]["type"], "text");
        assert_eq!(snap["historyIndex"], 0);
        assert_eq!(parse(&editor.selected_ids()).as_array().unwrap().len(), 1);
    }

    #[test]
    fn bad_json_is_ignored() {
        let mut editor = ResumeEditor::new();
        assert!(!editor.dispatch("not json"));
        assert!(!editor.dispatch(r#"{"type":"explode"}"#));
        assert!(!editor.can_undo());
    }

    #[test]
    fn undo_through_bridge() {
        let mut editor = ResumeEditor::new();
        editor.dispatch(r#"{"type":"addElement","payload":{"type":"rectangle"}}"#);
        assert!(editor.dispatch(r#"{"type":"undo"}"#));
        assert!(editor.can_redo());
        let snap = parse(&editor.snapshot_json());
        assert_eq!(snap["project"]["pages"][0]["elements"], Value::Array(vec![]));
        assert!(editor.handle_key("y", true, false, false, false));
        assert!(editor.can_undo());
    }

    #[test]
    fn load_project_reports_success() {
        let mut source = ResumeEditor::new();
        source.dispatch(r#"{"type":"setTitle","payload":{"title":"Jane Doe"}}"#);
        source.dispatch(r#"{"type":"addPage","payload":{}}"#);
        let exported = source.project_json();

        let mut editor = ResumeEditor::new();
        let result = parse(&editor.load_project(&exported));
        assert_eq!(result, json!({ "success": true, "error": null }));
        let snap = parse(&editor.snapshot_json());
        assert_eq!(snap["project"]["title"], "Jane Doe");
        assert_eq!(snap["project"]["pages"].as_array().unwrap().len(), 2);
        assert!(!editor.can_undo());
    }

    #[test]
    fn load_project_reports_failure() {
        let mut editor = ResumeEditor::new();
        editor.dispatch(r#"{"type":"setTitle","payload":{"title":"Keep me"}}"#);

        let result = parse(&editor.load_project(r#"{"id":"p","title":"t","pages":[]}"#));
        assert_eq!(result["success"], false);
        assert!(result["error"].as_str().unwrap().contains("page"));

        let result = parse(&editor.load_project("{"));
        assert_eq!(result["success"], false);
        assert_eq!(parse(&editor.snapshot_json())["project"]["title"], "Keep me");
    }

    #[test]
    fn validate_without_session() {
        let project = ResumeEditor::new().project_json();
        assert_eq!(parse(&validate_project(&project))["success"], true);
        assert_eq!(parse(&validate_project("[]"))["success"], false);
    }

    #[test]
    fn hit_test_through_bridge() {
        let mut editor = ResumeEditor::new();
        editor.dispatch(
            r#"{"type":"addElement","payload":{"type":"circle","patch":{"position":{"x":0,"y":0}}}}"#,
        );
        assert!(!editor.element_at(10.0, 10.0).is_empty());
        assert_eq!(editor.element_at(1000.0, 1000.0), "");
    }
}
