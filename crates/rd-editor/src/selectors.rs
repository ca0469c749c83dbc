//! Read-side projections over `EditorState` for the rendering layer.

use crate::history::HistoryEntry;
use crate::reducer::EditorState;
use rd_core::geometry::{self, Rect};
use rd_core::id::{ElementId, GroupId, PageId};
use rd_core::model::{Element, Page, Project};
use serde::Serialize;

/// Serializable view of the whole session, handed to persistence and the UI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot<'a> {
    pub project: &'a Project,
    pub current_page_id: PageId,
    pub selected_element_ids: &'a [ElementId],
    pub history: &'a [HistoryEntry],
    pub history_index: isize,
    pub can_undo: bool,
    pub can_redo: bool,
    pub zoom: f64,
}

impl EditorState {
    pub fn current_page(&self) -> Option<&Page> {
        self.project.page(self.current_page_id)
    }

    /// Elements of the current page in z-order (back to front).
    pub fn current_elements(&self) -> &[Element] {
        self.current_page()
            .map(|p| p.elements.as_slice())
            .unwrap_or_default()
    }

    /// Look up an element on any page.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.project.pages.iter().find_map(|p| p.element(id))
    }

    /// Selected elements in z-order.
    pub fn selected_elements(&self) -> Vec<&Element> {
        self.current_elements()
            .iter()
            .filter(|e| self.selected.contains(&e.id))
            .collect()
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected.contains(&id)
    }

    /// Bounding box of the selection, for drawing the selection frame.
    pub fn selection_bounds(&self) -> Option<Rect> {
        geometry::bounding_box(self.selected_elements().into_iter().map(Element::bounds))
    }

    /// Members of a group on the current page.
    pub fn group_members(&self, group_id: GroupId) -> Vec<&Element> {
        self.current_elements()
            .iter()
            .filter(|e| e.group_id == Some(group_id))
            .collect()
    }

    /// Topmost visible element under a page-space point.
    pub fn element_at(&self, x: f64, y: f64) -> Option<ElementId> {
        self.current_elements()
            .iter()
            .rev()
            .find(|e| e.visible && e.bounds().contains(x, y))
            .map(|e| e.id)
    }

    pub fn page_count(&self) -> usize {
        self.project.pages.len()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn snapshot(&self) -> EditorSnapshot<'_> {
        EditorSnapshot {
            project: &self.project,
            current_page_id: self.current_page_id,
            selected_element_ids: &self.selected,
            history: self.history.entries(),
            history_index: self.history.index(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            zoom: self.zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::action::Action;
    use crate::reducer::EditorState;
    use rd_core::geometry::{Point, Rect, Size};
    use rd_core::model::{ElementKind, ElementPatch};

    fn add(state: &mut EditorState, kind: ElementKind, x: f64, y: f64) {
        state.dispatch(Action::AddElement {
            kind,
            patch: ElementPatch {
                position: Some(Point::new(x, y)),
                size: Some(Size::new(50.0, 50.0)),
                ..Default::default()
            },
        });
    }

    #[test]
    fn element_at_prefers_topmost() {
        let mut s = EditorState::default();
        add(&mut s, ElementKind::Rectangle, 0.0, 0.0);
        add(&mut s, ElementKind::Circle, 25.0, 25.0);
        let top = s.current_elements()[1].id;
        assert_eq!(s.element_at(30.0, 30.0), Some(top));
        assert_eq!(s.element_at(500.0, 500.0), None);
    }

    #[test]
    fn hidden_elements_are_not_hit() {
        let mut s = EditorState::default();
        add(&mut s, ElementKind::Star, 0.0, 0.0);
        let id = s.current_elements()[0].id;
        s.dispatch(Action::UpdateElement {
            id,
            updates: ElementPatch {
                visible: Some(false),
                ..Default::default()
            },
        });
        assert_eq!(s.element_at(10.0, 10.0), None);
    }

    #[test]
    fn selection_bounds_cover_all_selected() {
        let mut s = EditorState::default();
        add(&mut s, ElementKind::Rectangle, 0.0, 0.0);
        add(&mut s, ElementKind::Rectangle, 100.0, 20.0);
        s.dispatch(Action::SelectAll);
        assert_eq!(s.selection_bounds(), Some(Rect::new(0.0, 0.0, 150.0, 70.0)));
        s.dispatch(Action::ClearSelection);
        assert_eq!(s.selection_bounds(), None);
    }

    #[test]
    fn snapshot_reports_cursor() {
        let mut s = EditorState::default();
        let snap = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(snap["historyIndex"], -1);
        assert_eq!(snap["canUndo"], false);

        add(&mut s, ElementKind::Text, 0.0, 0.0);
        let snap = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(snap["historyIndex"], 0);
        assert_eq!(snap["history"][0]["type"], "add_element");
        assert_eq!(snap["selectedElementIds"].as_array().unwrap().len(), 1);
        assert_eq!(
            snap["currentPageId"],
            serde_json::Value::String(s.current_page_id.to_string())
        );
    }
}
