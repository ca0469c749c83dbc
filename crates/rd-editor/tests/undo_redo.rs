//! Integration tests: reducer + history (rd-editor).
//!
//! Verifies that every recorded action can be undone and redone exactly,
//! and that the history stays bounded.

use pretty_assertions::assert_eq;
use rd_core::geometry::{Point, Size};
use rd_core::id::ElementId;
use rd_core::model::{ElementKind, ElementPatch, ElementStyle, PagePatch};
use rd_editor::{Action, EditorState, ElementUpdate};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn add(state: &mut EditorState, kind: ElementKind, x: f64, y: f64) -> ElementId {
    state.dispatch(Action::AddElement {
        kind,
        patch: ElementPatch::moved_to(Point::new(x, y)),
    });
    state.selected[0]
}

// ─── Adding ─────────────────────────────────────────────────────────────

#[test]
fn z_index_follows_insertion_order() {
    init_logging();
    let mut state = EditorState::default();
    let kinds = [
        ElementKind::Heading,
        ElementKind::Text,
        ElementKind::Rectangle,
        ElementKind::Image,
        ElementKind::ArrowRight,
    ];
    let ids: Vec<_> = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| add(&mut state, *kind, i as f64 * 10.0, 0.0))
        .collect();

    let elements = state.current_elements();
    assert_eq!(elements.len(), kinds.len());
    for (i, el) in elements.iter().enumerate() {
        assert_eq!(el.id, ids[i]);
        assert_eq!(el.z_index, i);
    }
}

#[test]
fn add_uses_defaults_for_missing_fields() {
    let mut state = EditorState::default();
    state.dispatch(Action::AddElement {
        kind: ElementKind::Rectangle,
        patch: ElementPatch::default(),
    });
    let el = &state.current_elements()[0];
    assert_eq!(el.position, Point::new(100.0, 100.0));
    assert_eq!(el.size, Size::new(200.0, 100.0));
    assert_eq!(el.rotation, 0.0);
    assert_eq!(el.opacity, 1.0);
    assert!(!el.locked);
    assert!(el.visible);
}

#[test]
fn undo_add_restores_count_and_selection() {
    init_logging();
    let mut state = EditorState::default();
    let first = add(&mut state, ElementKind::Text, 0.0, 0.0);
    let page_before = state.current_page().unwrap().clone();
    let selection_before = state.selected.clone();
    assert_eq!(selection_before.as_slice(), &[first]);

    add(&mut state, ElementKind::Heading, 50.0, 50.0);
    let page_after = state.current_page().unwrap().clone();
    let selection_after = state.selected.clone();

    assert!(state.dispatch(Action::Undo));
    assert_eq!(state.current_page().unwrap(), &page_before);
    assert_eq!(state.selected, selection_before);

    assert!(state.dispatch(Action::Redo));
    assert_eq!(state.current_page().unwrap(), &page_after);
    assert_eq!(state.selected, selection_after);
}

// ─── Updating ───────────────────────────────────────────────────────────

#[test]
fn update_roundtrip() {
    let mut state = EditorState::default();
    let id = add(&mut state, ElementKind::Text, 0.0, 0.0);
    let original = state.element(id).unwrap().clone();

    state.dispatch(Action::UpdateElement {
        id,
        updates: ElementPatch {
            content: Some("Senior Engineer".into()),
            style: Some(ElementStyle {
                font_size: Some(18.0),
                ..Default::default()
            }),
            ..Default::default()
        },
    });
    let updated = state.element(id).unwrap().clone();
    assert_eq!(updated.content.as_deref(), Some("Senior Engineer"));
    assert_eq!(updated.style.font_size, Some(18.0));

    state.dispatch(Action::Undo);
    assert_eq!(state.element(id).unwrap(), &original);
    state.dispatch(Action::Redo);
    assert_eq!(state.element(id).unwrap(), &updated);
}

#[test]
fn multi_update_is_one_step() {
    let mut state = EditorState::default();
    let a = add(&mut state, ElementKind::Rectangle, 0.0, 0.0);
    let b = add(&mut state, ElementKind::Circle, 300.0, 0.0);
    let steps = state.history.len();

    assert!(state.dispatch(Action::UpdateMultipleElements {
        updates: vec![
            ElementUpdate {
                id: a,
                updates: ElementPatch::moved_to(Point::new(10.0, 10.0)),
            },
            ElementUpdate {
                id: b,
                updates: ElementPatch::moved_to(Point::new(310.0, 10.0)),
            },
        ],
    }));
    assert_eq!(state.history.len(), steps + 1);

    state.dispatch(Action::Undo);
    assert_eq!(state.element(a).unwrap().position, Point::new(0.0, 0.0));
    assert_eq!(state.element(b).unwrap().position, Point::new(300.0, 0.0));
}

// ─── Deleting ───────────────────────────────────────────────────────────

#[test]
fn delete_reinserts_at_original_index() {
    let mut state = EditorState::default();
    let a = add(&mut state, ElementKind::Text, 0.0, 0.0);
    let b = add(&mut state, ElementKind::Text, 0.0, 20.0);
    let c = add(&mut state, ElementKind::Text, 0.0, 40.0);

    state.dispatch(Action::SelectElement { id: b, multi: false });
    assert!(state.dispatch(Action::DeleteElement { id: b }));
    assert!(state.selected.is_empty());
    assert_eq!(state.current_elements().len(), 2);

    state.dispatch(Action::Undo);
    let ids: Vec<_> = state.current_elements().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![a, b, c]);
    assert_eq!(state.selected.as_slice(), &[b]);
}

#[test]
fn delete_selected_restores_interleaved_order() {
    let mut state = EditorState::default();
    let ids: Vec<_> = (0..5)
        .map(|i| add(&mut state, ElementKind::Star, i as f64, 0.0))
        .collect();
    state.dispatch(Action::SelectElement {
        id: ids[1],
        multi: false,
    });
    state.dispatch(Action::SelectElement {
        id: ids[3],
        multi: true,
    });
    state.dispatch(Action::SelectElement {
        id: ids[4],
        multi: true,
    });
    assert!(state.dispatch(Action::DeleteSelected));
    let left: Vec<_> = state.current_elements().iter().map(|e| e.id).collect();
    assert_eq!(left, vec![ids[0], ids[2]]);

    state.dispatch(Action::Undo);
    let restored: Vec<_> = state.current_elements().iter().map(|e| e.id).collect();
    assert_eq!(restored, ids);
    for (i, el) in state.current_elements().iter().enumerate() {
        assert_eq!(el.z_index, i);
    }
}

// ─── History bookkeeping ────────────────────────────────────────────────

#[test]
fn history_is_bounded_at_fifty() {
    init_logging();
    let mut state = EditorState::default();
    for i in 0..51 {
        add(&mut state, ElementKind::Rectangle, i as f64, 0.0);
    }
    assert_eq!(state.history.len(), 50);
    assert_eq!(state.history.index(), 49);

    let mut undone = 0;
    while state.dispatch(Action::Undo) {
        undone += 1;
    }
    assert_eq!(undone, 50);
    assert_eq!(state.history.index(), -1);
    // The very first add fell out of the log and stays applied.
    assert_eq!(state.current_elements().len(), 1);
    assert!(!state.can_undo());
    assert!(state.can_redo());
}

#[test]
fn new_action_discards_redo_branch() {
    let mut state = EditorState::default();
    add(&mut state, ElementKind::Text, 0.0, 0.0);
    add(&mut state, ElementKind::Text, 0.0, 0.0);
    state.dispatch(Action::Undo);
    assert!(state.can_redo());

    add(&mut state, ElementKind::Icon, 0.0, 0.0);
    assert!(!state.can_redo());
    assert_eq!(state.history.len(), 2);
    assert!(!state.dispatch(Action::Redo));
}

#[test]
fn undo_on_empty_history_is_noop() {
    let mut state = EditorState::default();
    assert!(!state.dispatch(Action::Undo));
    assert!(!state.dispatch(Action::Redo));
}

#[test]
fn undo_returns_to_the_page_it_changed() {
    let mut state = EditorState::default();
    let first = state.current_page_id;
    let id = add(&mut state, ElementKind::Text, 0.0, 0.0);
    state.dispatch(Action::AddPage { name: None });
    let second = state.current_page_id;
    state.dispatch(Action::SetCurrentPage { id: first });
    state.dispatch(Action::SetCurrentPage { id: second });

    // Undo the page add: the session lands back on the first page.
    state.dispatch(Action::Undo);
    assert_eq!(state.page_count(), 1);
    assert_eq!(state.current_page_id, first);
    assert_eq!(state.selected.as_slice(), &[id]);
}

#[test]
fn page_update_roundtrip() {
    let mut state = EditorState::default();
    let page = state.current_page_id;
    assert!(state.dispatch(Action::UpdatePage {
        id: page,
        patch: PagePatch {
            name: Some("Cover letter".into()),
            background_color: Some("#F8FAFC".into()),
            ..Default::default()
        },
    }));
    assert_eq!(state.current_page().unwrap().props.name, "Cover letter");
    state.dispatch(Action::Undo);
    let props = &state.current_page().unwrap().props;
    assert_eq!(props.name, "Page 1");
    assert_eq!(props.background_color, "#FFFFFF");
}

#[test]
fn sole_page_delete_records_nothing() {
    let mut state = EditorState::default();
    let page = state.current_page_id;
    assert!(!state.dispatch(Action::DeletePage { id: page }));
    assert_eq!(state.page_count(), 1);
    assert!(state.history.is_empty());
}

#[test]
fn paste_undo_redo_keeps_ids() {
    let mut state = EditorState::default();
    add(&mut state, ElementKind::Heading, 0.0, 0.0);
    state.dispatch(Action::Copy);
    state.dispatch(Action::Paste);
    let pasted = state.selected[0];

    state.dispatch(Action::Undo);
    assert!(state.element(pasted).is_none());
    state.dispatch(Action::Redo);
    assert!(state.element(pasted).is_some());
    assert_eq!(state.selected.as_slice(), &[pasted]);
}

#[test]
fn undo_shows_the_page_an_element_was_deleted_from() {
    init_logging();
    let mut state = EditorState::default();
    let first = state.current_page_id;
    let id = add(&mut state, ElementKind::Text, 0.0, 0.0);
    state.dispatch(Action::AddPage { name: None });
    let second = state.current_page_id;
    assert_ne!(first, second);

    // Deleting from another page leaves the focus where it was.
    assert!(state.dispatch(Action::DeleteElement { id }));
    assert_eq!(state.current_page_id, second);

    assert!(state.dispatch(Action::Undo));
    assert_eq!(state.current_page_id, first);
    assert!(state.current_elements().iter().any(|e| e.id == id));

    state.dispatch(Action::SetCurrentPage { id: second });
    assert!(state.dispatch(Action::Redo));
    assert_eq!(state.current_page_id, first);
    assert!(state.element(id).is_none());
}

#[test]
fn undo_shows_the_page_an_element_was_updated_on() {
    let mut state = EditorState::default();
    let first = state.current_page_id;
    let id = add(&mut state, ElementKind::Heading, 0.0, 0.0);
    state.dispatch(Action::AddPage { name: None });

    assert!(state.dispatch(Action::UpdateElement {
        id,
        updates: ElementPatch::moved_to(Point::new(5.0, 5.0)),
    }));
    assert!(state.dispatch(Action::Undo));
    assert_eq!(state.current_page_id, first);
    assert_eq!(state.element(id).unwrap().position, Point::new(0.0, 0.0));
}
