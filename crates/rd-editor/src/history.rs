//! Linear undo/redo history.
//!
//! Every mutation is expressed as a `Change` that carries exactly the data
//! needed to apply it forward and to revert it. The reducer applies a change
//! through the same `apply` path that redo uses, so a redone step is
//! identical to the original.
//!
//! The log is a bounded sequence with a cursor: entries past the cursor are
//! the redo branch and are dropped as soon as a new change is recorded.

use crate::reducer::Selection;
use rd_core::id::{ElementId, PageId};
use rd_core::model::{Element, Page, PageProps, Project};
use serde::{Deserialize, Serialize};

/// An element together with the page index it occupies (or occupied).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placed {
    pub index: usize,
    pub element: Element,
}

/// A reversible document change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Change {
    AddElement {
        page_id: PageId,
        index: usize,
        element: Box<Element>,
    },
    DeleteElement {
        page_id: PageId,
        index: usize,
        element: Box<Element>,
    },
    UpdateElement {
        before: Box<Element>,
        after: Box<Element>,
    },
    /// Batch update (multi-drag, nudge, align, group). Pairs share indices.
    UpdateMultipleElements {
        before: Vec<Element>,
        after: Vec<Element>,
    },
    /// Batch insert (paste, duplicate). Sorted by ascending index.
    AddElements {
        page_id: PageId,
        elements: Vec<Placed>,
    },
    /// Batch removal (delete selection, cut). Sorted by ascending index.
    DeleteElements {
        page_id: PageId,
        elements: Vec<Placed>,
    },
    ReorderElement {
        page_id: PageId,
        element_id: ElementId,
        from: usize,
        to: usize,
    },
    AddPage {
        index: usize,
        page: Box<Page>,
    },
    DeletePage {
        index: usize,
        page: Box<Page>,
    },
    UpdatePage {
        page_id: PageId,
        before: PageProps,
        after: PageProps,
    },
    UpdateTitle {
        before: String,
        after: String,
    },
}

impl Change {
    /// Short human-readable name, used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Change::AddElement { .. } => "add element",
            Change::DeleteElement { .. } => "delete element",
            Change::UpdateElement { .. } => "update element",
            Change::UpdateMultipleElements { .. } => "update elements",
            Change::AddElements { .. } => "add elements",
            Change::DeleteElements { .. } => "delete elements",
            Change::ReorderElement { .. } => "reorder element",
            Change::AddPage { .. } => "add page",
            Change::DeletePage { .. } => "delete page",
            Change::UpdatePage { .. } => "update page",
            Change::UpdateTitle { .. } => "rename project",
        }
    }

    /// The page this change acts on. Element updates are located through
    /// `project`; title changes name no page.
    pub fn page_id(&self, project: &Project) -> Option<PageId> {
        match self {
            Change::AddElement { page_id, .. }
            | Change::DeleteElement { page_id, .. }
            | Change::AddElements { page_id, .. }
            | Change::DeleteElements { page_id, .. }
            | Change::ReorderElement { page_id, .. }
            | Change::UpdatePage { page_id, .. } => Some(*page_id),
            Change::UpdateElement { after, .. } => project.page_of(after.id),
            Change::UpdateMultipleElements { after, .. } => {
                after.first().and_then(|el| project.page_of(el.id))
            }
            Change::AddPage { page, .. } | Change::DeletePage { page, .. } => Some(page.id),
            Change::UpdateTitle { .. } => None,
        }
    }

    /// Apply the change forward.
    pub fn apply(&self, project: &mut Project) {
        match self {
            Change::AddElement {
                page_id,
                index,
                element,
            } => insert(project, *page_id, *index, element),
            Change::DeleteElement {
                page_id, element, ..
            } => remove(project, *page_id, element.id),
            Change::UpdateElement { after, .. } => replace(project, after),
            Change::UpdateMultipleElements { after, .. } => {
                for el in after {
                    replace(project, el);
                }
            }
            Change::AddElements { page_id, elements } => {
                for placed in elements {
                    insert(project, *page_id, placed.index, &placed.element);
                }
            }
            Change::DeleteElements { page_id, elements } => {
                for placed in elements {
                    remove(project, *page_id, placed.element.id);
                }
            }
            Change::ReorderElement {
                page_id,
                element_id,
                to,
                ..
            } => reorder(project, *page_id, *element_id, *to),
            Change::AddPage { index, page } => {
                let index = (*index).min(project.pages.len());
                project.pages.insert(index, (**page).clone());
            }
            Change::DeletePage { page, .. } => {
                project.pages.retain(|p| p.id != page.id);
            }
            Change::UpdatePage { page_id, after, .. } => {
                if let Some(page) = project.page_mut(*page_id) {
                    page.props = after.clone();
                }
            }
            Change::UpdateTitle { after, .. } => project.title.clone_from(after),
        }
    }

    /// Undo the change. Assumes the project is in the state `apply` left it.
    pub fn revert(&self, project: &mut Project) {
        match self {
            Change::AddElement {
                page_id, element, ..
            } => remove(project, *page_id, element.id),
            Change::DeleteElement {
                page_id,
                index,
                element,
            } => insert(project, *page_id, *index, element),
            Change::UpdateElement { before, .. } => replace(project, before),
            Change::UpdateMultipleElements { before, .. } => {
                for el in before {
                    replace(project, el);
                }
            }
            Change::AddElements { page_id, elements } => {
                for placed in elements.iter().rev() {
                    remove(project, *page_id, placed.element.id);
                }
            }
            Change::DeleteElements { page_id, elements } => {
                // Ascending re-insertion lands every element back at its
                // original index.
                for placed in elements {
                    insert(project, *page_id, placed.index, &placed.element);
                }
            }
            Change::ReorderElement {
                page_id,
                element_id,
                from,
                ..
            } => reorder(project, *page_id, *element_id, *from),
            Change::AddPage { page, .. } => {
                project.pages.retain(|p| p.id != page.id);
            }
            Change::DeletePage { index, page } => {
                let index = (*index).min(project.pages.len());
                project.pages.insert(index, (**page).clone());
            }
            Change::UpdatePage {
                page_id, before, ..
            } => {
                if let Some(page) = project.page_mut(*page_id) {
                    page.props = before.clone();
                }
            }
            Change::UpdateTitle { before, .. } => project.title.clone_from(before),
        }
    }
}

fn insert(project: &mut Project, page_id: PageId, index: usize, element: &Element) {
    if let Some(page) = project.page_mut(page_id) {
        page.insert_element(index, element.clone());
    }
}

fn remove(project: &mut Project, page_id: PageId, id: ElementId) {
    if let Some(page) = project.page_mut(page_id) {
        page.remove_element(id);
    }
}

/// Overwrite the element with the same id wherever it lives, keeping its
/// current z-order.
fn replace(project: &mut Project, element: &Element) {
    let Some(page_id) = project.page_of(element.id) else {
        return;
    };
    if let Some(page) = project.page_mut(page_id)
        && let Some(slot) = page.element_mut(element.id)
    {
        let z_index = slot.z_index;
        *slot = element.clone();
        slot.z_index = z_index;
    }
}

fn reorder(project: &mut Project, page_id: PageId, id: ElementId, to: usize) {
    if let Some(page) = project.page_mut(page_id)
        && let Some(from) = page.index_of(id)
    {
        page.move_element(from, to);
    }
}

/// One step in the history: a change plus the editor focus around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub change: Change,
    pub page_before: PageId,
    pub page_after: PageId,
    pub selection_before: Selection,
    pub selection_after: Selection,
}

/// Bounded undo/redo log with a cursor.
#[derive(Debug, Clone, Serialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Number of entries currently applied; the cursor is `applied - 1`.
    applied: usize,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            applied: 0,
            capacity,
        }
    }

    /// Record a new entry: drop the redo branch, append, evict the oldest
    /// entry when over capacity.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.applied);
        self.entries.push(entry);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.applied = self.entries.len();
    }

    /// Step the cursor back, returning the entry to revert.
    pub fn step_back(&mut self) -> Option<HistoryEntry> {
        if self.applied == 0 {
            return None;
        }
        self.applied -= 1;
        self.entries.get(self.applied).cloned()
    }

    /// Step the cursor forward, returning the entry to re-apply.
    pub fn step_forward(&mut self) -> Option<HistoryEntry> {
        let entry = self.entries.get(self.applied).cloned()?;
        self.applied += 1;
        Some(entry)
    }

    /// Cursor position: `-1` when nothing can be undone.
    pub fn index(&self) -> isize {
        self.applied as isize - 1
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.applied = 0;
    }
}
