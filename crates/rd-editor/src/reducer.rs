//! The editor reducer.
//!
//! `EditorState` owns the project, the focus (current page + selection),
//! the clipboard and the history. `dispatch` is the only entry point that
//! mutates it. Requests that reference missing elements or pages, or that
//! fail a precondition (grouping one element, deleting the last page), are
//! logged and ignored. Dispatch never fails.
//!
//! Document mutations are built as a `Change`, applied through
//! `Change::apply`, and recorded in the history together with the focus
//! before and after. Selection, zoom, settings and page switching are not
//! recorded.

use crate::action::{Action, ElementUpdate};
use crate::history::{Change, History, HistoryEntry, Placed};
use rd_core::config::EditorConfig;
use rd_core::geometry::{self, AlignMode, Point};
use rd_core::id::{ElementId, GroupId, PageId};
use rd_core::model::{Element, ElementKind, ElementPatch, Page, PagePatch, Project, SettingsPatch};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Selected element ids. Order carries no meaning.
pub type Selection = SmallVec<[ElementId; 8]>;

/// The complete in-memory state of one editor session.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub project: Project,
    pub current_page_id: PageId,
    pub selected: Selection,
    /// Snapshot of the last copied elements, independent of their page.
    pub clipboard: Vec<Element>,
    pub history: History,
    pub zoom: f64,
    config: EditorConfig,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Project::new("Untitled Resume"), EditorConfig::default())
    }
}

impl EditorState {
    /// Start a session on `project`, focused on its first page.
    ///
    /// A project without pages gets a blank one so the session always has
    /// a current page.
    pub fn new(mut project: Project, config: EditorConfig) -> Self {
        if project.pages.is_empty() {
            let id = project.fresh_page_id();
            let size = project.settings.default_page_size;
            project.pages.push(Page::new(id, "Page 1", size));
        }
        let current_page_id = project.pages[0].id;
        Self {
            project,
            current_page_id,
            selected: Selection::new(),
            clipboard: Vec::new(),
            history: History::new(config.history_capacity),
            zoom: 1.0,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Apply an action. Returns `true` if the state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let name = action.name();
        let changed = match action {
            Action::AddElement { kind, patch } => self.add_element(kind, &patch),
            Action::UpdateElement { id, updates } => self.update_element(id, &updates),
            Action::UpdateMultipleElements { updates } => self.update_multiple(&updates),
            Action::DeleteElement { id } => self.delete_element(id),
            Action::DeleteSelected => self.delete_selected(),
            Action::MoveSelected { dx, dy } => self.move_selected(dx, dy),
            Action::MoveGroup { group_id, position } => self.move_group(group_id, position),
            Action::LockElement { id, locked } => self.update_element(
                id,
                &ElementPatch {
                    locked: Some(locked),
                    ..Default::default()
                },
            ),
            Action::SelectElement { id, multi } => self.select_element(id, multi),
            Action::SelectAll => self.select_all(),
            Action::ClearSelection => self.clear_selection(),
            Action::Copy => self.copy(),
            Action::Cut => self.cut(),
            Action::Paste => self.paste(),
            Action::Duplicate => self.duplicate(),
            Action::BringForward { id } => self.reorder(id, ZStep::Forward),
            Action::SendBackward { id } => self.reorder(id, ZStep::Backward),
            Action::BringToFront { id } => self.reorder(id, ZStep::Front),
            Action::SendToBack { id } => self.reorder(id, ZStep::Back),
            Action::GroupElements => self.group_selected(),
            Action::UngroupElements => self.ungroup_selected(),
            Action::AlignElements { mode } => self.align_selected(mode),
            Action::AddPage { name } => self.add_page(name),
            Action::DeletePage { id } => self.delete_page(id),
            Action::DuplicatePage { id } => self.duplicate_page(id),
            Action::UpdatePage { id, patch } => self.update_page(id, &patch),
            Action::SetCurrentPage { id } => self.set_current_page(id),
            Action::SetTitle { title } => self.set_title(title),
            Action::UpdateSettings { patch } => self.update_settings(&patch),
            Action::SetZoom { zoom } => self.set_zoom(zoom),
            Action::LoadProject { project } => self.load_project(*project),
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
        };
        if !changed {
            log::debug!("{name}: no change");
        }
        changed
    }

    // ─── Recording ───────────────────────────────────────────────────────

    /// Apply `change`, move the focus, and record the step.
    ///
    /// The entry remembers the page the change touched, so undo and redo
    /// bring it back into view even when it was edited from another page.
    fn execute(&mut self, change: Change, page_after: PageId, selection_after: Selection) -> bool {
        let page_before = self.touched_page(&change).unwrap_or(self.current_page_id);
        change.apply(&mut self.project);
        log::trace!("apply {}", change.label());
        let redo_page = self.touched_page(&change).unwrap_or(page_after);

        let entry = HistoryEntry {
            change,
            page_before,
            page_after: redo_page,
            selection_before: self.selected.clone(),
            selection_after: selection_after.clone(),
        };
        self.history.push(entry);
        self.current_page_id = page_after;
        self.selected = selection_after;
        self.project.touch();
        true
    }

    /// The existing page `change` acts on, if it names one.
    fn touched_page(&self, change: &Change) -> Option<PageId> {
        change
            .page_id(&self.project)
            .filter(|id| self.project.page(*id).is_some())
    }

    /// Record a batch of replacement elements, skipping unchanged ones.
    fn replace_elements(&mut self, afters: Vec<Element>) -> bool {
        let mut before = Vec::with_capacity(afters.len());
        let mut after = Vec::with_capacity(afters.len());
        for el in afters {
            if let Some(old) = self.element(el.id)
                && *old != el
            {
                before.push(old.clone());
                after.push(el);
            }
        }
        if after.is_empty() {
            return false;
        }
        let selection = self.selected.clone();
        self.execute(
            Change::UpdateMultipleElements { before, after },
            self.current_page_id,
            selection,
        )
    }

    /// Selected elements on the current page, in z-order.
    fn selected_in_order(&self) -> Vec<Element> {
        self.current_page()
            .map(|page| {
                page.elements
                    .iter()
                    .filter(|e| self.is_selected(e.id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    // ─── Elements ────────────────────────────────────────────────────────

    fn add_element(&mut self, kind: ElementKind, patch: &ElementPatch) -> bool {
        let Some(page) = self.current_page() else {
            return false;
        };
        let index = page.elements.len();
        let id = self.project.fresh_element_id(kind);
        let mut element = Element::new(id, kind, &self.config.element_defaults);
        element.apply(patch);
        element.z_index = index;

        let page_id = self.current_page_id;
        self.execute(
            Change::AddElement {
                page_id,
                index,
                element: Box::new(element),
            },
            page_id,
            SmallVec::from_elem(id, 1),
        )
    }

    fn update_element(&mut self, id: ElementId, updates: &ElementPatch) -> bool {
        if updates.is_empty() {
            return false;
        }
        let Some(before) = self.element(id).cloned() else {
            return false;
        };
        let mut after = before.clone();
        if !after.apply(updates) {
            return false;
        }
        let selection = self.selected.clone();
        self.execute(
            Change::UpdateElement {
                before: Box::new(before),
                after: Box::new(after),
            },
            self.current_page_id,
            selection,
        )
    }

    fn update_multiple(&mut self, updates: &[ElementUpdate]) -> bool {
        let mut afters: Vec<Element> = Vec::with_capacity(updates.len());
        for update in updates {
            // Later updates for the same id build on earlier ones.
            if let Some(pending) = afters.iter_mut().find(|e| e.id == update.id) {
                pending.apply(&update.updates);
            } else if let Some(el) = self.element(update.id) {
                let mut el = el.clone();
                el.apply(&update.updates);
                afters.push(el);
            }
        }
        self.replace_elements(afters)
    }

    fn delete_element(&mut self, id: ElementId) -> bool {
        let Some(page_id) = self.project.page_of(id) else {
            return false;
        };
        let Some((index, element)) = self
            .project
            .page(page_id)
            .and_then(|p| Some((p.index_of(id)?, p.element(id)?.clone())))
        else {
            return false;
        };
        let selection: Selection = self.selected.iter().copied().filter(|s| *s != id).collect();
        self.execute(
            Change::DeleteElement {
                page_id,
                index,
                element: Box::new(element),
            },
            self.current_page_id,
            selection,
        )
    }

    fn delete_selected(&mut self) -> bool {
        let Some(page) = self.current_page() else {
            return false;
        };
        let elements: Vec<Placed> = page
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| self.is_selected(e.id))
            .map(|(index, e)| Placed {
                index,
                element: e.clone(),
            })
            .collect();
        if elements.is_empty() {
            return false;
        }
        let page_id = self.current_page_id;
        self.execute(
            Change::DeleteElements { page_id, elements },
            page_id,
            Selection::new(),
        )
    }

    fn move_selected(&mut self, dx: f64, dy: f64) -> bool {
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        let afters = self
            .selected_in_order()
            .into_iter()
            .filter(|e| !e.locked)
            .map(|mut e| {
                e.position = e.position.offset(dx, dy);
                e
            })
            .collect();
        self.replace_elements(afters)
    }

    fn move_group(&mut self, group_id: GroupId, position: Point) -> bool {
        let Some(page) = self.current_page() else {
            return false;
        };
        let afters = page
            .elements
            .iter()
            .filter(|e| e.group_id == Some(group_id) && !e.locked)
            .map(|e| {
                let mut e = e.clone();
                let offset = e.group_offset.unwrap_or_default();
                e.position = position.offset(offset.x, offset.y);
                e
            })
            .collect();
        self.replace_elements(afters)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    fn select_element(&mut self, id: ElementId, multi: bool) -> bool {
        let on_page = self.current_page().is_some_and(|p| p.contains(id));
        if !on_page {
            return false;
        }
        if multi {
            if let Some(pos) = self.selected.iter().position(|s| *s == id) {
                self.selected.remove(pos);
            } else {
                self.selected.push(id);
            }
            return true;
        }
        if self.selected.len() == 1 && self.selected[0] == id {
            return false;
        }
        self.selected = SmallVec::from_elem(id, 1);
        true
    }

    fn select_all(&mut self) -> bool {
        let Some(page) = self.current_page() else {
            return false;
        };
        let all: Selection = page
            .elements
            .iter()
            .filter(|e| !e.locked)
            .map(|e| e.id)
            .collect();
        if all == self.selected {
            return false;
        }
        self.selected = all;
        true
    }

    fn clear_selection(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        true
    }

    // ─── Clipboard ───────────────────────────────────────────────────────

    fn copy(&mut self) -> bool {
        let copied = self.selected_in_order();
        if copied.is_empty() {
            return false;
        }
        self.clipboard = copied;
        true
    }

    fn cut(&mut self) -> bool {
        self.copy() && self.delete_selected()
    }

    fn paste(&mut self) -> bool {
        if self.clipboard.is_empty() {
            return false;
        }
        // The clipboard itself is never shifted: every paste lands one
        // offset away from the copied snapshot.
        let sources = self.clipboard.clone();
        self.insert_copies(&sources)
    }

    fn duplicate(&mut self) -> bool {
        let sources = self.selected_in_order();
        if sources.is_empty() {
            return false;
        }
        self.insert_copies(&sources)
    }

    /// Append offset copies of `sources` to the current page and select them.
    fn insert_copies(&mut self, sources: &[Element]) -> bool {
        let Some(page) = self.current_page() else {
            return false;
        };
        let start = page.elements.len();
        let offset = self.config.paste_offset;
        let copies = clone_elements(&self.project, sources, offset);

        let selection: Selection = copies.iter().map(|e| e.id).collect();
        let elements = copies
            .into_iter()
            .enumerate()
            .map(|(i, element)| Placed {
                index: start + i,
                element,
            })
            .collect();
        let page_id = self.current_page_id;
        self.execute(Change::AddElements { page_id, elements }, page_id, selection)
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    fn reorder(&mut self, id: ElementId, step: ZStep) -> bool {
        let Some(page_id) = self.project.page_of(id) else {
            return false;
        };
        let Some(page) = self.project.page(page_id) else {
            return false;
        };
        let Some(from) = page.index_of(id) else {
            return false;
        };
        let last = page.elements.len() - 1;
        let to = match step {
            ZStep::Forward if from < last => from + 1,
            ZStep::Backward if from > 0 => from - 1,
            ZStep::Front => last,
            ZStep::Back => 0,
            _ => from,
        };
        if to == from {
            return false;
        }
        let selection = self.selected.clone();
        self.execute(
            Change::ReorderElement {
                page_id,
                element_id: id,
                from,
                to,
            },
            self.current_page_id,
            selection,
        )
    }

    // ─── Grouping & alignment ────────────────────────────────────────────

    fn group_selected(&mut self) -> bool {
        let members = self.selected_in_order();
        if members.len() < 2 {
            return false;
        }
        let Some(bounds) = geometry::bounding_box(members.iter().map(Element::bounds)) else {
            return false;
        };
        let group_id = self.project.fresh_group_id();
        let afters = members
            .into_iter()
            .map(|mut e| {
                e.group_id = Some(group_id);
                e.group_offset = Some(Point::new(
                    e.position.x - bounds.x,
                    e.position.y - bounds.y,
                ));
                e
            })
            .collect();
        self.replace_elements(afters)
    }

    fn ungroup_selected(&mut self) -> bool {
        let Some(page) = self.current_page() else {
            return false;
        };
        let groups: Vec<GroupId> = page
            .elements
            .iter()
            .filter(|e| self.selected.contains(&e.id))
            .filter_map(|e| e.group_id)
            .collect();
        if groups.is_empty() {
            return false;
        }
        let afters = page
            .elements
            .iter()
            .filter(|e| e.group_id.is_some_and(|g| groups.contains(&g)))
            .map(|e| {
                let mut e = e.clone();
                e.clear_group();
                e
            })
            .collect();
        self.replace_elements(afters)
    }

    fn align_selected(&mut self, mode: AlignMode) -> bool {
        let members = self.selected_in_order();
        if members.len() < 2 {
            return false;
        }
        let rects: Vec<_> = members.iter().map(Element::bounds).collect();
        let targets = geometry::arrange(&rects, mode);
        let afters = members
            .into_iter()
            .zip(targets)
            .filter(|(e, _)| !e.locked)
            .map(|(mut e, target)| {
                e.position = target;
                e
            })
            .collect();
        self.replace_elements(afters)
    }

    // ─── Pages ───────────────────────────────────────────────────────────

    fn add_page(&mut self, name: Option<String>) -> bool {
        let id = self.project.fresh_page_id();
        let index = self.project.pages.len();
        let name = name.unwrap_or_else(|| format!("Page {}", index + 1));
        let page = Page::new(id, name, self.project.settings.default_page_size);
        self.execute(
            Change::AddPage {
                index,
                page: Box::new(page),
            },
            id,
            Selection::new(),
        )
    }

    fn delete_page(&mut self, id: PageId) -> bool {
        if self.project.pages.len() <= 1 {
            log::debug!("refusing to delete the only page");
            return false;
        }
        let Some(index) = self.project.page_index(id) else {
            return false;
        };
        let page = self.project.pages[index].clone();
        let (page_after, selection) = if id == self.current_page_id {
            let neighbor = if index > 0 { index - 1 } else { index + 1 };
            (self.project.pages[neighbor].id, Selection::new())
        } else {
            (self.current_page_id, self.selected.clone())
        };
        self.execute(
            Change::DeletePage {
                index,
                page: Box::new(page),
            },
            page_after,
            selection,
        )
    }

    fn duplicate_page(&mut self, id: PageId) -> bool {
        let Some(index) = self.project.page_index(id) else {
            return false;
        };
        let source = &self.project.pages[index];
        let mut copy = Page::new(
            self.project.fresh_page_id(),
            format!("{} (copy)", source.props.name),
            geometry::Size::new(source.props.width, source.props.height),
        );
        copy.props.background_color.clone_from(&source.props.background_color);
        copy.props.background_image.clone_from(&source.props.background_image);
        copy.elements = clone_elements(&self.project, &source.elements, 0.0);
        copy.reindex();

        let page_id = copy.id;
        self.execute(
            Change::AddPage {
                index: index + 1,
                page: Box::new(copy),
            },
            page_id,
            Selection::new(),
        )
    }

    fn update_page(&mut self, id: PageId, patch: &PagePatch) -> bool {
        let Some(page) = self.project.page(id) else {
            return false;
        };
        let before = page.props.clone();
        let mut after = before.clone();
        if !after.apply(patch) {
            return false;
        }
        let selection = self.selected.clone();
        self.execute(
            Change::UpdatePage {
                page_id: id,
                before,
                after,
            },
            self.current_page_id,
            selection,
        )
    }

    fn set_current_page(&mut self, id: PageId) -> bool {
        if id == self.current_page_id || self.project.page(id).is_none() {
            return false;
        }
        self.current_page_id = id;
        self.selected.clear();
        true
    }

    // ─── Project ─────────────────────────────────────────────────────────

    fn set_title(&mut self, title: String) -> bool {
        if title == self.project.title {
            return false;
        }
        let before = self.project.title.clone();
        let selection = self.selected.clone();
        self.execute(
            Change::UpdateTitle {
                before,
                after: title,
            },
            self.current_page_id,
            selection,
        )
    }

    fn update_settings(&mut self, patch: &SettingsPatch) -> bool {
        let changed = self.project.settings.apply(patch);
        if changed {
            self.project.touch();
        }
        changed
    }

    fn set_zoom(&mut self, zoom: f64) -> bool {
        let zoom = self.config.clamp_zoom(zoom);
        if zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        true
    }

    fn load_project(&mut self, project: Project) -> bool {
        if let Err(err) = project.validate() {
            log::debug!("rejecting project: {err}");
            return false;
        }
        let mut project = project;
        for page in &mut project.pages {
            page.reindex();
        }
        self.current_page_id = project.pages[0].id;
        self.project = project;
        self.selected.clear();
        self.clipboard.clear();
        self.history.clear();
        true
    }

    // ─── History ─────────────────────────────────────────────────────────

    fn undo(&mut self) -> bool {
        let Some(entry) = self.history.step_back() else {
            return false;
        };
        entry.change.revert(&mut self.project);
        log::trace!("undo {}", entry.change.label());
        self.focus(entry.page_before, &entry.selection_before);
        self.project.touch();
        true
    }

    fn redo(&mut self) -> bool {
        let Some(entry) = self.history.step_forward() else {
            return false;
        };
        entry.change.apply(&mut self.project);
        log::trace!("redo {}", entry.change.label());
        self.focus(entry.page_after, &entry.selection_after);
        self.project.touch();
        true
    }

    /// Move the focus after a history step, dropping anything that no
    /// longer exists on the target page.
    fn focus(&mut self, page_id: PageId, selection: &Selection) {
        self.current_page_id = if self.project.page(page_id).is_some() {
            page_id
        } else {
            self.project.pages[0].id
        };
        self.selected = match self.current_page() {
            Some(page) => selection
                .iter()
                .copied()
                .filter(|id| page.contains(*id))
                .collect(),
            None => Selection::new(),
        };
    }
}

#[derive(Debug, Clone, Copy)]
enum ZStep {
    Forward,
    Backward,
    Front,
    Back,
}

/// Copies of `sources` with fresh ids, shifted by `offset` on both axes.
/// Members of a source group end up in a new group of their own.
fn clone_elements(project: &Project, sources: &[Element], offset: f64) -> Vec<Element> {
    let mut groups: HashMap<GroupId, GroupId> = HashMap::new();
    let mut taken: Vec<ElementId> = Vec::with_capacity(sources.len());
    sources
        .iter()
        .map(|src| {
            let mut el = src.clone();
            el.id = loop {
                let id = project.fresh_element_id(src.kind);
                if !taken.contains(&id) {
                    break id;
                }
            };
            taken.push(el.id);
            el.position = el.position.offset(offset, offset);
            if let Some(group) = src.group_id {
                let fresh = *groups
                    .entry(group)
                    .or_insert_with(|| project.fresh_group_id());
                el.group_id = Some(fresh);
            }
            el
        })
        .collect()
}
