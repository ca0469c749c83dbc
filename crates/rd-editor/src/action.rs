//! Editor actions dispatched by the host UI.
//!
//! On the wire an action is `{"type": "<camelCaseName>", "payload": {...}}`;
//! unit actions may omit the payload.

use rd_core::geometry::{AlignMode, Point};
use rd_core::id::{ElementId, GroupId, PageId};
use rd_core::model::{ElementKind, ElementPatch, PagePatch, Project, SettingsPatch};
use serde::{Deserialize, Serialize};

/// One element's share of a batch update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementUpdate {
    pub id: ElementId,
    pub updates: ElementPatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    // ── Elements ──
    AddElement {
        #[serde(rename = "type")]
        kind: ElementKind,
        #[serde(default)]
        patch: ElementPatch,
    },
    UpdateElement {
        id: ElementId,
        updates: ElementPatch,
    },
    UpdateMultipleElements {
        updates: Vec<ElementUpdate>,
    },
    DeleteElement {
        id: ElementId,
    },
    DeleteSelected,
    MoveSelected {
        dx: f64,
        dy: f64,
    },
    MoveGroup {
        group_id: GroupId,
        position: Point,
    },
    LockElement {
        id: ElementId,
        locked: bool,
    },

    // ── Selection ──
    SelectElement {
        id: ElementId,
        #[serde(default)]
        multi: bool,
    },
    SelectAll,
    ClearSelection,

    // ── Clipboard ──
    Copy,
    Cut,
    Paste,
    Duplicate,

    // ── Z-order ──
    BringForward {
        id: ElementId,
    },
    SendBackward {
        id: ElementId,
    },
    BringToFront {
        id: ElementId,
    },
    SendToBack {
        id: ElementId,
    },

    // ── Grouping & alignment ──
    GroupElements,
    UngroupElements,
    AlignElements {
        mode: AlignMode,
    },

    // ── Pages ──
    AddPage {
        #[serde(default)]
        name: Option<String>,
    },
    DeletePage {
        id: PageId,
    },
    DuplicatePage {
        id: PageId,
    },
    UpdatePage {
        id: PageId,
        patch: PagePatch,
    },
    SetCurrentPage {
        id: PageId,
    },

    // ── Project ──
    SetTitle {
        title: String,
    },
    UpdateSettings {
        patch: SettingsPatch,
    },
    SetZoom {
        zoom: f64,
    },
    LoadProject {
        project: Box<Project>,
    },

    // ── History ──
    Undo,
    Redo,
}

impl Action {
    /// Action name as it appears on the wire, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddElement { .. } => "addElement",
            Action::UpdateElement { .. } => "updateElement",
            Action::UpdateMultipleElements { .. } => "updateMultipleElements",
            Action::DeleteElement { .. } => "deleteElement",
            Action::DeleteSelected => "deleteSelected",
            Action::MoveSelected { .. } => "moveSelected",
            Action::MoveGroup { .. } => "moveGroup",
            Action::LockElement { .. } => "lockElement",
            Action::SelectElement { .. } => "selectElement",
            Action::SelectAll => "selectAll",
            Action::ClearSelection => "clearSelection",
            Action::Copy => "copy",
            Action::Cut => "cut",
            Action::Paste => "paste",
            Action::Duplicate => "duplicate",
            Action::BringForward { .. } => "bringForward",
            Action::SendBackward { .. } => "sendBackward",
            Action::BringToFront { .. } => "bringToFront",
            Action::SendToBack { .. } => "sendToBack",
            Action::GroupElements => "groupElements",
            Action::UngroupElements => "ungroupElements",
            Action::AlignElements { .. } => "alignElements",
            Action::AddPage { .. } => "addPage",
            Action::DeletePage { .. } => "deletePage",
            Action::DuplicatePage { .. } => "duplicatePage",
            Action::UpdatePage { .. } => "updatePage",
            Action::SetCurrentPage { .. } => "setCurrentPage",
            Action::SetTitle { .. } => "setTitle",
            Action::UpdateSettings { .. } => "updateSettings",
            Action::SetZoom { .. } => "setZoom",
            Action::LoadProject { .. } => "loadProject",
            Action::Undo => "undo",
            Action::Redo => "redo",
        }
    }
}
