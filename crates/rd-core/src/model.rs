//! Document model for RD projects.
//!
//! A `Project` owns an ordered list of `Page`s; each page owns an ordered
//! list of positioned `Element`s. Array order is z-order: the last element
//! paints on top. Every element carries a `z_index` that mirrors its array
//! position; `Page::reindex` restores that after any structural change.

use crate::config::ElementDefaults;
use crate::error::ProjectError;
use crate::geometry::{Point, Rect, Size};
use crate::id::{ElementId, GroupId, PageId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ─── Element kinds ───────────────────────────────────────────────────────

/// The fixed set of element types the editor can place on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Text,
    Heading,
    Rectangle,
    Circle,
    Triangle,
    Star,
    Line,
    ArrowRight,
    ArrowLeft,
    ArrowUp,
    ArrowDown,
    Image,
    Icon,
}

impl ElementKind {
    /// Prefix used for generated ids (`heading_12`).
    pub fn prefix(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Heading => "heading",
            ElementKind::Rectangle => "rectangle",
            ElementKind::Circle => "circle",
            ElementKind::Triangle => "triangle",
            ElementKind::Star => "star",
            ElementKind::Line => "line",
            ElementKind::ArrowRight
            | ElementKind::ArrowLeft
            | ElementKind::ArrowUp
            | ElementKind::ArrowDown => "arrow",
            ElementKind::Image => "image",
            ElementKind::Icon => "icon",
        }
    }

    /// Placeholder content for a freshly added element.
    fn default_content(self) -> Option<String> {
        match self {
            ElementKind::Text => Some("Text".into()),
            ElementKind::Heading => Some("Heading".into()),
            _ => None,
        }
    }

    fn default_style(self) -> ElementStyle {
        match self {
            ElementKind::Text => ElementStyle {
                font_size: Some(14.0),
                color: Some("#111827".into()),
                ..Default::default()
            },
            ElementKind::Heading => ElementStyle {
                font_size: Some(24.0),
                font_weight: Some(700),
                color: Some("#111827".into()),
                ..Default::default()
            },
            ElementKind::Line
            | ElementKind::ArrowRight
            | ElementKind::ArrowLeft
            | ElementKind::ArrowUp
            | ElementKind::ArrowDown => ElementStyle {
                stroke: Some("#111827".into()),
                stroke_width: Some(2.0),
                ..Default::default()
            },
            ElementKind::Image | ElementKind::Icon => ElementStyle::default(),
            ElementKind::Rectangle
            | ElementKind::Circle
            | ElementKind::Triangle
            | ElementKind::Star => ElementStyle {
                fill: Some("#3B82F6".into()),
                ..Default::default()
            },
        }
    }
}

// ─── Styling ─────────────────────────────────────────────────────────────

/// Horizontal text alignment inside a text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Type-specific styling. Unset fields fall back to the renderer's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

impl ElementStyle {
    /// Overlay every field that is set in `src`. Non-finite numbers are
    /// skipped.
    pub fn merge(&mut self, src: &ElementStyle) {
        if src.fill.is_some() {
            self.fill.clone_from(&src.fill);
        }
        if src.stroke.is_some() {
            self.stroke.clone_from(&src.stroke);
        }
        if let Some(v) = src.stroke_width.filter(|v| v.is_finite()) {
            self.stroke_width = Some(v);
        }
        if let Some(v) = src.border_radius.filter(|v| v.is_finite()) {
            self.border_radius = Some(v);
        }
        if src.font_family.is_some() {
            self.font_family.clone_from(&src.font_family);
        }
        if let Some(v) = src.font_size.filter(|v| v.is_finite()) {
            self.font_size = Some(v);
        }
        if src.font_weight.is_some() {
            self.font_weight = src.font_weight;
        }
        if src.color.is_some() {
            self.color.clone_from(&src.color);
        }
        if src.text_align.is_some() {
            self.text_align = src.text_align;
        }
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

/// A positioned element on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub position: Point,
    pub size: Size,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub z_index: usize,

    /// Text for text/heading, source URL for images, icon name for icons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub style: ElementStyle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Offset from the group's bounding-box top-left when grouped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_offset: Option<Point>,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

impl Element {
    /// A new element with the kind's placeholder content and styling.
    pub fn new(id: ElementId, kind: ElementKind, defaults: &ElementDefaults) -> Self {
        Self {
            id,
            kind,
            position: defaults.position,
            size: defaults.size,
            rotation: 0.0,
            opacity: 1.0,
            locked: false,
            visible: true,
            z_index: 0,
            content: kind.default_content(),
            style: kind.default_style(),
            group_id: None,
            group_offset: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    /// Apply a sparse update. Returns `true` if any field changed.
    ///
    /// Non-finite numbers are ignored so they never reach the document.
    pub fn apply(&mut self, patch: &ElementPatch) -> bool {
        let before = self.clone();
        if let Some(position) = patch.position
            && position.x.is_finite()
            && position.y.is_finite()
        {
            self.position = position;
        }
        if let Some(size) = patch.size
            && size.width.is_finite()
            && size.height.is_finite()
        {
            self.size = size;
        }
        if let Some(rotation) = patch.rotation.filter(|r| r.is_finite()) {
            self.rotation = rotation;
        }
        if let Some(opacity) = patch.opacity.filter(|o| o.is_finite()) {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(locked) = patch.locked {
            self.locked = locked;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(content) = &patch.content {
            self.content = Some(content.clone());
        }
        if let Some(style) = &patch.style {
            self.style.merge(style);
        }
        *self != before
    }

    /// Detach from any group.
    pub fn clear_group(&mut self) {
        self.group_id = None;
        self.group_offset = None;
    }
}

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ElementStyle>,
}

impl ElementPatch {
    pub fn moved_to(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ─── Page ────────────────────────────────────────────────────────────────

/// A4 portrait, in millimetres.
pub const A4: Size = Size::new(210.0, 297.0);

/// Page metadata that can be edited independently of its elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProps {
    pub name: String,
    /// Width in millimetres.
    pub width: f64,
    /// Height in millimetres.
    pub height: f64,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

fn default_background() -> String {
    "#FFFFFF".into()
}

impl PageProps {
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            name: name.into(),
            width: size.width,
            height: size.height,
            background_color: default_background(),
            background_image: None,
        }
    }

    /// Apply a sparse update. Returns `true` if anything changed.
    pub fn apply(&mut self, patch: &PagePatch) -> bool {
        let before = self.clone();
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(color) = &patch.background_color {
            self.background_color.clone_from(color);
        }
        if let Some(image) = &patch.background_image {
            // An empty string clears the image.
            self.background_image = (!image.is_empty()).then(|| image.clone());
        }
        *self != before
    }
}

/// Sparse update for page metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagePatch {
    pub name: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub background_color: Option<String>,
    pub background_image: Option<String>,
}

/// A single page: metadata plus its elements in z-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    #[serde(flatten)]
    pub props: PageProps,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Page {
    pub fn new(id: PageId, name: impl Into<String>, size: Size) -> Self {
        Self {
            id,
            props: PageProps::new(name, size),
            elements: Vec::new(),
        }
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Re-stamp `z_index` from array order.
    pub fn reindex(&mut self) {
        for (i, el) in self.elements.iter_mut().enumerate() {
            el.z_index = i;
        }
    }

    /// Insert at `index` (clamped to the end) and re-stamp z-order.
    pub fn insert_element(&mut self, index: usize, element: Element) {
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
        self.reindex();
    }

    pub fn push_element(&mut self, element: Element) {
        self.insert_element(self.elements.len(), element);
    }

    /// Remove by id, returning the former index and the element.
    pub fn remove_element(&mut self, id: ElementId) -> Option<(usize, Element)> {
        let index = self.index_of(id)?;
        let element = self.elements.remove(index);
        self.reindex();
        Some((index, element))
    }

    /// Move the element at `from` to `to`, shifting the ones in between.
    /// Returns `false` when either index is out of range or they are equal.
    pub fn move_element(&mut self, from: usize, to: usize) -> bool {
        let len = self.elements.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let element = self.elements.remove(from);
        self.elements.insert(to, element);
        self.reindex();
        true
    }
}

// ─── Settings ────────────────────────────────────────────────────────────

/// Per-project editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub show_grid: bool,
    pub snap_to_grid: bool,
    /// Grid pitch in millimetres.
    pub grid_size: f64,
    pub default_page_size: Size,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_grid: false,
            snap_to_grid: false,
            grid_size: 5.0,
            default_page_size: A4,
        }
    }
}

/// Sparse update for settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub show_grid: Option<bool>,
    pub snap_to_grid: Option<bool>,
    pub grid_size: Option<f64>,
    pub default_page_size: Option<Size>,
}

impl Settings {
    pub fn apply(&mut self, patch: &SettingsPatch) -> bool {
        let before = self.clone();
        if let Some(v) = patch.show_grid {
            self.show_grid = v;
        }
        if let Some(v) = patch.snap_to_grid {
            self.snap_to_grid = v;
        }
        if let Some(v) = patch.grid_size {
            self.grid_size = v.max(0.0);
        }
        if let Some(v) = patch.default_page_size {
            self.default_page_size = v;
        }
        *self != before
    }
}

// ─── Project ─────────────────────────────────────────────────────────────

/// One resume document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    pub pages: Vec<Page>,
    #[serde(default)]
    pub settings: Settings,
}

impl Project {
    /// A new project with a single empty page.
    pub fn new(title: impl Into<String>) -> Self {
        let settings = Settings::default();
        let now = Utc::now();
        let first = Page::new(
            PageId::with_prefix("page"),
            "Page 1",
            settings.default_page_size,
        );
        Self {
            id: ProjectId::with_prefix("project"),
            title: title.into(),
            created_at: now,
            updated_at: now,
            pages: vec![first],
            settings,
        }
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    pub fn page_index(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    /// The page holding an element, if any.
    pub fn page_of(&self, id: ElementId) -> Option<PageId> {
        self.pages.iter().find(|p| p.contains(id)).map(|p| p.id)
    }

    pub fn contains_element(&self, id: ElementId) -> bool {
        self.page_of(id).is_some()
    }

    /// A generated element id not yet used anywhere in the project.
    pub fn fresh_element_id(&self, kind: ElementKind) -> ElementId {
        loop {
            let id = ElementId::with_prefix(kind.prefix());
            if !self.contains_element(id) {
                return id;
            }
        }
    }

    pub fn fresh_page_id(&self) -> PageId {
        loop {
            let id = PageId::with_prefix("page");
            if self.page(id).is_none() {
                return id;
            }
        }
    }

    /// A generated group id not yet stamped on any element.
    pub fn fresh_group_id(&self) -> GroupId {
        loop {
            let id = GroupId::with_prefix("group");
            let used = self
                .pages
                .iter()
                .flat_map(|p| &p.elements)
                .any(|e| e.group_id == Some(id));
            if !used {
                return id;
            }
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Check structural invariants of a loaded project.
    ///
    /// # Errors
    /// Returns the first violation found: no pages, a repeated page id, or
    /// an element id that appears more than once across the project.
    pub fn validate(&self) -> Result<(), ProjectError> {
        if self.pages.is_empty() {
            return Err(ProjectError::NoPages);
        }
        let mut page_ids = HashSet::new();
        let mut element_ids = HashSet::new();
        for page in &self.pages {
            if !page_ids.insert(page.id) {
                return Err(ProjectError::DuplicatePage(page.id));
            }
            for el in &page.elements {
                if !element_ids.insert(el.id) {
                    return Err(ProjectError::DuplicateElement(el.id));
                }
            }
        }
        Ok(())
    }

    /// Parse and validate a project from its JSON form. Element z-indices
    /// are re-stamped from array order.
    ///
    /// # Errors
    /// Returns `ProjectError::Json` for malformed input or any
    /// `validate` failure.
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let mut project: Project = serde_json::from_str(json)?;
        project.validate()?;
        for page in &mut project.pages {
            page.reindex();
        }
        log::debug!(
            "loaded project {} ({} pages)",
            project.id,
            project.pages.len()
        );
        Ok(project)
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    /// Only fails if serialization itself fails, which the model's types
    /// never trigger in practice.
    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string(self)?)
    }
}
