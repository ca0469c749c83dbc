use crate::id::{ElementId, PageId};
use thiserror::Error;

/// Reasons a project cannot be loaded into an editor session.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("project has no pages")]
    NoPages,
    #[error("page id `{0}` is used more than once")]
    DuplicatePage(PageId),
    #[error("element id `{0}` is used more than once")]
    DuplicateElement(ElementId),
    #[error("invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),
}
