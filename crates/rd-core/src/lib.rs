pub mod config;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;

pub use config::{EditorConfig, ElementDefaults};
pub use error::ProjectError;
pub use geometry::{AlignMode, Point, Rect, Size};
pub use id::{ElementId, GroupId, PageId, ProjectId};
pub use model::*;
