use crate::element::{ElementId, ElementKind};
use thiserror::Error;

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Malformed page content: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Page content has no __body root")]
    MissingBody,

    #[error("Page content has {0} roots, expected exactly one")]
    MultipleRoots(usize),

    #[error("Element id {0} appears more than once")]
    DuplicateId(ElementId),

    #[error("Element of type {0} has an empty id")]
    EmptyId(ElementKind),

    #[error("__body element {0} is not the root")]
    UnexpectedBody(ElementId),

    #[error("Two-column element {id} must own exactly 2 column containers, found {found}")]
    InvalidColumns { id: ElementId, found: usize },

    #[error("Element {id} of type {kind} has the wrong content shape")]
    ContentMismatch { id: ElementId, kind: ElementKind },
}

impl DocumentError {
    pub fn content_mismatch(id: &ElementId, kind: ElementKind) -> Self {
        Self::ContentMismatch {
            id: id.clone(),
            kind,
        }
    }

    pub fn invalid_columns(id: &ElementId, found: usize) -> Self {
        Self::InvalidColumns {
            id: id.clone(),
            found,
        }
    }
}
