//! Error types for the editor

use crate::mutations::MutationError;
use funnel_document::{DocumentError, ElementId};
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Cannot select {0}: no such element")]
    UnknownSelection(ElementId),

    #[error("Document is already loaded for this session")]
    AlreadyLoaded,

    #[error("Document is read-only in live mode")]
    ReadOnly,

    #[error("Invalid editor config: {0}")]
    Config(#[source] serde_json::Error),
}
