//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Field path error: {0}")]
    FieldPath(#[from] blockforge_common::FieldPathError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
