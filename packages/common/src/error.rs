use thiserror::Error;

/// Common error type shared by the blockforge crates
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Field path error: {0}")]
    FieldPath(#[from] FieldPathError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),
}

/// Malformed or unusable settings field path.
///
/// These are programmer errors: the editing surface produced an address
/// that can never resolve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldPathError {
    #[error("Field path is empty")]
    Empty,

    #[error("Empty segment in field path: {0}")]
    EmptySegment(String),

    #[error("Unclosed bracket in field path: {0}")]
    UnclosedBracket(String),

    #[error("Invalid index `{index}` in field path: {path}")]
    InvalidIndex { path: String, index: String },

    #[error("Index {index} is past the end of `{path}` (length {len})")]
    IndexOutOfRange { path: String, index: usize, len: usize },

    #[error("Cannot descend into non-container value at `{0}`")]
    NotAContainer(String),
}
