use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("Channel closed")]
    ChannelClosed,
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
