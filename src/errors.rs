use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnergiekompasError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] anyhow::Error),
    #[error("Error while writing results: {0}")]
    FailureInOutput(#[from] OutputError),
}

/// An error raised while writing results to an output sink.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct OutputError {
    error: anyhow::Error,
}

impl OutputError {
    pub(crate) fn new(error: anyhow::Error) -> Self {
        Self { error }
    }
}
