use thiserror::Error;

/// Message shown to callers for failures they cannot fix themselves.
pub const GENERIC_FAILURE: &str = "Oh no! Something has gone wrong.";

#[derive(Error, Debug)]
pub enum GraphError {
    /// No matching series, no seasons, or a season with no episode rows.
    #[error("{0}")]
    NotFound(String),

    /// Network failure or markup the adapter could not make sense of.
    #[error("Catalog unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Render error: {0}")]
    Render(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    UpstreamUnavailable,
    Render,
}

impl GraphError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(message.into())
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,
            Self::Render(_) => ErrorKind::Render,
        }
    }

    /// Text that is safe to show to the person who asked for the chart.
    ///
    /// `NotFound` is user-correctable and surfaced verbatim; everything else
    /// collapses to [`GENERIC_FAILURE`].
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(msg) => msg.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        Self::UpstreamUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
