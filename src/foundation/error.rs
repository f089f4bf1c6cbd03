pub type MemeResult<T> = Result<T, MemeError>;

/// Error taxonomy shared by the engine, the storage adapters and the orchestrator.
///
/// A cache miss is not represented here: lookups report it as
/// [`Lookup::Missing`](crate::Lookup::Missing).
#[derive(thiserror::Error, Debug)]
pub enum MemeError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("source not found: {0}")]
    SourceNotFound(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("generation failed: {0}")]
    GenerationFailed(#[source] Box<MemeError>),

    #[error("persist failed: {0}")]
    PersistFailed(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemeError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn source_not_found(name: impl Into<String>) -> Self {
        Self::SourceNotFound(name.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn generation_failed(cause: MemeError) -> Self {
        Self::GenerationFailed(Box::new(cause))
    }

    pub fn persist_failed(msg: impl Into<String>) -> Self {
        Self::PersistFailed(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Transport status a routing layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::SourceNotFound(_) => 404,
            Self::Decode(_) => 422,
            Self::Encode(_)
            | Self::GenerationFailed(_)
            | Self::PersistFailed(_)
            | Self::Storage(_)
            | Self::Font(_)
            | Self::Config(_)
            | Self::Other(_) => 500,
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Encode(_) | Self::GenerationFailed(_) | Self::PersistFailed(_) | Self::Storage(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
