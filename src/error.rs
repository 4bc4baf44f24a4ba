use thiserror::Error;

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Lookup errors ───────────────────────────────────────────────────────────

/// Failure of an upstream lookup. "Nothing found" is not an error: lookups
/// return `Ok(None)` for a well-formed query with zero results.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{service} returned {status}: {message}")]
    UpstreamStatus {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    #[error("{service} response could not be decoded: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

impl LookupError {
    /// Upstream HTTP status carried by this error, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::UpstreamStatus { status, .. } => Some(*status),
            Self::InvalidInput(_) | Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }
}

// ─── Retrieval errors ────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("empty query text")]
    EmptyQuery,

    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("embedding has {actual} dimensions, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("vector query failed: {0}")]
    Query(String),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} authentication failed")]
    Auth { provider: String },

    #[error("streaming error: {0}")]
    Streaming(String),
}

// ─── Prompt / Template errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("template render failed: {0}")]
    Render(String),

    #[error("template not found: {0}")]
    NotFound(String),
}

// ─── Chat turn errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("conversation has no user message")]
    NoUserMessage,

    #[error("latest user message is empty")]
    EmptyUserMessage,

    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("prompt assembly failed: {0}")]
    Prompt(#[from] PromptError),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("turn exceeded {0}s deadline")]
    Timeout(u64),
}

impl ChatError {
    /// Whether the error was caused by the caller's input rather than a
    /// failing upstream.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::NoUserMessage | Self::EmptyUserMessage | Self::Retrieval(RetrievalError::EmptyQuery)
        )
    }
}
