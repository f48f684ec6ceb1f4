use thiserror::Error;

pub type ShellResult<T> = Result<T, ShellError>;

/// Fault reported by the native engine.
///
/// The engine is opaque; all we get back is a message.
#[derive(Debug, Clone, Error)]
#[error("native engine: {0}")]
pub struct NativeError(pub String);

impl NativeError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum ShellError {
    /// Engine construction failed. There is no recovery from this one.
    #[error("engine construction failed: {0}")]
    EngineCreate(#[source] NativeError),

    #[error("config error: {0}")]
    Config(String),

    #[error("preferences error: {0}")]
    Prefs(String),

    #[error("invalid server address {0:?}")]
    InvalidAddress(String),

    #[error("launch config already committed for this session")]
    AlreadyCommitted,

    #[error("no launch prompt is pending")]
    NoPromptPending,
}
