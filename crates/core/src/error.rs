use hai_types::TextError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid upload: {0}")]
    InvalidUpload(#[from] UploadError),
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Reasons an uploaded file cannot be read as a medicine name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("uploaded file is not valid UTF-8 text")]
    NotUtf8,
    #[error("uploaded file contains no text")]
    Empty,
    #[error("uploaded text is too long to be a medicine name ({len} characters, limit {limit})")]
    TooLong { limit: usize, len: usize },
}

impl From<TextError> for UploadError {
    fn from(err: TextError) -> Self {
        match err {
            TextError::Empty => UploadError::Empty,
            TextError::TooLong { limit, len } => UploadError::TooLong { limit, len },
        }
    }
}

/// Failures talking to the hosted chat-completion API.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("inference API key is not configured")]
    NotConfigured,
    #[error("inference request timed out after {0}s")]
    Timeout(u64),
    #[error("inference API rejected the credentials (status {0})")]
    Unauthorized(u16),
    #[error("inference API rate limit reached")]
    RateLimited,
    #[error("inference API returned status {status}")]
    Upstream { status: u16, body: String },
    #[error("failed to reach inference API: {0}")]
    Transport(reqwest::Error),
    #[error("malformed inference response: {0}")]
    MalformedResponse(String),
}

impl InferenceError {
    /// Whether the same request could plausibly succeed later.
    pub fn is_transient(&self) -> bool {
        match self {
            InferenceError::Timeout(_)
            | InferenceError::RateLimited
            | InferenceError::Transport(_) => true,
            InferenceError::Upstream { status, .. } => *status >= 500,
            InferenceError::NotConfigured
            | InferenceError::Unauthorized(_)
            | InferenceError::MalformedResponse(_) => false,
        }
    }
}

pub type InferenceResult<T> = std::result::Result<T, InferenceError>;
