use thiserror::Error;

/// Coarse classification of a [`FetchError`], for callers that branch on the failure
/// rather than print it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TrustAnchor,
    Client,
    Transport,
    Status,
    Parse,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::TrustAnchor => write!(f, "TrustAnchor"),
            ErrorKind::Client => write!(f, "Client"),
            ErrorKind::Transport => write!(f, "Transport"),
            ErrorKind::Status => write!(f, "Status"),
            ErrorKind::Parse => write!(f, "Parse"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid trust anchor: {message}")]
    TrustAnchor { message: String },

    #[error("Failed to build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Unexpected response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response from {url} is not valid UTF-8: {source}")]
    Encoding {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::TrustAnchor { .. } => ErrorKind::TrustAnchor,
            FetchError::Client { .. } => ErrorKind::Client,
            FetchError::Transport { .. } => ErrorKind::Transport,
            FetchError::Status { .. } => ErrorKind::Status,
            FetchError::Parse { .. } | FetchError::Encoding { .. } => ErrorKind::Parse,
        }
    }

    pub(crate) fn trust_anchor(message: impl Into<String>) -> Self {
        FetchError::TrustAnchor {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
