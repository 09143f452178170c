//! Error types for wallabag-client.

use thiserror::Error;

/// All errors that can arise from talking to a wallabag server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No access token configured.
    #[error("no access token configured")]
    MissingToken,

    /// Server answered with a non-success status code.
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// Connection, DNS, TLS, or timeout failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// Export body exceeded the configured size limit.
    #[error("response from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: u64 },

    /// Response body could not be read or decoded.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    pub(crate) fn from_ureq(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => ClientError::Status {
                status,
                url: url.to_string(),
            },
            ureq::Error::Transport(t) => ClientError::Transport {
                url: url.to_string(),
                source: Box::new(t),
            },
        }
    }
}
