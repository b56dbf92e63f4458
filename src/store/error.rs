use thiserror::Error;

/// Why a candidate fetch produced no list. Stored in snapshots, so it stays `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("network error: {code} {status_text}")]
    Status { code: u16, status_text: String },

    #[error("malformed response body: {0}")]
    Decode(String),

    #[error("fetch worker stopped before delivering a result")]
    WorkerLost,
}
