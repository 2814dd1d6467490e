use thiserror::Error;

/// Failure of a single round-trip. Never escalated past the worker pool.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to build request {index}: {source}")]
    BuildRequest {
        index: u64,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request {index} failed: {source}")]
    Request {
        index: u64,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to drain response body for request {index}: {source}")]
    DrainBody {
        index: u64,
        #[source]
        source: reqwest::Error,
    },
    #[cfg(test)]
    #[error("Stub transport failure for request {index}.")]
    Stub { index: u64 },
}
