//! Round-trip seam between the worker pool and the network.
mod http;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::pipeline::RequestSpec;

pub use http::{HttpTransport, TransportConfig};

/// Performs round-trips for the worker pool. One instance is shared by every
/// executor, so implementations must tolerate concurrent calls without
/// external locking.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes one request and returns the response's declared length.
    ///
    /// # Errors
    ///
    /// Returns an error for transport-level failures only; any HTTP status
    /// counts as a completed round-trip.
    async fn round_trip(&self, request: &RequestSpec) -> Result<u64, TransportError>;
}
