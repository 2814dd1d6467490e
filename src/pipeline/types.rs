use reqwest::header::HeaderMap;
use url::Url;

use crate::args::HttpMethod;
use crate::error::TransportError;

/// One unit of work. `index` only orders log lines; it never affects results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub index: u64,
    pub method: HttpMethod,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Outcome of one round-trip, handed from an executor to the aggregator.
#[derive(Debug)]
pub enum ResultDescriptor {
    Success { index: u64, byte_length: u64 },
    Failure { index: u64, error: TransportError },
}
