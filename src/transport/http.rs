use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::debug;

use crate::args::{DEFAULT_USER_AGENT, PipelineArgs, PositiveUsize};
use crate::error::{HttpError, TransportError};
use crate::pipeline::RequestSpec;

use super::Transport;

/// Client options for the shared connection pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportConfig {
    pub no_user_agent: bool,
    pub disable_keepalive: bool,
    pub pool_max_idle_per_host: Option<PositiveUsize>,
    pub insecure: bool,
}

impl TransportConfig {
    #[must_use]
    pub const fn from_args(args: &PipelineArgs) -> Self {
        Self {
            no_user_agent: args.no_ua,
            disable_keepalive: args.disable_keepalive,
            pool_max_idle_per_host: args.pool_max_idle_per_host,
            insecure: args.insecure,
        }
    }
}

/// `reqwest`-backed transport. The client's pool provides connection reuse
/// across all executors; it applies no request timeouts.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: &TransportConfig) -> Result<Self, HttpError> {
        let mut client_builder = Client::builder();

        if !config.no_user_agent {
            client_builder = client_builder.user_agent(DEFAULT_USER_AGENT);
        }

        if config.disable_keepalive {
            client_builder = client_builder
                .pool_max_idle_per_host(0)
                .pool_idle_timeout(Some(Duration::from_secs(0)));
        } else if let Some(max_idle) = config.pool_max_idle_per_host {
            client_builder = client_builder.pool_max_idle_per_host(max_idle.get());
        }

        if config.insecure {
            client_builder = client_builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }

        let client = client_builder
            .build()
            .map_err(|err| HttpError::BuildClientFailed { source: err })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn round_trip(&self, request: &RequestSpec) -> Result<u64, TransportError> {
        let index = request.index;
        let mut builder = self
            .client
            .request(request.method.into(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = request.body.as_ref() {
            builder = builder.body(body.clone());
        }
        let built = builder
            .build()
            .map_err(|err| TransportError::BuildRequest { index, source: err })?;

        let response = self
            .client
            .execute(built)
            .await
            .map_err(|err| TransportError::Request { index, source: err })?;
        debug!("Request {} answered with status {}", index, response.status());

        let declared = response.content_length();
        let drained = drain_response_body(response)
            .await
            .map_err(|err| TransportError::DrainBody { index, source: err })?;
        Ok(declared.unwrap_or(drained))
    }
}

/// Reads the body to the end so the connection can go back to the pool.
async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
