use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::config::{FormPayload, PipelineConfig, RequestTarget};
use crate::error::HttpError;

use super::types::RequestSpec;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Builds the request for a given sequence index.
pub trait RequestFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the request for `index` cannot be constructed;
    /// the generator logs it and skips the index.
    fn build(&self, index: u64) -> Result<RequestSpec, HttpError>;
}

/// Parses a target URL and rejects schemes the HTTP transport cannot serve.
///
/// # Errors
///
/// Returns an error for unparseable URLs and non-http(s) schemes.
pub fn parse_target_url(url: &str) -> Result<Url, HttpError> {
    let parsed = Url::parse(url).map_err(|err| HttpError::InvalidUrl {
        url: url.to_owned(),
        source: err,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(HttpError::UnsupportedScheme {
            url: url.to_owned(),
            scheme: other.to_owned(),
        }),
    }
}

/// Request factory driven by the run configuration: fixed method, URL and
/// headers plus an optional form body carrying the sequence index.
#[derive(Debug, Clone)]
pub struct TemplateRequestFactory {
    target: RequestTarget,
    payload: Option<FormPayload>,
    sequence_field: Option<String>,
}

impl TemplateRequestFactory {
    #[must_use]
    pub const fn new(
        target: RequestTarget,
        payload: Option<FormPayload>,
        sequence_field: Option<String>,
    ) -> Self {
        Self {
            target,
            payload,
            sequence_field,
        }
    }

    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.target.clone(),
            config.payload.clone(),
            config.sequence_field.clone(),
        )
    }
}

impl RequestFactory for TemplateRequestFactory {
    fn build(&self, index: u64) -> Result<RequestSpec, HttpError> {
        let url = parse_target_url(&self.target.url)?;
        let mut headers = build_headers(&self.target.headers)?;
        let body = self.payload.as_ref().map(|payload| {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
            }
            payload.encode_with_sequence(self.sequence_field.as_deref(), index)
        });

        Ok(RequestSpec {
            index,
            method: self.target.method,
            url,
            headers,
            body,
        })
    }
}

/// Converts `name: value` pairs into a header map.
///
/// # Errors
///
/// Returns an error for names or values that are not valid in HTTP.
pub fn build_headers(pairs: &[(String, String)]) -> Result<HeaderMap, HttpError> {
    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
            HttpError::InvalidHeaderName {
                header: key.clone(),
                source: err,
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|err| HttpError::InvalidHeaderValue {
            header: key.clone(),
            source: err,
        })?;
        headers.append(name, value);
    }
    Ok(headers)
}
