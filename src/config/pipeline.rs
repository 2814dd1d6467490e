use std::path::Path;
use std::time::Duration;

use crate::args::{HttpMethod, PipelineArgs, PositiveUsize};
use crate::error::{AppError, AppResult, ValidationError};
use crate::pipeline::{build_headers, parse_target_url};

use super::payload::{FormPayload, load_payload};

/// Method, URL and headers shared by every request of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// Immutable run configuration handed to every pipeline stage.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Target number of requests (N). Zero is allowed.
    pub requests: u64,
    /// Worker executors (W).
    pub concurrency: PositiveUsize,
    pub target: RequestTarget,
    /// Form body template; `None` means bodiless requests.
    pub payload: Option<FormPayload>,
    /// Form field overwritten with the sequence index on each request.
    pub sequence_field: Option<String>,
    /// Cancels the run once elapsed. `None` runs until N results arrive.
    pub deadline: Option<Duration>,
}

impl PipelineConfig {
    /// Freezes CLI/config values into a pipeline configuration, loading the
    /// payload template from disk when one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is missing or unusable, a header is not
    /// valid HTTP, the payload file
    /// cannot be loaded, or a form body is combined with GET.
    pub fn from_args(args: &PipelineArgs) -> AppResult<Self> {
        let url = args
            .url
            .clone()
            .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
        parse_target_url(&url).map_err(AppError::http)?;
        build_headers(&args.headers).map_err(AppError::http)?;

        let mut payload = match args.payload.as_deref() {
            Some(path) => Some(load_payload(Path::new(path))?),
            None => None,
        };
        if !args.form.is_empty() || args.sequence_field.is_some() {
            let fields = payload.get_or_insert_with(FormPayload::default);
            for (key, value) in &args.form {
                fields.set(key.clone(), value.clone());
            }
        }

        let method = args.method.unwrap_or(if payload.is_some() {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        });
        if method == HttpMethod::Get && payload.is_some() {
            return Err(AppError::validation(ValidationError::BodyWithGet));
        }

        Ok(Self {
            requests: args.requests,
            concurrency: args.concurrency,
            target: RequestTarget {
                method,
                url,
                headers: args.headers.clone(),
            },
            payload,
            sequence_field: args.sequence_field.clone(),
            deadline: args.deadline,
        })
    }
}
