use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::args::{HttpMethod, OutputFormat, parse_duration_arg};
use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    #[serde(alias = "reqs")]
    pub requests: Option<u64>,
    #[serde(alias = "concurrent")]
    pub concurrency: Option<usize>,
    pub headers: Option<Vec<String>>,
    pub payload: Option<String>,
    pub form: Option<BTreeMap<String, String>>,
    pub sequence_field: Option<String>,
    pub deadline: Option<DurationValue>,
    pub output_format: Option<OutputFormat>,
    pub no_ua: Option<bool>,
    pub disable_keepalive: Option<bool>,
    pub pool_max_idle_per_host: Option<usize>,
    pub insecure: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
