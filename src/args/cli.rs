use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_form_field, parse_header, parse_positive_usize};
use super::types::{HttpMethod, OutputFormat, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Fixed-count async HTTP load generator: N requests, W workers, one aggregate report."
)]
pub struct PipelineArgs {
    /// Target URL for every request
    #[arg(long, short = 'u', help_heading = "Common Options")]
    pub url: Option<String>,

    /// HTTP method (defaults to post when a form body is configured, get otherwise)
    #[arg(long, short = 'X', value_enum, ignore_case = true)]
    pub method: Option<HttpMethod>,

    /// Total number of requests to issue
    #[arg(
        long,
        short = 'n',
        alias = "reqs",
        default_value = "60",
        help_heading = "Common Options"
    )]
    pub requests: u64,

    /// Number of concurrent workers (must be >= 1)
    #[arg(
        long = "concurrent",
        short = 'c',
        alias = "concurrency",
        default_value = "31",
        value_parser = parse_positive_usize,
        help_heading = "Common Options"
    )]
    pub concurrency: PositiveUsize,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// JSON object file whose scalar fields become the form-encoded body
    #[arg(long)]
    pub payload: Option<String>,

    /// Extra form field in 'key=value' format (repeatable, overrides payload fields)
    #[arg(long = "form", value_parser = parse_form_field)]
    pub form: Vec<(String, String)>,

    /// Form field set to the request's sequence index on every request
    #[arg(long = "sequence-field")]
    pub sequence_field: Option<String>,

    /// Cancel the run after this long (supports ms/s/m/h)
    #[arg(long, value_parser = parse_duration_arg)]
    pub deadline: Option<Duration>,

    /// Report format printed to stdout
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Do not send a User-Agent header
    #[arg(long = "no-ua")]
    pub no_ua: bool,

    /// Open a fresh connection for every request
    #[arg(long = "disable-keepalive")]
    pub disable_keepalive: bool,

    /// Max idle connections per host kept in the shared pool
    #[arg(long = "pool-max-idle-per-host", value_parser = parse_positive_usize)]
    pub pool_max_idle_per_host: Option<PositiveUsize>,

    /// Accept invalid TLS certificates and hostnames
    #[arg(long)]
    pub insecure: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by PIPELOAD_LOG/RUST_LOG)
    #[arg(long, short = 'v', help_heading = "Common Options")]
    pub verbose: bool,

    /// Path to config file (TOML/JSON). Defaults to ./pipeload.toml or ./pipeload.json if present.
    #[arg(long, help_heading = "Common Options")]
    pub config: Option<String>,
}
