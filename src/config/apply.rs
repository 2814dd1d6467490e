use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PipelineArgs, PositiveUsize, parse_header};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments. Values given on the command
/// line always win.
///
/// # Errors
///
/// Returns an error when config values are invalid.
pub fn apply_config(
    args: &mut PipelineArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "method")
        && let Some(method) = config.method
    {
        args.method = Some(method);
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = requests;
    }

    if !is_cli(matches, "concurrency")
        && let Some(concurrency) = config.concurrency
    {
        args.concurrency = ensure_positive_usize(concurrency, "concurrency")?;
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        let mut parsed = Vec::with_capacity(headers.len());
        for header in headers {
            let pair = parse_header(header)
                .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?;
            parsed.push(pair);
        }
        args.headers = parsed;
    }

    if !is_cli(matches, "payload")
        && let Some(payload) = config.payload.clone()
    {
        args.payload = Some(payload);
    }

    if !is_cli(matches, "form")
        && let Some(form) = config.form.as_ref()
    {
        args.form = form
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
    }

    if !is_cli(matches, "sequence_field")
        && let Some(field) = config.sequence_field.clone()
    {
        args.sequence_field = Some(field);
    }

    if !is_cli(matches, "deadline")
        && let Some(deadline) = config.deadline.as_ref()
    {
        let deadline = deadline
            .to_duration()
            .map_err(|err| AppError::config(ConfigError::InvalidDeadline { source: err }))?;
        args.deadline = Some(deadline);
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if !is_cli(matches, "no_ua")
        && let Some(no_ua) = config.no_ua
    {
        args.no_ua = no_ua;
    }

    if !is_cli(matches, "disable_keepalive")
        && let Some(disable) = config.disable_keepalive
    {
        args.disable_keepalive = disable;
    }

    if !is_cli(matches, "pool_max_idle_per_host")
        && let Some(max_idle) = config.pool_max_idle_per_host
    {
        args.pool_max_idle_per_host =
            Some(ensure_positive_usize(max_idle, "pool_max_idle_per_host")?);
    }

    if !is_cli(matches, "insecure")
        && let Some(insecure) = config.insecure
    {
        args.insecure = insecure;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}
