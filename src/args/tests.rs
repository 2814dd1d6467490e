use super::parsers::parse_form_field;
use super::*;
use crate::error::{AppError, AppResult, ValidationError};
use clap::Parser;
use std::time::Duration;

fn parse_test_args<I, T>(args: I) -> AppResult<PipelineArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    PipelineArgs::try_parse_from(args).map_err(AppError::from)
}

#[test]
fn defaults_are_sixty_requests_over_thirty_one_workers() -> AppResult<()> {
    let args = parse_test_args(["pipeload", "-u", "http://localhost"])?;
    if args.requests != 60 {
        return Err(AppError::validation(format!(
            "Unexpected requests: {}",
            args.requests
        )));
    }
    if args.concurrency.get() != 31 {
        return Err(AppError::validation(format!(
            "Unexpected concurrency: {}",
            args.concurrency.get()
        )));
    }
    if args.method.is_some() || args.deadline.is_some() {
        return Err(AppError::validation("Expected no method and no deadline"));
    }
    if args.output_format != OutputFormat::Text {
        return Err(AppError::validation("Expected text output by default"));
    }
    Ok(())
}

#[test]
fn parses_counts_and_aliases() -> AppResult<()> {
    let args = parse_test_args([
        "pipeload",
        "--url",
        "http://localhost",
        "--reqs",
        "0",
        "--concurrency",
        "3",
        "-X",
        "POST",
    ])?;
    if args.requests != 0 || args.concurrency.get() != 3 {
        return Err(AppError::validation("Aliases were not applied"));
    }
    if args.method != Some(HttpMethod::Post) {
        return Err(AppError::validation("Expected POST"));
    }
    Ok(())
}

#[test]
fn zero_concurrency_is_rejected() -> AppResult<()> {
    match parse_test_args(["pipeload", "-u", "http://localhost", "-c", "0"]) {
        Err(_) => Ok(()),
        Ok(_) => Err(AppError::validation("Expected -c 0 to be rejected")),
    }
}

#[test]
fn parses_repeatable_headers_and_form_fields() -> AppResult<()> {
    let args = parse_test_args([
        "pipeload",
        "-u",
        "http://localhost",
        "-H",
        "X-Trace: abc",
        "-H",
        "Accept:text/plain",
        "--form",
        "format=jpeg",
        "--form",
        "empty=",
    ])?;
    let expected_headers = vec![
        ("X-Trace".to_owned(), "abc".to_owned()),
        ("Accept".to_owned(), "text/plain".to_owned()),
    ];
    if args.headers != expected_headers {
        return Err(AppError::validation(format!(
            "Unexpected headers: {:?}",
            args.headers
        )));
    }
    let expected_form = vec![
        ("format".to_owned(), "jpeg".to_owned()),
        ("empty".to_owned(), String::new()),
    ];
    if args.form != expected_form {
        return Err(AppError::validation(format!(
            "Unexpected form: {:?}",
            args.form
        )));
    }
    Ok(())
}

#[test]
fn parse_header_invalid() -> AppResult<()> {
    match parse_header("MissingDelimiter") {
        Err(ValidationError::InvalidHeaderFormat { .. }) => Ok(()),
        other => Err(AppError::validation(format!(
            "Expected InvalidHeaderFormat, got {:?}",
            other
        ))),
    }
}

#[test]
fn parse_form_field_requires_key() -> AppResult<()> {
    if parse_form_field("=value").is_ok() {
        return Err(AppError::validation("Expected empty key to be rejected"));
    }
    if parse_form_field("novalue").is_ok() {
        return Err(AppError::validation("Expected missing '=' to be rejected"));
    }
    Ok(())
}

#[test]
fn parse_duration_units() -> AppResult<()> {
    let cases = [
        ("250ms", Duration::from_millis(250)),
        ("3", Duration::from_secs(3)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_arg(input)?;
        if parsed != expected {
            return Err(AppError::validation(format!(
                "Unexpected duration for {}: {:?}",
                input, parsed
            )));
        }
    }
    Ok(())
}

#[test]
fn parse_duration_rejects_zero_and_bad_units() -> AppResult<()> {
    if !matches!(parse_duration_arg("0s"), Err(ValidationError::DurationZero)) {
        return Err(AppError::validation("Expected zero duration to fail"));
    }
    if !matches!(
        parse_duration_arg("5d"),
        Err(ValidationError::InvalidDurationUnit { .. })
    ) {
        return Err(AppError::validation("Expected unknown unit to fail"));
    }
    Ok(())
}
