use super::{PipelineConfig, apply_config, load_config_file, load_payload};
use crate::args::{HttpMethod, OutputFormat, PipelineArgs};
use crate::error::{AppError, ConfigError, HttpError, ValidationError};
use clap::{ArgMatches, CommandFactory, FromArgMatches};
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

fn parse_cli(args: &[&str]) -> Result<(PipelineArgs, ArgMatches), String> {
    let matches = PipelineArgs::command()
        .try_get_matches_from(args)
        .map_err(|err| err.to_string())?;
    let parsed = PipelineArgs::from_arg_matches(&matches).map_err(|err| err.to_string())?;
    Ok((parsed, matches))
}

fn write_file(path: &Path, content: &str) -> Result<(), String> {
    std::fs::write(path, content).map_err(|err| format!("write failed: {}", err))
}

#[test]
fn parse_toml_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("pipeload.toml");
    let content = r#"
url = "http://localhost:8000/detect"
method = "post"
reqs = 120
concurrent = 8
headers = ["X-Run: nightly"]
payload = "data/test.json"
sequence_field = "frameid"
deadline = "30s"
output_format = "json"

[form]
format = "jpeg"
"#;
    write_file(&path, content)?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.url.as_deref() != Some("http://localhost:8000/detect") {
        return Err("Unexpected url".to_owned());
    }
    if config.requests != Some(120) || config.concurrency != Some(8) {
        return Err("Aliases reqs/concurrent were not honoured".to_owned());
    }
    if config.method != Some(HttpMethod::Post) || config.output_format != Some(OutputFormat::Json)
    {
        return Err("Unexpected method/output format".to_owned());
    }
    let deadline = config
        .deadline
        .as_ref()
        .ok_or_else(|| "Expected deadline".to_owned())?
        .to_duration()
        .map_err(|err| err.to_string())?;
    if deadline != Duration::from_secs(30) {
        return Err(format!("Unexpected deadline: {:?}", deadline));
    }
    let form = config.form.ok_or_else(|| "Expected form".to_owned())?;
    if form.get("format").map(String::as_str) != Some("jpeg") {
        return Err("Unexpected form".to_owned());
    }
    Ok(())
}

#[test]
fn parse_json_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("pipeload.json");
    write_file(
        &path,
        r#"{"url": "http://localhost:3000", "requests": 5, "concurrency": 2, "deadline": 10}"#,
    )?;
    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.requests != Some(5) || config.concurrency != Some(2) {
        return Err("Unexpected counts".to_owned());
    }
    let deadline = config
        .deadline
        .as_ref()
        .ok_or_else(|| "Expected deadline".to_owned())?
        .to_duration()
        .map_err(|err| err.to_string())?;
    if deadline != Duration::from_secs(10) {
        return Err(format!("Unexpected deadline: {:?}", deadline));
    }
    Ok(())
}

#[test]
fn unsupported_extension_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("pipeload.yaml");
    write_file(&path, "url: http://localhost")?;
    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => {
            Ok(())
        }
        other => Err(format!("Expected UnsupportedExtension, got {:?}", other)),
    }
}

#[test]
fn cli_values_override_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("pipeload.toml");
    write_file(
        &path,
        r#"
url = "http://config.example"
requests = 500
concurrency = 50
insecure = true
"#,
    )?;
    let config = load_config_file(&path).map_err(|err| err.to_string())?;

    let (mut args, matches) = parse_cli(&["pipeload", "-n", "7", "-u", "http://cli.example"])?;
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.url.as_deref() != Some("http://cli.example") || args.requests != 7 {
        return Err(format!("CLI values lost: {:?}", args));
    }
    if args.concurrency.get() != 50 || !args.insecure {
        return Err(format!("Config values not applied: {:?}", args));
    }
    Ok(())
}

#[test]
fn config_rejects_zero_concurrency() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("pipeload.toml");
    write_file(&path, "concurrency = 0\n")?;
    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    let (mut args, matches) = parse_cli(&["pipeload", "-u", "http://localhost"])?;
    match apply_config(&mut args, &matches, &config) {
        Err(AppError::Config(ConfigError::FieldMustBePositive { field, .. }))
            if field == "concurrency" =>
        {
            Ok(())
        }
        other => Err(format!("Expected FieldMustBePositive, got {:?}", other)),
    }
}

#[test]
fn payload_flattens_scalar_fields() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("test.json");
    write_file(
        &path,
        r#"{"image": "abc", "width": 640, "do_tracking": 1, "mirror": false}"#,
    )?;
    let payload = load_payload(&path).map_err(|err| err.to_string())?;
    if payload.get("width") != Some("640") || payload.get("mirror") != Some("false") {
        return Err(format!("Unexpected payload: {:?}", payload));
    }
    let encoded = payload.encode_with_sequence(None, 3);
    if encoded != "do_tracking=1&image=abc&mirror=false&width=640" {
        return Err(format!("Unexpected encoding: {}", encoded));
    }
    Ok(())
}

#[test]
fn payload_rejects_nested_and_non_objects() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let nested = dir.path().join("nested.json");
    write_file(&nested, r#"{"size": {"w": 1}}"#)?;
    match load_payload(&nested) {
        Err(AppError::Config(ConfigError::PayloadFieldNotScalar { field })) if field == "size" => {}
        other => return Err(format!("Expected PayloadFieldNotScalar, got {:?}", other)),
    }

    let list = dir.path().join("list.json");
    write_file(&list, "[1, 2]")?;
    if !matches!(
        load_payload(&list),
        Err(AppError::Config(ConfigError::PayloadNotObject { .. }))
    ) {
        return Err("Expected PayloadNotObject".to_owned());
    }

    let missing = dir.path().join("missing.json");
    if !matches!(
        load_payload(&missing),
        Err(AppError::Config(ConfigError::ReadPayload { .. }))
    ) {
        return Err("Expected ReadPayload".to_owned());
    }
    Ok(())
}

#[test]
fn pipeline_config_defaults_to_post_with_payload() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("test.json");
    write_file(&path, r#"{"format": "png"}"#)?;
    let payload_path = path.to_string_lossy().into_owned();
    let (args, _) = parse_cli(&[
        "pipeload",
        "-u",
        "http://localhost:8000/detect",
        "--payload",
        &payload_path,
        "--form",
        "format=jpeg",
        "--sequence-field",
        "frameid",
    ])?;
    let config = PipelineConfig::from_args(&args).map_err(|err| err.to_string())?;
    if config.target.method != HttpMethod::Post {
        return Err("Expected POST when a body is configured".to_owned());
    }
    let payload = config
        .payload
        .as_ref()
        .ok_or_else(|| "Expected payload".to_owned())?;
    if payload.get("format") != Some("jpeg") {
        return Err("--form should override payload fields".to_owned());
    }
    if config.sequence_field.as_deref() != Some("frameid") || config.requests != 60 {
        return Err(format!("Unexpected config: {:?}", config));
    }
    Ok(())
}

#[test]
fn pipeline_config_without_body_uses_get() -> Result<(), String> {
    let (args, _) = parse_cli(&["pipeload", "-u", "http://localhost", "-n", "0"])?;
    let config = PipelineConfig::from_args(&args).map_err(|err| err.to_string())?;
    if config.target.method != HttpMethod::Get || config.payload.is_some() {
        return Err(format!("Expected bodiless GET: {:?}", config));
    }
    if config.requests != 0 {
        return Err("N=0 must be accepted".to_owned());
    }
    Ok(())
}

#[test]
fn pipeline_config_rejects_invalid_combinations() -> Result<(), String> {
    let (args, _) = parse_cli(&["pipeload"])?;
    if !matches!(
        PipelineConfig::from_args(&args),
        Err(AppError::Validation(ValidationError::MissingUrl))
    ) {
        return Err("Expected MissingUrl".to_owned());
    }

    let (args, _) = parse_cli(&["pipeload", "-u", "http://localhost", "-X", "get", "--form", "a=b"])?;
    if !matches!(
        PipelineConfig::from_args(&args),
        Err(AppError::Validation(ValidationError::BodyWithGet))
    ) {
        return Err("Expected BodyWithGet".to_owned());
    }

    let (args, _) = parse_cli(&["pipeload", "-u", "localhost:8000"])?;
    if !matches!(
        PipelineConfig::from_args(&args),
        Err(AppError::Http(HttpError::UnsupportedScheme { .. } | HttpError::InvalidUrl { .. }))
    ) {
        return Err("Expected an unusable URL to be fatal".to_owned());
    }

    let (args, _) = parse_cli(&["pipeload", "-u", "http://localhost", "-H", "Bad Name: v"])?;
    match PipelineConfig::from_args(&args) {
        Err(AppError::Http(HttpError::InvalidHeaderName { header, .. })) if header == "Bad Name" => {}
        other => return Err(format!("Expected an invalid header name to be fatal: {:?}", other)),
    }
    Ok(())
}
