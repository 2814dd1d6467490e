use std::ffi::OsString;
use std::sync::Arc;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use pipeload::args::PipelineArgs;
use pipeload::config::{PipelineConfig, apply_config, load_config};
use pipeload::error::{AppError, AppResult};
use pipeload::pipeline::{RunSummary, TemplateRequestFactory, run_pipeline};
use pipeload::report;
use pipeload::shutdown::shutdown_channel;
use pipeload::transport::{HttpTransport, Transport, TransportConfig};

use crate::shutdown_handlers::setup_signal_shutdown_handler;

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose);

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    let pipeline_config = PipelineConfig::from_args(&args).inspect_err(|err| {
        tracing::error!("Invalid configuration: {}", err);
    })?;
    let transport_config = TransportConfig::from_args(&args);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let summary = runtime.block_on(run_async(&pipeline_config, &transport_config))?;
    println!("{}", report::render(&summary, args.output_format)?);
    Ok(())
}

fn parse_args() -> AppResult<(PipelineArgs, ArgMatches)> {
    let raw_args: Vec<OsString> = std::env::args_os().collect();
    let matches = PipelineArgs::command().get_matches_from(raw_args);
    let args = PipelineArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(
    config: &PipelineConfig,
    transport_config: &TransportConfig,
) -> AppResult<RunSummary> {
    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(transport_config).map_err(AppError::http)?);
    let factory = TemplateRequestFactory::from_config(config);

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx, shutdown_tx.subscribe());

    let summary = run_pipeline(config, factory, transport, &shutdown_tx, shutdown_rx).await;

    signal_handle.abort();
    summary
}
