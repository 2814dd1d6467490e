//! Core library for the `pipeload` CLI.
//!
//! The binary wires these pieces together: CLI argument types, configuration
//! loading, the generator/worker-pool/aggregator pipeline, the shared HTTP
//! transport, and report rendering. Library APIs may evolve with the CLI.
pub mod args;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod shutdown;
pub mod transport;
