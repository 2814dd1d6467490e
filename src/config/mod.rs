//! Configuration loading and application.
pub(crate) mod apply;
mod loader;
mod payload;
mod pipeline;
pub mod types;

#[cfg(test)]
mod tests;

pub use apply::apply_config;
pub use loader::load_config;
pub use payload::{FormPayload, load_payload};
pub use pipeline::{PipelineConfig, RequestTarget};

#[cfg(test)]
pub(crate) use loader::load_config_file;
