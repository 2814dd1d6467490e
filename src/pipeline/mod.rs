//! Fixed-count load pipeline.
//!
//! A generator feeds [`RequestSpec`]s into a rendezvous queue, a pool of W
//! executors performs the round-trips through one shared [`Transport`], and a
//! single aggregator counts [`ResultDescriptor`]s until exactly N have been
//! observed. The caller only blocks on the aggregator.
//!
//! [`Transport`]: crate::transport::Transport
mod aggregator;
mod generator;
mod pool;
mod request;
mod run;
mod types;


pub use aggregator::{AggregateStats, aggregate};
pub use generator::{RequestSequence, spawn_generator};
pub use pool::WorkerPool;
pub use request::{RequestFactory, TemplateRequestFactory, build_headers, parse_target_url};
pub use run::{HANDOFF_CAPACITY, RunSummary, run_pipeline};
pub use types::{RequestSpec, ResultDescriptor};
