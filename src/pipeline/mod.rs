//! Pipeline entry points for feed publishing.
//!
//! - `crawl`: concurrent feed retrieval, one task per site
//! - `select`: per-feed item selection and annotation
//! - `publish`: existence check, rendering, and record creation per item
//! - `pipeline`: the orchestrator tying them together

pub mod crawl;
pub mod pipeline;
pub mod publish;
pub mod select;

pub use pipeline::{Pipeline, RunReport, run_pipeline};
pub use publish::{PublishOutcome, Publisher};
pub use select::{annotate, select_count, select_items};
