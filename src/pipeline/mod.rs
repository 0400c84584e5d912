pub mod orchestrator;
pub mod render;
mod types;

pub use orchestrator::run_batch;
pub use types::{
    BatchEvent, BatchInput, BatchReport, Stage, Summary, TenantOutcome, TenantReport,
};
