//! Lead enrichment orchestration: owns the session's lead collection,
//! drives status transitions, and schedules bulk enrichment in
//! sequential fixed-size batches.

pub mod error;
pub mod orchestrator;
pub mod service;
pub mod session;

pub use error::PipelineError;
pub use orchestrator::{BulkReport, EnrichOutcome, Orchestrator, DEFAULT_BATCH_SIZE};
pub use service::{BoxError, GeminiLeadService, LeadService};
pub use session::{Banner, Controls, SearchParams, SessionView};
