pub mod anchor;
pub mod config;
pub mod log;
mod orchestrator;
pub mod resources;
mod types;

pub use anchor::select_anchor;
pub use log::write_log;
pub use resources::{available_memory, plan_memory, MemoryBudget};
pub use orchestrator::{plan_batch, plan_batch_reported, run_registration, run_registration_reported};
pub use types::{
    BatchPlan, MalformedFile, PipelineStage, ProgressReporter, RegistrationReport, RoundRecord,
};
