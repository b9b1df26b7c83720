pub mod cancellation;
pub mod context;
pub mod orchestrator;
pub mod phases;
pub mod unit;

pub use cancellation::CancellationToken;
pub use context::GenerationContext;
pub use orchestrator::{
    GenerationOrchestrator, GenerationOutcome, GenerationReport, Inspection, SkipReason,
};
pub use unit::{GeneratedUnit, GENERATED_UNIT_NAME};
