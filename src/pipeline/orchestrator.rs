use super::context::GenerationContext;
use super::phases::emit::EmitOptions;
use super::phases::{emit, extract, scan};
use super::unit::GeneratedUnit;
use crate::error::GenerationError;
use crate::metadata::{Diagnostic, FunctionMetadataRecord};
use crate::progress::{LoggingHandler, ProgressEvent, ProgressHandler};
use crate::syntax::SyntaxTree;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Feature switch off; trees were not scanned
    Disabled,
    /// No registration call sites matched
    NoCandidates,
    /// Call sites matched but none produced a record
    NoRecords,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Disabled => write!(f, "metadata source generation disabled"),
            SkipReason::NoCandidates => write!(f, "no route registration call sites"),
            SkipReason::NoRecords => write!(f, "no call site produced function metadata"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub unit: GeneratedUnit,
    pub records: Vec<FunctionMetadataRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    Skipped(SkipReason),
    Generated(GenerationReport),
}

impl GenerationOutcome {
    pub fn unit(&self) -> Option<&GeneratedUnit> {
        match self {
            GenerationOutcome::Generated(report) => Some(&report.unit),
            GenerationOutcome::Skipped(_) => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, GenerationOutcome::Skipped(_))
    }
}

/// Scan and extract results without emission
#[derive(Debug, Clone, Default)]
pub struct Inspection {
    pub candidates: usize,
    pub nodes_visited: usize,
    pub records: Vec<FunctionMetadataRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct GenerationOrchestrator {
    progress_handler: Option<LoggingHandler>,
}

impl GenerationOrchestrator {
    pub fn new(progress_handler: Option<LoggingHandler>) -> Self {
        Self { progress_handler }
    }

    /// Runs one generation pass
    ///
    /// Nothing is produced when the pass is skipped or cancelled.
    pub fn execute(
        &self,
        trees: &[SyntaxTree],
        context: &GenerationContext,
    ) -> Result<GenerationOutcome, GenerationError> {
        let start = Instant::now();
        let result = self.run(trees, context);

        match &result {
            Ok(GenerationOutcome::Skipped(reason)) => {
                self.report(ProgressEvent::Skipped {
                    reason: reason.to_string(),
                });
            }
            Ok(GenerationOutcome::Generated(report)) => {
                info!(
                    unit = %report.unit.hint_name,
                    functions = report.records.len(),
                    diagnostics = report.diagnostics.len(),
                    "Generated metadata provider"
                );
                self.report(ProgressEvent::Completed {
                    functions: report.records.len(),
                    total_time: start.elapsed(),
                });
            }
            Err(e) if e.is_cancelled() => self.report(ProgressEvent::Cancelled),
            Err(_) => {}
        }

        result
    }

    fn run(
        &self,
        trees: &[SyntaxTree],
        context: &GenerationContext,
    ) -> Result<GenerationOutcome, GenerationError> {
        if !context.config.enabled {
            debug!("Source generation switch is off");
            return Ok(GenerationOutcome::Skipped(SkipReason::Disabled));
        }

        self.report(ProgressEvent::Started { trees: trees.len() });

        let scanned = self.phase("scan", || scan::execute(trees, &context.cancellation))?;
        if scanned.is_empty() {
            return Ok(GenerationOutcome::Skipped(SkipReason::NoCandidates));
        }

        let extracted = self.phase("extract", || extract::execute(&scanned.candidates, context))?;
        if extracted.records.is_empty() {
            return Ok(GenerationOutcome::Skipped(SkipReason::NoRecords));
        }

        let options = EmitOptions::new(
            context.config.namespace.clone(),
            context.config.auto_register,
        );
        let source = self.phase("emit", || {
            emit::execute(&extracted.records, &options, &context.cancellation)
        })?;

        // Last chance to abort before the unit becomes visible.
        context.cancellation.check()?;

        Ok(GenerationOutcome::Generated(GenerationReport {
            unit: GeneratedUnit::new(source),
            records: extracted.records,
            diagnostics: extracted.diagnostics,
        }))
    }

    /// Runs scan and extract regardless of the feature switch
    pub fn inspect(
        &self,
        trees: &[SyntaxTree],
        context: &GenerationContext,
    ) -> Result<Inspection, GenerationError> {
        let scanned = self.phase("scan", || scan::execute(trees, &context.cancellation))?;
        let extracted = self.phase("extract", || extract::execute(&scanned.candidates, context))?;

        Ok(Inspection {
            candidates: scanned.candidates.len(),
            nodes_visited: scanned.nodes_visited,
            records: extracted.records,
            diagnostics: extracted.diagnostics,
        })
    }

    fn phase<T>(
        &self,
        name: &str,
        run: impl FnOnce() -> Result<T, GenerationError>,
    ) -> Result<T, GenerationError> {
        self.report(ProgressEvent::PhaseStarted {
            phase: name.to_string(),
        });

        let phase_start = Instant::now();
        let output = run()?;

        self.report(ProgressEvent::PhaseComplete {
            phase: name.to_string(),
            duration: phase_start.elapsed(),
        });
        Ok(output)
    }

    fn report(&self, event: ProgressEvent) {
        if let Some(handler) = &self.progress_handler {
            handler.on_progress(&event);
        }
    }
}
