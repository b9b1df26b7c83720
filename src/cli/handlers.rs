//! Command handlers
//!
//! Each handler returns the process exit code: 0 on success or skip, 1 on
//! error. The CLI never cancels a pass; a cancelled pass only comes from
//! library hosts holding the token.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::commands::{GenerateArgs, ScanArgs};
use super::output::OutputFormatter;
use crate::config::{BuildProperties, GeneratorConfig};
use crate::pipeline::{
    CancellationToken, GeneratedUnit, GenerationContext, GenerationOrchestrator,
    GenerationOutcome,
};
use crate::progress::LoggingHandler;
use crate::syntax::SyntaxTree;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

pub fn handle_generate(args: &GenerateArgs, quiet: bool) -> i32 {
    exit_code(run_generate(args, quiet))
}

pub fn handle_scan(args: &ScanArgs, quiet: bool) -> i32 {
    exit_code(run_scan(args, quiet))
}

fn exit_code(result: Result<()>) -> i32 {
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

fn run_generate(args: &GenerateArgs, quiet: bool) -> Result<()> {
    let props = load_properties(args.build_properties.as_deref(), &args.properties)?;
    let config = GeneratorConfig::from_properties(&props, args.assembly_name.as_deref())
        .context("Failed to resolve generator configuration")?;
    debug!(config = ?config.to_display_map(), "Resolved generator configuration");

    let trees = load_trees(&args.trees)?;
    let context = GenerationContext::new(config, CancellationToken::new());
    let orchestrator = GenerationOrchestrator::new((!quiet).then_some(LoggingHandler));

    let report = match orchestrator.execute(&trees, &context)? {
        GenerationOutcome::Skipped(reason) => {
            info!(reason = %reason, "Nothing generated");
            return Ok(());
        }
        GenerationOutcome::Generated(report) => report,
    };

    for diagnostic in &report.diagnostics {
        warn!("{}", diagnostic);
    }

    match &args.out_dir {
        Some(dir) => {
            write_unit(dir, &report.unit)?;
        }
        None => print!("{}", report.unit.source),
    }
    Ok(())
}

fn run_scan(args: &ScanArgs, quiet: bool) -> Result<()> {
    let trees = load_trees(&args.trees)?;
    let config = GeneratorConfig::new(args.assembly_name.as_str());
    config.validate().context("Invalid assembly name")?;

    let context = GenerationContext::with_config(config);
    let orchestrator = GenerationOrchestrator::new((!quiet).then_some(LoggingHandler));
    let inspection = orchestrator.inspect(&trees, &context)?;

    let formatter = OutputFormatter::new(args.format.into());
    println!("{}", formatter.format_inspection(&inspection)?);
    Ok(())
}

/// File properties first, then `KEY=VALUE` pairs on top
pub fn load_properties(file: Option<&Path>, pairs: &[String]) -> Result<BuildProperties> {
    let mut props = match file {
        Some(path) => BuildProperties::from_path(path)
            .with_context(|| format!("Failed to load build properties from {}", path.display()))?,
        None => BuildProperties::new(),
    };
    props.merge(BuildProperties::from_pairs(pairs).context("Invalid --property value")?);
    Ok(props)
}

pub fn load_trees(paths: &[PathBuf]) -> Result<Vec<SyntaxTree>> {
    paths
        .iter()
        .map(|path| {
            SyntaxTree::from_path(path)
                .with_context(|| format!("Failed to load syntax tree {}", path.display()))
        })
        .collect()
}

/// Writes the unit into `dir` unless an identical file is already there
///
/// Returns whether the file was (re)written.
pub fn write_unit(dir: &Path, unit: &GeneratedUnit) -> Result<bool> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = dir.join(&unit.hint_name);

    if let Ok(existing) = fs::read_to_string(&path) {
        if GeneratedUnit::new(existing).digest() == unit.digest() {
            debug!(path = %path.display(), "Generated unit unchanged");
            return Ok(false);
        }
    }

    fs::write(&path, &unit.source)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), digest = %unit.digest(), "Wrote generated unit");
    Ok(true)
}
