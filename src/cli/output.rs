//! Output formatting for scan reports
//!
//! JSON and YAML carry the same document; the human format is a summary for
//! terminals.

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::metadata::{parse_interval, FunctionMetadataRecord};
use crate::pipeline::Inspection;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_inspection(&self, inspection: &Inspection) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&inspection_document(inspection))
                .context("Failed to serialize scan report to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(&inspection_document(inspection))
                .context("Failed to serialize scan report to YAML"),
            OutputFormat::Human => Ok(self.format_inspection_human(inspection)),
        }
    }

    fn format_inspection_human(&self, inspection: &Inspection) -> String {
        let mut output = String::new();

        output.push_str("Function Metadata Scan\n");
        output.push_str(RULE);
        output.push_str("\n\n");
        output.push_str(&format!(
            "Call sites: {} ({} nodes visited)\n",
            inspection.candidates, inspection.nodes_visited
        ));
        output.push_str(&format!("Functions:  {}\n\n", inspection.records.len()));

        for record in &inspection.records {
            let name = record.name.as_deref().unwrap_or("(non-literal route)");
            output.push_str(&format!(
                "Function{}  {} {}\n",
                record.call_site,
                record.methods().join(","),
                name
            ));
            output.push_str(&format!("\u{251C}\u{2500} Script: {}\n", record.script_file));

            let invalid = invalid_intervals(record);
            if record.retry.is_none() {
                output.push_str("\u{2514}\u{2500} Retry:  none\n");
            } else if invalid.is_empty() {
                output.push_str(&format!("\u{2514}\u{2500} Retry:  {:?}\n", record.retry));
            } else {
                output.push_str(&format!(
                    "\u{2514}\u{2500} Retry:  {:?} (unparseable: {})\n",
                    record.retry,
                    invalid.join(", ")
                ));
            }
        }

        if !inspection.diagnostics.is_empty() {
            output.push_str("\n\u{26A0} Diagnostics:\n");
            for diagnostic in &inspection.diagnostics {
                output.push_str(&format!("  - {}\n", diagnostic));
            }
        }

        output
    }
}

/// Interval fields the host would fail to parse
///
/// Generation passes these through unchanged; the report only flags them.
pub fn invalid_intervals(record: &FunctionMetadataRecord) -> Vec<&'static str> {
    record
        .retry
        .intervals()
        .into_iter()
        .filter(|(_, literal)| parse_interval(literal).is_err())
        .map(|(field, _)| field)
        .collect()
}

fn inspection_document(inspection: &Inspection) -> Value {
    let functions: Vec<Value> = inspection
        .records
        .iter()
        .map(|record| {
            json!({
                "index": record.call_site,
                "metadata": record,
                "invalidIntervals": invalid_intervals(record),
            })
        })
        .collect();

    json!({
        "callSites": inspection.candidates,
        "nodesVisited": inspection.nodes_visited,
        "functions": functions,
        "diagnostics": inspection.diagnostics,
    })
}
