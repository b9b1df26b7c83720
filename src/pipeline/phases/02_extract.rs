use super::scan::CallSiteCandidate;
use crate::error::GenerationError;
use crate::metadata::diagnostic::{MALFORMED_RETRY, NON_LITERAL_ROUTE, UNRECOGNIZED_VERB};
use crate::metadata::{BindingDescriptor, Diagnostic, FunctionMetadataRecord, HttpVerb, RetryPolicy};
use crate::pipeline::GenerationContext;
use crate::syntax::{NodeKind, SyntaxNode};
use tracing::{debug, warn};

const FIXED_DELAY_RETRY: &str = "FixedDelayRetry";
const EXPONENTIAL_BACKOFF_RETRY: &str = "ExponentialBackoffRetry";

#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    pub records: Vec<FunctionMetadataRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns candidates into metadata records, in candidate order
///
/// Only cancellation fails the phase. Everything else degrades into a
/// diagnostic so one bad call site cannot block the rest.
pub fn execute(
    candidates: &[CallSiteCandidate<'_>],
    context: &GenerationContext,
) -> Result<ExtractResult, GenerationError> {
    let mut result = ExtractResult::default();

    for (index, candidate) in candidates.iter().enumerate() {
        context.cancellation.check()?;

        if let Some(record) =
            extract_record(index, candidate, context.assembly_name(), &mut result.diagnostics)
        {
            result.records.push(record);
        }
    }

    debug!(
        records = result.records.len(),
        diagnostics = result.diagnostics.len(),
        "Extracted function metadata"
    );
    Ok(result)
}

fn extract_record(
    index: usize,
    candidate: &CallSiteCandidate<'_>,
    assembly_name: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<FunctionMetadataRecord> {
    let Some(verb) = HttpVerb::from_method_name(candidate.method()) else {
        warn!(method = candidate.method(), call_site = index, "No HTTP verb for registration method");
        diagnostics.push(Diagnostic::warning(
            UNRECOGNIZED_VERB,
            index,
            format!(
                "'{}' has no HTTP verb mapping; call site excluded",
                candidate.method()
            ),
        ));
        return None;
    };

    let name = route_pattern(candidate);
    if name.is_none() {
        warn!(call_site = index, "Route argument is not a string literal");
        diagnostics.push(Diagnostic::warning(
            NON_LITERAL_ROUTE,
            index,
            format!(
                "route argument of '{}' is not a string literal; a placeholder name is emitted",
                candidate.method()
            ),
        ));
    }

    let retry = match candidate.declaration() {
        Some(declaration) => retry_policy(declaration).unwrap_or_else(|attribute| {
            diagnostics.push(Diagnostic::info(
                MALFORMED_RETRY,
                index,
                format!("'{}' arguments are not literals of the expected shape; no retry emitted", attribute),
            ));
            RetryPolicy::None
        }),
        None => RetryPolicy::None,
    };

    Some(
        FunctionMetadataRecord::http(name, assembly_name, http_bindings(verb), retry)
            .with_call_site(index),
    )
}

/// Literal text of the route argument
///
/// Non-literal routes (variables, concatenations, ...) yield `None`.
pub fn route_pattern(candidate: &CallSiteCandidate<'_>) -> Option<String> {
    candidate
        .arguments()
        .first()
        .filter(|arg| arg.is(NodeKind::StringLiteral))
        .and_then(|arg| arg.text())
        .map(str::to_string)
}

/// Input trigger followed by the return-value output
pub fn http_bindings(verb: HttpVerb) -> Vec<BindingDescriptor> {
    vec![
        BindingDescriptor::http_trigger(verb),
        BindingDescriptor::http_return(),
    ]
}

/// Reads the first retry attribute on a declaration
///
/// `Ok(RetryPolicy::None)` when there is no retry attribute; `Err(name)` when
/// one is present but its arguments do not have the expected literal shape.
pub fn retry_policy(declaration: &SyntaxNode) -> Result<RetryPolicy, String> {
    for attribute in declaration.children_of_kind(NodeKind::Attribute) {
        let Some(name) = attribute.text() else {
            continue;
        };
        let name = name.strip_suffix("Attribute").unwrap_or(name);
        let args = attribute.attribute_arguments();

        match name {
            FIXED_DELAY_RETRY => {
                return match args.as_slice() {
                    [count, delay] => match (literal_int(count), literal_str(delay)) {
                        (Some(count), Some(delay)) => Ok(RetryPolicy::fixed_delay(count, delay)),
                        _ => Err(FIXED_DELAY_RETRY.to_string()),
                    },
                    _ => Err(FIXED_DELAY_RETRY.to_string()),
                };
            }
            EXPONENTIAL_BACKOFF_RETRY => {
                return match args.as_slice() {
                    [count, min, max] => {
                        match (literal_int(count), literal_str(min), literal_str(max)) {
                            (Some(count), Some(min), Some(max)) => {
                                Ok(RetryPolicy::exponential_backoff(count, min, max))
                            }
                            _ => Err(EXPONENTIAL_BACKOFF_RETRY.to_string()),
                        }
                    }
                    _ => Err(EXPONENTIAL_BACKOFF_RETRY.to_string()),
                };
            }
            _ => continue,
        }
    }

    Ok(RetryPolicy::None)
}

fn literal_int(node: &SyntaxNode) -> Option<i32> {
    if !node.is(NodeKind::NumericLiteral) {
        return None;
    }
    node.text()?.trim().parse().ok()
}

fn literal_str(node: &SyntaxNode) -> Option<&str> {
    if !node.is(NodeKind::StringLiteral) {
        return None;
    }
    node.text()
}
