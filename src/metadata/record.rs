use super::{BindingDescriptor, RetryPolicy};
use serde::{Deserialize, Serialize};

/// Entry point shared by every generated function; the host routes the actual
/// request through the web stack, so this trigger never runs user code.
pub const ENTRY_POINT: &str = "AspNetIntegration.NoOpTrigger.Run";

pub const WORKER_LANGUAGE: &str = "dotnet-isolated";

pub const LIBRARY_EXTENSION: &str = "dll";

/// Normalized description of one discovered function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionMetadataRecord {
    /// Zero-based position of the originating call site in scan order
    #[serde(default)]
    pub call_site: usize,
    /// Route literal; `None` when the route argument was not a literal
    pub name: Option<String>,
    pub script_file: String,
    pub entry_point: String,
    pub language: String,
    pub is_http_trigger: bool,
    /// Input trigger first, output last
    pub bindings: Vec<BindingDescriptor>,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl FunctionMetadataRecord {
    pub fn http(
        name: Option<String>,
        assembly_name: &str,
        bindings: Vec<BindingDescriptor>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            call_site: 0,
            name,
            script_file: script_file_for(assembly_name),
            entry_point: ENTRY_POINT.to_string(),
            language: WORKER_LANGUAGE.to_string(),
            is_http_trigger: true,
            bindings,
            retry,
        }
    }

    pub fn with_call_site(mut self, call_site: usize) -> Self {
        self.call_site = call_site;
        self
    }

    /// Verb list of the input trigger, if any
    pub fn methods(&self) -> &[String] {
        self.bindings
            .first()
            .and_then(|b| b.methods.as_deref())
            .unwrap_or(&[])
    }
}

pub fn script_file_for(assembly_name: &str) -> String {
    format!("{}.{}", assembly_name, LIBRARY_EXTENSION)
}
