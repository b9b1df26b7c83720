//! fnmeta - compile-time function metadata for route-registration call sites
//!
//! Scans parser-independent syntax trees for `MapGet`/`MapPost`/`MapPut`/
//! `MapDelete`/`MapPatch` registrations and renders a metadata provider the
//! functions host loads at startup, so no runtime function indexing is needed.
//!
//! # Pipeline
//!
//! - [`pipeline::phases::scan`]: matches call sites by shape, in traversal order
//! - [`pipeline::phases::extract`]: derives one [`FunctionMetadataRecord`] per call site
//! - [`pipeline::phases::emit`]: renders the provider source
//! - [`GenerationOrchestrator`]: feature gate, phase sequencing, cancellation
//!
//! # Example
//!
//! ```
//! use fnmeta::syntax::builder::{compilation_unit, lambda, map_call, string_literal};
//! use fnmeta::{GenerationContext, GenerationOrchestrator, GeneratorConfig, SyntaxTree};
//!
//! let tree = SyntaxTree::new(compilation_unit(vec![
//!     map_call("MapGet", string_literal("/orders"), lambda()),
//! ]));
//! let context = GenerationContext::with_config(GeneratorConfig::new("Contoso.Api"));
//!
//! let outcome = GenerationOrchestrator::new(None)
//!     .execute(&[tree], &context)
//!     .unwrap();
//! let unit = outcome.unit().unwrap();
//! assert!(unit.source.contains("Function0RawBindings"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod progress;
pub mod syntax;
pub mod util;

pub use config::{BuildProperties, ConfigError, GeneratorConfig};
pub use error::GenerationError;
pub use metadata::{BindingDescriptor, Diagnostic, FunctionMetadataRecord, HttpVerb, RetryPolicy};
pub use pipeline::{
    CancellationToken, GeneratedUnit, GenerationContext, GenerationOrchestrator,
    GenerationOutcome, GenerationReport, SkipReason,
};
pub use syntax::{SyntaxNode, SyntaxTree};
pub use util::{config_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
