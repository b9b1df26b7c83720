//! Function metadata model
//!
//! Records produced by extraction and consumed by emission. Everything here is
//! plain data; none of it knows about syntax trees or generated source.

pub mod binding;
pub mod diagnostic;
pub mod duration;
pub mod record;
pub mod retry;

pub use binding::{AuthLevel, BindingDescriptor, BindingDirection, HttpVerb};
pub use diagnostic::{Diagnostic, Severity};
pub use duration::{parse_interval, DurationError};
pub use record::{FunctionMetadataRecord, ENTRY_POINT, LIBRARY_EXTENSION, WORKER_LANGUAGE};
pub use retry::RetryPolicy;
