//! Error types for a generation pass

use crate::config::ConfigError;
use crate::syntax::SyntaxError;
use thiserror::Error;

/// Errors that abort a generation pass
///
/// Extraction and emission degrade instead of failing, so in practice only
/// cancellation and broken inputs surface here.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The caller asked the pass to stop; nothing was published
    #[error("Generation cancelled")]
    Cancelled,

    #[error("Invalid generator configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Failed to serialize binding descriptor: {0}")]
    Binding(#[from] serde_json::Error),

    #[error("Failed to render generated source")]
    Render(#[from] std::fmt::Error),
}

impl GenerationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenerationError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_display() {
        let err = GenerationError::Cancelled;
        assert_eq!(err.to_string(), "Generation cancelled");
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_config_error_converts() {
        let err: GenerationError = ConfigError::MissingAssemblyName.into();
        assert!(!err.is_cancelled());
        assert!(err.to_string().contains("assembly name"));
    }
}
