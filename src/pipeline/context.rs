//! Per-pass generation context

use super::cancellation::CancellationToken;
use crate::config::GeneratorConfig;

/// Everything a generation pass needs besides the syntax trees
///
/// Built fresh for every pass; nothing in it is shared between passes except
/// the cancellation flag the caller chooses to keep.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub config: GeneratorConfig,
    pub cancellation: CancellationToken,
}

impl GenerationContext {
    pub fn new(config: GeneratorConfig, cancellation: CancellationToken) -> Self {
        Self {
            config,
            cancellation,
        }
    }

    /// Context with a private, never-cancelled token
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self::new(config, CancellationToken::new())
    }

    pub fn assembly_name(&self) -> &str {
        &self.config.assembly_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_creation() {
        let token = CancellationToken::new();
        let context = GenerationContext::new(GeneratorConfig::new("App"), token.clone());

        assert_eq!(context.assembly_name(), "App");
        token.cancel();
        assert!(context.cancellation.is_cancelled());
    }

    #[test]
    fn test_with_config() {
        let context = GenerationContext::with_config(GeneratorConfig::new("App"));
        assert!(!context.cancellation.is_cancelled());
        assert!(context.config.enabled);
    }
}
