use sha2::{Digest, Sha256};

/// Name the generated source is published under
pub const GENERATED_UNIT_NAME: &str = "MapActionGeneratedFunctionMetadata.g.cs";

/// Rendered source handed to the host compiler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub hint_name: String,
    pub source: String,
}

impl GeneratedUnit {
    pub fn new(source: String) -> Self {
        Self {
            hint_name: GENERATED_UNIT_NAME.to_string(),
            source,
        }
    }

    /// Content digest in `sha256:<hex>` form
    pub fn digest(&self) -> String {
        let hash = Sha256::digest(self.source.as_bytes());
        format!("sha256:{}", hex::encode(hash))
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}
