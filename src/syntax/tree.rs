use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Version of the serialized tree format understood by this crate
pub const IR_VERSION: u32 = 1;

/// Deepest JSON nesting accepted when loading a tree
///
/// Every tree level costs two JSON levels (node object and `children` array),
/// so this admits trees roughly 250 nodes deep.
pub const MAX_NESTING_DEPTH: usize = 512;

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("Failed to parse syntax tree: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read syntax tree {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported syntax tree version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Syntax tree nests deeper than {max} JSON levels")]
    TooDeep { max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    CompilationUnit,
    Declaration,
    Attribute,
    Invocation,
    MemberAccess,
    Identifier,
    ArgumentList,
    Argument,
    StringLiteral,
    NumericLiteral,
    Lambda,
    Block,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn child(&self, index: usize) -> Option<&SyntaxNode> {
        self.children.get(index)
    }

    /// Children of the given kind, in order
    pub fn children_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// Pre-order traversal starting at (and including) this node
    ///
    /// Each node is paired with the nearest `declaration` strictly above it.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![(self, None)],
        }
    }

    /// Expressions of an `invocation`'s argument list
    ///
    /// Returns `None` when the node is not an invocation or has no argument list.
    pub fn invocation_arguments(&self) -> Option<Vec<&SyntaxNode>> {
        if !self.is(NodeKind::Invocation) {
            return None;
        }
        let list = self.child(1).filter(|c| c.is(NodeKind::ArgumentList))?;
        Some(argument_expressions(list))
    }

    /// Expressions of an `attribute`'s argument list (empty when it has none)
    pub fn attribute_arguments(&self) -> Vec<&SyntaxNode> {
        self.children_of_kind(NodeKind::ArgumentList)
            .next()
            .map(argument_expressions)
            .unwrap_or_default()
    }
}

fn argument_expressions(list: &SyntaxNode) -> Vec<&SyntaxNode> {
    list.children_of_kind(NodeKind::Argument)
        .map(|arg| arg.child(0).unwrap_or(arg))
        .collect()
}

/// Iterative walk, so tree depth never grows the call stack
pub struct Descendants<'a> {
    stack: Vec<(&'a SyntaxNode, Option<&'a SyntaxNode>)>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (&'a SyntaxNode, Option<&'a SyntaxNode>);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, enclosing) = self.stack.pop()?;
        let scope = if node.is(NodeKind::Declaration) {
            Some(node)
        } else {
            enclosing
        };
        self.stack
            .extend(node.children.iter().rev().map(|child| (child, scope)));
        Some((node, enclosing))
    }
}

/// One lowered compilation unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    pub root: SyntaxNode,
}

impl SyntaxTree {
    pub fn new(root: SyntaxNode) -> Self {
        Self {
            version: IR_VERSION,
            path: None,
            root,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SyntaxError> {
        if exceeds_nesting(json, MAX_NESTING_DEPTH) {
            return Err(SyntaxError::TooDeep {
                max: MAX_NESTING_DEPTH,
            });
        }

        // Depth is bounded above, so serde_json's own 128-level cap is lifted.
        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let tree = SyntaxTree::deserialize(&mut deserializer)?;
        deserializer.end()?;

        if tree.version != IR_VERSION {
            return Err(SyntaxError::UnsupportedVersion {
                found: tree.version,
                expected: IR_VERSION,
            });
        }
        Ok(tree)
    }

    pub fn from_path(path: &Path) -> Result<Self, SyntaxError> {
        let content = std::fs::read_to_string(path).map_err(|source| SyntaxError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut tree = Self::from_json(&content)?;
        if tree.path.is_none() {
            tree.path = Some(path.display().to_string());
        }
        Ok(tree)
    }

    pub fn to_json(&self) -> Result<String, SyntaxError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Display label used in logs
    pub fn label(&self) -> &str {
        self.path.as_deref().unwrap_or("<memory>")
    }
}

/// Whether `json` opens more than `max` nested objects/arrays
///
/// Brackets inside string literals are skipped. Malformed input is left for
/// the parser to reject.
fn exceeds_nesting(json: &str, max: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > max {
                    return true;
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    false
}
