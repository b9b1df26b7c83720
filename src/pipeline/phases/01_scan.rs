use crate::error::GenerationError;
use crate::pipeline::CancellationToken;
use crate::syntax::{NodeKind, SyntaxNode, SyntaxTree};
use tracing::{debug, trace};

/// Route-registration methods recognised on a member access
pub const KNOWN_METHODS: [&str; 5] = ["MapGet", "MapPost", "MapPut", "MapDelete", "MapPatch"];

/// Route pattern and handler
pub const EXPECTED_ARGUMENTS: usize = 2;

/// Nodes visited between cancellation checks
pub const CANCELLATION_CHECK_INTERVAL: usize = 256;

/// A matched registration call, borrowed from the tree it was found in
#[derive(Debug, Clone)]
pub struct CallSiteCandidate<'a> {
    method: &'a str,
    arguments: Vec<&'a SyntaxNode>,
    declaration: Option<&'a SyntaxNode>,
}

impl<'a> CallSiteCandidate<'a> {
    pub fn new(
        method: &'a str,
        arguments: Vec<&'a SyntaxNode>,
        declaration: Option<&'a SyntaxNode>,
    ) -> Self {
        Self {
            method,
            arguments,
            declaration,
        }
    }

    /// Invoked member name, e.g. `MapGet`
    pub fn method(&self) -> &'a str {
        self.method
    }

    pub fn arguments(&self) -> &[&'a SyntaxNode] {
        &self.arguments
    }

    /// Nearest declaration enclosing the call
    pub fn declaration(&self) -> Option<&'a SyntaxNode> {
        self.declaration
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScanResult<'a> {
    pub candidates: Vec<CallSiteCandidate<'a>>,
    pub nodes_visited: usize,
}

impl<'a> ScanResult<'a> {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Collects registration call sites from every tree, in traversal order
pub fn execute<'a>(
    trees: &'a [SyntaxTree],
    cancellation: &CancellationToken,
) -> Result<ScanResult<'a>, GenerationError> {
    let mut result = ScanResult::default();

    for tree in trees {
        let before = result.candidates.len();
        scan_tree(tree, cancellation, &mut result)?;
        debug!(
            tree = tree.label(),
            candidates = result.candidates.len() - before,
            "Scanned syntax tree"
        );
    }

    Ok(result)
}

fn scan_tree<'a>(
    tree: &'a SyntaxTree,
    cancellation: &CancellationToken,
    result: &mut ScanResult<'a>,
) -> Result<(), GenerationError> {
    for (node, enclosing) in tree.root.descendants() {
        result.nodes_visited += 1;
        if result.nodes_visited % CANCELLATION_CHECK_INTERVAL == 0 {
            cancellation.check()?;
        }

        if let Some(candidate) = match_call_site(node, enclosing) {
            trace!(method = candidate.method(), "Matched call site");
            result.candidates.push(candidate);
            cancellation.check()?;
        }
    }

    Ok(())
}

/// Matches `<receiver>.<KnownMethod>(route, handler)` by shape alone
pub fn match_call_site<'a>(
    node: &'a SyntaxNode,
    declaration: Option<&'a SyntaxNode>,
) -> Option<CallSiteCandidate<'a>> {
    if !node.is(NodeKind::Invocation) {
        return None;
    }

    let callee = node.child(0).filter(|c| c.is(NodeKind::MemberAccess))?;
    let method = callee
        .child(1)
        .filter(|c| c.is(NodeKind::Identifier))
        .and_then(|c| c.text())?;

    if !KNOWN_METHODS.contains(&method) {
        return None;
    }

    let arguments = node.invocation_arguments()?;
    if arguments.len() != EXPECTED_ARGUMENTS {
        return None;
    }

    Some(CallSiteCandidate::new(method, arguments, declaration))
}
