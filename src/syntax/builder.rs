//! Constructors for synthetic trees
//!
//! Front ends and tests use these instead of spelling out node shapes by hand.

use super::{NodeKind, SyntaxNode};

pub fn compilation_unit(children: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new(NodeKind::CompilationUnit).with_children(children)
}

pub fn block(children: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new(NodeKind::Block).with_children(children)
}

pub fn identifier(name: &str) -> SyntaxNode {
    SyntaxNode::new(NodeKind::Identifier).with_text(name)
}

pub fn string_literal(value: &str) -> SyntaxNode {
    SyntaxNode::new(NodeKind::StringLiteral).with_text(value)
}

pub fn numeric_literal(value: i64) -> SyntaxNode {
    SyntaxNode::new(NodeKind::NumericLiteral).with_text(value.to_string())
}

pub fn lambda() -> SyntaxNode {
    SyntaxNode::new(NodeKind::Lambda)
}

pub fn member_access(receiver: SyntaxNode, member: &str) -> SyntaxNode {
    SyntaxNode::new(NodeKind::MemberAccess).with_children(vec![receiver, identifier(member)])
}

pub fn argument_list(arguments: Vec<SyntaxNode>) -> SyntaxNode {
    let arguments = arguments
        .into_iter()
        .map(|expr| SyntaxNode::new(NodeKind::Argument).with_children(vec![expr]))
        .collect();
    SyntaxNode::new(NodeKind::ArgumentList).with_children(arguments)
}

pub fn invocation(callee: SyntaxNode, arguments: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new(NodeKind::Invocation).with_children(vec![callee, argument_list(arguments)])
}

/// `app.<method>(route, handler)`
pub fn map_call(method: &str, route: SyntaxNode, handler: SyntaxNode) -> SyntaxNode {
    invocation(member_access(identifier("app"), method), vec![route, handler])
}

pub fn attribute(name: &str, arguments: Vec<SyntaxNode>) -> SyntaxNode {
    let node = SyntaxNode::new(NodeKind::Attribute).with_text(name);
    if arguments.is_empty() {
        node
    } else {
        node.with_children(vec![argument_list(arguments)])
    }
}

pub fn declaration(name: &str, attributes: Vec<SyntaxNode>, body: Vec<SyntaxNode>) -> SyntaxNode {
    let mut children = attributes;
    children.push(block(body));
    SyntaxNode::new(NodeKind::Declaration)
        .with_text(name)
        .with_children(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_call_shape() {
        let call = map_call("MapPost", string_literal("/a"), lambda());

        assert!(call.is(NodeKind::Invocation));
        let callee = call.child(0).unwrap();
        assert!(callee.is(NodeKind::MemberAccess));
        assert_eq!(callee.child(1).and_then(|n| n.text()), Some("MapPost"));
        assert_eq!(call.child(1).unwrap().children.len(), 2);
    }

    #[test]
    fn test_attribute_without_arguments_has_no_list() {
        let attr = attribute("Obsolete", vec![]);
        assert!(attr.children.is_empty());
        assert!(attr.attribute_arguments().is_empty());
    }

    #[test]
    fn test_declaration_keeps_attributes_before_body() {
        let decl = declaration(
            "Configure",
            vec![attribute("FixedDelayRetry", vec![numeric_literal(3)])],
            vec![identifier("x")],
        );

        assert!(decl.child(0).unwrap().is(NodeKind::Attribute));
        assert!(decl.child(1).unwrap().is(NodeKind::Block));
    }
}
