//! Parser-independent syntax tree
//!
//! The generator never talks to a compiler front end directly. Front ends lower
//! their parse trees into this small, versioned node-kind/child-list form, and
//! the pipeline phases only ever see [`SyntaxTree`] values.
//!
//! # Shape conventions
//!
//! - `invocation`: child 0 is the callee, child 1 the `argument_list`
//! - `member_access`: child 0 is the receiver, child 1 an `identifier` naming the member
//! - `argument_list`: `argument` children, each wrapping exactly one expression
//! - `string_literal`: `text` is the unquoted literal value
//! - `declaration`: `text` is the declared name, `attribute` children decorate it
//! - `attribute`: `text` is the attribute name, optional `argument_list` child

pub mod builder;
mod tree;

pub use tree::{Descendants, NodeKind, SyntaxError, SyntaxNode, SyntaxTree, IR_VERSION};
