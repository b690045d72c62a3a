//! The output AST: a source-mapped text tree.
//!
//! Nodes are immutable once built and shared as `Arc<Node>`; a
//! memoized node may appear in several parents, so tree walks key
//! their visited-sets on pointer identity. Three flavors exist: plain
//! text, declarations (the body of a top-level declaration at a
//! location) and references (a cross-declaration dependency).

use std::sync::Arc;

use tygen_common::SourceLocation;
use tygen_model::{TypeId, TypePath};

use crate::location::DeclarationLocation;

/// One piece of a node: inline text or a child node.
#[derive(Debug, Clone)]
pub enum Part {
    Text(String),
    Child(Arc<Node>),
}

/// The flavor of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure text with children.
    Plain,
    /// The body of a top-level declaration at `location`.
    Declaration { location: DeclarationLocation },
    /// A dependency on the declaration at `refers_to`. When the
    /// referenced declaration node itself is known it rides along so
    /// the orchestrator can route it to its file.
    Reference {
        refers_to: DeclarationLocation,
        declaration: Option<Arc<Node>>,
    },
}

/// A textual segment of generated output.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    parts: Vec<Part>,
    ty: Option<TypeId>,
    path: Option<TypePath>,
    source: Option<SourceLocation>,
    should_cache: bool,
}

impl Node {
    /// Start a plain node.
    #[must_use]
    pub fn plain() -> NodeBuilder {
        NodeBuilder::new(NodeKind::Plain, true)
    }

    /// Start a declaration node for `location`.
    #[must_use]
    pub fn declaration(location: DeclarationLocation) -> NodeBuilder {
        NodeBuilder::new(NodeKind::Declaration { location }, true)
    }

    /// Start a reference node pointing at `refers_to`. Reference
    /// nodes default to not being cached: how a reference renders
    /// depends on where it is rendered from.
    #[must_use]
    pub fn reference(refers_to: DeclarationLocation) -> NodeBuilder {
        NodeBuilder::new(
            NodeKind::Reference {
                refers_to,
                declaration: None,
            },
            false,
        )
    }

    /// Start a reference node that also carries the referenced
    /// declaration node.
    #[must_use]
    pub fn reference_to_declaration(
        refers_to: DeclarationLocation,
        declaration: Arc<Node>,
    ) -> NodeBuilder {
        NodeBuilder::new(
            NodeKind::Reference {
                refers_to,
                declaration: Some(declaration),
            },
            false,
        )
    }

    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    #[must_use]
    pub fn ty(&self) -> Option<TypeId> {
        self.ty
    }

    #[must_use]
    pub fn path(&self) -> Option<&TypePath> {
        self.path.as_ref()
    }

    #[must_use]
    pub fn source(&self) -> Option<&SourceLocation> {
        self.source.as_ref()
    }

    #[must_use]
    pub fn should_cache(&self) -> bool {
        self.should_cache
    }

    #[must_use]
    pub fn is_declaration(&self) -> bool {
        matches!(self.kind, NodeKind::Declaration { .. })
    }

    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self.kind, NodeKind::Reference { .. })
    }

    /// The declaration location, for declaration nodes.
    #[must_use]
    pub fn declaration_location(&self) -> Option<&DeclarationLocation> {
        match &self.kind {
            NodeKind::Declaration { location } => Some(location),
            _ => None,
        }
    }

    /// The referenced location, for reference nodes.
    #[must_use]
    pub fn refers_to(&self) -> Option<&DeclarationLocation> {
        match &self.kind {
            NodeKind::Reference { refers_to, .. } => Some(refers_to),
            _ => None,
        }
    }

    /// This node, opted into memoization. Reference nodes default out
    /// of the cache; a backend whose reference form does not depend on
    /// the surrounding context upgrades them with this.
    #[must_use]
    pub fn cached(self: Arc<Self>) -> Arc<Node> {
        if self.should_cache {
            return self;
        }
        let mut node = (*self).clone();
        node.should_cache = true;
        Arc::new(node)
    }

    /// The concatenated text of this node and its children.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Child(child) => child.collect_text(out),
            }
        }
    }
}

/// Builder for output nodes.
#[derive(Debug)]
pub struct NodeBuilder {
    kind: NodeKind,
    parts: Vec<Part>,
    ty: Option<TypeId>,
    path: Option<TypePath>,
    source: Option<SourceLocation>,
    should_cache: bool,
}

impl NodeBuilder {
    fn new(kind: NodeKind, should_cache: bool) -> Self {
        Self {
            kind,
            parts: Vec::new(),
            ty: None,
            path: None,
            source: None,
            should_cache,
        }
    }

    /// Append inline text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text(text.into()));
        self
    }

    /// Append a child node.
    #[must_use]
    pub fn child(mut self, child: Arc<Node>) -> Self {
        self.parts.push(Part::Child(child));
        self
    }

    /// Append every node of an iterator, separated by `separator`.
    #[must_use]
    pub fn children_separated(
        mut self,
        children: impl IntoIterator<Item = Arc<Node>>,
        separator: &str,
    ) -> Self {
        for (i, child) in children.into_iter().enumerate() {
            if i > 0 {
                self.parts.push(Part::Text(separator.to_owned()));
            }
            self.parts.push(Part::Child(child));
        }
        self
    }

    /// Record the originating type and path, for debugging and
    /// source-map attribution.
    #[must_use]
    pub fn origin(mut self, ty: TypeId, path: TypePath) -> Self {
        self.ty = Some(ty);
        self.path = Some(path);
        self
    }

    /// Attach an explicit source position, overriding the originating
    /// type's declaration site.
    #[must_use]
    pub fn source(mut self, location: SourceLocation) -> Self {
        self.source = Some(location);
        self
    }

    /// Exclude the built node from memoization. Required when the
    /// rendering depends on surrounding context.
    #[must_use]
    pub fn do_not_cache(mut self) -> Self {
        self.should_cache = false;
        self
    }

    #[must_use]
    pub fn build(self) -> Arc<Node> {
        Arc::new(Node {
            kind: self.kind,
            parts: self.parts,
            ty: self.ty,
            path: self.path,
            source: self.source,
            should_cache: self.should_cache,
        })
    }
}

#[cfg(test)]
#[path = "../tests/node_tests.rs"]
mod tests;
