//! The contract a pluggable target backend implements.

use std::sync::Arc;

use indexmap::IndexSet;
use tygen_model::{CompileError, TypeId, TypePath, Visit};

use crate::compiler::Compiler;
use crate::location::{DeclarationLocation, Location};
use crate::node::Node;

/// What `compile_type` receives: the type, the path that reached it,
/// the traversal handle for recursing into inner types, and the
/// orchestrator for reentrant calls (`compile_type`,
/// `compile_reference`, `assign_declaration_location`).
pub struct CompileArgs<'a> {
    pub ty: TypeId,
    pub path: &'a TypePath,
    pub visit: &'a Visit<'a, Arc<Node>>,
    pub compiler: &'a Compiler<'a>,
}

/// The target of a reference: a declaration location, optionally with
/// the declaration node itself.
#[derive(Debug, Clone)]
pub struct ReferenceTarget {
    pub location: DeclarationLocation,
    pub declaration: Option<Arc<Node>>,
}

impl ReferenceTarget {
    #[must_use]
    pub fn location(location: DeclarationLocation) -> Self {
        Self {
            location,
            declaration: None,
        }
    }

    #[must_use]
    pub fn declaration(location: DeclarationLocation, declaration: Arc<Node>) -> Self {
        Self {
            location,
            declaration: Some(declaration),
        }
    }
}

/// What `compile_reference` receives.
pub struct ReferenceArgs<'a> {
    pub from: Location,
    pub to: ReferenceTarget,
    pub compiler: &'a Compiler<'a>,
}

/// Everything known about one output file when it is rendered: its
/// declarations in assignment order and the locations it references.
#[derive(Debug, Clone)]
pub struct FileData {
    pub file_name: String,
    pub nodes: Vec<Arc<Node>>,
    pub references: IndexSet<DeclarationLocation>,
}

/// A target backend: renders types, references and files for one
/// output dialect.
pub trait Backend {
    /// Render one type. May recurse through `args.visit` (which goes
    /// back through the orchestrator's cache and cycle breaking) and
    /// may reentrantly call the orchestrator.
    fn compile_type(&self, args: &CompileArgs<'_>) -> Result<Arc<Node>, CompileError>;

    /// Render the syntactic form used at `args.from` to refer to the
    /// declaration `args.to`. Typical behavior: a bare name within the
    /// same file and namespace, a qualified name across files.
    fn compile_reference(&self, args: &ReferenceArgs<'_>) -> Result<Arc<Node>, CompileError>;

    /// Render one whole output file from its declarations and
    /// outgoing references.
    fn compile_file(&self, file: &FileData) -> Result<Arc<Node>, CompileError>;

    /// Placement policy hook: where a declaration for `ty` should
    /// live, given the location compilation is currently emitting to.
    fn suggest_declaration_location(
        &self,
        _ty: TypeId,
        _from: Option<&Location>,
    ) -> Option<Location> {
        None
    }
}
