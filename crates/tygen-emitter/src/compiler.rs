//! The compiler orchestrator.
//!
//! Owns the per-compilation program state and a single reentrant
//! `current` output-location cell, saved and restored around every
//! recursive invocation. The orchestrator memoizes backend output per
//! type, breaks cycles with reference nodes once a declaration
//! location exists, assigns deterministic unique declaration names,
//! routes declaration nodes to files, and renders each touched file
//! through the backend.

use std::cell::RefCell;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashMap, FxHashSet};

use tygen_common::SourceMap;
use tygen_model::{
    CompileError, RecursionGuard, RecursionProfile, RecursionResult, TypeData, TypeDatabase,
    TypeId, TypeKind, TypePath, VisitArgs, walk,
};

use crate::backend::{Backend, CompileArgs, FileData, ReferenceArgs, ReferenceTarget};
use crate::location::{DeclarationLocation, Location};
use crate::names::infer_type_name;
use crate::node::{Node, NodeKind, Part};
use crate::serializer::serialize;

/// One requested output: a type and where its declaration should go.
#[derive(Debug, Clone)]
pub struct EntryPoint {
    pub ty: TypeId,
    pub location: Location,
    pub name: Option<String>,
}

impl EntryPoint {
    #[must_use]
    pub fn new(ty: TypeId, location: Location) -> Self {
        Self {
            ty,
            location,
            name: None,
        }
    }

    #[must_use]
    pub fn named(ty: TypeId, location: Location, name: impl Into<String>) -> Self {
        Self {
            ty,
            location,
            name: Some(name.into()),
        }
    }
}

/// A suggested placement for `assign_declaration_location`.
#[derive(Debug, Clone)]
pub struct LocationHint {
    pub location: Location,
    pub name: Option<String>,
}

/// One output file, accumulating during compilation.
#[derive(Debug, Default)]
pub struct FileBuilder {
    file_name: String,
    nodes: Vec<Arc<Node>>,
    node_set: FxHashSet<usize>,
    references: IndexSet<DeclarationLocation>,
}

impl FileBuilder {
    fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_owned(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Nodes assigned to this file, in assignment order.
    #[must_use]
    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    /// Outgoing reference locations, insertion-ordered and
    /// deduplicated.
    #[must_use]
    pub fn references(&self) -> &IndexSet<DeclarationLocation> {
        &self.references
    }

    fn push_node(&mut self, node: &Arc<Node>) {
        let key = Arc::as_ptr(node) as usize;
        if self.node_set.insert(key) {
            self.nodes.push(node.clone());
        }
    }

    fn add_reference(&mut self, location: DeclarationLocation) {
        self.references.insert(location);
    }

    fn to_file_data(&self) -> FileData {
        FileData {
            file_name: self.file_name.clone(),
            nodes: self.nodes.clone(),
            references: self.references.clone(),
        }
    }
}

/// Per-compilation state.
#[derive(Debug, Default)]
pub struct Program {
    entry_points: Vec<(TypeId, DeclarationLocation)>,
    files: IndexMap<String, FileBuilder>,
    type_to_location: FxHashMap<TypeId, DeclarationLocation>,
    type_to_node: FxHashMap<TypeId, Arc<Node>>,
    name_counts: FxHashMap<(String, Option<Vec<String>>, String), u32>,
}

impl Program {
    #[must_use]
    pub fn entry_points(&self) -> &[(TypeId, DeclarationLocation)] {
        &self.entry_points
    }

    #[must_use]
    pub fn files(&self) -> &IndexMap<String, FileBuilder> {
        &self.files
    }

    /// The declaration location assigned to `ty`, if any.
    #[must_use]
    pub fn declaration_location(&self, ty: TypeId) -> Option<&DeclarationLocation> {
        self.type_to_location.get(&ty)
    }

    /// The memoized node compiled for `ty`, if any.
    #[must_use]
    pub fn node_for(&self, ty: TypeId) -> Option<&Arc<Node>> {
        self.type_to_node.get(&ty)
    }

    fn file_mut(&mut self, file_name: &str) -> &mut FileBuilder {
        self.files
            .entry(file_name.to_owned())
            .or_insert_with(|| FileBuilder::new(file_name))
    }

    /// Assign a node tree to files: declarations go to their own
    /// file, references record an edge in the file they appear in.
    /// The file builders deduplicate nodes by identity, so walks from
    /// several entry points contribute each declaration once.
    fn assign_node(
        &mut self,
        node: &Arc<Node>,
        current_file: &str,
        is_root: bool,
        visited: &mut FxHashSet<usize>,
    ) {
        let key = Arc::as_ptr(node) as usize;
        if !visited.insert(key) {
            return;
        }

        let mut file = current_file.to_owned();
        match node.kind() {
            NodeKind::Reference {
                refers_to,
                declaration,
            } => {
                self.file_mut(&file).add_reference(refers_to.clone());
                if let Some(declaration) = declaration {
                    self.assign_node(&declaration.clone(), &file, false, visited);
                }
            }
            NodeKind::Declaration { location } => {
                file = location.location.file_name.clone();
                self.file_mut(&file).push_node(node);
            }
            NodeKind::Plain => {
                if is_root {
                    self.file_mut(&file).push_node(node);
                }
            }
        }

        let parts: Vec<Arc<Node>> = node
            .parts()
            .iter()
            .filter_map(|part| match part {
                Part::Child(child) => Some(child.clone()),
                Part::Text(_) => None,
            })
            .collect();
        for child in parts {
            self.assign_node(&child, &file, false, visited);
        }
    }
}

/// One rendered output file.
#[derive(Debug, Clone)]
pub struct CompiledFile {
    pub text: String,
    pub source_map: SourceMap,
    pub ast: Arc<Node>,
    pub compiled_from: Vec<TypeId>,
}

/// The result of `compile_program`.
#[derive(Debug)]
pub struct Output {
    pub files: IndexMap<String, CompiledFile>,
    pub program: Program,
}

#[derive(Debug)]
struct CompilerState {
    current: Option<Location>,
    program: Program,
    guard: RecursionGuard<TypeId>,
}

impl CompilerState {
    fn new() -> Self {
        Self {
            current: None,
            program: Program::default(),
            guard: RecursionGuard::with_profile(RecursionProfile::Compilation),
        }
    }
}

/// The compiler orchestrator. See the module docs.
pub struct Compiler<'a> {
    db: &'a dyn TypeDatabase,
    backend: &'a dyn Backend,
    state: RefCell<CompilerState>,
}

impl<'a> Compiler<'a> {
    #[must_use]
    pub fn new(db: &'a dyn TypeDatabase, backend: &'a dyn Backend) -> Self {
        Self {
            db,
            backend,
            state: RefCell::new(CompilerState::new()),
        }
    }

    #[must_use]
    pub fn db(&self) -> &'a dyn TypeDatabase {
        self.db
    }

    /// Compile a set of entry points into rendered files.
    #[tracing::instrument(level = "trace", skip_all, fields(entries = entries.len()))]
    pub fn compile_program(&self, entries: &[EntryPoint]) -> Result<Output, CompileError> {
        self.state.replace(CompilerState::new());

        // Entry types get their declaration locations up front, so
        // every cycle back into an entry can break at a reference.
        for entry in entries {
            let assigned = self.assign_declaration_location(
                entry.ty,
                Some(LocationHint {
                    location: entry.location.clone(),
                    name: entry.name.clone(),
                }),
            );
            self.state
                .borrow_mut()
                .program
                .entry_points
                .push((entry.ty, assigned));
        }

        for (index, entry) in entries.iter().enumerate() {
            let assigned = self.state.borrow().program.entry_points[index].1.clone();
            let root = self.compile_type_in(entry.ty, TypePath::empty(), assigned.location.clone())?;
            let mut visited = FxHashSet::default();
            self.state.borrow_mut().program.assign_node(
                &root,
                &assigned.location.file_name,
                true,
                &mut visited,
            );
        }

        let file_data: Vec<FileData> = self
            .state
            .borrow()
            .program
            .files
            .values()
            .map(FileBuilder::to_file_data)
            .collect();

        let mut files = IndexMap::new();
        for data in file_data {
            let ast = self.backend.compile_file(&data)?;
            let (text, source_map) = serialize(self.db, &data.file_name, &ast);
            let compiled_from = self
                .state
                .borrow()
                .program
                .entry_points
                .iter()
                .filter(|(_, location)| location.location.file_name == data.file_name)
                .map(|(ty, _)| *ty)
                .collect();
            files.insert(
                data.file_name.clone(),
                CompiledFile {
                    text,
                    source_map,
                    ast,
                    compiled_from,
                },
            );
        }

        let program = self.state.replace(CompilerState::new()).program;
        Ok(Output { files, program })
    }

    /// Compile one type reached via `path`.
    pub fn compile_type(&self, ty: TypeId, path: &TypePath) -> Result<Arc<Node>, CompileError> {
        self.compile_type_at(ty, path.clone(), None)
    }

    /// Compile one type, overriding the current output location.
    pub fn compile_type_in(
        &self,
        ty: TypeId,
        path: TypePath,
        output_location: Location,
    ) -> Result<Arc<Node>, CompileError> {
        self.compile_type_at(ty, path, Some(output_location))
    }

    fn compile_type_at(
        &self,
        ty: TypeId,
        path: TypePath,
        output_location: Option<Location>,
    ) -> Result<Arc<Node>, CompileError> {
        let saved = {
            let mut state = self.state.borrow_mut();
            let saved = state.current.clone();
            if let Some(location) = output_location {
                state.current = Some(location);
            }
            saved
        };
        let result = walk(self.db, path, ty, &|args: VisitArgs<'_, Arc<Node>>| {
            self.kernel(args)
        });
        self.state.borrow_mut().current = saved;
        result
    }

    /// The compilation kernel: memo cache, error surfacing, cycle
    /// breaking, backend delegation, conditional caching.
    fn kernel(&self, args: VisitArgs<'_, Arc<Node>>) -> Result<Arc<Node>, CompileError> {
        let ty = args.ty;

        if let Some(node) = self.state.borrow().program.type_to_node.get(&ty) {
            return Ok(node.clone());
        }

        if let TypeData::Error(message) = self.db.lookup(ty) {
            return Err(CompileError::type_has_error(message.to_string()));
        }

        if args.path.includes(ty) {
            return self.cycle_reference(ty, args.path);
        }

        let entered = self.state.borrow_mut().guard.enter(ty);
        match entered {
            RecursionResult::Entered => {}
            // A backend that recursed with a fresh path still cannot
            // run off the end of the graph.
            RecursionResult::CycleDetected => return self.cycle_reference(ty, args.path),
            RecursionResult::DepthExceeded | RecursionResult::IterationsExceeded => {
                return Err(self.circular_error(ty, args.path));
            }
        }

        let result = self.backend.compile_type(&CompileArgs {
            ty,
            path: args.path,
            visit: &args.visit,
            compiler: self,
        });
        self.state.borrow_mut().guard.leave(&ty);
        let node = result?;

        if node.should_cache() {
            self.state
                .borrow_mut()
                .program
                .type_to_node
                .insert(ty, node.clone());
        }
        Ok(node)
    }

    /// Break a cyclic revisit with a reference node, when a
    /// declaration location exists to refer to.
    fn cycle_reference(&self, ty: TypeId, path: &TypePath) -> Result<Arc<Node>, CompileError> {
        let location = self
            .state
            .borrow()
            .program
            .type_to_location
            .get(&ty)
            .cloned();
        match location {
            Some(location) => {
                let from = self
                    .state
                    .borrow()
                    .current
                    .clone()
                    .ok_or_else(CompileError::reference_without_location)?;
                self.compile_reference(from, ReferenceTarget::location(location))
            }
            None => Err(self.circular_error(ty, path)),
        }
    }

    /// The circular-compilation diagnostic, naming the first named
    /// type on the cyclic subpath.
    fn circular_error(&self, ty: TypeId, path: &TypePath) -> CompileError {
        let name = path
            .subpath_from(ty)
            .and_then(|subpath| {
                subpath
                    .steps()
                    .iter()
                    .find_map(|step| self.db.name(step.from))
            })
            .or_else(|| self.db.name(ty))
            .unwrap_or_else(|| self.db.kind(ty).to_string());
        CompileError::circular_compilation(name)
    }

    /// Compile the syntactic form used at `from` to refer to `to`.
    pub fn compile_reference(
        &self,
        from: Location,
        to: ReferenceTarget,
    ) -> Result<Arc<Node>, CompileError> {
        let saved = {
            let mut state = self.state.borrow_mut();
            let saved = state.current.clone();
            state.current = Some(from.clone());
            saved
        };
        let result = self.backend.compile_reference(&ReferenceArgs {
            from,
            to: to.clone(),
            compiler: self,
        });
        self.state.borrow_mut().current = saved;
        let node = result?;

        // A backend may answer with a plain node; wrap cacheable ones
        // so reference edges are still collected during file
        // assignment.
        let node = match node.kind() {
            NodeKind::Plain if node.should_cache() => {
                let mut builder = match to.declaration {
                    Some(declaration) => {
                        Node::reference_to_declaration(to.location, declaration)
                    }
                    None => Node::reference(to.location),
                };
                if let Some(ty) = node.ty() {
                    let path = node.path().cloned().unwrap_or_default();
                    builder = builder.origin(ty, path);
                }
                builder.child(node).build()
            }
            _ => node,
        };
        Ok(node)
    }

    /// Assign (or return the existing) declaration location for `ty`.
    ///
    /// Placement: explicit hint, then the backend's suggestion, then
    /// the current output location, then empty. Naming: explicit hint,
    /// then inference; uniqueness per `(file, namespace, base name)`
    /// by counter suffix in assignment order.
    pub fn assign_declaration_location(
        &self,
        ty: TypeId,
        hint: Option<LocationHint>,
    ) -> DeclarationLocation {
        if let Some(existing) = self.state.borrow().program.type_to_location.get(&ty) {
            return existing.clone();
        }

        let current = self.state.borrow().current.clone();
        let location = hint
            .as_ref()
            .map(|h| h.location.clone())
            .or_else(|| self.backend.suggest_declaration_location(ty, current.as_ref()))
            .or(current)
            .unwrap_or_default();
        let base = hint
            .and_then(|h| h.name)
            .unwrap_or_else(|| infer_type_name(self.db, ty));

        let mut state = self.state.borrow_mut();
        let count = state
            .program
            .name_counts
            .entry((location.file_name.clone(), location.namespace.clone(), base.clone()))
            .or_insert(0);
        *count += 1;
        let name = if *count == 1 {
            base
        } else {
            format!("{base}{}", *count - 1)
        };

        let assigned = DeclarationLocation::new(location, name);
        if self.db.kind(ty) == TypeKind::Enum {
            if let Some(declared) = self.db.name(ty) {
                if declared != assigned.name {
                    tracing::warn!(
                        declared,
                        assigned = assigned.name,
                        "enum declaration renamed to keep names unique"
                    );
                }
            }
        }
        state.program.type_to_location.insert(ty, assigned.clone());
        assigned
    }

    /// The declaration location already assigned to `ty`, if any.
    #[must_use]
    pub fn declaration_location(&self, ty: TypeId) -> Option<DeclarationLocation> {
        self.state
            .borrow()
            .program
            .type_to_location
            .get(&ty)
            .cloned()
    }

    /// The current output location.
    #[must_use]
    pub fn current_output_location(&self) -> Option<Location> {
        self.state.borrow().current.clone()
    }
}

/// Compile `entries` with `backend` over the types in `db`.
pub fn compile(
    db: &dyn TypeDatabase,
    backend: &dyn Backend,
    entries: &[EntryPoint],
) -> Result<Output, CompileError> {
    Compiler::new(db, backend).compile_program(entries)
}
