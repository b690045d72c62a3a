//! A small record-dialect backend shared by the integration tests.
//!
//! The dialect: named object-likes become `record Name { ... }`
//! declarations referenced by bare name, anonymous objects render
//! inline, unions become `union Name = A | B;` declarations at the
//! top level, and cross-file references produce `using file;` headers.

use std::cell::RefCell;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tygen_model::{
    CompileError, Edge, ObjectType, TypeData, TypeDatabase, TypeId, TypeKind, TypeOrigin,
    TypeStore,
};

use tygen_emitter::{
    Backend, CompileArgs, FileData, Location, Node, ReferenceArgs, ReferenceTarget,
};

pub struct RecordBackend {
    compile_calls: RefCell<FxHashMap<TypeId, u32>>,
    suggestions: RefCell<FxHashMap<TypeId, Location>>,
}

impl RecordBackend {
    pub fn new() -> Self {
        Self {
            compile_calls: RefCell::new(FxHashMap::default()),
            suggestions: RefCell::new(FxHashMap::default()),
        }
    }

    /// Route declarations for `ty` to `location`.
    pub fn suggest(&self, ty: TypeId, location: Location) {
        self.suggestions.borrow_mut().insert(ty, location);
    }

    /// How many times `compile_type` ran for `ty`.
    pub fn calls_for(&self, ty: TypeId) -> u32 {
        self.compile_calls.borrow().get(&ty).copied().unwrap_or(0)
    }

    fn declare_record(
        &self,
        args: &CompileArgs<'_>,
        object: &ObjectType,
    ) -> Result<Arc<Node>, CompileError> {
        let location = args.compiler.assign_declaration_location(args.ty, None);
        let mut builder = Node::declaration(location.clone())
            .origin(args.ty, args.path.clone())
            .text(format!("record {} {{\n", location.name));
        for (index, member) in object.members.iter().enumerate() {
            let child = args.visit.step(
                Edge::NamedMember {
                    index,
                    name: member.name.clone(),
                },
                member.ty,
            )?;
            let optional = if member.optional { "?" } else { "" };
            builder = builder
                .text(format!("    {}{}: ", member.name, optional))
                .child(child)
                .text(";\n");
        }
        let declaration = builder.text("}\n").build();
        self.reference_to(args, location, declaration)
    }

    fn declare_enum(
        &self,
        args: &CompileArgs<'_>,
        members: &[TypeId],
    ) -> Result<Arc<Node>, CompileError> {
        let location = args.compiler.assign_declaration_location(args.ty, None);
        let mut builder = Node::declaration(location.clone())
            .origin(args.ty, args.path.clone())
            .text(format!("enum {} {{\n", location.name));
        for (index, &member) in members.iter().enumerate() {
            let child = args.visit.step(Edge::Variant { index }, member)?;
            builder = builder.text("    ").child(child).text(";\n");
        }
        let declaration = builder.text("}\n").build();
        self.reference_to(args, location, declaration)
    }

    /// Declarations are always referenced by name where they occur;
    /// the declaration node rides along so the orchestrator can route
    /// it to its file.
    fn reference_to(
        &self,
        args: &CompileArgs<'_>,
        location: tygen_emitter::DeclarationLocation,
        declaration: Arc<Node>,
    ) -> Result<Arc<Node>, CompileError> {
        let from = args
            .compiler
            .current_output_location()
            .ok_or_else(CompileError::reference_without_location)?;
        let reference = args
            .compiler
            .compile_reference(from, ReferenceTarget::declaration(location, declaration))?;
        Ok(reference.cached())
    }

    fn literal_text(db: &dyn TypeDatabase, ty: TypeId) -> String {
        match db.lookup(ty) {
            TypeData::StringLiteral(value) => format!("\"{value}\""),
            TypeData::NumberLiteral(value) => value.to_string(),
            TypeData::BooleanLiteral(value) => value.to_string(),
            TypeData::BigIntLiteral(value) => format!("{value}n"),
            _ => String::new(),
        }
    }
}

impl Backend for RecordBackend {
    fn compile_type(&self, args: &CompileArgs<'_>) -> Result<Arc<Node>, CompileError> {
        *self
            .compile_calls
            .borrow_mut()
            .entry(args.ty)
            .or_insert(0) += 1;

        let db = args.compiler.db();
        let ty = args.ty;
        let data = db.lookup(ty);

        if data.kind().is_primitive() {
            return Ok(Node::plain()
                .text(data.kind().as_str())
                .origin(ty, args.path.clone())
                .build());
        }

        match data {
            TypeData::StringLiteral(_)
            | TypeData::NumberLiteral(_)
            | TypeData::BooleanLiteral(_)
            | TypeData::BigIntLiteral(_) => Ok(Node::plain()
                .text(Self::literal_text(db, ty))
                .origin(ty, args.path.clone())
                .build()),
            TypeData::Object(object) => {
                if object.name.is_some() {
                    self.declare_record(args, &object)
                } else {
                    let mut builder = Node::plain().origin(ty, args.path.clone()).text("{ ");
                    for (index, member) in object.members.iter().enumerate() {
                        let child = args.visit.step(
                            Edge::NamedMember {
                                index,
                                name: member.name.clone(),
                            },
                            member.ty,
                        )?;
                        builder = builder
                            .text(format!("{}: ", member.name))
                            .child(child)
                            .text("; ");
                    }
                    Ok(builder.text("}").build())
                }
            }
            TypeData::Union(union) => {
                let mut variants = Vec::with_capacity(union.variants.len());
                for (index, &variant) in union.variants.iter().enumerate() {
                    variants.push(args.visit.step(Edge::Variant { index }, variant)?);
                }
                if args.path.is_empty() {
                    let location = args.compiler.assign_declaration_location(ty, None);
                    Ok(Node::declaration(location.clone())
                        .origin(ty, args.path.clone())
                        .text(format!("union {} = ", location.name))
                        .children_separated(variants, " | ")
                        .text(";\n")
                        .build())
                } else {
                    Ok(Node::plain()
                        .origin(ty, args.path.clone())
                        .children_separated(variants, " | ")
                        .build())
                }
            }
            TypeData::Intersection(intersection) => {
                let mut variants = Vec::with_capacity(intersection.variants.len());
                for (index, &variant) in intersection.variants.iter().enumerate() {
                    variants.push(args.visit.step(Edge::Variant { index }, variant)?);
                }
                Ok(Node::plain()
                    .origin(ty, args.path.clone())
                    .children_separated(variants, " & ")
                    .build())
            }
            TypeData::Array { element } => {
                let child = args.visit.step(Edge::NumberIndex, element)?;
                Ok(Node::plain()
                    .origin(ty, args.path.clone())
                    .child(child)
                    .text("[]")
                    .build())
            }
            TypeData::Tuple(tuple) => {
                let mut members = Vec::with_capacity(tuple.members.len());
                for (index, member) in tuple.members.iter().enumerate() {
                    members.push(args.visit.step(Edge::IndexedMember { index }, member.ty)?);
                }
                Ok(Node::plain()
                    .origin(ty, args.path.clone())
                    .text("[")
                    .children_separated(members, ", ")
                    .text("]")
                    .build())
            }
            TypeData::Promise { element } => {
                let child = args.visit.step(Edge::Awaited, element)?;
                Ok(Node::plain()
                    .origin(ty, args.path.clone())
                    .text("promise<")
                    .child(child)
                    .text(">")
                    .build())
            }
            TypeData::Callable(callable) => {
                let mut builder = Node::plain().origin(ty, args.path.clone()).text("fn(");
                for (index, parameter) in callable.parameters.iter().enumerate() {
                    let child = args.visit.step(
                        Edge::Parameter {
                            index,
                            name: parameter.name.clone(),
                        },
                        parameter.ty,
                    )?;
                    if index > 0 {
                        builder = builder.text(", ");
                    }
                    builder = builder.text(format!("{}: ", parameter.name)).child(child);
                }
                let ret = args.visit.step(Edge::Return, callable.return_type)?;
                Ok(builder.text(") -> ").child(ret).build())
            }
            TypeData::Alias(alias) => args.visit.step(Edge::Aliased, alias.target),
            TypeData::GenericArguments(generic) => {
                args.visit.step(Edge::Aliased, generic.instantiated)
            }
            TypeData::Enum(enumeration) => self.declare_enum(args, &enumeration.members),
            TypeData::EnumMember(member) => {
                // Inside its enum declaration a member is a definition;
                // referenced anywhere else it is its qualified name.
                let inside_enum = args.path.last().is_some_and(|step| {
                    matches!(step.edge, Edge::Variant { .. })
                        && db.kind(step.from) == TypeKind::Enum
                });
                let text = if inside_enum {
                    format!("{} = {}", member.name, Self::literal_text(db, member.value))
                } else {
                    member.qualified_name.clone()
                };
                Ok(Node::plain()
                    .text(text)
                    .origin(ty, args.path.clone())
                    .do_not_cache()
                    .build())
            }
            other => Err(CompileError::no_backend_for_kind(other.kind())),
        }
    }

    fn compile_reference(&self, args: &ReferenceArgs<'_>) -> Result<Arc<Node>, CompileError> {
        // Bare name everywhere; cross-file resolution happens through
        // the `using` headers compile_file emits.
        Ok(Node::plain().text(args.to.location.name.clone()).build())
    }

    fn compile_file(&self, file: &FileData) -> Result<Arc<Node>, CompileError> {
        let mut builder = Node::plain();
        let mut imported: Vec<&str> = Vec::new();
        for reference in &file.references {
            let target = reference.file_name();
            if target != file.file_name && !imported.contains(&target) {
                imported.push(target);
                builder = builder.text(format!("using {target};\n"));
            }
        }
        if !imported.is_empty() {
            builder = builder.text("\n");
        }
        for node in &file.nodes {
            builder = builder.child(node.clone());
        }
        Ok(builder.build())
    }

    fn suggest_declaration_location(
        &self,
        ty: TypeId,
        _from: Option<&Location>,
    ) -> Option<Location> {
        self.suggestions.borrow().get(&ty).cloned()
    }
}

/// A `TypeStore` view with source text attached, for source-map
/// embedding tests.
pub struct StoreWithSources<'a> {
    pub store: &'a TypeStore,
    pub files: FxHashMap<String, String>,
}

impl TypeDatabase for StoreWithSources<'_> {
    fn lookup(&self, id: TypeId) -> TypeData {
        self.store.lookup(id)
    }

    fn origin(&self, id: TypeId) -> TypeOrigin {
        self.store.origin(id)
    }

    fn source_text(&self, file: &str) -> Option<String> {
        self.files.get(file).cloned()
    }
}
