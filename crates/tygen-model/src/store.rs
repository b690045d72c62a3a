//! The type arena (`TypeStore`) and the read interface over it
//! (`TypeDatabase`).
//!
//! Type identity is an arena index (`TypeId`) assigned once when a
//! type is created. All per-compilation caches key on `TypeId` and are
//! dropped with the compilation; the arena itself is append-only and
//! shared across compilations.
//!
//! Downstream code reads types only through `TypeDatabase`, so a
//! lazily-populating adapter is indistinguishable from a fully
//! populated store.

use std::sync::RwLock;

use tygen_common::SourceLocation;

use crate::types::{
    AliasType, CallableFlavor, CallableType, EnumMemberType, EnumType, GenericArgumentsType,
    IntersectionType, ObjectFlavor, ObjectType, Parameter, TupleMember, TupleType, TypeData,
    TypeKind, TypeMember, TypeParameterType, UnionType,
};

/// Identity of one type: an index into a `TypeStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub const STRING: TypeId = TypeId(0);
    pub const NUMBER: TypeId = TypeId(1);
    pub const BOOLEAN: TypeId = TypeId(2);
    pub const BIGINT: TypeId = TypeId(3);
    pub const SYMBOL: TypeId = TypeId(4);
    pub const NULL: TypeId = TypeId(5);
    pub const UNDEFINED: TypeId = TypeId(6);
    pub const VOID: TypeId = TypeId(7);
    pub const ANY: TypeId = TypeId(8);
    pub const UNKNOWN: TypeId = TypeId(9);
    pub const NEVER: TypeId = TypeId(10);
    pub const NON_PRIMITIVE: TypeId = TypeId(11);
    pub const DATE: TypeId = TypeId(12);
    pub const ERROR: TypeId = TypeId(13);

    const INTRINSIC_COUNT: usize = 14;

    /// The arena index of this id.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        TypeId(index as u32)
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Provenance of a type slot: the host handle it was adapted from, its
/// declaration site, documentation and export visibility. Used solely
/// for source positions and docs; the engine never interprets the host
/// handle.
#[derive(Debug, Clone, Default)]
pub struct TypeOrigin {
    pub host: Option<u64>,
    pub declaration: Option<SourceLocation>,
    pub documentation: Option<String>,
    pub exported: bool,
}

/// The read interface every downstream component uses.
pub trait TypeDatabase {
    /// The payload stored for `id`. Implementations that populate
    /// lazily hydrate the slot here.
    fn lookup(&self, id: TypeId) -> TypeData;

    /// Provenance of `id`.
    fn origin(&self, id: TypeId) -> TypeOrigin;

    /// The kind of `id`.
    fn kind(&self, id: TypeId) -> TypeKind {
        self.lookup(id).kind()
    }

    /// The declared name of `id`, if any.
    fn name(&self, id: TypeId) -> Option<String> {
        self.lookup(id).name().map(str::to_owned)
    }

    /// The declaration site of `id`, if known.
    fn declaration(&self, id: TypeId) -> Option<SourceLocation> {
        self.origin(id).declaration
    }

    /// Documentation attached to the declaration of `id`, if any.
    fn documentation(&self, id: TypeId) -> Option<String> {
        self.origin(id).documentation
    }

    /// The text content of an original source file, for source-map
    /// embedding. `None` for files whose content should not be
    /// embedded (stdlib files) or is unknown.
    fn source_text(&self, _file: &str) -> Option<String> {
        None
    }
}

struct Slot {
    data: Option<TypeData>,
    origin: TypeOrigin,
}

/// The arena the type model lives in.
///
/// Slots are reserved, then filled exactly once; a filled slot is
/// never mutated. Intrinsic primitives are pre-registered with
/// constant ids.
pub struct TypeStore {
    slots: RwLock<Vec<Slot>>,
}

impl TypeStore {
    #[must_use]
    pub fn new() -> Self {
        let intrinsics = [
            TypeData::String,
            TypeData::Number,
            TypeData::Boolean,
            TypeData::BigInt,
            TypeData::Symbol,
            TypeData::Null,
            TypeData::Undefined,
            TypeData::Void,
            TypeData::Any,
            TypeData::Unknown,
            TypeData::Never,
            TypeData::NonPrimitiveObject,
            TypeData::Date,
            TypeData::Error("unresolvable type".into()),
        ];
        debug_assert_eq!(intrinsics.len(), TypeId::INTRINSIC_COUNT);
        let slots = intrinsics
            .into_iter()
            .map(|data| Slot {
                data: Some(data),
                origin: TypeOrigin::default(),
            })
            .collect();
        Self {
            slots: RwLock::new(slots),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Slot>> {
        match self.slots.read() {
            Ok(guard) => guard,
            Err(e) => e.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Slot>> {
        match self.slots.write() {
            Ok(guard) => guard,
            Err(e) => e.into_inner(),
        }
    }

    /// Number of slots, including intrinsics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reserve an unpopulated slot. The adapter inserts reserved ids
    /// into its cache before recursing so cyclic host types resolve to
    /// the placeholder instead of recursing forever.
    pub fn reserve(&self) -> TypeId {
        let mut slots = self.write();
        let id = TypeId::from_index(slots.len());
        slots.push(Slot {
            data: None,
            origin: TypeOrigin::default(),
        });
        id
    }

    /// Fill a reserved slot. Filling an already-filled slot is a logic
    /// error and leaves the original payload in place.
    pub fn fill(&self, id: TypeId, data: TypeData) {
        let mut slots = self.write();
        if let Some(slot) = slots.get_mut(id.index()) {
            if slot.data.is_none() {
                slot.data = Some(data);
            } else {
                tracing::warn!(id = %id, "attempted to refill a populated type slot");
            }
        }
    }

    /// Attach provenance to a slot.
    pub fn set_origin(&self, id: TypeId, origin: TypeOrigin) {
        let mut slots = self.write();
        if let Some(slot) = slots.get_mut(id.index()) {
            slot.origin = origin;
        }
    }

    /// Whether the slot is still unpopulated.
    #[must_use]
    pub fn is_pending(&self, id: TypeId) -> bool {
        self.read()
            .get(id.index())
            .map(|slot| slot.data.is_none())
            .unwrap_or(false)
    }

    /// Reserve and fill in one step.
    pub fn intern(&self, data: TypeData) -> TypeId {
        let mut slots = self.write();
        let id = TypeId::from_index(slots.len());
        slots.push(Slot {
            data: Some(data),
            origin: TypeOrigin::default(),
        });
        id
    }

    // =========================================================================
    // Constructors
    //
    // The adapter (and tests) build model types through these; each
    // call creates a fresh identity.
    // =========================================================================

    pub fn literal_string(&self, value: &str) -> TypeId {
        self.intern(TypeData::StringLiteral(value.into()))
    }

    pub fn literal_number(&self, value: f64) -> TypeId {
        self.intern(TypeData::NumberLiteral(value))
    }

    pub fn literal_boolean(&self, value: bool) -> TypeId {
        self.intern(TypeData::BooleanLiteral(value))
    }

    pub fn literal_bigint(&self, value: &str) -> TypeId {
        self.intern(TypeData::BigIntLiteral(value.into()))
    }

    pub fn unique_symbol(&self, name: &str) -> TypeId {
        self.intern(TypeData::UniqueSymbol(name.into()))
    }

    pub fn object_like(&self, object: ObjectType) -> TypeId {
        self.intern(TypeData::Object(object.into()))
    }

    pub fn interface(&self, name: &str, members: Vec<TypeMember>) -> TypeId {
        self.object_like(ObjectType::new(
            ObjectFlavor::Interface,
            Some(name.to_owned()),
            members,
        ))
    }

    pub fn object(&self, members: Vec<TypeMember>) -> TypeId {
        self.object_like(ObjectType::new(ObjectFlavor::Object, None, members))
    }

    pub fn class(&self, name: &str, members: Vec<TypeMember>) -> TypeId {
        self.object_like(ObjectType::new(
            ObjectFlavor::Class,
            Some(name.to_owned()),
            members,
        ))
    }

    pub fn callable(&self, callable: CallableType) -> TypeId {
        self.intern(TypeData::Callable(callable.into()))
    }

    pub fn function(&self, parameters: Vec<Parameter>, return_type: TypeId) -> TypeId {
        self.callable(CallableType::new(
            CallableFlavor::Function,
            parameters,
            return_type,
        ))
    }

    pub fn method(&self, name: &str, parameters: Vec<Parameter>, return_type: TypeId) -> TypeId {
        let mut callable = CallableType::new(CallableFlavor::Method, parameters, return_type);
        callable.name = Some(name.to_owned());
        self.callable(callable)
    }

    pub fn union(&self, variants: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Union(
            UnionType {
                variants,
                discriminant_members: Vec::new(),
            }
            .into(),
        ))
    }

    pub fn union_with_discriminants(
        &self,
        variants: Vec<TypeId>,
        discriminant_members: Vec<String>,
    ) -> TypeId {
        self.intern(TypeData::Union(
            UnionType {
                variants,
                discriminant_members,
            }
            .into(),
        ))
    }

    pub fn intersection(&self, variants: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Intersection(
            IntersectionType {
                variants,
                intersected: None,
            }
            .into(),
        ))
    }

    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array { element })
    }

    pub fn tuple(&self, members: Vec<TupleMember>, has_rest: bool) -> TypeId {
        self.intern(TypeData::Tuple(TupleType { members, has_rest }.into()))
    }

    pub fn promise(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Promise { element })
    }

    pub fn alias(&self, name: &str, target: TypeId) -> TypeId {
        self.intern(TypeData::Alias(
            AliasType {
                name: name.to_owned(),
                target,
                type_parameters: Vec::new(),
            }
            .into(),
        ))
    }

    pub fn type_parameter(
        &self,
        name: &str,
        constraint: Option<TypeId>,
        default: Option<TypeId>,
    ) -> TypeId {
        self.intern(TypeData::TypeParameter(
            TypeParameterType {
                name: name.to_owned(),
                constraint,
                default,
            }
            .into(),
        ))
    }

    pub fn generic_arguments(
        &self,
        target: TypeId,
        type_arguments: Vec<TypeId>,
        instantiated: TypeId,
    ) -> TypeId {
        self.intern(TypeData::GenericArguments(
            GenericArgumentsType {
                target,
                type_arguments,
                instantiated,
            }
            .into(),
        ))
    }

    pub fn enum_member(&self, name: &str, qualified_name: &str, value: TypeId) -> TypeId {
        self.intern(TypeData::EnumMember(
            EnumMemberType {
                name: name.to_owned(),
                qualified_name: qualified_name.to_owned(),
                value,
            }
            .into(),
        ))
    }

    pub fn enum_type(&self, name: &str, members: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Enum(
            EnumType {
                name: name.to_owned(),
                members,
            }
            .into(),
        ))
    }

    pub fn error(&self, message: &str) -> TypeId {
        self.intern(TypeData::Error(message.into()))
    }
}

impl TypeDatabase for TypeStore {
    fn lookup(&self, id: TypeId) -> TypeData {
        let slots = self.read();
        match slots.get(id.index()).and_then(|slot| slot.data.clone()) {
            Some(data) => data,
            None => TypeData::Error("unpopulated type slot".into()),
        }
    }

    fn origin(&self, id: TypeId) -> TypeOrigin {
        self.read()
            .get(id.index())
            .map(|slot| slot.origin.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../tests/store_tests.rs"]
mod tests;
