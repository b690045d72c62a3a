//! Conversion of host types into the model.
//!
//! Identity: for one adapter, two adaptations of the same host handle
//! return the same `TypeId`. The cache is append-only and shared
//! across compilations.
//!
//! Cycles: the adapter reserves a slot and inserts it into the cache
//! before recursing into the host type's fields, so cyclic host types
//! resolve to the reserved id instead of recursing forever.
//!
//! Laziness: with `eager` off, reserved slots are populated on first
//! `TypeDatabase::lookup` through the adapter. Downstream code cannot
//! tell a hydrated slot from an eagerly built one.

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

use tygen_model::{
    AliasType, CallableType, EnumMemberType, EnumType, GenericArgumentsType, IntersectionType,
    LiteralValue, ObjectType, Parameter, TupleMember, TupleType, TypeData, TypeDatabase, TypeId,
    TypeMember, TypeOrigin, TypeParameterType, TypePredicate, TypeStore, UnionType,
};

use crate::source::{HostTypeId, RawPrimitive, RawType, TypeSource};

/// Generic names recognized as the array well-known type when applied
/// to exactly one argument.
const ARRAY_LIKE_NAMES: [&str; 4] = ["Array", "ReadonlyArray", "ArrayLike", "ConcatArray"];

/// Generic names recognized as the promise well-known type when
/// applied to exactly one argument.
const PROMISE_LIKE_NAMES: [&str; 2] = ["Promise", "PromiseLike"];

/// Adapter behavior switches.
#[derive(Debug, Clone, Copy)]
pub struct AdapterOptions {
    /// Populate types recursively at adaptation time instead of on
    /// first lookup.
    pub eager: bool,
    /// Record host provenance (handle, declaration site, docs, export
    /// visibility) on each adapted type.
    pub attach_host: bool,
    /// Keep alias wrappers even when the aliased type already carries
    /// its own name.
    pub preserve_simple_aliases: bool,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            eager: true,
            attach_host: true,
            preserve_simple_aliases: false,
        }
    }
}

/// Converts host handles into model types backed by a `TypeStore`.
///
/// The adapter is also a `TypeDatabase`: reads through it hydrate
/// lazily-reserved slots on demand.
pub struct Adapter<'s> {
    source: &'s dyn TypeSource,
    store: &'s TypeStore,
    options: AdapterOptions,
    cache: DashMap<HostTypeId, TypeId, FxBuildHasher>,
    pending: DashMap<TypeId, HostTypeId, FxBuildHasher>,
}

impl<'s> Adapter<'s> {
    #[must_use]
    pub fn new(source: &'s dyn TypeSource, store: &'s TypeStore, options: AdapterOptions) -> Self {
        Self {
            source,
            store,
            options,
            cache: DashMap::with_hasher(FxBuildHasher),
            pending: DashMap::with_hasher(FxBuildHasher),
        }
    }

    #[must_use]
    pub fn store(&self) -> &'s TypeStore {
        self.store
    }

    /// Adapt a host type. Repeated calls with the same handle return
    /// the same id.
    pub fn adapt(&self, host: HostTypeId) -> TypeId {
        if let Some(id) = self.cache.get(&host) {
            return *id;
        }

        // Types that resolve to an existing identity never get a slot:
        // unlifted primitives collapse to the intrinsics, and algebraic
        // types normalize variant-first (a union cannot directly
        // contain itself, so adapting constituents first terminates).
        if !self.is_lifted(host) {
            match self.source.raw(host) {
                RawType::Primitive(primitive) => {
                    let id = Self::intrinsic(primitive);
                    self.cache.insert(host, id);
                    return id;
                }
                raw @ (RawType::Union { .. } | RawType::Intersection { .. }) => {
                    let id = self.adapt_algebraic(host, raw);
                    self.cache.insert(host, id);
                    return id;
                }
                _ => {}
            }
        }

        let id = self.store.reserve();
        self.cache.insert(host, id);
        self.attach_origin(id, host);
        tracing::trace!(host = host.0, id = %id, "adapted host type");

        if self.options.eager {
            self.populate(id, host);
        } else {
            self.pending.insert(id, host);
        }
        id
    }

    /// Populate a reserved slot if it is still pending. Called from
    /// `lookup` in lazy mode.
    fn hydrate(&self, id: TypeId) {
        if let Some((_, host)) = self.pending.remove(&id) {
            tracing::trace!(host = host.0, id = %id, "hydrating lazy type");
            self.populate(id, host);
        }
    }

    fn populate(&self, id: TypeId, host: HostTypeId) {
        let data = self.build(host);
        self.store.fill(id, data);
    }

    const fn intrinsic(primitive: RawPrimitive) -> TypeId {
        match primitive {
            RawPrimitive::String => TypeId::STRING,
            RawPrimitive::Number => TypeId::NUMBER,
            RawPrimitive::Boolean => TypeId::BOOLEAN,
            RawPrimitive::BigInt => TypeId::BIGINT,
            RawPrimitive::Symbol => TypeId::SYMBOL,
            RawPrimitive::Null => TypeId::NULL,
            RawPrimitive::Undefined => TypeId::UNDEFINED,
            RawPrimitive::Void => TypeId::VOID,
            RawPrimitive::Any => TypeId::ANY,
            RawPrimitive::Unknown => TypeId::UNKNOWN,
            RawPrimitive::Never => TypeId::NEVER,
            RawPrimitive::NonPrimitiveObject => TypeId::NON_PRIMITIVE,
        }
    }

    /// Whether the adapted form of `host` carries a wrapper around its
    /// body (a generic instantiation, or an alias that is kept).
    fn is_lifted(&self, host: HostTypeId) -> bool {
        self.source.instantiation(host).is_some() || self.keeps_alias(host)
    }

    /// Whether the alias symbol on `host`, if any, survives
    /// adaptation. Aliases of types that already carry their own name
    /// (and of primitives and literals) are elided unless
    /// `preserve_simple_aliases` is set.
    fn keeps_alias(&self, host: HostTypeId) -> bool {
        if self.source.alias(host).is_none() {
            return false;
        }
        if self.options.preserve_simple_aliases {
            return true;
        }
        if self.source.instantiation(host).is_some() {
            return true;
        }
        match self.source.raw(host) {
            RawType::Union { .. } | RawType::Intersection { .. } => true,
            RawType::ObjectLike { name, .. } | RawType::Callable { name, .. } => name.is_none(),
            _ => false,
        }
    }

    /// Union/intersection normalization: constituents are adapted
    /// first, trivially identical ones deduplicated, and degenerate
    /// forms collapsed.
    fn adapt_algebraic(&self, host: HostTypeId, raw: RawType) -> TypeId {
        match raw {
            RawType::Union {
                variants,
                discriminant_members,
            } => {
                let ids = self.adapt_deduped(&variants);
                match ids.len() {
                    0 => TypeId::NEVER,
                    1 => ids[0],
                    _ => {
                        let id = self.store.intern(TypeData::Union(
                            UnionType {
                                variants: ids,
                                discriminant_members,
                            }
                            .into(),
                        ));
                        self.attach_origin(id, host);
                        id
                    }
                }
            }
            RawType::Intersection {
                variants,
                intersected,
            } => {
                let ids = self.adapt_deduped(&variants);
                match ids.len() {
                    0 => TypeId::UNKNOWN,
                    1 => ids[0],
                    _ => {
                        let id = self.store.intern(TypeData::Intersection(
                            IntersectionType {
                                variants: ids,
                                intersected: intersected.map(|i| self.adapt(i)),
                            }
                            .into(),
                        ));
                        self.attach_origin(id, host);
                        id
                    }
                }
            }
            _ => self.store.intern(self.build_body_raw(raw)),
        }
    }

    fn adapt_deduped(&self, variants: &[HostTypeId]) -> Vec<TypeId> {
        let mut seen = FxHashSet::default();
        let mut ids = Vec::with_capacity(variants.len());
        for variant in variants {
            let id = self.adapt(*variant);
            if seen.insert(id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Build the payload for the slot backing `host`: the alias
    /// wrapper when one is kept, otherwise the unaliased form.
    fn build(&self, host: HostTypeId) -> TypeData {
        match self.source.alias(host) {
            Some(alias) if self.keeps_alias(host) => {
                let target = self.store.intern(self.build_unaliased(host));
                TypeData::Alias(
                    AliasType {
                        name: alias.name,
                        target,
                        type_parameters: alias
                            .type_parameters
                            .iter()
                            .map(|p| self.adapt(*p))
                            .collect(),
                    }
                    .into(),
                )
            }
            _ => self.build_unaliased(host),
        }
    }

    /// The form of `host` without its alias symbol: generic lifting
    /// and well-known recognition apply here, so the wrapping order is
    /// always generic-arguments first, alias outermost.
    fn build_unaliased(&self, host: HostTypeId) -> TypeData {
        if let Some(inst) = self.source.instantiation(host) {
            if inst.type_arguments.len() == 1 {
                if let Some(target_name) = inst.target_name.as_deref() {
                    let element = inst.type_arguments[0];
                    if ARRAY_LIKE_NAMES.contains(&target_name) {
                        return TypeData::Array {
                            element: self.adapt(element),
                        };
                    }
                    if PROMISE_LIKE_NAMES.contains(&target_name) {
                        return TypeData::Promise {
                            element: self.adapt(element),
                        };
                    }
                }
            }
            let instantiated = self.store.intern(self.build_body(host));
            return TypeData::GenericArguments(
                GenericArgumentsType {
                    target: self.adapt(inst.target),
                    type_arguments: inst
                        .type_arguments
                        .iter()
                        .map(|a| self.adapt(*a))
                        .collect(),
                    instantiated,
                }
                .into(),
            );
        }
        self.build_body(host)
    }

    fn build_body(&self, host: HostTypeId) -> TypeData {
        self.build_body_raw(self.source.raw(host))
    }

    fn build_body_raw(&self, raw: RawType) -> TypeData {
        match raw {
            RawType::Primitive(primitive) => match primitive {
                RawPrimitive::String => TypeData::String,
                RawPrimitive::Number => TypeData::Number,
                RawPrimitive::Boolean => TypeData::Boolean,
                RawPrimitive::BigInt => TypeData::BigInt,
                RawPrimitive::Symbol => TypeData::Symbol,
                RawPrimitive::Null => TypeData::Null,
                RawPrimitive::Undefined => TypeData::Undefined,
                RawPrimitive::Void => TypeData::Void,
                RawPrimitive::Any => TypeData::Any,
                RawPrimitive::Unknown => TypeData::Unknown,
                RawPrimitive::Never => TypeData::Never,
                RawPrimitive::NonPrimitiveObject => TypeData::NonPrimitiveObject,
            },
            RawType::Literal(value) => Self::literal_data(&value),
            RawType::UniqueSymbol { name } => TypeData::UniqueSymbol(name.into()),
            RawType::EnumMember {
                name,
                qualified_name,
                value,
            } => TypeData::EnumMember(
                EnumMemberType {
                    name,
                    qualified_name,
                    value: self.store.intern(Self::literal_data(&value)),
                }
                .into(),
            ),
            RawType::Enum { name, members } => TypeData::Enum(
                EnumType {
                    name,
                    members: members.iter().map(|m| self.adapt(*m)).collect(),
                }
                .into(),
            ),
            RawType::Union {
                variants,
                discriminant_members,
            } => {
                // Reached only for alias-wrapped unions; the unaliased
                // fast path handles the rest.
                let ids = self.adapt_deduped(&variants);
                match ids.len() {
                    0 => TypeData::Never,
                    1 => self.lookup_through_pending(ids[0]),
                    _ => TypeData::Union(
                        UnionType {
                            variants: ids,
                            discriminant_members,
                        }
                        .into(),
                    ),
                }
            }
            RawType::Intersection {
                variants,
                intersected,
            } => {
                let ids = self.adapt_deduped(&variants);
                match ids.len() {
                    0 => TypeData::Unknown,
                    1 => self.lookup_through_pending(ids[0]),
                    _ => TypeData::Intersection(
                        IntersectionType {
                            variants: ids,
                            intersected: intersected.map(|i| self.adapt(i)),
                        }
                        .into(),
                    ),
                }
            }
            RawType::ObjectLike {
                flavor,
                name,
                members,
                call_signature,
                ctor_signature,
                type_parameters,
                string_index,
                number_index,
            } => {
                if name.as_deref() == Some("Date") {
                    return TypeData::Date;
                }
                TypeData::Object(
                    ObjectType {
                        flavor,
                        name,
                        members: members
                            .into_iter()
                            .filter(|m| m.has_declaration)
                            .map(|m| TypeMember {
                                name: m.name,
                                ty: self.adapt(m.ty),
                                optional: m.optional,
                                modifiers: m.modifiers,
                            })
                            .collect(),
                        call_signature: call_signature.map(|s| self.adapt(s)),
                        ctor_signature: ctor_signature.map(|s| self.adapt(s)),
                        type_parameters: type_parameters.iter().map(|p| self.adapt(*p)).collect(),
                        string_index: string_index.map(|s| self.adapt(s)),
                        number_index: number_index.map(|s| self.adapt(s)),
                    }
                    .into(),
                )
            }
            RawType::Callable {
                flavor,
                name,
                type_parameters,
                parameters,
                return_type,
                predicate,
            } => TypeData::Callable(
                CallableType {
                    flavor,
                    name,
                    type_parameters: type_parameters.iter().map(|p| self.adapt(*p)).collect(),
                    parameters: parameters
                        .into_iter()
                        .map(|p| Parameter {
                            name: p.name,
                            ty: self.adapt(p.ty),
                            optional: p.optional,
                            rest: p.rest,
                            has_initializer: p.has_initializer,
                        })
                        .collect(),
                    return_type: self.adapt(return_type),
                    predicate: predicate.map(|p| TypePredicate {
                        parameter_name: p.parameter_name,
                        parameter_index: p.parameter_index,
                        ty: self.adapt(p.ty),
                    }),
                }
                .into(),
            ),
            RawType::TypeParameter {
                name,
                constraint,
                default,
            } => TypeData::TypeParameter(
                TypeParameterType {
                    name,
                    constraint: constraint.map(|c| self.adapt(c)),
                    default: default.map(|d| self.adapt(d)),
                }
                .into(),
            ),
            RawType::Tuple { members, has_rest } => TypeData::Tuple(
                TupleType {
                    members: members
                        .iter()
                        .map(|m| TupleMember {
                            ty: self.adapt(m.ty),
                            optional: m.optional,
                        })
                        .collect(),
                    has_rest,
                }
                .into(),
            ),
            RawType::Untranslatable { message } => TypeData::Error(message.into()),
        }
    }

    /// Payload of `id` for collapse sites, hydrating first so a lazy
    /// singleton constituent reads as its real data.
    fn lookup_through_pending(&self, id: TypeId) -> TypeData {
        self.hydrate(id);
        self.store.lookup(id)
    }

    fn literal_data(value: &LiteralValue) -> TypeData {
        match value {
            LiteralValue::String(s) => TypeData::StringLiteral(Arc::from(s.as_str())),
            LiteralValue::Number(n) => TypeData::NumberLiteral(*n),
            LiteralValue::Boolean(b) => TypeData::BooleanLiteral(*b),
            LiteralValue::BigInt(s) => TypeData::BigIntLiteral(Arc::from(s.as_str())),
        }
    }

    fn attach_origin(&self, id: TypeId, host: HostTypeId) {
        if !self.options.attach_host {
            return;
        }
        self.store.set_origin(
            id,
            TypeOrigin {
                host: Some(host.0),
                declaration: self.source.declaration(host),
                documentation: self.source.documentation(host),
                exported: self.source.is_exported(host),
            },
        );
    }
}

impl TypeDatabase for Adapter<'_> {
    fn lookup(&self, id: TypeId) -> TypeData {
        self.hydrate(id);
        self.store.lookup(id)
    }

    fn origin(&self, id: TypeId) -> TypeOrigin {
        self.store.origin(id)
    }

    fn source_text(&self, file: &str) -> Option<String> {
        self.source.source_text(file)
    }
}

#[cfg(test)]
#[path = "../tests/adapter_tests.rs"]
mod tests;
