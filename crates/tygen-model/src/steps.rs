//! Kind-keyed edge enumerators.
//!
//! For each kind with outgoing edges there is one enumerator per edge
//! axis: single-edge enumerators return `Option`-shaped results, list
//! enumerators (`map_*`) return one result per edge in source order.
//! `enumerators_for` is the frozen registry; `map_any_step` iterates
//! it in declaration order, and `map_json_step` restricts traversal to
//! the value-oriented edges.

use crate::error::CompileError;
use crate::path::Edge;
use crate::store::TypeId;
use crate::types::{TypeData, TypeKind};
use crate::walk::Visit;

// =============================================================================
// List enumerators
// =============================================================================

/// One result per named member of an object-like type.
pub fn map_named_members<R>(visit: &Visit<'_, R>) -> Result<Vec<R>, CompileError> {
    let TypeData::Object(obj) = visit.db().lookup(visit.ty()) else {
        return Ok(Vec::new());
    };
    obj.members
        .iter()
        .enumerate()
        .map(|(index, member)| {
            visit.step(
                Edge::NamedMember {
                    index,
                    name: member.name.clone(),
                },
                member.ty,
            )
        })
        .collect()
}

/// One result per tuple element.
pub fn map_indexed_members<R>(visit: &Visit<'_, R>) -> Result<Vec<R>, CompileError> {
    let TypeData::Tuple(tuple) = visit.db().lookup(visit.ty()) else {
        return Ok(Vec::new());
    };
    tuple
        .members
        .iter()
        .enumerate()
        .map(|(index, member)| visit.step(Edge::IndexedMember { index }, member.ty))
        .collect()
}

/// One result per constituent of a union, intersection or enum.
pub fn map_variants<R>(visit: &Visit<'_, R>) -> Result<Vec<R>, CompileError> {
    let variants: Vec<TypeId> = match visit.db().lookup(visit.ty()) {
        TypeData::Union(u) => u.variants.clone(),
        TypeData::Intersection(i) => i.variants.clone(),
        TypeData::Enum(e) => e.members.clone(),
        _ => return Ok(Vec::new()),
    };
    variants
        .into_iter()
        .enumerate()
        .map(|(index, variant)| visit.step(Edge::Variant { index }, variant))
        .collect()
}

/// One result per generic parameter of a generic-bearing type.
pub fn map_type_parameters<R>(visit: &Visit<'_, R>) -> Result<Vec<R>, CompileError> {
    let db = visit.db();
    let params = db.lookup(visit.ty()).type_parameters().to_vec();
    params
        .into_iter()
        .enumerate()
        .map(|(index, param)| {
            let name = match db.lookup(param) {
                TypeData::TypeParameter(tp) => tp.name.clone(),
                _ => String::new(),
            };
            visit.step(Edge::TypeParameter { index, name }, param)
        })
        .collect()
}

/// One result per parameter of a callable.
pub fn map_parameters<R>(visit: &Visit<'_, R>) -> Result<Vec<R>, CompileError> {
    let TypeData::Callable(callable) = visit.db().lookup(visit.ty()) else {
        return Ok(Vec::new());
    };
    callable
        .parameters
        .iter()
        .enumerate()
        .map(|(index, parameter)| {
            visit.step(
                Edge::Parameter {
                    index,
                    name: parameter.name.clone(),
                },
                parameter.ty,
            )
        })
        .collect()
}

/// One result per argument of a generic instantiation. Argument names
/// come from the target's parameter list when resolvable.
pub fn map_generic_arguments<R>(visit: &Visit<'_, R>) -> Result<Vec<R>, CompileError> {
    let db = visit.db();
    let TypeData::GenericArguments(generic) = db.lookup(visit.ty()) else {
        return Ok(Vec::new());
    };
    let target_params = db.lookup(generic.target).type_parameters().to_vec();
    generic
        .type_arguments
        .iter()
        .enumerate()
        .map(|(index, argument)| {
            let name = target_params.get(index).and_then(|param| {
                match db.lookup(*param) {
                    TypeData::TypeParameter(tp) => Some(tp.name.clone()),
                    _ => None,
                }
            });
            visit.step(Edge::GenericArgument { index, name }, *argument)
        })
        .collect()
}

// =============================================================================
// Single-edge enumerators
// =============================================================================

/// The string-index type of an object-like type.
pub fn string_index<R>(visit: &Visit<'_, R>) -> Result<Option<R>, CompileError> {
    let target = match visit.db().lookup(visit.ty()) {
        TypeData::Object(obj) => obj.string_index,
        _ => None,
    };
    match target {
        Some(target) => visit.step(Edge::StringIndex, target).map(Some),
        None => Ok(None),
    }
}

/// The number-index type of an object-like type, or an array's
/// element.
pub fn number_index<R>(visit: &Visit<'_, R>) -> Result<Option<R>, CompileError> {
    let target = match visit.db().lookup(visit.ty()) {
        TypeData::Object(obj) => obj.number_index,
        TypeData::Array { element } => Some(element),
        _ => None,
    };
    match target {
        Some(target) => visit.step(Edge::NumberIndex, target).map(Some),
        None => Ok(None),
    }
}

/// The element of a promise.
pub fn awaited<R>(visit: &Visit<'_, R>) -> Result<Option<R>, CompileError> {
    match visit.db().lookup(visit.ty()) {
        TypeData::Promise { element } => visit.step(Edge::Awaited, element).map(Some),
        _ => Ok(None),
    }
}

/// The constraint of a generic parameter.
pub fn type_parameter_constraint<R>(visit: &Visit<'_, R>) -> Result<Option<R>, CompileError> {
    let target = match visit.db().lookup(visit.ty()) {
        TypeData::TypeParameter(tp) => tp.constraint,
        _ => None,
    };
    match target {
        Some(target) => visit.step(Edge::TypeParameterConstraint, target).map(Some),
        None => Ok(None),
    }
}

/// The default of a generic parameter.
pub fn type_parameter_default<R>(visit: &Visit<'_, R>) -> Result<Option<R>, CompileError> {
    let target = match visit.db().lookup(visit.ty()) {
        TypeData::TypeParameter(tp) => tp.default,
        _ => None,
    };
    match target {
        Some(target) => visit.step(Edge::TypeParameterDefault, target).map(Some),
        None => Ok(None),
    }
}

/// The return type of a callable.
pub fn return_type<R>(visit: &Visit<'_, R>) -> Result<Option<R>, CompileError> {
    match visit.db().lookup(visit.ty()) {
        TypeData::Callable(callable) => {
            visit.step(Edge::Return, callable.return_type).map(Some)
        }
        _ => Ok(None),
    }
}

/// The call signature of an object-like type.
pub fn call_signature<R>(visit: &Visit<'_, R>) -> Result<Option<R>, CompileError> {
    let target = match visit.db().lookup(visit.ty()) {
        TypeData::Object(obj) => obj.call_signature,
        _ => None,
    };
    match target {
        Some(target) => visit.step(Edge::CallSignature, target).map(Some),
        None => Ok(None),
    }
}

/// The constructor signature of an object-like type.
pub fn ctor_signature<R>(visit: &Visit<'_, R>) -> Result<Option<R>, CompileError> {
    let target = match visit.db().lookup(visit.ty()) {
        TypeData::Object(obj) => obj.ctor_signature,
        _ => None,
    };
    match target {
        Some(target) => visit.step(Edge::CtorSignature, target).map(Some),
        None => Ok(None),
    }
}

/// The generic target of an instantiation.
pub fn generic_target<R>(visit: &Visit<'_, R>) -> Result<Option<R>, CompileError> {
    match visit.db().lookup(visit.ty()) {
        TypeData::GenericArguments(generic) => {
            visit.step(Edge::GenericTarget, generic.target).map(Some)
        }
        _ => Ok(None),
    }
}

/// The inner type of an alias, enum member or generic instantiation.
pub fn aliased<R>(visit: &Visit<'_, R>) -> Result<Option<R>, CompileError> {
    let target = match visit.db().lookup(visit.ty()) {
        TypeData::Alias(alias) => Some(alias.target),
        TypeData::EnumMember(member) => Some(member.value),
        TypeData::GenericArguments(generic) => Some(generic.instantiated),
        _ => None,
    };
    match target {
        Some(target) => visit.step(Edge::Aliased, target).map(Some),
        None => Ok(None),
    }
}

// =============================================================================
// Registry and universal enumerators
// =============================================================================

/// One entry in the per-kind enumerator registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEnumerator {
    NamedMembers,
    CallSignature,
    CtorSignature,
    TypeParameters,
    StringIndex,
    NumberIndex,
    Variants,
    Aliased,
    Parameters,
    Return,
    TypeParameterConstraint,
    TypeParameterDefault,
    GenericTarget,
    GenericArgumentList,
    IndexedMembers,
    Awaited,
}

impl StepEnumerator {
    /// Run this enumerator, appending results in source order.
    pub fn apply<R>(self, visit: &Visit<'_, R>, out: &mut Vec<R>) -> Result<(), CompileError> {
        match self {
            StepEnumerator::NamedMembers => out.extend(map_named_members(visit)?),
            StepEnumerator::CallSignature => out.extend(call_signature(visit)?),
            StepEnumerator::CtorSignature => out.extend(ctor_signature(visit)?),
            StepEnumerator::TypeParameters => out.extend(map_type_parameters(visit)?),
            StepEnumerator::StringIndex => out.extend(string_index(visit)?),
            StepEnumerator::NumberIndex => out.extend(number_index(visit)?),
            StepEnumerator::Variants => out.extend(map_variants(visit)?),
            StepEnumerator::Aliased => out.extend(aliased(visit)?),
            StepEnumerator::Parameters => out.extend(map_parameters(visit)?),
            StepEnumerator::Return => out.extend(return_type(visit)?),
            StepEnumerator::TypeParameterConstraint => {
                out.extend(type_parameter_constraint(visit)?);
            }
            StepEnumerator::TypeParameterDefault => out.extend(type_parameter_default(visit)?),
            StepEnumerator::GenericTarget => out.extend(generic_target(visit)?),
            StepEnumerator::GenericArgumentList => out.extend(map_generic_arguments(visit)?),
            StepEnumerator::IndexedMembers => out.extend(map_indexed_members(visit)?),
            StepEnumerator::Awaited => out.extend(awaited(visit)?),
        }
        Ok(())
    }
}

/// The frozen registry: the enumerators of a kind, in the order
/// `map_any_step` runs them. Fully determined by the kind's shape.
#[must_use]
pub fn enumerators_for(kind: TypeKind) -> &'static [StepEnumerator] {
    use StepEnumerator as E;
    match kind {
        TypeKind::Interface | TypeKind::Object | TypeKind::Class => &[
            E::NamedMembers,
            E::CallSignature,
            E::CtorSignature,
            E::TypeParameters,
            E::StringIndex,
            E::NumberIndex,
        ],
        TypeKind::Union | TypeKind::Intersection | TypeKind::Enum => &[E::Variants],
        TypeKind::EnumMember => &[E::Aliased],
        TypeKind::Function | TypeKind::Method => &[E::TypeParameters, E::Parameters, E::Return],
        TypeKind::TypeParameter => &[E::TypeParameterConstraint, E::TypeParameterDefault],
        TypeKind::GenericArguments => &[E::GenericTarget, E::GenericArgumentList, E::Aliased],
        TypeKind::Alias => &[E::TypeParameters, E::Aliased],
        TypeKind::Array => &[E::NumberIndex],
        TypeKind::Tuple => &[E::IndexedMembers],
        TypeKind::Promise => &[E::Awaited],
        _ => &[],
    }
}

/// Visit every outgoing edge of the current type, in registry order.
pub fn map_any_step<R>(visit: &Visit<'_, R>) -> Result<Vec<R>, CompileError> {
    let mut out = Vec::new();
    for enumerator in enumerators_for(visit.db().kind(visit.ty())) {
        enumerator.apply(visit, &mut out)?;
    }
    Ok(out)
}

/// Visit only the edges that survive a value-oriented projection:
/// algebraic constituents, named and indexed members, index types and
/// aliasing. Signatures, type parameters, generic-argument structure
/// and promise awaiting are excluded.
pub fn map_json_step<R>(visit: &Visit<'_, R>) -> Result<Vec<R>, CompileError> {
    use StepEnumerator as E;
    let enumerators: &[StepEnumerator] = match visit.db().kind(visit.ty()) {
        TypeKind::Interface | TypeKind::Object | TypeKind::Class => {
            &[E::NamedMembers, E::StringIndex, E::NumberIndex]
        }
        TypeKind::Union | TypeKind::Intersection | TypeKind::Enum => &[E::Variants],
        TypeKind::EnumMember | TypeKind::Alias | TypeKind::GenericArguments => &[E::Aliased],
        TypeKind::Array => &[E::NumberIndex],
        TypeKind::Tuple => &[E::IndexedMembers],
        _ => &[],
    };
    let mut out = Vec::new();
    for enumerator in enumerators {
        enumerator.apply(visit, &mut out)?;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/steps_tests.rs"]
mod tests;
