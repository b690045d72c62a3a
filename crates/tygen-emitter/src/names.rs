//! Declaration-name inference.
//!
//! Unnamed types still need deterministic declaration names. The
//! rules are fixed and depth-first: named types keep their name,
//! composites derive one from their constituents, and everything else
//! falls back to `Anonymous` plus the kind.

use tygen_model::{
    RecursionGuard, RecursionProfile, RecursionResult, TypeData, TypeDatabase, TypeId, UnionType,
};

/// Infer a deterministic declaration name for `ty`.
#[must_use]
pub fn infer_type_name(db: &dyn TypeDatabase, ty: TypeId) -> String {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::NameInference);
    infer(db, ty, &mut guard)
        .unwrap_or_else(|| format!("Anonymous{}", db.kind(ty).camel_name()))
}

fn infer(db: &dyn TypeDatabase, ty: TypeId, guard: &mut RecursionGuard<TypeId>) -> Option<String> {
    if guard.enter(ty) != RecursionResult::Entered {
        return None;
    }
    let result = infer_inner(db, ty, guard);
    guard.leave(&ty);
    result
}

fn infer_inner(
    db: &dyn TypeDatabase,
    ty: TypeId,
    guard: &mut RecursionGuard<TypeId>,
) -> Option<String> {
    let data = db.lookup(ty);
    if let Some(name) = data.name() {
        return Some(name.to_owned());
    }
    match data {
        TypeData::Array { element } => Some(match infer(db, element, guard) {
            Some(element) => format!("ArrayOf{element}"),
            None => "Array".to_owned(),
        }),
        TypeData::Union(union) => Some(union_name(db, &union, guard)),
        TypeData::Intersection(intersection) => {
            Some(join_names(db, &intersection.variants, "And", "Intersection", guard))
        }
        TypeData::GenericArguments(generic) => match infer(db, generic.target, guard) {
            Some(target) => {
                let arguments: Vec<String> = generic
                    .type_arguments
                    .iter()
                    .map(|argument| {
                        infer(db, *argument, guard)
                            .unwrap_or_else(|| db.kind(*argument).camel_name().to_owned())
                    })
                    .collect();
                if arguments.is_empty() {
                    Some(target)
                } else {
                    Some(format!("{target}Of{}", arguments.join("And")))
                }
            }
            None => infer(db, generic.instantiated, guard),
        },
        TypeData::StringLiteral(value) => Some(camelize(&value)),
        TypeData::NumberLiteral(value) => Some(numeric_name(&value.to_string())),
        TypeData::BooleanLiteral(value) => Some(if value { "True" } else { "False" }.to_owned()),
        TypeData::BigIntLiteral(value) => Some(numeric_name(&value)),
        data if data.kind().is_primitive() => Some(data.kind().camel_name().to_owned()),
        _ => None,
    }
}

/// Union naming prefers discriminant-derived variant names when the
/// host computed discriminant members.
fn union_name(db: &dyn TypeDatabase, union: &UnionType, guard: &mut RecursionGuard<TypeId>) -> String {
    if let Some(discriminant) = union.discriminant_members.first() {
        let mut names = Vec::with_capacity(union.variants.len());
        for variant in &union.variants {
            match discriminant_name(db, *variant, discriminant, guard) {
                Some(name) => names.push(name),
                None => return join_names(db, &union.variants, "Or", "Union", guard),
            }
        }
        return names.join("Or");
    }
    join_names(db, &union.variants, "Or", "Union", guard)
}

/// The name a variant contributes through its discriminant member.
fn discriminant_name(
    db: &dyn TypeDatabase,
    variant: TypeId,
    discriminant: &str,
    guard: &mut RecursionGuard<TypeId>,
) -> Option<String> {
    let TypeData::Object(object) = db.lookup(variant) else {
        return None;
    };
    let member = object.members.iter().find(|m| m.name == discriminant)?;
    infer(db, member.ty, guard)
}

fn join_names(
    db: &dyn TypeDatabase,
    variants: &[TypeId],
    separator: &str,
    fallback: &str,
    guard: &mut RecursionGuard<TypeId>,
) -> String {
    let mut names = Vec::with_capacity(variants.len());
    for variant in variants {
        match infer(db, *variant, guard) {
            Some(name) => names.push(name),
            None => return fallback.to_owned(),
        }
    }
    if names.is_empty() {
        fallback.to_owned()
    } else {
        names.join(separator)
    }
}

/// CamelCase a literal value: word boundaries at non-alphanumerics,
/// a leading `N` when the result would start with a digit.
fn camelize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut upper_next = true;
    for ch in value.chars() {
        if ch.is_alphanumeric() {
            if upper_next {
                out.extend(ch.to_uppercase());
                upper_next = false;
            } else {
                out.push(ch);
            }
        } else {
            upper_next = true;
        }
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, 'N');
    }
    out
}

fn numeric_name(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { '_' })
        .collect();
    format!("N{sanitized}")
}

#[cfg(test)]
#[path = "../tests/names_tests.rs"]
mod tests;
