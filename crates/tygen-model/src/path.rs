//! Labelled edges and paths through the type graph.
//!
//! A `Step` is one labelled outgoing edge from a type; a `TypePath` is
//! the ordered sequence of steps taken from a traversal root. Paths
//! are immutable; every operation returns a new path.

use smallvec::SmallVec;

use crate::store::{TypeDatabase, TypeId};

/// The label of one outgoing edge. Payloads carry the index and name
/// needed to render the edge; the full member or parameter is
/// recovered through the step's `from` type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Edge {
    /// From object-like to a named member's type.
    NamedMember { index: usize, name: String },
    /// From tuple to an element type.
    IndexedMember { index: usize },
    /// From object-like to its string-index type.
    StringIndex,
    /// From object-like or array to its number-index type.
    NumberIndex,
    /// From union, intersection or enum to a constituent.
    Variant { index: usize },
    /// From promise to its element.
    Awaited,
    /// From a generic-bearing type to one of its parameters.
    TypeParameter { index: usize, name: String },
    /// From a generic parameter to its constraint.
    TypeParameterConstraint,
    /// From a generic parameter to its default.
    TypeParameterDefault,
    /// From callable to a parameter's type.
    Parameter { index: usize, name: String },
    /// From callable to its return type.
    Return,
    /// From object-like to its call signature.
    CallSignature,
    /// From object-like to its constructor signature.
    CtorSignature,
    /// From a generic-arguments to one argument.
    GenericArgument { index: usize, name: Option<String> },
    /// From a generic-arguments to its generic target.
    GenericTarget,
    /// From alias, enum-member or generic-arguments to the inner type.
    Aliased,
}

impl Edge {
    /// The fixed textual form of this edge, so identical paths always
    /// render identically.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Edge::NamedMember { name, .. } => format!(".{name}"),
            Edge::IndexedMember { index } => format!("[{index}]"),
            Edge::StringIndex => "[string]".to_owned(),
            Edge::NumberIndex => "[number]".to_owned(),
            Edge::Variant { index } => format!("|{index}"),
            Edge::Awaited => ".await".to_owned(),
            Edge::TypeParameter { name, .. } => format!("<{name}>"),
            Edge::TypeParameterConstraint => ".constraint".to_owned(),
            Edge::TypeParameterDefault => ".default".to_owned(),
            Edge::Parameter { name, .. } => format!("({name})"),
            Edge::Return => ".return".to_owned(),
            Edge::CallSignature => ".call".to_owned(),
            Edge::CtorSignature => ".new".to_owned(),
            Edge::GenericArgument { index, .. } => format!("<{index}>"),
            Edge::GenericTarget => ".target".to_owned(),
            Edge::Aliased => ".aliased".to_owned(),
        }
    }
}

/// One labelled edge taken from `from`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    pub from: TypeId,
    pub edge: Edge,
}

impl Step {
    #[must_use]
    pub fn new(from: TypeId, edge: Edge) -> Self {
        Self { from, edge }
    }
}

/// An ordered sequence of steps from a traversal root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypePath {
    steps: SmallVec<[Step; 8]>,
}

impl TypePath {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The last step, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// A new path with `step` appended.
    #[must_use]
    pub fn concat(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    /// A new path with all of `other` appended.
    #[must_use]
    pub fn concat_path(&self, other: &TypePath) -> Self {
        let mut steps = self.steps.clone();
        steps.extend(other.steps.iter().cloned());
        Self { steps }
    }

    /// A new path with `step` appended when present, otherwise a copy.
    #[must_use]
    pub fn concat_opt(&self, step: Option<Step>) -> Self {
        match step {
            Some(step) => self.concat(step),
            None => self.clone(),
        }
    }

    /// True iff any step originates at `ty`.
    #[must_use]
    pub fn includes(&self, ty: TypeId) -> bool {
        self.steps.iter().any(|step| step.from == ty)
    }

    /// The suffix starting at the first step originating at `ty`, or
    /// `None` when no step does.
    #[must_use]
    pub fn subpath_from(&self, ty: TypeId) -> Option<TypePath> {
        let start = self.steps.iter().position(|step| step.from == ty)?;
        Some(Self {
            steps: self.steps[start..].iter().cloned().collect(),
        })
    }

    /// Human-readable rendering for diagnostics. The root is named by
    /// its declared name or kind; each step uses its fixed label.
    #[must_use]
    pub fn display(&self, db: &dyn TypeDatabase, target: Option<TypeId>) -> String {
        let mut out = String::new();
        if let Some(first) = self.steps.first() {
            out.push_str(&type_label(db, first.from));
        } else if let Some(target) = target {
            return type_label(db, target);
        }
        for step in &self.steps {
            out.push_str(&step.edge.label());
        }
        if let Some(target) = target {
            out.push_str(" -> ");
            out.push_str(&type_label(db, target));
        }
        out
    }

    /// Best-effort projection into a structural type-accessor dialect,
    /// used when deriving readable type names.
    #[must_use]
    pub fn to_type_accessor(&self, db: &dyn TypeDatabase) -> String {
        let mut acc = match self.steps.first() {
            Some(first) => type_label(db, first.from),
            None => return String::new(),
        };
        for step in &self.steps {
            acc = match &step.edge {
                Edge::NamedMember { name, .. } => format!("{acc}[\"{name}\"]"),
                Edge::IndexedMember { index } => format!("{acc}[{index}]"),
                Edge::StringIndex => format!("{acc}[string]"),
                Edge::NumberIndex => format!("{acc}[number]"),
                Edge::Awaited => format!("Awaited<{acc}>"),
                Edge::Return => format!("ReturnType<{acc}>"),
                Edge::Parameter { index, .. } => format!("Parameters<{acc}>[{index}]"),
                // Unions, signatures, generics and aliases are
                // transparent in the accessor dialect.
                _ => acc,
            };
        }
        acc
    }
}

fn type_label(db: &dyn TypeDatabase, ty: TypeId) -> String {
    match db.name(ty) {
        Some(name) => name,
        None => db.kind(ty).to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/path_tests.rs"]
mod tests;
