//! The recursive walker.
//!
//! `walk` is the single traversal primitive: it hands the visitor the
//! current type, the path that reached it, and a `Visit` handle whose
//! `step` recurses with the extended path and the same visitor. The
//! walker makes no ordering choices and performs no cycle prevention;
//! visitors that must tolerate cycles wrap themselves with
//! `prevent_cycles`.
//!
//! If a visitor fails, the walker annotates the error with the current
//! path exactly once.

use crate::error::CompileError;
use crate::path::{Edge, Step, TypePath};
use crate::steps::{map_any_step, map_json_step};
use crate::store::{TypeDatabase, TypeId};

/// A visitor: called once per visited type.
pub type VisitorFn<'a, R> = dyn Fn(VisitArgs<'_, R>) -> Result<R, CompileError> + 'a;

/// What a visitor receives: the current type, the path that reached
/// it, and the recursion handle.
pub struct VisitArgs<'a, R> {
    pub ty: TypeId,
    pub path: &'a TypePath,
    pub visit: Visit<'a, R>,
}

/// The recursion handle handed to visitors and enumerators.
pub struct Visit<'a, R> {
    db: &'a dyn TypeDatabase,
    visitor: &'a VisitorFn<'a, R>,
    from: TypeId,
    path: &'a TypePath,
}

impl<R> Clone for Visit<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Visit<'_, R> {}

impl<'a, R> Visit<'a, R> {
    #[must_use]
    pub fn db(&self) -> &'a dyn TypeDatabase {
        self.db
    }

    /// The type this handle recurses from.
    #[must_use]
    pub fn ty(&self) -> TypeId {
        self.from
    }

    #[must_use]
    pub fn path(&self) -> &'a TypePath {
        self.path
    }

    /// Recurse into `child` over `edge`, with the same visitor.
    pub fn step(&self, edge: Edge, child: TypeId) -> Result<R, CompileError> {
        walk(
            self.db,
            self.path.concat(Step::new(self.from, edge)),
            child,
            self.visitor,
        )
    }

    /// Recurse into `child` over `edge` with a substitute visitor.
    pub fn step_with(
        &self,
        edge: Edge,
        child: TypeId,
        visitor: &VisitorFn<'_, R>,
    ) -> Result<R, CompileError> {
        walk(
            self.db,
            self.path.concat(Step::new(self.from, edge)),
            child,
            visitor,
        )
    }

    /// A bound handle whose default recursive visitor is `visitor`.
    #[must_use]
    pub fn with(&self, visitor: &'a VisitorFn<'a, R>) -> Visit<'a, R> {
        Visit {
            db: self.db,
            visitor,
            from: self.from,
            path: self.path,
        }
    }
}

/// Invoke `visitor` on `ty` reached via `path` and return its result.
///
/// Errors are annotated with the current path at most once per error
/// value.
pub fn walk<R>(
    db: &dyn TypeDatabase,
    path: TypePath,
    ty: TypeId,
    visitor: &VisitorFn<'_, R>,
) -> Result<R, CompileError> {
    let args = VisitArgs {
        ty,
        path: &path,
        visit: Visit {
            db,
            visitor,
            from: ty,
            path: &path,
        },
    };
    visitor(args).map_err(|mut error| {
        if !error.is_annotated() {
            error.annotate_path(path.display(db, Some(ty)));
        }
        error
    })
}

/// The distinguished result of a cycle-guarded visitor.
#[derive(Debug, Clone, PartialEq)]
pub enum Cycled<R> {
    /// The wrapped visitor ran and produced a value.
    Finite(R),
    /// The visited type already originates a step on the path; the
    /// payload is the cyclic subpath.
    Cyclical(TypePath),
}

impl<R> Cycled<R> {
    #[must_use]
    pub fn is_cyclical(&self) -> bool {
        matches!(self, Cycled::Cyclical(_))
    }

    /// The finite value, if any.
    #[must_use]
    pub fn finite(self) -> Option<R> {
        match self {
            Cycled::Finite(value) => Some(value),
            Cycled::Cyclical(_) => None,
        }
    }
}

/// Wrap a visitor so cyclic revisits short-circuit to
/// `Cycled::Cyclical` instead of recursing forever.
pub fn prevent_cycles<'a, R>(
    visitor: &'a VisitorFn<'a, Cycled<R>>,
) -> impl Fn(VisitArgs<'_, Cycled<R>>) -> Result<Cycled<R>, CompileError> + 'a {
    move |args| match args.path.subpath_from(args.ty) {
        Some(subpath) => {
            tracing::trace!(ty = %args.ty, "cycle prevented");
            Ok(Cycled::Cyclical(subpath))
        }
        None => visitor(args),
    }
}

/// Which universal enumerator a depth-first walk recurses with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Traverse {
    /// Every outgoing edge, in registry order.
    #[default]
    AnyStep,
    /// Only the value-oriented edges.
    JsonStep,
}

/// Hooks for `walk_depth_first`.
#[derive(Clone, Copy, Default)]
pub struct DepthFirstHooks<'h> {
    pub before: Option<&'h dyn Fn(TypeId, &TypePath)>,
    pub after: Option<&'h dyn Fn(TypeId, &TypePath)>,
    pub traverse: Traverse,
}

/// Depth-first walk over the graph: `before` on entry, recursion over
/// the chosen enumerator (results discarded), `after` on exit. Cyclic
/// revisits are skipped so external-state visitors terminate.
pub fn walk_depth_first(
    db: &dyn TypeDatabase,
    path: TypePath,
    ty: TypeId,
    hooks: DepthFirstHooks<'_>,
) -> Result<(), CompileError> {
    let visitor = move |args: VisitArgs<'_, ()>| -> Result<(), CompileError> {
        if args.path.subpath_from(args.ty).is_some() {
            return Ok(());
        }
        if let Some(before) = hooks.before {
            before(args.ty, args.path);
        }
        match hooks.traverse {
            Traverse::AnyStep => {
                map_any_step(&args.visit)?;
            }
            Traverse::JsonStep => {
                map_json_step(&args.visit)?;
            }
        }
        if let Some(after) = hooks.after {
            after(args.ty, args.path);
        }
        Ok(())
    };
    walk(db, path, ty, &visitor)
}

#[cfg(test)]
#[path = "../tests/walk_tests.rs"]
mod tests;
