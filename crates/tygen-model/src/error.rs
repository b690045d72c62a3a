//! Compilation errors.
//!
//! Nothing is recovered at the core level: errors propagate to the
//! `compile_program` caller. The walker annotates each error with the
//! traversal path at most once, tracked by the annotation slot on the
//! error value itself.

use thiserror::Error;

use crate::types::TypeKind;

/// The kinds of failure the core raises.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileErrorKind {
    /// A type carrying an adapter error reached a backend.
    #[error("cannot compile a type that carries an error: {message}")]
    TypeHasError { message: String },

    /// The backend's kind dispatch has no entry for the type.
    #[error("no backend handler for type kind `{kind}`")]
    NoBackendForKind { kind: TypeKind },

    /// Compilation recursed through a cycle with no declaration break.
    #[error(
        "compilation recursed through `{type_name}` without a declaration location being \
         assigned; assign one with `assign_declaration_location` before recursing, or build a \
         reference node directly"
    )]
    CircularCompilation { type_name: String },

    /// A reference was requested while no output location was set.
    #[error("cannot build a reference: no output location is set")]
    ReferenceWithoutLocation,

    /// A failure raised by a backend.
    #[error("{message}")]
    Backend { message: String },
}

/// An error raised during compilation, optionally annotated with the
/// traversal path it surfaced on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    kind: CompileErrorKind,
    path_note: Option<String>,
}

impl CompileError {
    #[must_use]
    pub fn new(kind: CompileErrorKind) -> Self {
        Self {
            kind,
            path_note: None,
        }
    }

    #[must_use]
    pub fn type_has_error(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::TypeHasError {
            message: message.into(),
        })
    }

    #[must_use]
    pub fn no_backend_for_kind(kind: TypeKind) -> Self {
        Self::new(CompileErrorKind::NoBackendForKind { kind })
    }

    #[must_use]
    pub fn circular_compilation(type_name: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::CircularCompilation {
            type_name: type_name.into(),
        })
    }

    #[must_use]
    pub fn reference_without_location() -> Self {
        Self::new(CompileErrorKind::ReferenceWithoutLocation)
    }

    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(CompileErrorKind::Backend {
            message: message.into(),
        })
    }

    #[must_use]
    pub fn kind(&self) -> &CompileErrorKind {
        &self.kind
    }

    /// Whether a path annotation has already been attached.
    #[must_use]
    pub fn is_annotated(&self) -> bool {
        self.path_note.is_some()
    }

    /// The attached path annotation, if any.
    #[must_use]
    pub fn path_note(&self) -> Option<&str> {
        self.path_note.as_deref()
    }

    /// Attach a path annotation. Only the first annotation sticks.
    pub fn annotate_path(&mut self, path: String) {
        if self.path_note.is_none() {
            self.path_note = Some(path);
        }
    }
}

impl From<CompileErrorKind> for CompileError {
    fn from(kind: CompileErrorKind) -> Self {
        Self::new(kind)
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(note) = &self.path_note {
            write!(f, "\nPath: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
