//! Type model, path model and traversal engine for the tygen code
//! generator.
//!
//! This crate provides:
//! - The intermediate type model (`TypeId`, `TypeData`, `TypeKind`)
//! - The arena the model lives in (`TypeStore`) and the read interface
//!   every downstream component uses (`TypeDatabase`)
//! - Labelled edges and paths through the type graph (`Edge`, `Step`,
//!   `TypePath`)
//! - The recursive walker and its cycle-prevention combinator
//! - The kind-keyed edge-enumerator registry
//! - Recursion depth/iteration guards
//! - The compilation error type (`CompileError`)

// The closed sum of type kinds and their payload records
pub mod types;
pub use types::{
    AliasType, CallableFlavor, CallableType, EnumMemberType, EnumType, GenericArgumentsType,
    IntersectionType, LiteralValue, Modifiers, ObjectFlavor, ObjectType, Parameter, TupleMember,
    TupleType, TypeData, TypeKind, TypeMember, TypeParameterType, TypePredicate, UnionType,
};

// The arena and the read interface over it
pub mod store;
pub use store::{TypeDatabase, TypeId, TypeOrigin, TypeStore};

// Labelled edges and paths
pub mod path;
pub use path::{Edge, Step, TypePath};

// Recursive walker and cycle combinator
pub mod walk;
pub use walk::{
    Cycled, DepthFirstHooks, Traverse, Visit, VisitArgs, VisitorFn, prevent_cycles, walk,
    walk_depth_first,
};

// Kind-keyed edge enumerators
pub mod steps;
pub use steps::{StepEnumerator, enumerators_for, map_any_step, map_json_step};

// Recursion depth/iteration guards
pub mod recursion;
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};

// Compilation errors
pub mod error;
pub use error::{CompileError, CompileErrorKind};
