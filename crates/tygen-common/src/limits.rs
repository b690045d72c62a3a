//! Centralized limits and thresholds for the code generator.
//!
//! Recursion limits for graph traversal live in
//! `tygen_model::recursion::RecursionProfile`; the constants here are
//! the raw values those profiles are built from, kept in one place so
//! construction sites stay consistent.

/// Maximum compilation recursion depth before the orchestrator gives up
/// and reports a circular compilation without a declaration break.
///
/// Type graphs deeper than this are, in practice, cyclic graphs whose
/// backend forgot to assign a declaration location before recursing.
pub const MAX_COMPILE_DEPTH: u32 = 200;

/// Maximum depth for declaration-name inference.
///
/// Name inference walks unnamed composite types (arrays, unions,
/// intersections, generic instantiations) looking for named
/// constituents. Anything deeper than this yields an anonymous name.
pub const MAX_NAME_INFERENCE_DEPTH: u32 = 32;

/// Iteration budget shared by the recursion profiles.
pub const MAX_TRAVERSAL_ITERATIONS: u32 = 100_000;
