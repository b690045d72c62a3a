//! Output AST, backend contract and compiler orchestrator for the
//! tygen code generator.
//!
//! The orchestrator drives entry-point compilation: it adapts each
//! entry type into a root output node through the pluggable backend,
//! deduplicates declarations, breaks cycles with reference nodes,
//! assigns deterministic unique names, routes declarations to files,
//! and serializes each file to text plus a source map.

// File and namespace locations
pub mod location;
pub use location::{
    DeclarationLocation, Location, file_and_namespace_equal, file_name_equal, namespace_equal,
};

// The source-mapped text tree backends emit
pub mod node;
pub use node::{Node, NodeBuilder, NodeKind, Part};

// The pluggable backend contract
pub mod backend;
pub use backend::{Backend, CompileArgs, FileData, ReferenceArgs, ReferenceTarget};

// Declaration-name inference
pub mod names;
pub use names::infer_type_name;

// The orchestrator
pub mod compiler;
pub use compiler::{
    CompiledFile, Compiler, EntryPoint, FileBuilder, LocationHint, Output, Program, compile,
};

// Node-tree serialization with source maps
pub mod serializer;
pub use serializer::serialize;
