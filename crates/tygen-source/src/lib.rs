//! Host type-checker adapter for the tygen code generator.
//!
//! The engine never talks to a host type-checker directly. Hosts
//! implement [`TypeSource`], exposing classification, member and
//! signature enumeration, generic targets and arguments, declaration
//! positions, export visibility and documentation. The [`Adapter`]
//! converts host handles into model types, preserving identity through
//! a shared append-only cache and populating slots either eagerly or
//! on first lookup.

// The host-facing raw model and source trait
pub mod source;
pub use source::{
    HostTypeId, RawAlias, RawInstantiation, RawMember, RawParameter, RawPredicate, RawPrimitive,
    RawTupleMember, RawType, TypeSource,
};

// The adapter itself
pub mod adapter;
pub use adapter::{Adapter, AdapterOptions};
