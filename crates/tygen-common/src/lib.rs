//! Common types and utilities for the tygen code generator.
//!
//! This crate provides foundational types used across all tygen crates:
//! - Source locations (`SourceLocation`, `Position`, `LineMap`)
//! - Source map generation (`SourceMapGenerator`, VLQ encoding)
//! - Centralized limits and thresholds

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position, SourceLocation};

// Source Map generation
pub mod source_map;
pub use source_map::{SourceMap, SourceMapGenerator};

// Centralized limits and thresholds
pub mod limits;
