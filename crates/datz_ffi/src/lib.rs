//! Flutter-facing FFI surface for Datz! core.
//!
//! # Responsibility
//! - Re-export use-case functions consumed by the FRB code generator.

pub mod api;
