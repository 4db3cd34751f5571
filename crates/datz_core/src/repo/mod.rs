//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the flat key-value contract the catalog persists through.
//! - Isolate SQLite query details from catalog orchestration.
//!
//! # Invariants
//! - Repositories store opaque text; they never interpret catalog values.

pub mod kv_repo;
