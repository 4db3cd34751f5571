//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into catalog-level operations.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod catalog_store;
