//! Grade-tracking domain model.
//!
//! # Responsibility
//! - Define the year/subject records persisted by the catalog store.
//! - Provide score aggregation and the built-in preset table.
//!
//! # Invariants
//! - Every year is identified by its unique `name`.
//! - Composite subjects are one level deep.

pub mod preset;
pub mod score;
pub mod year;
