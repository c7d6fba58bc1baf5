//! Domain model for categorized personal documents.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own write-time validation rules shared by repositories and services.
//!
//! # Invariants
//! - Every category and document is identified by a stable UUID.
//! - Category ordinals (`sort_order`) stay dense in `0..count`.

pub mod category;
pub mod document;
