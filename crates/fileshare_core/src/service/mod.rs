//! Use-case services over repository contracts.
//!
//! # Responsibility
//! - Enforce rules that span records (delete guards, draft readiness).
//! - Stay storage-agnostic: services only see repository traits.

pub mod category_service;
pub mod document_service;
