//! Derived UI state owned by screen presenters.
//!
//! # Responsibility
//! - Hold small pieces of screen state explicitly instead of in globals.
//! - Recompute derived values synchronously and publish them via [`signal::Signal`].
//!
//! # Invariants
//! - All mutation happens on one thread; nothing here locks.
//! - State is applied strictly in event order, so the next render observes it.

pub mod category_order;
pub mod document_draft;
pub mod document_query;
pub mod selection;
pub mod signal;
