//! Flutter bridge for the FileShare core.

pub mod api;
