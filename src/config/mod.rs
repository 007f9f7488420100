// src/config/mod.rs
//! Deployment configuration (source selection, endpoints, timeouts, cache TTLs).

pub mod source;

pub use source::{SourceConfig, SourceKind};
