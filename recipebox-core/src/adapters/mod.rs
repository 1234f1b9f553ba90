//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the Repository port
//! - Local filesystem for MediaStorage
//! - UUID v4 (or a fixed value) for IdentifierSource

pub mod duckdb;
pub mod identifier;
pub mod media;
