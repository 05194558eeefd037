//! # taskcat Shared Library
//!
//! Everything the taskcat binaries have in common: configuration, the error
//! taxonomy, store access, the operation set behind each menu command, and
//! the interactive menu loop that drives them.
//!
//! ## Module Organization
//!
//! - `config`: Environment-provided connection settings
//! - `error`: Common error type
//! - `db`: PostgreSQL pool and schema migrations
//! - `models`: Users, statuses, tasks and cats
//! - `store`: Store traits with PostgreSQL, MongoDB and in-memory backends
//! - `guards`: Existence checks run before lookups and mutations
//! - `ops`: One operation per menu command
//! - `render`: Tables, colorized documents and notices
//! - `menu`: Table-driven command loop
//! - `seed`: Fake data generation

pub mod config;
pub mod db;
pub mod error;
pub mod guards;
pub mod menu;
pub mod models;
pub mod ops;
pub mod render;
pub mod seed;
pub mod store;

/// Current version of the taskcat shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
