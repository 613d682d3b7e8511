//! The resolved dependency graph and its algorithms.
//!
//! `Graph::build` runs the construction phases (group classification,
//! singleton registration, binding resolution); after the optional
//! deferred command-interface pass the graph is frozen and every
//! algorithm reads it immutably: cycle verification, topological sorting
//! with synthetic edges, entry expansion, slice auto-collection, and
//! per-entry validation.

pub mod builder;
pub mod cycles;
pub mod queries;
pub mod resolve;
pub mod toposort;
pub mod types;

pub use types::Graph;
