//! The typed model of a loaded module.
//!
//! This is the loader contract: an external package loader resolves source
//! into a `TypeTable` plus `LoadedPackage` values, and every downstream
//! system (scanner, command detector, graph) consumes only this model.
//! Type identity for graph purposes is the canonical qualified string; the
//! `TypeId` handle is retained solely for interface-satisfaction and
//! method-set queries.

pub mod package;
pub mod types;

pub use package::{FuncDecl, LoadedPackage, PackageImport};
pub use types::{Method, MethodSig, TypeId, TypeTable};
