//! Provider discovery, command detection, and dependency-graph resolution
//! for weave.
//!
//! The pipeline: a loader supplies typed packages (`model`), the scanner
//! extracts providers, the graph builder resolves bindings and freezes an
//! immutable [`Graph`], the command detector discovers entry points, and
//! the graph's query API hands dependency-ordered provider sequences to
//! the code emitter.

pub mod annotations;
pub mod commands;
pub mod graph;
pub mod model;
pub mod naming;
pub mod scanner;

pub use commands::{CommandDetector, DiscoveredCommand, HandlerInfo};
pub use graph::Graph;
pub use model::{FuncDecl, LoadedPackage, MethodSig, PackageImport, TypeId, TypeTable};
pub use scanner::{NoIgnore, PathFilter, Provider, ScanOutput, Scanner, TypeRef};
