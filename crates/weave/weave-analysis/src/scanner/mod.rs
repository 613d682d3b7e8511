//! Provider discovery over loaded packages.
//!
//! The scanner applies the "one primary constructor per package"
//! convention: exported `New*` functions are ranked by how well their name
//! matches the convention, annotated constructors always opt in, and
//! candidates whose products are already covered are dropped.

pub mod filter;
pub mod scanner;
pub mod types;

pub use filter::{NoIgnore, PathFilter};
pub use scanner::Scanner;
pub use types::{Provider, ScanOutput, TypeRef};
