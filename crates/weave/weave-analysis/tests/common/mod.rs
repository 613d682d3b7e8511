//! Shared fixtures: an in-memory loader universe for pipeline tests.
#![allow(dead_code)]

use weave_analysis::model::{FuncDecl, LoadedPackage, MethodSig, TypeId, TypeTable};
use weave_analysis::scanner::{NoIgnore, ScanOutput, Scanner};
use weave_analysis::Graph;
use weave_core::config::WeaveConfig;
use weave_core::types::source::Position;

pub const MODULE: &str = "example.com/app";

pub fn config() -> WeaveConfig {
    let mut cfg = WeaveConfig::default();
    cfg.module = MODULE.to_string();
    cfg
}

/// An in-memory loader universe: one type table plus loaded packages.
pub struct Fixture {
    pub table: TypeTable,
    pub packages: Vec<LoadedPackage>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            table: TypeTable::new(),
            packages: Vec::new(),
        }
    }

    /// Register a package under the module root; returns its index.
    pub fn package(&mut self, rel_path: &str, name: &str) -> usize {
        self.packages
            .push(LoadedPackage::new(format!("{MODULE}/{rel_path}"), name));
        self.packages.len() - 1
    }

    /// Add a top-level function to a package.
    pub fn func(
        &mut self,
        pkg: usize,
        name: &str,
        doc: &[&str],
        params: &[TypeId],
        results: &[TypeId],
    ) {
        let line = (self.packages[pkg].funcs.len() as u32 + 1) * 10;
        let file = format!("{}/{}.go", self.packages[pkg].pkg_path, self.packages[pkg].name);
        let mut decl = FuncDecl::new(name, Position::new(file, line, 1));
        decl.doc = doc.iter().map(|s| s.to_string()).collect();
        decl.params = params.to_vec();
        decl.results = results.to_vec();
        self.packages[pkg].funcs.push(decl);
    }

    /// Declare a struct in a module package and return `*T`.
    pub fn struct_ptr(&mut self, rel_pkg: &str, type_name: &str) -> TypeId {
        let id = self
            .table
            .declare_struct(&format!("{MODULE}/{rel_pkg}"), type_name);
        self.table.pointer_to(id)
    }

    /// Declare an interface in a module package.
    pub fn iface(&mut self, rel_pkg: &str, type_name: &str, methods: Vec<MethodSig>) -> TypeId {
        self.table
            .declare_interface(&format!("{MODULE}/{rel_pkg}"), type_name, methods)
    }

    pub fn error(&mut self) -> TypeId {
        self.table.error_type()
    }

    pub fn scan(&self, cfg: &WeaveConfig) -> ScanOutput {
        Scanner::new(cfg, &NoIgnore)
            .scan(&self.table, &self.packages)
            .expect("scan should succeed")
    }

    /// Scan and build; panics on build errors.
    pub fn graph<'a>(&'a self, cfg: &WeaveConfig) -> Graph<'a> {
        let out = self.scan(cfg);
        Graph::build(&self.table, out.providers, cfg, out.pkg_index, out.iface_catalogue)
            .expect("graph build should succeed")
    }
}

/// A one-method interface signature returning `error`.
pub fn unary_error_method(table: &mut TypeTable, name: &str) -> MethodSig {
    let err = table.error_type();
    MethodSig::new(name, vec![], vec![err])
}

/// Function names of a provider sequence, for order assertions.
pub fn func_names(providers: &[&weave_analysis::Provider]) -> Vec<String> {
    providers.iter().map(|p| p.func_name.clone()).collect()
}
