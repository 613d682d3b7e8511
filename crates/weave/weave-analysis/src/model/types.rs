//! Interning arena for the types of a loaded module.
//!
//! The table answers the queries the graph layer needs: qualified
//! rendering, interface tests, method sets under pointer-receiver rules,
//! and interface satisfaction. Construction happens in the loader; all
//! query methods take `&self`.

use serde::{Deserialize, Serialize};
use weave_core::types::collections::FxHashMap;

/// Handle into a [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId(u32);

impl TypeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Signature of a method, compared structurally for interface satisfaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSig {
    pub name: String,
    pub params: Vec<TypeId>,
    pub results: Vec<TypeId>,
}

impl MethodSig {
    pub fn new(name: impl Into<String>, params: Vec<TypeId>, results: Vec<TypeId>) -> Self {
        Self {
            name: name.into(),
            params,
            results,
        }
    }
}

/// A method declared on a named struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub sig: MethodSig,
    /// Pointer-receiver methods belong only to the pointer method set.
    pub ptr_receiver: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Underlying {
    Struct,
    Interface(Vec<MethodSig>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeData {
    /// The built-in `error` interface. Terminates return lists and is not
    /// an interface for binding purposes.
    Error,
    /// A language built-in (`string`, `int`, ...).
    Basic { name: String },
    Named {
        pkg_path: String,
        name: String,
        underlying: Underlying,
        methods: Vec<Method>,
    },
    Pointer { elem: TypeId },
    Slice { elem: TypeId },
}

/// Arena of all types in one loader universe.
#[derive(Debug, Default)]
pub struct TypeTable {
    types: Vec<TypeData>,
    named: FxHashMap<(String, String), TypeId>,
    pointers: FxHashMap<TypeId, TypeId>,
    slices: FxHashMap<TypeId, TypeId>,
    basics: FxHashMap<String, TypeId>,
    error_id: Option<TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(data);
        id
    }

    fn data(&self, id: TypeId) -> &TypeData {
        &self.types[id.index()]
    }

    // ---- construction (loader side) ----

    /// The built-in `error` type, interned on first use.
    pub fn error_type(&mut self) -> TypeId {
        if let Some(id) = self.error_id {
            return id;
        }
        let id = self.push(TypeData::Error);
        self.error_id = Some(id);
        id
    }

    pub fn basic(&mut self, name: &str) -> TypeId {
        if let Some(&id) = self.basics.get(name) {
            return id;
        }
        let id = self.push(TypeData::Basic {
            name: name.to_string(),
        });
        self.basics.insert(name.to_string(), id);
        id
    }

    /// Declare (or look up) a named struct type.
    pub fn declare_struct(&mut self, pkg_path: &str, name: &str) -> TypeId {
        let key = (pkg_path.to_string(), name.to_string());
        if let Some(&id) = self.named.get(&key) {
            return id;
        }
        let id = self.push(TypeData::Named {
            pkg_path: pkg_path.to_string(),
            name: name.to_string(),
            underlying: Underlying::Struct,
            methods: Vec::new(),
        });
        self.named.insert(key, id);
        id
    }

    /// Declare (or look up) a named interface type with its method set.
    pub fn declare_interface(
        &mut self,
        pkg_path: &str,
        name: &str,
        methods: Vec<MethodSig>,
    ) -> TypeId {
        let key = (pkg_path.to_string(), name.to_string());
        if let Some(&id) = self.named.get(&key) {
            return id;
        }
        let id = self.push(TypeData::Named {
            pkg_path: pkg_path.to_string(),
            name: name.to_string(),
            underlying: Underlying::Interface(methods),
            methods: Vec::new(),
        });
        self.named.insert(key, id);
        id
    }

    /// Attach a method to a declared struct type.
    pub fn add_method(&mut self, owner: TypeId, sig: MethodSig, ptr_receiver: bool) {
        match &mut self.types[owner.index()] {
            TypeData::Named {
                underlying: Underlying::Struct,
                methods,
                ..
            } => methods.push(Method { sig, ptr_receiver }),
            _ => debug_assert!(false, "add_method on a non-struct type"),
        }
    }

    pub fn pointer_to(&mut self, elem: TypeId) -> TypeId {
        if let Some(&id) = self.pointers.get(&elem) {
            return id;
        }
        let id = self.push(TypeData::Pointer { elem });
        self.pointers.insert(elem, id);
        id
    }

    pub fn slice_of(&mut self, elem: TypeId) -> TypeId {
        if let Some(&id) = self.slices.get(&elem) {
            return id;
        }
        let id = self.push(TypeData::Slice { elem });
        self.slices.insert(elem, id);
        id
    }

    // ---- queries ----

    /// Canonical fully-qualified rendering: `pkg/path.Name`, `*T`, `[]T`.
    pub fn qualified(&self, id: TypeId) -> String {
        match self.data(id) {
            TypeData::Error => "error".to_string(),
            TypeData::Basic { name } => name.clone(),
            TypeData::Named { pkg_path, name, .. } => {
                if pkg_path.is_empty() {
                    name.clone()
                } else {
                    format!("{pkg_path}.{name}")
                }
            }
            TypeData::Pointer { elem } => format!("*{}", self.qualified(*elem)),
            TypeData::Slice { elem } => format!("[]{}", self.qualified(*elem)),
        }
    }

    /// Owning package path, following one pointer indirection.
    pub fn pkg_path(&self, id: TypeId) -> &str {
        match self.data(id) {
            TypeData::Named { pkg_path, .. } => pkg_path,
            TypeData::Pointer { elem } => self.pkg_path(*elem),
            _ => "",
        }
    }

    pub fn is_error(&self, id: TypeId) -> bool {
        matches!(self.data(id), TypeData::Error)
    }

    /// True after one pointer dereference the underlying type is an
    /// interface, excluding the built-in `error`.
    pub fn is_interface(&self, id: TypeId) -> bool {
        let target = match self.data(id) {
            TypeData::Pointer { elem } => *elem,
            _ => id,
        };
        matches!(
            self.data(target),
            TypeData::Named {
                underlying: Underlying::Interface(_),
                ..
            }
        )
    }

    /// The named interface itself, with no pointer dereference. A pointer
    /// to an interface is not usable as a binding target.
    pub fn interface_id(&self, id: TypeId) -> Option<TypeId> {
        match self.data(id) {
            TypeData::Named {
                underlying: Underlying::Interface(_),
                ..
            } => Some(id),
            _ => None,
        }
    }

    fn interface_methods(&self, iface: TypeId) -> Option<&[MethodSig]> {
        match self.data(iface) {
            TypeData::Named {
                underlying: Underlying::Interface(methods),
                ..
            } => Some(methods),
            _ => None,
        }
    }

    /// Package path and name of a named type.
    pub fn named_info(&self, id: TypeId) -> Option<(&str, &str)> {
        match self.data(id) {
            TypeData::Named { pkg_path, name, .. } => Some((pkg_path, name)),
            _ => None,
        }
    }

    pub fn as_pointer(&self, id: TypeId) -> Option<TypeId> {
        match self.data(id) {
            TypeData::Pointer { elem } => Some(*elem),
            _ => None,
        }
    }

    pub fn slice_elem(&self, id: TypeId) -> Option<TypeId> {
        match self.data(id) {
            TypeData::Slice { elem } => Some(*elem),
            _ => None,
        }
    }

    /// The method set of `id` under pointer-receiver rules: value receivers
    /// only for a named value, the full set for a pointer to a named value,
    /// the declared set for an interface.
    pub fn method_set(&self, id: TypeId) -> Vec<&MethodSig> {
        match self.data(id) {
            TypeData::Named {
                underlying: Underlying::Interface(methods),
                ..
            } => methods.iter().collect(),
            TypeData::Named { methods, .. } => methods
                .iter()
                .filter(|m| !m.ptr_receiver)
                .map(|m| &m.sig)
                .collect(),
            TypeData::Pointer { elem } => self.pointer_method_set(*elem),
            _ => Vec::new(),
        }
    }

    /// The method set of `*id`, without interning a pointer type.
    pub fn pointer_method_set(&self, id: TypeId) -> Vec<&MethodSig> {
        match self.data(id) {
            TypeData::Named {
                underlying: Underlying::Struct,
                methods,
                ..
            } => methods.iter().map(|m| &m.sig).collect(),
            _ => Vec::new(),
        }
    }

    /// Whether the method set of `id` satisfies the interface `iface`.
    pub fn implements(&self, id: TypeId, iface: TypeId) -> bool {
        let Some(required) = self.interface_methods(iface) else {
            return false;
        };
        let have = self.method_set(id);
        required.iter().all(|m| have.iter().any(|h| *h == m))
    }

    /// Whether the method set of `*id` satisfies the interface `iface`.
    pub fn pointer_implements(&self, id: TypeId, iface: TypeId) -> bool {
        let Some(required) = self.interface_methods(iface) else {
            return false;
        };
        let have = self.pointer_method_set(id);
        required.iter().all(|m| have.iter().any(|h| *h == m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_rendering_covers_pointers_and_slices() {
        let mut table = TypeTable::new();
        let client = table.declare_struct("example.com/app/cache", "Client");
        let ptr = table.pointer_to(client);
        let slice = table.slice_of(ptr);

        assert_eq!(table.qualified(client), "example.com/app/cache.Client");
        assert_eq!(table.qualified(ptr), "*example.com/app/cache.Client");
        assert_eq!(table.qualified(slice), "[]*example.com/app/cache.Client");
        assert_eq!(table.pkg_path(ptr), "example.com/app/cache");
    }

    #[test]
    fn error_is_not_an_interface() {
        let mut table = TypeTable::new();
        let err = table.error_type();
        assert!(table.is_error(err));
        assert!(!table.is_interface(err));
    }

    #[test]
    fn pointer_receiver_methods_stay_out_of_the_value_set() {
        let mut table = TypeTable::new();
        let err = table.error_type();
        let listener = table.declare_interface(
            "example.com/app/mq",
            "Listener",
            vec![MethodSig::new("Listen", vec![], vec![err])],
        );
        let worker = table.declare_struct("example.com/app/jobs", "Worker");
        table.add_method(worker, MethodSig::new("Listen", vec![], vec![err]), true);

        assert!(!table.implements(worker, listener));
        assert!(table.pointer_implements(worker, listener));

        let ptr = table.pointer_to(worker);
        assert!(table.implements(ptr, listener));
    }

    #[test]
    fn signature_mismatch_fails_satisfaction() {
        let mut table = TypeTable::new();
        let err = table.error_type();
        let s = table.basic("string");
        let listener = table.declare_interface(
            "example.com/app/mq",
            "Listener",
            vec![MethodSig::new("Listen", vec![], vec![err])],
        );
        let worker = table.declare_struct("example.com/app/jobs", "Worker");
        table.add_method(worker, MethodSig::new("Listen", vec![s], vec![err]), false);

        assert!(!table.implements(worker, listener));
    }

    #[test]
    fn interface_id_does_not_dereference_pointers() {
        let mut table = TypeTable::new();
        let iface = table.declare_interface("example.com/app/mq", "Listener", vec![]);
        let ptr = table.pointer_to(iface);

        assert!(table.is_interface(ptr));
        assert_eq!(table.interface_id(iface), Some(iface));
        assert_eq!(table.interface_id(ptr), None);
    }
}
