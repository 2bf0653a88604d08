//! Lexical environments.
//!
//! An [`Environment`] is a reference-counted scope with a parent link.
//! Closures hold on to the environment they were created in, so a call
//! frame outlives the call when a returned function still refers to it.
//! Lookup walks the parent chain, which is acyclic: every scope is created
//! as the child of an existing one.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::value::Value;

/// A variable binding.
#[derive(Clone, Debug)]
pub struct Binding {
    pub value: Value,
    /// Declared with `export`; collected by the module loader.
    pub exported: bool,
}

struct Scope {
    bindings: FxHashMap<String, Binding>,
    /// Exported names in declaration order.
    exports: Vec<String>,
    parent: Option<Environment>,
}

impl Scope {
    fn new(parent: Option<Environment>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            exports: Vec::new(),
            parent,
        }
    }
}

#[derive(Clone)]
pub struct Environment(Arc<RwLock<Scope>>);

impl Environment {
    /// A root scope with no parent.
    pub fn new() -> Self {
        Environment(Arc::new(RwLock::new(Scope::new(None))))
    }

    /// A new scope whose parent is `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Environment(Arc::new(RwLock::new(Scope::new(Some(self.clone())))))
    }

    /// Bind `name` in this scope, shadowing any outer binding.
    pub fn define(&self, name: &str, value: Value) {
        self.define_with(name, value, false);
    }

    pub fn define_with(&self, name: &str, value: Value, exported: bool) {
        let mut scope = self.0.write();
        if exported && !scope.bindings.get(name).is_some_and(|b| b.exported) {
            scope.exports.push(name.to_string());
        }
        let exported = exported || scope.bindings.get(name).is_some_and(|b| b.exported);
        scope.bindings.insert(name.to_string(), Binding { value, exported });
    }

    /// Look `name` up through the parent chain.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let parent = {
                let scope = current.0.read();
                if let Some(binding) = scope.bindings.get(name) {
                    return Some(binding.value.clone());
                }
                scope.parent.clone()
            };
            current = parent?;
        }
    }

    /// Update the nearest existing binding of `name`, or define it here.
    ///
    /// This is plain assignment (`n = n + 1`): a closure assigning to a
    /// captured variable updates the shared binding. The root scope holds
    /// the builtins and is never assigned into; a name found only there is
    /// shadowed here instead.
    pub fn assign(&self, name: &str, value: Value) {
        let mut current = self.clone();
        loop {
            let parent = {
                let mut scope = current.0.write();
                let Some(parent) = scope.parent.clone() else {
                    break;
                };
                if let Some(binding) = scope.bindings.get_mut(name) {
                    binding.value = value;
                    return;
                }
                parent
            };
            current = parent;
        }
        self.define(name, value);
    }

    /// Exported bindings of this scope, in declaration order.
    pub fn exports(&self) -> Vec<(String, Value)> {
        let scope = self.0.read();
        scope
            .exports
            .iter()
            .filter_map(|name| {
                let binding = scope.bindings.get(name)?;
                Some((name.clone(), binding.value.clone()))
            })
            .collect()
    }

    /// Names bound directly in this scope.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.read().bindings.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.read();
        f.debug_struct("Environment")
            .field("bindings", &scope.bindings.len())
            .field("has_parent", &scope.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests;
