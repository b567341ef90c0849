//! Scope chain implementation
//!
//! This module provides the variable storage used during evaluation:
//! - [`ScopeStack`]: arena of live scopes, addressed by [`ScopeId`]
//! - [`Scope`]: one scope's values and the base names declared in it
//!
//! # Resolution
//!
//! A key resolves to the nearest scope, starting from the current one and
//! following parent links, that declared the key's *base* name (the part
//! before any `[`). When no scope in the chain declared it, the root scope
//! owns it. Reads of keys that were never written yield 0.
//!
//! # Lifetime
//!
//! Scopes are created on entering a block or a call and released when that
//! evaluation returns, so they live and die in stack order. A child's parent
//! always has a smaller id than the child, and the top of the arena is the
//! only scope that may be released.

use rustc_hash::{FxHashMap, FxHashSet};

/// Handle to a live scope in a [`ScopeStack`]
pub type ScopeId = usize;

/// Build the storage key for a possibly indexed variable: `a`, `a[3]`,
/// `grid[1][-2]`.
pub fn compound_key(name: &str, indices: &[i32]) -> String {
    let mut key = String::from(name);
    for index in indices {
        key.push('[');
        key.push_str(&index.to_string());
        key.push(']');
    }
    key
}

/// The base name of a compound key
pub fn base_name(key: &str) -> &str {
    match key.find('[') {
        Some(pos) => &key[..pos],
        None => key,
    }
}

/// A single scope: values by compound key plus the declared base names
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    values: FxHashMap<String, i32>,
    declared: FxHashSet<String>,
}

impl Scope {
    fn new(parent: Option<ScopeId>) -> Self {
        Scope {
            parent,
            ..Scope::default()
        }
    }

    fn owns(&self, key: &str) -> bool {
        self.parent.is_none() || self.declared.contains(base_name(key))
    }

    /// Whether `name` was declared directly in this scope
    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    /// All stored values, sorted by key (for display)
    pub fn sorted_values(&self) -> Vec<(String, i32)> {
        let mut values: Vec<(String, i32)> = self
            .values
            .iter()
            .map(|(key, value)| (key.clone(), *value))
            .collect();
        values.sort();
        values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// All live scopes, root first
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// Create a stack holding only the root scope
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![Scope::new(None)],
        }
    }

    pub fn root(&self) -> ScopeId {
        0
    }

    /// Create a child of `parent` and return its handle
    pub fn push(&mut self, parent: ScopeId) -> ScopeId {
        debug_assert!(parent < self.scopes.len());
        self.scopes.push(Scope::new(Some(parent)));
        self.scopes.len() - 1
    }

    /// Release the most recently created scope. The root is never released.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of live scopes, root included
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn get_scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id)
    }

    /// Mark `name` as owned by `scope` and reset its unindexed slot to 0
    pub fn declare(&mut self, scope: ScopeId, name: &str) {
        let target = &mut self.scopes[scope];
        target.declared.insert(name.to_string());
        target.values.insert(name.to_string(), 0);
    }

    /// Read `key` as seen from `scope`
    pub fn get(&self, scope: ScopeId, key: &str) -> i32 {
        let owner = self.owner(scope, key);
        self.scopes[owner].values.get(key).copied().unwrap_or(0)
    }

    /// Write `key` as seen from `scope`
    pub fn set(&mut self, scope: ScopeId, key: &str, value: i32) {
        let owner = self.owner(scope, key);
        match self.scopes[owner].values.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.scopes[owner].values.insert(key.to_string(), value);
            }
        }
    }

    /// The scope in the chain starting at `scope` that owns `key`
    pub fn owner(&self, scope: ScopeId, key: &str) -> ScopeId {
        let mut current = scope;
        loop {
            let candidate = &self.scopes[current];
            match candidate.parent {
                Some(parent) if !candidate.owns(key) => current = parent,
                _ => return current,
            }
        }
    }

    /// Scope handles from `scope` up to the root
    pub fn chain(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut chain = vec![scope];
        let mut current = scope;
        while let Some(parent) = self.scopes[current].parent {
            chain.push(parent);
            current = parent;
        }
        chain
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_keys() {
        assert_eq!(compound_key("a", &[]), "a");
        assert_eq!(compound_key("a", &[3, -1]), "a[3][-1]");
        assert_eq!(base_name("a[3][-1]"), "a");
        assert_eq!(base_name("abc"), "abc");
    }

    #[test]
    fn test_undeclared_names_live_in_root() {
        let mut scopes = ScopeStack::new();
        let child = scopes.push(scopes.root());
        let grandchild = scopes.push(child);

        scopes.set(grandchild, "x", 7);
        assert_eq!(scopes.owner(grandchild, "x"), scopes.root());
        assert_eq!(scopes.get(scopes.root(), "x"), 7);
        assert_eq!(scopes.get(child, "never_written"), 0);
    }

    #[test]
    fn test_nearest_declaration_wins() {
        let mut scopes = ScopeStack::new();
        let root = scopes.root();
        scopes.declare(root, "x");
        scopes.set(root, "x", 1);

        let child = scopes.push(root);
        scopes.declare(child, "x");
        scopes.set(child, "x", 2);

        assert_eq!(scopes.get(child, "x"), 2);
        assert_eq!(scopes.get(root, "x"), 1);

        scopes.pop();
        assert_eq!(scopes.get(root, "x"), 1);
    }

    #[test]
    fn test_array_slots_follow_base_name() {
        let mut scopes = ScopeStack::new();
        let root = scopes.root();
        let child = scopes.push(root);
        scopes.declare(child, "a");

        scopes.set(child, "a[2]", 5);
        assert_eq!(scopes.owner(child, "a[2]"), child);
        assert_eq!(scopes.get(child, "a[2]"), 5);
        assert_eq!(scopes.get(root, "a[2]"), 0);
    }

    #[test]
    fn test_declare_resets_value() {
        let mut scopes = ScopeStack::new();
        let root = scopes.root();
        scopes.set(root, "n", 9);
        scopes.declare(root, "n");
        assert_eq!(scopes.get(root, "n"), 0);
        assert!(scopes.get_scope(root).is_some_and(|s| s.is_declared("n")));
    }

    #[test]
    fn test_root_is_never_popped() {
        let mut scopes = ScopeStack::new();
        scopes.pop();
        assert_eq!(scopes.depth(), 1);

        let child = scopes.push(scopes.root());
        assert_eq!(scopes.chain(child), vec![child, scopes.root()]);
    }
}
