//! Hierarchical key-value container keyed by session id and namespace path

use std::collections::HashMap;

use super::error::{StoreError, StoreResult};

/// A node of the store tree: either a leaf value or a nested mapping
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<V> {
    /// Leaf value.
    Value(V),
    /// Nested mapping.
    Namespace(Namespace<V>),
}

impl<V> Entry<V> {
    /// The leaf value, if this is one.
    #[must_use]
    pub fn as_value(&self) -> Option<&V> {
        match self {
            Self::Value(value) => Some(value),
            Self::Namespace(_) => None,
        }
    }

    /// The mapping, if this is one.
    #[must_use]
    pub fn as_namespace(&self) -> Option<&Namespace<V>> {
        match self {
            Self::Namespace(namespace) => Some(namespace),
            Self::Value(_) => None,
        }
    }

    /// Consume the entry, keeping only a leaf value.
    #[must_use]
    pub fn into_value(self) -> Option<V> {
        match self {
            Self::Value(value) => Some(value),
            Self::Namespace(_) => None,
        }
    }

    /// Turn this entry into a mapping, discarding a leaf value if present.
    fn make_namespace(&mut self) -> &mut Namespace<V> {
        match self {
            Self::Namespace(namespace) => namespace,
            Self::Value(_) => {
                *self = Self::Namespace(Namespace::new());
                self.make_namespace()
            }
        }
    }
}

/// Mapping from segment name to child entry
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace<V> {
    children: HashMap<String, Entry<V>>,
}

impl<V> Default for Namespace<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Namespace<V> {
    /// Empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self { children: HashMap::new() }
    }

    /// Child entry named `segment`.
    #[must_use]
    pub fn get(&self, segment: &str) -> Option<&Entry<V>> {
        self.children.get(segment)
    }

    /// Put `entry` under `segment`, returning what it replaced.
    pub fn insert(&mut self, segment: impl Into<String>, entry: Entry<V>) -> Option<Entry<V>> {
        self.children.insert(segment.into(), entry)
    }

    /// Take the child named `segment` out.
    pub fn remove(&mut self, segment: &str) -> Option<Entry<V>> {
        self.children.remove(segment)
    }

    /// Whether a child named `segment` exists.
    #[must_use]
    pub fn contains(&self, segment: &str) -> bool {
        self.children.contains_key(segment)
    }

    /// Child names, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the mapping has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Session-scoped tree of namespaces holding values of type `V`
///
/// Paths are a session key followed by zero or more segments, walked
/// left-to-right as nested mappings:
///
/// - [`get`](Self::get) fails with [`StoreError::NamespaceNotFound`] when any
///   prefix is absent or when the walk hits a leaf value early.
/// - [`set`](Self::set) creates missing intermediate mappings and overwrites
///   the leaf. With no segments the session key itself is the leaf.
/// - [`remove`](Self::remove) deletes the leaf without pruning ancestors.
#[derive(Debug, Clone)]
pub struct NamespacedStore<V> {
    root: HashMap<String, Entry<V>>,
}

impl<V> Default for NamespacedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> NamespacedStore<V> {
    /// Store with no sessions.
    #[must_use]
    pub fn new() -> Self {
        Self { root: HashMap::new() }
    }

    /// Create (or reset) a session subtree with the given empty namespaces.
    pub fn create_session(&mut self, key: &str, namespaces: &[&str]) {
        let mut root = Namespace::new();
        for name in namespaces {
            root.insert(*name, Entry::Namespace(Namespace::new()));
        }
        self.root.insert(key.to_string(), Entry::Namespace(root));
    }

    /// Drop a session subtree. Returns whether the session existed.
    pub fn destroy_session(&mut self, key: &str) -> bool {
        self.root.remove(key).is_some()
    }

    /// Whether a subtree exists for `key`.
    #[must_use]
    pub fn contains_session(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Number of session subtrees.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.root.len()
    }

    /// Look up the entry at `key/segments..`.
    ///
    /// # Errors
    /// [`StoreError::NamespaceNotFound`] naming the first unresolved prefix.
    pub fn get(&self, key: &str, segments: &[&str]) -> StoreResult<&Entry<V>> {
        let mut current = self.root.get(key).ok_or_else(|| StoreError::not_found(key, &[]))?;

        for (depth, segment) in segments.iter().enumerate() {
            current = match current {
                Entry::Namespace(namespace) => namespace.children.get(*segment),
                Entry::Value(_) => None,
            }
            .ok_or_else(|| StoreError::not_found(key, &segments[..=depth]))?;
        }

        Ok(current)
    }

    /// Look up a leaf value.
    ///
    /// # Errors
    /// [`StoreError::NamespaceNotFound`] if the path does not resolve,
    /// [`StoreError::NotAValue`] if it resolves to a mapping.
    pub fn get_value(&self, key: &str, segments: &[&str]) -> StoreResult<&V> {
        self.get(key, segments)?.as_value().ok_or_else(|| StoreError::not_a_value(key, segments))
    }

    /// Look up a mapping.
    ///
    /// # Errors
    /// [`StoreError::NamespaceNotFound`] if the path does not resolve or
    /// resolves to a leaf value.
    pub fn get_namespace(&self, key: &str, segments: &[&str]) -> StoreResult<&Namespace<V>> {
        self.get(key, segments)?.as_namespace().ok_or_else(|| StoreError::not_found(key, segments))
    }

    /// Write `value` as the leaf at `key/segments..`.
    pub fn set(&mut self, key: &str, segments: &[&str], value: V) {
        self.set_entry(key, segments, Entry::Value(value));
    }

    /// Write an arbitrary entry (value or mapping) at `key/segments..`.
    ///
    /// A leaf value found where an intermediate mapping is needed is
    /// replaced by an empty mapping.
    pub fn set_entry(&mut self, key: &str, segments: &[&str], entry: Entry<V>) {
        let Some((leaf, parents)) = segments.split_last() else {
            self.root.insert(key.to_string(), entry);
            return;
        };

        let mut current = self
            .root
            .entry(key.to_string())
            .or_insert_with(|| Entry::Namespace(Namespace::new()));

        for segment in parents {
            current = current
                .make_namespace()
                .children
                .entry((*segment).to_string())
                .or_insert_with(|| Entry::Namespace(Namespace::new()));
        }

        current.make_namespace().insert(*leaf, entry);
    }

    /// Delete and return the leaf at `key/segments..`.
    ///
    /// # Errors
    /// [`StoreError::NamespaceNotFound`] if the parent path does not resolve
    /// to a mapping or the final segment is absent.
    pub fn remove(&mut self, key: &str, segments: &[&str]) -> StoreResult<Entry<V>> {
        let Some((leaf, parents)) = segments.split_last() else {
            return self.root.remove(key).ok_or_else(|| StoreError::not_found(key, &[]));
        };

        let mut current =
            self.root.get_mut(key).ok_or_else(|| StoreError::not_found(key, &[]))?;

        for (depth, segment) in parents.iter().enumerate() {
            current = match current {
                Entry::Namespace(namespace) => namespace.children.get_mut(*segment),
                Entry::Value(_) => None,
            }
            .ok_or_else(|| StoreError::not_found(key, &parents[..=depth]))?;
        }

        match current {
            Entry::Namespace(namespace) => namespace.remove(leaf),
            Entry::Value(_) => None,
        }
        .ok_or_else(|| StoreError::not_found(key, segments))
    }
}
