//! Insertion-ordered dictionaries with lazily evaluated fields.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use quill_ir::ExprId;
use rustc_hash::FxHashMap;

use super::Value;
use crate::environment::Environment;
use crate::unit::Unit;

/// A dictionary entry.
#[derive(Clone)]
pub enum Slot {
    Ready(Value),
    /// Not evaluated yet. Forced on first access with `this` bound to the
    /// owning dictionary, then replaced by `Ready`.
    Pending(Thunk),
    /// Currently being forced; reaching it again is a self-reference.
    Forcing,
}

/// An unevaluated field expression and where to evaluate it.
#[derive(Clone)]
pub struct Thunk {
    pub unit: Arc<Unit>,
    pub expr: ExprId,
    pub env: Environment,
}

#[derive(Clone, Default)]
pub struct DictData {
    entries: Vec<(Arc<str>, Slot)>,
    index: FxHashMap<Arc<str>, usize>,
}

impl DictData {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Slot> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Slot> {
        self.index.get(key).map(|&i| &mut self.entries[i].1)
    }

    /// Evaluated value of `key`, if present and already forced.
    pub fn get_ready(&self, key: &str) -> Option<&Value> {
        match self.get(key) {
            Some(Slot::Ready(value)) => Some(value),
            _ => None,
        }
    }

    /// Insert or overwrite. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<Arc<str>>, slot: Slot) {
        let key = key.into();
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].1 = slot;
        } else {
            self.index.insert(Arc::clone(&key), self.entries.len());
            self.entries.push((key, slot));
        }
    }

    pub fn set(&mut self, key: impl Into<Arc<str>>, value: Value) {
        self.insert(key, Slot::Ready(value));
    }

    pub fn remove(&mut self, key: &str) -> Option<Slot> {
        let i = self.index.remove(key)?;
        let (_, slot) = self.entries.remove(i);
        for position in self.index.values_mut() {
            if *position > i {
                *position -= 1;
            }
        }
        Some(slot)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Arc<str>> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Slot)> {
        self.entries.iter().map(|(key, slot)| (key, slot))
    }

    /// Keys whose slots still need forcing.
    pub fn pending_keys(&self) -> Vec<Arc<str>> {
        self.entries
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Pending(_)))
            .map(|(key, _)| Arc::clone(key))
            .collect()
    }

    /// Field-wise equality over evaluated entries, ignoring order.
    pub fn equals(&self, other: &DictData) -> bool {
        self.len() == other.len()
            && self.entries.iter().all(|(key, slot)| match (slot, other.get(key)) {
                (Slot::Ready(a), Some(Slot::Ready(b))) => a.equals(b),
                _ => false,
            })
    }
}

/// Shared, interior-mutable dictionary.
#[derive(Clone, Default)]
pub struct Dict(Arc<RwLock<DictData>>);

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: DictData) -> Self {
        Dict(Arc::new(RwLock::new(data)))
    }

    /// Build a dictionary of evaluated values.
    pub fn from_values<K: Into<Arc<str>>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let mut data = DictData::new();
        for (key, value) in entries {
            data.set(key, value);
        }
        Self::from_data(data)
    }

    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, DictData> {
        self.0.read()
    }

    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, DictData> {
        self.0.write()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Dict) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Stable identity for cycle detection.
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub fn get_ready(&self, key: &str) -> Option<Value> {
        self.read().get_ready(key).cloned()
    }

    pub fn set(&self, key: impl Into<Arc<str>>, value: Value) {
        self.write().set(key, value);
    }

    /// The `__type` tag of a pseudo-type dictionary.
    pub fn type_tag(&self) -> Option<Arc<str>> {
        match self.read().get_ready(crate::pseudo::TYPE_KEY) {
            Some(Value::Str(tag)) => Some(Arc::clone(tag)),
            _ => None,
        }
    }

    /// A new dictionary with the same slots. Pending fields stay pending.
    pub fn shallow_copy(&self) -> Dict {
        Dict::from_data(self.read().clone())
    }
}

impl fmt::Debug for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.read();
        let mut map = f.debug_map();
        for (key, slot) in data.iter() {
            match slot {
                Slot::Ready(value) => map.entry(key, value),
                Slot::Pending(_) => map.entry(key, &"<pending>"),
                Slot::Forcing => map.entry(key, &"<forcing>"),
            };
        }
        map.finish()
    }
}
