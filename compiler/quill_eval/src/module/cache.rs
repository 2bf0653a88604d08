//! Module cache shared between interpreters.
//!
//! One mutex guards both the finished entries and the in-flight markers, so
//! checking for an entry and claiming a path is a single step. An in-flight
//! marker records which load session owns it: the same session reaching it
//! again is a circular import, another session waits for the load to finish.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Condvar, Mutex};
use rustc_hash::FxHashMap;

use crate::value::Value;

/// Identifies one interpreter's chain of nested imports.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SessionId(u64);

impl SessionId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SessionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Default)]
struct CacheState {
    entries: FxHashMap<PathBuf, Value>,
    in_flight: FxHashMap<PathBuf, SessionId>,
    /// Which path each blocked session is waiting for.
    waiting: FxHashMap<SessionId, PathBuf>,
}

impl CacheState {
    /// Would `session` waiting on `path` close a cycle of sessions waiting
    /// on each other's loads?
    fn would_deadlock(&self, session: SessionId, path: &Path) -> bool {
        let mut current = path;
        for _ in 0..=self.waiting.len() {
            let Some(owner) = self.in_flight.get(current) else {
                return false;
            };
            if *owner == session {
                return true;
            }
            match self.waiting.get(owner) {
                Some(next) => current = next,
                None => return false,
            }
        }
        false
    }
}

#[derive(Default)]
pub struct ModuleCache {
    state: Mutex<CacheState>,
    loaded: Condvar,
}

/// Outcome of [`ModuleCache::claim`].
pub enum Claim<'a> {
    /// Already loaded.
    Cached(Value),
    /// The caller now owns the load and must finish or drop the guard.
    Load(LoadGuard<'a>),
    /// The path is being loaded further up this session's import chain.
    Cycle,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `path`, or claim it for loading by `session`.
    ///
    /// Blocks while another session is loading the same path.
    pub fn claim(&self, path: &Path, session: SessionId) -> Claim<'_> {
        let mut state = self.state.lock();
        loop {
            if let Some(value) = state.entries.get(path) {
                return Claim::Cached(value.clone());
            }
            match state.in_flight.get(path).copied() {
                None => {
                    state.in_flight.insert(path.to_path_buf(), session);
                    return Claim::Load(LoadGuard {
                        cache: self,
                        path: path.to_path_buf(),
                        finished: false,
                    });
                }
                Some(owner) if owner == session => return Claim::Cycle,
                Some(_) if state.would_deadlock(session, path) => return Claim::Cycle,
                Some(owner) => {
                    tracing::debug!(path = %path.display(), ?owner, "waiting for module load");
                    state.waiting.insert(session, path.to_path_buf());
                    self.loaded.wait(&mut state);
                    state.waiting.remove(&session);
                }
            }
        }
    }

    pub fn get(&self, path: &Path) -> Option<Value> {
        self.state.lock().entries.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ModuleCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ModuleCache")
            .field("entries", &state.entries.len())
            .field("in_flight", &state.in_flight.len())
            .finish()
    }
}

/// Ownership of an in-flight load.
///
/// Dropping the guard without [`finish`](Self::finish) abandons the load:
/// nothing is cached and waiting sessions retry.
pub struct LoadGuard<'a> {
    cache: &'a ModuleCache,
    path: PathBuf,
    finished: bool,
}

impl LoadGuard<'_> {
    pub fn finish(mut self, value: Value) {
        let mut state = self.cache.state.lock();
        state.in_flight.remove(&self.path);
        state.entries.insert(std::mem::take(&mut self.path), value);
        self.finished = true;
        drop(state);
        self.cache.loaded.notify_all();
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.cache.state.lock().in_flight.remove(&self.path);
        self.cache.loaded.notify_all();
    }
}
