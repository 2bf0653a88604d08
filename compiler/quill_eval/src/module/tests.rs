use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;
use crate::value::Value;

#[test]
fn candidate_paths_get_the_module_extension() {
    let base = Path::new("/project/src");
    assert_eq!(candidate_path("./lib", base), PathBuf::from("/project/src/lib.quill"));
    assert_eq!(candidate_path("../util.quill", base), PathBuf::from("/project/util.quill"));
    assert_eq!(candidate_path("/abs/data.txt", base), PathBuf::from("/abs/data.txt"));
}

#[test]
fn memory_source_normalizes_paths() {
    let source = MemorySource::new().with_file("/m/a.quill", "export x = 1");
    let canonical = source.canonicalize(Path::new("/m/sub/../a.quill")).unwrap();
    assert_eq!(canonical, PathBuf::from("/m/a.quill"));
    assert_eq!(source.read_source(&canonical).unwrap(), "export x = 1");
    assert_eq!(
        source.canonicalize(Path::new("/m/missing.quill")),
        Err(SourceError::NotFound(PathBuf::from("/m/missing.quill")))
    );
}

#[test]
fn loader_maps_missing_modules() {
    let loader = ModuleLoader::new(Arc::new(MemorySource::new()), Arc::new(ModuleCache::new()));
    let error = loader.canonicalize("./nope", Path::new("/m")).unwrap_err();
    assert_eq!(error.message, "module not found: /m/nope.quill");
}

#[test]
fn claim_then_cached() {
    let cache = ModuleCache::new();
    let session = SessionId::next();
    let path = Path::new("/m/a.quill");
    let Claim::Load(guard) = cache.claim(path, session) else {
        panic!("first claim should load");
    };
    guard.finish(Value::Int(7));
    assert!(matches!(cache.claim(path, session), Claim::Cached(Value::Int(7))));
    assert!(matches!(cache.claim(path, SessionId::next()), Claim::Cached(Value::Int(7))));
    assert_eq!(cache.len(), 1);
}

#[test]
fn reentry_from_same_session_is_a_cycle() {
    let cache = ModuleCache::new();
    let session = SessionId::next();
    let path = Path::new("/m/a.quill");
    let _guard = match cache.claim(path, session) {
        Claim::Load(guard) => guard,
        _ => panic!("first claim should load"),
    };
    assert!(matches!(cache.claim(path, session), Claim::Cycle));
}

#[test]
fn abandoned_load_is_not_cached() {
    let cache = ModuleCache::new();
    let session = SessionId::next();
    let path = Path::new("/m/a.quill");
    match cache.claim(path, session) {
        Claim::Load(guard) => drop(guard),
        _ => panic!("first claim should load"),
    }
    assert!(cache.is_empty());
    assert!(matches!(cache.claim(path, session), Claim::Load(_)));
}

#[test]
fn other_sessions_wait_for_the_load() {
    let cache = ModuleCache::new();
    let path = Path::new("/m/a.quill");
    let Claim::Load(guard) = cache.claim(path, SessionId::next()) else {
        panic!("first claim should load");
    };
    std::thread::scope(|scope| {
        let waiter = scope.spawn(|| matches!(cache.claim(path, SessionId::next()), Claim::Cached(Value::Int(1))));
        std::thread::sleep(Duration::from_millis(20));
        guard.finish(Value::Int(1));
        assert!(waiter.join().unwrap());
    });
}
