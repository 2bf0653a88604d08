use std::path::Path;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn default_policy_allows_only_reads() {
    let policy = DefaultPolicy;
    let path = Path::new("/tmp/x.txt");
    assert!(policy.check_access(path, Operation::Read).is_ok());
    assert_eq!(
        policy.check_access(path, Operation::Write),
        Err(PermissionError::new(path, Operation::Write))
    );
    assert!(policy.check_access(path, Operation::Execute).is_err());
}

#[test]
fn rooted_policy_allows_under_roots() {
    let policy = RootedPolicy::new()
        .allow(Operation::Write, "/srv/out")
        .allow(Operation::Execute, "/srv/app");
    assert!(policy
        .check_access(Path::new("/srv/out/a/b.json"), Operation::Write)
        .is_ok());
    assert!(policy
        .check_access(Path::new("/srv/app/lib.quill"), Operation::Execute)
        .is_ok());
    assert!(policy
        .check_access(Path::new("/srv/app/lib.quill"), Operation::Write)
        .is_err());
}

#[test]
fn rooted_policy_sees_through_dot_dot() {
    let policy = RootedPolicy::new().allow(Operation::Write, "/srv/out");
    assert!(policy
        .check_access(Path::new("/srv/out/../secret"), Operation::Write)
        .is_err());
}

#[test]
fn deny_wins_over_default_read() {
    let policy = RootedPolicy::new().deny(Operation::Read, "/etc");
    assert!(policy.check_access(Path::new("/home/me/x"), Operation::Read).is_ok());
    let error = policy
        .check_access(Path::new("/etc/passwd"), Operation::Read)
        .unwrap_err();
    assert_eq!(error.to_string(), "read access denied: /etc/passwd");
}

#[test]
fn read_allow_list_restricts_reads() {
    let policy = RootedPolicy::new().allow(Operation::Read, "/data");
    assert!(policy.check_access(Path::new("/data/a.csv"), Operation::Read).is_ok());
    assert!(policy.check_access(Path::new("/other/a.csv"), Operation::Read).is_err());
}
