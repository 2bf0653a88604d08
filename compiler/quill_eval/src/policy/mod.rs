//! File access policy.
//!
//! File builtins consult the policy before reading or writing, and the
//! module loader checks [`Operation::Execute`] before evaluating an
//! imported file. Without configuration, reads are allowed and writes and
//! execution are denied.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::paths::normalize;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Operation {
    Read,
    Write,
    Execute,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Execute => "execute",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{operation} access denied: {}", path.display())]
pub struct PermissionError {
    pub path: PathBuf,
    pub operation: Operation,
}

impl PermissionError {
    pub fn new(path: &Path, operation: Operation) -> Self {
        PermissionError {
            path: path.to_path_buf(),
            operation,
        }
    }
}

pub trait SecurityPolicy: Send + Sync + fmt::Debug {
    /// `path` is absolute.
    fn check_access(&self, path: &Path, operation: Operation) -> Result<(), PermissionError>;
}

/// Read anything; write and execute nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultPolicy;

impl SecurityPolicy for DefaultPolicy {
    fn check_access(&self, path: &Path, operation: Operation) -> Result<(), PermissionError> {
        match operation {
            Operation::Read => Ok(()),
            Operation::Write | Operation::Execute => Err(PermissionError::new(path, operation)),
        }
    }
}

/// Per-operation allow and deny lists of directory roots.
///
/// A path under a denied root is always refused. Otherwise it must be
/// under an allowed root, except that reads with no allowed roots
/// configured are unrestricted.
#[derive(Clone, Debug, Default)]
pub struct RootedPolicy {
    allow: Vec<(Operation, PathBuf)>,
    deny: Vec<(Operation, PathBuf)>,
}

impl RootedPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn allow(mut self, operation: Operation, root: impl AsRef<Path>) -> Self {
        self.allow.push((operation, normalize(root.as_ref())));
        self
    }

    #[must_use]
    pub fn deny(mut self, operation: Operation, root: impl AsRef<Path>) -> Self {
        self.deny.push((operation, normalize(root.as_ref())));
        self
    }

    fn roots(list: &[(Operation, PathBuf)], operation: Operation) -> impl Iterator<Item = &PathBuf> {
        list.iter()
            .filter(move |(op, _)| *op == operation)
            .map(|(_, root)| root)
    }
}

impl SecurityPolicy for RootedPolicy {
    fn check_access(&self, path: &Path, operation: Operation) -> Result<(), PermissionError> {
        let path = normalize(path);
        if Self::roots(&self.deny, operation).any(|root| path.starts_with(root)) {
            return Err(PermissionError::new(&path, operation));
        }
        let mut allowed = Self::roots(&self.allow, operation).peekable();
        if operation == Operation::Read && allowed.peek().is_none() {
            return Ok(());
        }
        if allowed.any(|root| path.starts_with(root)) {
            Ok(())
        } else {
            Err(PermissionError::new(&path, operation))
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
