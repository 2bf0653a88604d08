//! Options for `quill run`.

use std::path::{Path, PathBuf};

use quill_eval::{Operation, RootedPolicy};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("missing file path")]
    MissingFile,
    #[error("option `{0}` needs a value")]
    MissingValue(String),
    #[error("invalid value `{value}` for `{option}`")]
    InvalidValue { option: String, value: String },
    #[error("unknown option `{0}`")]
    Unknown(String),
}

/// Parsed `quill run` arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub file: PathBuf,
    pub allow_write: Vec<PathBuf>,
    pub allow_execute: Vec<PathBuf>,
    pub deny_read: Vec<PathBuf>,
    /// Overrides the interpreter's call depth limit.
    pub max_depth: Option<usize>,
}

impl RunOptions {
    /// Parse the arguments after `run`. Options take their value either as
    /// the next argument or after `=`.
    pub fn parse(args: &[String]) -> Result<Self, OptionsError> {
        let mut options = RunOptions::default();
        let mut file = None;
        let mut args = args.iter();
        while let Some(arg) = args.next() {
            if !arg.starts_with("--") {
                if file.is_some() {
                    return Err(OptionsError::Unknown(arg.clone()));
                }
                file = Some(PathBuf::from(arg));
                continue;
            }
            let (name, inline) = match arg.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (arg.as_str(), None),
            };
            let mut value = || {
                inline
                    .clone()
                    .or_else(|| args.next().cloned())
                    .ok_or_else(|| OptionsError::MissingValue(name.to_string()))
            };
            match name {
                "--allow-write" => options.allow_write.push(PathBuf::from(value()?)),
                "--allow-execute" => options.allow_execute.push(PathBuf::from(value()?)),
                "--deny-read" => options.deny_read.push(PathBuf::from(value()?)),
                "--max-depth" => {
                    let text = value()?;
                    let depth = text.parse().map_err(|_| OptionsError::InvalidValue {
                        option: name.to_string(),
                        value: text.clone(),
                    })?;
                    options.max_depth = Some(depth);
                }
                _ => return Err(OptionsError::Unknown(name.to_string())),
            }
        }
        options.file = file.ok_or(OptionsError::MissingFile)?;
        Ok(options)
    }

    /// Policy for running a script that lives in `script_dir`: modules next
    /// to the script may be imported, and the flags add further roots.
    pub fn policy(&self, script_dir: &Path) -> RootedPolicy {
        let mut policy = RootedPolicy::new().allow(Operation::Execute, script_dir);
        for dir in &self.allow_execute {
            policy = policy.allow(Operation::Execute, absolute(dir));
        }
        for dir in &self.allow_write {
            policy = policy.allow(Operation::Write, absolute(dir));
        }
        for dir in &self.deny_read {
            policy = policy.deny(Operation::Read, absolute(dir));
        }
        policy
    }
}

/// Canonical form of `path` when it exists, else joined to the working
/// directory.
fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    })
}
