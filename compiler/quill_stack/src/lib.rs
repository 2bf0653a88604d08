//! Stack safety for the recursive parser and evaluator.
//!
//! Two separate concerns live here:
//!
//! - [`ensure_sufficient_stack`] grows the native stack on demand so deeply
//!   nested source (long `else if` chains, nested literals) does not crash
//!   the host.
//! - [`DepthLimit`] bounds *logical* depth (parser nesting, user call depth)
//!   so unbounded user recursion becomes a reported error instead of
//!   unbounded memory growth.
//!
//! # Configuration
//!
//! - **Red zone**: 100KB - if less than this remains, the stack is grown
//! - **Growth size**: 1MB per growth

use std::fmt;

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// On native targets this uses `stacker::maybe_grow`; on WASM it calls `f`
/// directly.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// A counter bounded by a maximum depth.
///
/// Callers pair every successful [`enter`](Self::enter) with one
/// [`exit`](Self::exit), typically around a recursive call.
#[derive(Clone, Debug)]
pub struct DepthLimit {
    current: usize,
    max: usize,
}

/// Returned by [`DepthLimit::enter`] when the limit would be exceeded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepthExceeded {
    pub max: usize,
}

impl fmt::Display for DepthExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "maximum depth of {} exceeded", self.max)
    }
}

impl std::error::Error for DepthExceeded {}

impl DepthLimit {
    pub const fn new(max: usize) -> Self {
        DepthLimit { current: 0, max }
    }

    /// Enter one level deeper.
    pub fn enter(&mut self) -> Result<(), DepthExceeded> {
        if self.current >= self.max {
            return Err(DepthExceeded { max: self.max });
        }
        self.current += 1;
        Ok(())
    }

    /// Leave one level.
    #[inline]
    pub fn exit(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }
}
