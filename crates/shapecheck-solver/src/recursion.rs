//! Depth limiting for the recursive engines.
//!
//! Descriptors and values are trees, so both engines recurse once per level
//! of nesting. The algebra is assumed acyclic, but malformed input (or a
//! value graph built through shared handles) must not overflow the stack.
//! Every recursive step therefore goes through a [`DepthCounter`]; when the
//! limit is reached the step is denied and the caller fails closed.
//!
//! # Profiles
//!
//! [`RecursionProfile`] names the limit used at each call site:
//!
//! ```ignore
//! let mut depth = DepthCounter::with_profile(RecursionProfile::SubtypeCheck);
//! if !depth.enter() {
//!     return false; // fail closed
//! }
//! let result = recurse();
//! depth.leave();
//! result
//! ```
//!
//! # Safety
//!
//! - **Debug leak detection**: dropping a counter with unmatched `enter()`
//!   calls panics in debug builds.
//! - **Debug underflow detection**: `leave()` at depth 0 panics in debug builds.
//! - **Sticky exceeded state**: once the limit trips, [`DepthCounter::is_exceeded`]
//!   stays `true` until [`DepthCounter::reset`].

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named depth-limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecursionProfile {
    /// Descriptor-vs-descriptor comparison.
    ///
    /// depth = 100
    SubtypeCheck,

    /// Value-vs-descriptor conformance. Runtime values nest deeper than
    /// annotations do (long chains of nested lists, JSON-like payloads).
    ///
    /// depth = 256
    ValueCheck,

    /// Custom limit for one-off or test scenarios.
    Custom { max_depth: u32 },
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::SubtypeCheck => 100,
            Self::ValueCheck => 256,
            Self::Custom { max_depth } => max_depth,
        }
    }
}

// ---------------------------------------------------------------------------
// DepthCounter
// ---------------------------------------------------------------------------

/// A depth-only guard for stack overflow protection.
///
/// The same descriptor may legitimately appear at several places in a tree,
/// so no visiting set is kept: only nesting depth is bounded.
#[derive(Debug)]
pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
    exceeded: bool,
}

impl DepthCounter {
    /// A counter allowing `max_depth` nested levels.
    pub fn new(max_depth: u32) -> Self {
        Self {
            depth: 0,
            max_depth,
            exceeded: false,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    /// Step one level down.
    ///
    /// At the limit nothing is counted and `false` comes back; the caller
    /// must then fail closed without calling `leave()`.
    #[inline]
    pub fn enter(&mut self) -> bool {
        let allowed = self.depth < self.max_depth;
        if allowed {
            self.depth += 1;
        } else {
            self.exceeded = true;
        }
        allowed
    }

    /// Leave the current level. Must pair with a successful [`enter`](Self::enter).
    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "unbalanced DepthCounter::leave()");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Returns `true` if the limit was hit since the last reset.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }

    /// Clear depth and the exceeded flag, keeping the limit.
    pub fn reset(&mut self) {
        self.depth = 0;
        self.exceeded = false;
    }
}

#[cfg(debug_assertions)]
impl Drop for DepthCounter {
    fn drop(&mut self) {
        if !std::thread::panicking() && self.depth > 0 {
            panic!("DepthCounter dropped at depth {}: enter() without leave()", self.depth);
        }
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
