//! Guard rails for lattice expansion.
//!
//! Mining is a depth-first recursion whose depth and output size depend only
//! on the data. These limits turn pathological inputs into errors instead of
//! stack exhaustion or unbounded runs:
//! - **Depth limit**: maximum itemset length reached by the recursion
//! - **Itemset limit**: maximum number of lattice nodes
//! - **Deadline**: wall-clock budget, checked between top-level siblings

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default maximum recursion depth (itemset length).
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Mining limits configuration.
///
/// A value of `0` for `max_itemsets` or `timeout_ms` disables that limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningLimits {
    /// Maximum recursion depth, i.e. the longest itemset that may be built.
    pub max_depth: usize,
    /// Maximum number of itemsets kept in the lattice (0 = unlimited).
    pub max_itemsets: usize,
    /// Mining deadline in milliseconds (0 = none).
    pub timeout_ms: u64,
}

impl Default for MiningLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_itemsets: 0,
            timeout_ms: 0,
        }
    }
}

impl MiningLimits {
    /// Creates limits with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// No itemset cap and no deadline. The depth guard stays at
    /// [`DEFAULT_MAX_DEPTH`] so the recursion cannot exhaust the stack.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_itemsets: 0,
            timeout_ms: 0,
        }
    }

    /// Sets the maximum recursion depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the maximum number of itemsets.
    #[must_use]
    pub fn with_max_itemsets(mut self, count: usize) -> Self {
        self.max_itemsets = count;
        self
    }

    /// Sets the mining deadline in milliseconds.
    #[must_use]
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }
}

/// Guard-rail violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitViolation {
    /// Recursion went deeper than `max_depth`.
    DepthExceeded {
        /// Maximum allowed depth.
        max: usize,
        /// Depth that was about to be entered.
        actual: usize,
    },
    /// The lattice grew beyond `max_itemsets`.
    ItemsetLimitExceeded {
        /// Maximum allowed number of itemsets.
        max: usize,
    },
    /// Mining ran past its deadline.
    Timeout {
        /// Allowed time in milliseconds.
        max_ms: u64,
        /// Elapsed time in milliseconds.
        elapsed_ms: u64,
    },
}

impl std::fmt::Display for LimitViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DepthExceeded { max, actual } => {
                write!(f, "Recursion depth exceeded: max={max}, actual={actual}")
            }
            Self::ItemsetLimitExceeded { max } => {
                write!(f, "Itemset limit exceeded: max={max}")
            }
            Self::Timeout { max_ms, elapsed_ms } => {
                write!(f, "Mining timed out: max={max_ms}ms, elapsed={elapsed_ms}ms")
            }
        }
    }
}

impl std::error::Error for LimitViolation {}

/// Per-run limit tracking.
#[derive(Debug)]
pub struct MiningContext {
    limits: MiningLimits,
    start_time: Instant,
    itemsets: usize,
}

impl MiningContext {
    /// Starts tracking a run. `initial_itemsets` is the size of the lattice
    /// before expansion (the frequent singletons).
    #[must_use]
    pub fn new(limits: MiningLimits, initial_itemsets: usize) -> Self {
        Self {
            limits,
            start_time: Instant::now(),
            itemsets: initial_itemsets,
        }
    }

    /// Checks the deadline.
    pub fn check_timeout(&self) -> Result<(), LimitViolation> {
        if self.limits.timeout_ms == 0 {
            return Ok(());
        }
        let elapsed_ms = u64::try_from(self.start_time.elapsed().as_millis()).unwrap_or(u64::MAX);
        if elapsed_ms > self.limits.timeout_ms {
            return Err(LimitViolation::Timeout {
                max_ms: self.limits.timeout_ms,
                elapsed_ms,
            });
        }
        Ok(())
    }

    /// Checks that `depth` may be entered.
    pub fn check_depth(&self, depth: usize) -> Result<(), LimitViolation> {
        if depth > self.limits.max_depth {
            return Err(LimitViolation::DepthExceeded {
                max: self.limits.max_depth,
                actual: depth,
            });
        }
        Ok(())
    }

    /// Accounts for one more itemset about to be inserted.
    pub fn record_itemset(&mut self) -> Result<(), LimitViolation> {
        if self.limits.max_itemsets != 0 && self.itemsets >= self.limits.max_itemsets {
            return Err(LimitViolation::ItemsetLimitExceeded {
                max: self.limits.max_itemsets,
            });
        }
        self.itemsets += 1;
        Ok(())
    }

    /// Number of itemsets accounted for so far.
    #[must_use]
    pub fn itemsets(&self) -> usize {
        self.itemsets
    }

    /// Returns elapsed time since the run started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
