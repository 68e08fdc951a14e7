//! # Eclat Core
//!
//! Frequent-itemset mining with the Eclat algorithm over vertical bitsets.
//!
//! Each item is encoded as the set of transaction indices that contain it.
//! Support counting then reduces to bitset intersections and population
//! counts, and the search walks a prefix tree of itemsets depth first.
//!
//! ## Features
//!
//! - **Pluggable bitsets**: Roaring (default), dense words, adaptive hash/Roaring
//! - **Prefix-tree lattice**: every frequent itemset exactly once, in lexicographic order
//! - **Guard rails**: recursion depth cap, itemset cap and deadline
//! - **Exact support**: integer population counts, `ceil(fraction * n)` threshold
//!
//! ## Quick Start
//!
//! ```rust
//! use eclat_core::{mine_transactions, MiningConfig, MiningLimits, RoaringBitmap, TransactionSet};
//!
//! let transactions = TransactionSet::parse(b"0 1\n0 1 2\n1 2\n0 2\n", 1.0)?;
//! let config = MiningConfig { min_support: 0.5, ..MiningConfig::default() };
//!
//! let outcome = mine_transactions::<RoaringBitmap>(transactions, &config, &MiningLimits::default())?;
//! let summary = outcome.tree.summary();
//!
//! assert_eq!(summary.count, 6);
//! assert_eq!(summary.count_maximal, 3);
//! assert!((summary.avg_length() - 1.5).abs() < 1e-9);
//! # Ok::<(), eclat_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
// Item ids and transaction indices are u32, counts are u64; the conversions
// are bounds-checked where the input is untrusted (TransactionSet).
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod bitset;
pub mod config;
pub mod error;
pub mod guardrails;
#[cfg(test)]
mod guardrails_tests;
pub mod lattice;
pub mod miner;
pub mod pipeline;
pub mod transaction;
#[cfg(test)]
mod transaction_tests;
pub mod vertical;

pub use bitset::{AdaptiveBitset, BackendKind, Bitset, DenseBitset, ItemBitset, RoaringBitmap};
pub use config::{ConfigError, EclatConfig, LoggingConfig, MiningConfig};
pub use error::{Error, Result};
pub use guardrails::{LimitViolation, MiningContext, MiningLimits};
pub use lattice::{FrequentItemset, ItemNode, ItemTree, LatticeSummary, NodeId};
pub use miner::{eclat, EclatMiner, MiningObserver, MiningStats, NoopObserver, TracingObserver};
pub use pipeline::{mine_transactions, mine_transactions_with, MiningOutcome};
pub use transaction::{min_support_count, TransactionSet};
pub use vertical::BitsetBag;
