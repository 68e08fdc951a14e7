//! Fuzz target for the transaction file parser.
//!
//! Any byte string must either parse or fail with a typed error, never panic.
//! On success every kept line is reflected in `item_max`.

#![no_main]

use eclat_core::TransactionSet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(set) = TransactionSet::parse(data, 1.0) else {
        return;
    };

    let max = set.iter().flat_map(|t| t.iter().copied()).max();
    assert_eq!(set.item_max(), max);
    assert!(set.len() <= data.len());
});
