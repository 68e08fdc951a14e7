//! Tests for `guardrails` module

use std::time::Duration;

use super::guardrails::*;

#[test]
fn test_default_limits() {
    let limits = MiningLimits::default();

    assert_eq!(limits.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(limits.max_itemsets, 0);
    assert_eq!(limits.timeout_ms, 0);
    assert_eq!(MiningLimits::new(), limits);
}

#[test]
fn test_builder_methods() {
    let limits = MiningLimits::new()
        .with_max_depth(8)
        .with_max_itemsets(100)
        .with_timeout_ms(250);

    assert_eq!(limits.max_depth, 8);
    assert_eq!(limits.max_itemsets, 100);
    assert_eq!(limits.timeout_ms, 250);
}

#[test]
fn test_check_depth() {
    // Arrange
    let ctx = MiningContext::new(MiningLimits::new().with_max_depth(3), 0);

    // Act & Assert
    assert!(ctx.check_depth(3).is_ok());
    assert_eq!(
        ctx.check_depth(4),
        Err(LimitViolation::DepthExceeded { max: 3, actual: 4 })
    );
}

#[test]
fn test_unlimited_keeps_depth_guard() {
    let ctx = MiningContext::new(MiningLimits::unlimited(), 0);

    assert_eq!(MiningLimits::unlimited().max_itemsets, 0);
    assert_eq!(MiningLimits::unlimited().timeout_ms, 0);
    assert!(ctx.check_depth(DEFAULT_MAX_DEPTH).is_ok());
    assert_eq!(
        ctx.check_depth(DEFAULT_MAX_DEPTH + 1),
        Err(LimitViolation::DepthExceeded {
            max: DEFAULT_MAX_DEPTH,
            actual: DEFAULT_MAX_DEPTH + 1,
        })
    );
}

#[test]
fn test_record_itemset_counts_initial_nodes() {
    // Arrange
    let mut ctx = MiningContext::new(MiningLimits::new().with_max_itemsets(3), 2);

    // Act
    let first = ctx.record_itemset();
    let second = ctx.record_itemset();

    // Assert
    assert!(first.is_ok());
    assert_eq!(
        second,
        Err(LimitViolation::ItemsetLimitExceeded { max: 3 })
    );
    assert_eq!(ctx.itemsets(), 3);
}

#[test]
fn test_zero_itemset_limit_is_unlimited() {
    let mut ctx = MiningContext::new(MiningLimits::default(), 0);

    for _ in 0..10_000 {
        ctx.record_itemset().expect("no limit");
    }

    assert_eq!(ctx.itemsets(), 10_000);
}

#[test]
fn test_timeout() {
    // Arrange
    let ctx = MiningContext::new(MiningLimits::new().with_timeout_ms(1), 0);

    // Act
    std::thread::sleep(Duration::from_millis(10));

    // Assert
    assert!(matches!(
        ctx.check_timeout(),
        Err(LimitViolation::Timeout { max_ms: 1, .. })
    ));
    assert!(ctx.elapsed() >= Duration::from_millis(10));
}

#[test]
fn test_no_timeout_by_default() {
    let ctx = MiningContext::new(MiningLimits::default(), 0);

    std::thread::sleep(Duration::from_millis(2));

    assert!(ctx.check_timeout().is_ok());
}

#[test]
fn test_violation_display() {
    let msg = LimitViolation::Timeout {
        max_ms: 100,
        elapsed_ms: 150,
    }
    .to_string();

    assert_eq!(msg, "Mining timed out: max=100ms, elapsed=150ms");
}

#[test]
fn test_limits_deserialize_with_defaults() {
    let limits: MiningLimits = serde_json::from_str(r#"{"max_itemsets": 5}"#).expect("parse");

    assert_eq!(limits.max_itemsets, 5);
    assert_eq!(limits.max_depth, DEFAULT_MAX_DEPTH);
}
