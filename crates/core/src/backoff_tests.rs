// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

fn backoff_100ms() -> Backoff {
    Backoff::new(Duration::from_millis(100), Duration::from_secs(30), true)
}

#[test]
fn zero_failures_returns_base_independent_of_jitter() {
    let backoff = backoff_100ms();
    assert_eq!(backoff.next_delay(0, 1.0), Duration::from_millis(100));
    assert_eq!(backoff.next_delay(0, 0.5), Duration::from_millis(100));
    assert_eq!(backoff.next_delay(0, 0.73), Duration::from_millis(100));
}

#[test]
fn exponential_growth_with_unit_jitter() {
    let backoff = backoff_100ms();
    assert_eq!(backoff.next_delay(1, 1.0), Duration::from_millis(200));
    assert_eq!(backoff.next_delay(2, 1.0), Duration::from_millis(400));
    assert_eq!(backoff.next_delay(3, 1.0), Duration::from_millis(800));
    assert_eq!(backoff.next_delay(4, 1.0), Duration::from_millis(1600));
    assert_eq!(backoff.next_delay(5, 1.0), Duration::from_millis(3200));
}

#[test]
fn exponent_is_capped_at_32x() {
    let backoff = backoff_100ms();
    let at_cap = backoff.next_delay(EXPONENT_CAP, 1.0);
    assert_eq!(at_cap, Duration::from_millis(3200));
    assert_eq!(backoff.next_delay(6, 1.0), at_cap);
    assert_eq!(backoff.next_delay(50, 1.0), at_cap);
}

#[test]
fn jitter_scales_the_delay() {
    let backoff = backoff_100ms();
    assert_eq!(backoff.next_delay(1, 0.5), Duration::from_millis(100));
    assert_eq!(backoff.next_delay(2, 0.75), Duration::from_millis(300));
}

#[test]
fn delay_is_clamped_to_max() {
    let backoff = Backoff::new(Duration::from_secs(5), Duration::from_secs(8), true);
    assert_eq!(backoff.next_delay(1, 1.0), Duration::from_secs(8));
    assert_eq!(backoff.next_delay(5, 1.0), Duration::from_secs(8));
}

#[test]
fn non_exponential_ignores_failures() {
    let backoff = Backoff::new(Duration::from_secs(5), Duration::from_secs(60), false);
    for failures in 0..10 {
        assert_eq!(backoff.next_delay(failures, 1.0), Duration::from_secs(5));
    }
}

#[test]
fn draw_jitter_stays_in_range() {
    for _ in 0..200 {
        let jitter = draw_jitter();
        assert!((JITTER_MIN..=JITTER_MAX).contains(&jitter));
    }
}

proptest! {
    #[test]
    fn any_failure_count_is_bounded_by_max(
        base_ms in 1u64..10_000,
        failures in 1u32..100,
        jitter in JITTER_MIN..=JITTER_MAX,
    ) {
        let base = Duration::from_millis(base_ms);
        let max = Duration::from_millis(base_ms * 20);
        let backoff = Backoff::new(base, max, true);
        prop_assert!(backoff.next_delay(failures, jitter) <= max);
    }

    #[test]
    fn zero_failures_always_base(
        base_ms in 1u64..10_000,
        jitter in JITTER_MIN..=JITTER_MAX,
    ) {
        let base = Duration::from_millis(base_ms);
        let backoff = Backoff::new(base, Duration::from_millis(base_ms * 20), true);
        prop_assert_eq!(backoff.next_delay(0, jitter), base);
    }

    #[test]
    fn delay_never_shrinks_below_half_of_unjittered(
        base_ms in 1u64..1_000,
        failures in 1u32..20,
    ) {
        // With jitter at its floor the delay is half the unjittered value,
        // never less (unless the cap intervenes).
        let base = Duration::from_millis(base_ms);
        let max = Duration::from_secs(3600);
        let backoff = Backoff::new(base, max, true);
        let full = backoff.next_delay(failures, JITTER_MAX);
        let floor = backoff.next_delay(failures, JITTER_MIN);
        prop_assert!(floor >= full.mul_f64(0.5 - f64::EPSILON));
    }
}
