// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn tracker(config: HoverConfig) -> HoverTracker {
    HoverTracker::new(TargetId::new("tgt-1"), "/monitors/42", config)
}

fn now() -> Instant {
    Instant::now()
}

#[test]
fn enter_arms_the_dwell_timer() {
    let mut t = tracker(HoverConfig::for_priority(Priority::Medium));
    assert_eq!(
        t.pointer_enter(now()),
        HoverArm::Dwell(Duration::from_millis(75))
    );
    assert!(t.armed());
}

#[test]
fn immediate_mode_fires_on_enter() {
    let mut t = tracker(HoverConfig {
        immediate: true,
        ..HoverConfig::default()
    });
    assert_eq!(t.pointer_enter(now()), HoverArm::Immediate);
    assert!(!t.armed());
}

#[test]
fn timer_fired_fires_once() {
    let mut t = tracker(HoverConfig::default());
    t.pointer_enter(now());
    assert!(t.timer_fired());
    t.mark_fired();
    assert!(!t.timer_fired());
}

#[test]
fn fired_target_ignores_reentry() {
    let mut t = tracker(HoverConfig::default());
    t.pointer_enter(now());
    t.mark_fired();
    t.pointer_leave();

    assert_eq!(t.pointer_enter(now()), HoverArm::None);
    assert_eq!(t.pointer_move(1.0, 1.0, now()), HoverArm::None);
    assert!(!t.focus());
}

#[test]
fn slow_movement_accelerates_the_prefetch() {
    let mut t = tracker(HoverConfig::for_priority(Priority::Low));
    let t0 = now();
    assert_eq!(
        t.pointer_enter(t0),
        HoverArm::Dwell(Duration::from_millis(150))
    );

    // First sample only records a position.
    assert_eq!(t.pointer_move(10.0, 10.0, t0), HoverArm::None);

    // 12 px over 120 ms = 0.1 px/ms, well under the 0.5 threshold.
    let arm = t.pointer_move(22.0, 10.0, t0 + Duration::from_millis(120));
    assert_eq!(arm, HoverArm::Accelerated(Duration::from_millis(45)));
}

#[test]
fn accelerated_delay_is_floored() {
    let config = HoverConfig::for_priority(Priority::High);
    // 30% of 25 ms would be 7.5 ms; the floor keeps it at 25 ms.
    assert_eq!(config.accel_delay(), Duration::from_millis(25));
}

#[test]
fn fast_movement_keeps_the_dwell_timer() {
    let mut t = tracker(HoverConfig::default());
    let t0 = now();
    t.pointer_enter(t0);
    t.pointer_move(0.0, 0.0, t0);

    // 200 px over 120 ms is 1.67 px/ms, above the threshold.
    let arm = t.pointer_move(200.0, 0.0, t0 + Duration::from_millis(120));
    assert_eq!(arm, HoverArm::None);
    assert!(t.armed());
}

#[test]
fn samples_within_the_gap_are_ignored() {
    let mut t = tracker(HoverConfig::default());
    let t0 = now();
    t.pointer_enter(t0);
    t.pointer_move(0.0, 0.0, t0);

    // 40 ms since the last sample: no speed estimate yet, even though the
    // instantaneous speed would be below the threshold.
    let arm = t.pointer_move(1.0, 0.0, t0 + Duration::from_millis(40));
    assert_eq!(arm, HoverArm::None);

    // The earlier sample is still the reference; 100+ ms later the
    // estimate is computed against it.
    let arm = t.pointer_move(2.0, 0.0, t0 + Duration::from_millis(110));
    assert_eq!(
        arm,
        HoverArm::Accelerated(HoverConfig::default().accel_delay())
    );
}

#[test]
fn acceleration_happens_at_most_once() {
    let mut t = tracker(HoverConfig::default());
    let t0 = now();
    t.pointer_enter(t0);
    t.pointer_move(0.0, 0.0, t0);

    let first = t.pointer_move(1.0, 0.0, t0 + Duration::from_millis(110));
    assert!(matches!(first, HoverArm::Accelerated(_)));

    let second = t.pointer_move(2.0, 0.0, t0 + Duration::from_millis(220));
    assert_eq!(second, HoverArm::None);
}

#[test]
fn leave_cancels_pending_intent_but_keeps_fired_state() {
    let mut t = tracker(HoverConfig::default());
    t.pointer_enter(now());
    assert!(t.pointer_leave());
    assert!(!t.armed());
    assert!(!t.has_fired());

    // Leaving again is a safe no-op.
    assert!(!t.pointer_leave());
}

#[test]
fn moves_after_leave_are_ignored() {
    let mut t = tracker(HoverConfig::default());
    let t0 = now();
    t.pointer_enter(t0);
    t.pointer_leave();
    assert_eq!(t.pointer_move(0.0, 0.0, t0), HoverArm::None);
}

#[test]
fn focus_fires_when_enabled() {
    let mut t = tracker(HoverConfig::default());
    assert!(t.focus());
    t.mark_fired();
    assert!(!t.focus());
}

#[test]
fn focus_disabled_never_fires() {
    let mut t = tracker(HoverConfig {
        prefetch_on_focus: false,
        ..HoverConfig::default()
    });
    assert!(!t.focus());
}

#[test]
fn reset_reenables_firing_for_new_destination() {
    let mut t = tracker(HoverConfig::default());
    t.pointer_enter(now());
    t.mark_fired();

    t.reset("/monitors/43");
    assert_eq!(t.destination(), "/monitors/43");
    assert!(!t.has_fired());
    assert!(matches!(t.pointer_enter(now()), HoverArm::Dwell(_)));
}

#[test]
fn speed_is_euclidean() {
    let t0 = now();
    let a = PointerSample { x: 0.0, y: 0.0, at: t0 };
    let b = PointerSample {
        x: 30.0,
        y: 40.0,
        at: t0 + Duration::from_millis(100),
    };
    assert!((a.speed_to(&b) - 0.5).abs() < 1e-9);
}

#[test]
fn zero_elapsed_speed_is_infinite() {
    let t0 = now();
    let a = PointerSample { x: 0.0, y: 0.0, at: t0 };
    let b = PointerSample { x: 5.0, y: 0.0, at: t0 };
    assert!(a.speed_to(&b).is_infinite());
}
