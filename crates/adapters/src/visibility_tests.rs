// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn reports_initial_state() {
    assert!(HostVisibility::new(true).is_visible());
    assert!(!HostVisibility::new(false).is_visible());
}

#[test]
fn set_visible_flips_state_across_clones() {
    let host = HostVisibility::new(true);
    let runtime_handle = host.clone();

    host.set_visible(false);
    assert!(!runtime_handle.is_visible());
}

#[tokio::test]
async fn subscribers_see_transitions() {
    let host = HostVisibility::new(true);
    let mut rx = host.subscribe();

    host.set_visible(false);
    rx.changed().await.unwrap();
    assert!(!*rx.borrow());
}

#[test]
fn repeating_the_same_state_does_not_notify() {
    let host = HostVisibility::new(true);
    let mut rx = host.subscribe();
    rx.borrow_and_update();

    host.set_visible(true);
    assert!(!rx.has_changed().unwrap());

    host.set_visible(false);
    assert!(rx.has_changed().unwrap());
}

#[test]
fn always_visible_never_changes() {
    let vis = AlwaysVisible::new();
    let rx = vis.subscribe();
    assert!(vis.is_visible());
    assert!(*rx.borrow());
    assert!(!rx.has_changed().unwrap());
}
