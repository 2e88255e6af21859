// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_tracks_wall_time() {
    let clock = SystemClock;
    let before = Utc::now();
    let t = clock.now();
    assert!(t >= before);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    clock.advance(Duration::from_secs(60));
    let t2 = clock.now();
    assert_eq!((t2 - t1).num_seconds(), 60);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::from_secs(30));
    let t2 = clock1.now();
    assert_eq!((t2 - t1).num_seconds(), 30);
}

#[test]
fn fake_clock_can_be_pinned_and_reset() {
    let start = Utc::now();
    let clock = FakeClock::at(start);
    assert_eq!(clock.now(), start);

    clock.advance(Duration::from_millis(1500));
    assert_eq!((clock.now() - start).num_milliseconds(), 1500);

    clock.set(start);
    assert_eq!(clock.now(), start);
}
