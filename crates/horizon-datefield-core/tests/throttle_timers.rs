//! Integration tests for throttling on a shared timer manager.

use std::sync::Arc;
use std::time::Duration;

use horizon_datefield_core::{ManualClock, Scheduler, SharedTimerManager, Signal, Throttle};
use parking_lot::Mutex;

fn setup() -> (Arc<ManualClock>, Arc<SharedTimerManager>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let clock = Arc::new(ManualClock::new());
    let timers = Arc::new(SharedTimerManager::with_clock(clock.clone()));
    (clock, timers)
}

/// Drive the loop the way a host would: advance, reap, route.
fn pump<T>(clock: &ManualClock, timers: &SharedTimerManager, by: Duration, throttle: &mut Throttle<T>) -> Vec<T> {
    clock.advance(by);
    timers
        .process_expired()
        .into_iter()
        .filter_map(|id| throttle.on_timer(id))
        .collect()
}

#[test]
fn test_trailing_edge_releases_latest() {
    let (clock, timers) = setup();
    let mut throttle = Throttle::new(timers.clone(), Duration::from_millis(100));

    for value in 1..=5 {
        throttle.push(value);
        assert!(pump(&clock, &timers, Duration::from_millis(10), &mut throttle).is_empty());
    }

    let released = pump(&clock, &timers, Duration::from_millis(50), &mut throttle);
    assert_eq!(released, vec![5]);
    assert!(!throttle.is_pending());
    assert_eq!(timers.active_count(), 0);
}

#[test]
fn test_new_window_after_release() {
    let (clock, timers) = setup();
    let mut throttle = Throttle::new(timers.clone(), Duration::from_millis(100));

    throttle.push("first");
    assert_eq!(pump(&clock, &timers, Duration::from_millis(100), &mut throttle), vec!["first"]);

    throttle.push("second");
    assert_eq!(timers.time_until_next(), Some(Duration::from_millis(100)));
    assert_eq!(pump(&clock, &timers, Duration::from_millis(100), &mut throttle), vec!["second"]);
}

#[test]
fn test_independent_throttles_share_a_manager() {
    let (clock, timers) = setup();
    let mut fast = Throttle::new(timers.clone(), Duration::from_millis(50));
    let mut slow = Throttle::new(timers.clone(), Duration::from_millis(200));

    fast.push(1);
    slow.push(2);
    assert_eq!(timers.active_count(), 2);

    clock.advance(Duration::from_millis(60));
    let fired = timers.process_expired();
    assert_eq!(fired.len(), 1);
    assert_eq!(fast.on_timer(fired[0]), Some(1));
    assert_eq!(slow.on_timer(fired[0]), None);
    assert!(slow.is_pending());
}

#[test]
fn test_released_payload_reaches_signal() {
    let (clock, timers) = setup();
    let mut throttle = Throttle::new(timers.clone(), Duration::from_millis(100));
    let signal = Signal::<String>::new();
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    signal.connect(move |text| sink.lock().push(text.clone()));

    throttle.push("2020-02-15".to_string());
    throttle.push("2020-03-15".to_string());
    for text in pump(&clock, &timers, Duration::from_millis(100), &mut throttle) {
        signal.emit(text);
    }

    assert_eq!(*received.lock(), vec!["2020-03-15".to_string()]);
}

#[test]
fn test_drop_cancels_pending_timer() {
    let (_clock, timers) = setup();
    {
        let mut throttle = Throttle::new(timers.clone(), Duration::from_millis(100));
        throttle.push(());
        assert_eq!(timers.active_count(), 1);
    }
    assert_eq!(timers.active_count(), 0);
}

#[test]
fn test_stopped_timer_never_fires() {
    let (clock, timers) = setup();
    let id = timers.start_one_shot(Duration::from_millis(10));
    timers.stop(id).unwrap();
    assert!(timers.stop(id).is_err());
    clock.advance(Duration::from_millis(20));
    assert!(timers.process_expired().is_empty());
}
