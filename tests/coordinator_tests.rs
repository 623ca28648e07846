use std::sync::Arc;
use std::time::{Duration, Instant};

use tickscope::coordinator::ChartCoordinator;
use tickscope::error::AppError;
use tickscope::model::tick::Tick;
use tickscope::telemetry::{TelemetryEvent, TelemetryHub};

fn coordinator(capacity: usize, min_refresh_ms: u64) -> ChartCoordinator {
    ChartCoordinator::new(
        capacity,
        Duration::from_millis(min_refresh_ms),
        Arc::new(TelemetryHub::default()),
    )
    .unwrap()
}

#[test]
fn first_tick_always_refreshes() {
    let mut coord = coordinator(10, 33);
    let snapshot = coord.add_tick_at(Tick::new(1_000, 100.0), Instant::now());
    let snapshot = snapshot.expect("first tick must refresh");
    assert_eq!(snapshot.prices, vec![100.0]);
}

#[test]
fn refreshes_are_throttled_by_the_minimum_interval() {
    let mut coord = coordinator(10, 33);
    let t0 = Instant::now();

    assert!(coord.add_tick_at(Tick::new(0, 100.0), t0).is_some());

    // Inside the interval: inserted but not refreshed.
    let throttled = coord.add_tick_at(Tick::new(1, 101.0), t0 + Duration::from_millis(10));
    assert!(throttled.is_none());
    assert_eq!(coord.count(), 2);

    // Past the interval: refresh includes every tick inserted meanwhile.
    let refreshed = coord
        .add_tick_at(Tick::new(2, 102.0), t0 + Duration::from_millis(40))
        .expect("past the interval a refresh is due");
    assert_eq!(refreshed.prices, vec![100.0, 101.0, 102.0]);
}

#[test]
fn throttle_clock_only_advances_on_refresh() {
    let mut coord = coordinator(10, 33);
    let t0 = Instant::now();

    assert!(coord.add_tick_at(Tick::new(0, 1.0), t0).is_some());
    // Two throttled inserts do not push the next refresh further out.
    assert!(coord
        .add_tick_at(Tick::new(1, 2.0), t0 + Duration::from_millis(10))
        .is_none());
    assert!(coord
        .add_tick_at(Tick::new(2, 3.0), t0 + Duration::from_millis(20))
        .is_none());
    assert!(coord
        .add_tick_at(Tick::new(3, 4.0), t0 + Duration::from_millis(33))
        .is_some());
}

#[test]
fn set_capacity_refreshes_unconditionally() {
    let mut coord = coordinator(5, 1_000_000);
    let t0 = Instant::now();
    for i in 0..5u64 {
        coord.add_tick_at(Tick::new(i, i as f64), t0 + Duration::from_millis(i));
    }

    // The throttle would block a plain refresh for ages, but a capacity
    // change always produces a snapshot of the new window.
    let snapshot = coord
        .set_capacity_at(3, t0 + Duration::from_millis(10))
        .unwrap();
    assert_eq!(coord.capacity(), 3);
    assert_eq!(snapshot.prices, vec![2.0, 3.0, 4.0]);
}

#[test]
fn failed_resize_keeps_the_window_intact() {
    let mut coord = coordinator(3, 33);
    let t0 = Instant::now();
    coord.add_tick_at(Tick::new(0, 10.0), t0);

    let err = coord.set_capacity_at(0, t0).unwrap_err();
    assert!(matches!(err, AppError::InvalidCapacity));
    assert_eq!(coord.capacity(), 3);
    assert_eq!(coord.count(), 1);
    assert_eq!(coord.latest_tick().unwrap().price, 10.0);
}

#[test]
fn clear_resets_window_and_throttle() {
    let mut coord = coordinator(5, 1_000_000);
    let t0 = Instant::now();
    assert!(coord.add_tick_at(Tick::new(0, 1.0), t0).is_some());

    coord.clear();
    assert_eq!(coord.count(), 0);

    // Refresh clock restarted, so the next insert refreshes immediately
    // despite the huge throttle interval.
    let snapshot = coord.add_tick_at(Tick::new(1, 2.0), t0 + Duration::from_millis(1));
    assert_eq!(snapshot.unwrap().prices, vec![2.0]);
}

#[tokio::test]
async fn telemetry_traces_the_feed_path() {
    let hub = Arc::new(TelemetryHub::default());
    let mut rx = hub.subscribe();
    let mut coord =
        ChartCoordinator::new(4, Duration::from_millis(33), hub.clone()).unwrap();

    let t0 = Instant::now();
    coord.add_tick_at(Tick::new(5, 42.0), t0);
    coord.add_tick_at(Tick::new(6, 43.0), t0 + Duration::from_millis(1));
    coord.set_capacity_at(8, t0 + Duration::from_millis(2)).unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        TelemetryEvent::TickGenerated {
            timestamp_ms: 5,
            price: 42.0
        }
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        TelemetryEvent::RefreshEmitted { points: 1 }
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        TelemetryEvent::TickGenerated {
            timestamp_ms: 6,
            price: 43.0
        }
    );
    assert_eq!(rx.recv().await.unwrap(), TelemetryEvent::RefreshThrottled);
    assert_eq!(
        rx.recv().await.unwrap(),
        TelemetryEvent::WindowResized { capacity: 8 }
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        TelemetryEvent::RefreshEmitted { points: 2 }
    );
}
