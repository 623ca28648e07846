use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::timeout;

use tickscope::config::Config;
use tickscope::event::{AppEvent, FeedCommand};
use tickscope::feed::run_feed;
use tickscope::telemetry::TelemetryHub;

fn fast_config() -> Config {
    let mut config = Config::default();
    config.feed.tick_interval_ms = 5;
    config.chart.min_refresh_ms = 1;
    config.chart.capacity = 64;
    config
}

struct FeedHarness {
    app_rx: mpsc::Receiver<AppEvent>,
    cmd_tx: mpsc::Sender<FeedCommand>,
    running_tx: watch::Sender<bool>,
    shutdown_tx: watch::Sender<bool>,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

fn spawn_feed(config: Config) -> FeedHarness {
    let telemetry = Arc::new(TelemetryHub::default());
    let (app_tx, app_rx) = mpsc::channel(256);
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (running_tx, running_rx) = watch::channel(true);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(run_feed(
        config,
        telemetry,
        app_tx,
        cmd_rx,
        running_rx,
        shutdown_rx,
    ));

    FeedHarness {
        app_rx,
        cmd_tx,
        running_tx,
        shutdown_tx,
        handle,
    }
}

async fn recv_within(rx: &mut mpsc::Receiver<AppEvent>, ms: u64) -> Option<AppEvent> {
    timeout(Duration::from_millis(ms), rx.recv())
        .await
        .ok()
        .flatten()
}

/// Drain in-flight events until the channel stays quiet for 100ms.
async fn drain_until_quiet(rx: &mut mpsc::Receiver<AppEvent>) {
    let mut drained = 0;
    while recv_within(rx, 100).await.is_some() {
        drained += 1;
        assert!(drained < 500, "feed kept ticking while stopped");
    }
}

#[tokio::test]
async fn feed_pauses_and_resumes_on_the_running_flag() {
    let mut feed = spawn_feed(fast_config());

    assert!(
        recv_within(&mut feed.app_rx, 1_000).await.is_some(),
        "feed produced nothing while running"
    );

    feed.running_tx.send(false).unwrap();
    drain_until_quiet(&mut feed.app_rx).await;

    // A lone restart must wake the paused loop again.
    feed.running_tx.send(true).unwrap();
    assert!(
        recv_within(&mut feed.app_rx, 1_000).await.is_some(),
        "feed did not resume after restart"
    );

    feed.shutdown_tx.send(true).unwrap();
    feed.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn paused_feed_still_services_commands() {
    let mut feed = spawn_feed(fast_config());

    feed.running_tx.send(false).unwrap();
    drain_until_quiet(&mut feed.app_rx).await;

    feed.cmd_tx.send(FeedCommand::SetCapacity(10)).await.unwrap();
    let mut saw_resize = false;
    for _ in 0..10 {
        match recv_within(&mut feed.app_rx, 500).await {
            Some(AppEvent::CapacityChanged(capacity)) => {
                assert_eq!(capacity, 10);
                saw_resize = true;
                break;
            }
            Some(_) => continue,
            None => break,
        }
    }
    assert!(saw_resize, "resize was not serviced while paused");

    feed.shutdown_tx.send(true).unwrap();
    feed.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn feed_stops_on_shutdown() {
    let mut feed = spawn_feed(fast_config());

    assert!(recv_within(&mut feed.app_rx, 1_000).await.is_some());

    feed.shutdown_tx.send(true).unwrap();
    feed.handle.await.unwrap().unwrap();
}
