use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};

use crate::config::Config;
use crate::coordinator::ChartCoordinator;
use crate::event::{AppEvent, FeedCommand};
use crate::market::generator::MarketPriceGenerator;
use crate::telemetry::TelemetryHub;

/// Drive the generator on a fixed interval and funnel everything that
/// touches the tick window through this single task.
///
/// The `running` watch gates tick production without tearing the task
/// down; commands and shutdown are still serviced while paused.
pub async fn run_feed(
    config: Config,
    telemetry: Arc<TelemetryHub>,
    app_tx: mpsc::Sender<AppEvent>,
    mut cmd_rx: mpsc::Receiver<FeedCommand>,
    mut running_rx: watch::Receiver<bool>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<()> {
    let mut generator = MarketPriceGenerator::new(config.feed.generator.clone())
        .context("generator config rejected")?;
    let mut coordinator = ChartCoordinator::new(
        config.chart.capacity,
        Duration::from_millis(config.chart.min_refresh_ms),
        telemetry,
    )
    .context("chart window rejected")?;

    let mut interval = tokio::time::interval(Duration::from_millis(config.feed.tick_interval_ms));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut total_ticks: u64 = 0;
    let mut last_regime = generator.regime();

    loop {
        tokio::select! {
            _ = interval.tick(), if *running_rx.borrow() => {
                let price = generator.next_price();
                total_ticks += 1;

                if let Some(snapshot) = coordinator.add_tick(price) {
                    let _ = app_tx.send(AppEvent::PlotRefresh(snapshot)).await;
                }
                let _ = app_tx.send(AppEvent::TickCount(total_ticks)).await;

                let regime = generator.regime();
                if regime != last_regime {
                    tracing::info!(regime = regime.as_label(), price, "Regime changed");
                    last_regime = regime;
                    let _ = app_tx.send(AppEvent::RegimeChanged(regime)).await;
                }
            }
            // Wake on every start/stop toggle so the tick gate above is
            // re-evaluated; without this a paused task would sleep on the
            // other branches and never see the flag flip back.
            _ = running_rx.changed() => {}
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else { break };
                match cmd {
                    FeedCommand::SetCapacity(capacity) => {
                        match coordinator.set_capacity(capacity) {
                            Ok(snapshot) => {
                                tracing::info!(capacity, kept = snapshot.len(), "Window resized");
                                let _ = app_tx.send(AppEvent::CapacityChanged(capacity)).await;
                                let _ = app_tx.send(AppEvent::PlotRefresh(snapshot)).await;
                            }
                            Err(e) => {
                                tracing::warn!(capacity, error = %e, "Resize rejected");
                                let _ = app_tx
                                    .send(AppEvent::LogMessage(format!("[WARN] Resize rejected: {}", e)))
                                    .await;
                            }
                        }
                    }
                    FeedCommand::ResetGenerator => {
                        generator.reset();
                        last_regime = generator.regime();
                        let _ = app_tx
                            .send(AppEvent::LogMessage("Generator reset to base price".to_string()))
                            .await;
                        let _ = app_tx.send(AppEvent::RegimeChanged(last_regime)).await;
                    }
                    FeedCommand::ForceRegime(regime) => {
                        generator.force_regime(regime);
                        last_regime = regime;
                        let _ = app_tx.send(AppEvent::RegimeChanged(regime)).await;
                    }
                    FeedCommand::ClearWindow => {
                        coordinator.clear();
                        let _ = app_tx.send(AppEvent::PlotRefresh(Default::default())).await;
                        let _ = app_tx
                            .send(AppEvent::LogMessage("Window cleared".to_string()))
                            .await;
                    }
                }
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    Ok(())
}
