use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use tokio::sync::{mpsc, watch};

use tickscope::config::Config;
use tickscope::event::{AppEvent, FeedCommand};
use tickscope::feed::run_feed;
use tickscope::input::{parse_main_command, UiCommand, CAPACITY_STEP};
use tickscope::telemetry::{BenchStats, TelemetryEvent, TelemetryHub};
use tickscope::ui::{self, chart::ChartTheme, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    // Log to file so tracing output doesn't fight the TUI for the terminal.
    let log_file = std::fs::File::create("tickscope.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        capacity = config.chart.capacity,
        tick_interval_ms = config.feed.tick_interval_ms,
        min_refresh_ms = config.chart.min_refresh_ms,
        "Starting tickscope"
    );

    // Channels
    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(256);
    let (feed_cmd_tx, feed_cmd_rx) = mpsc::channel::<FeedCommand>(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (running_tx, running_rx) = watch::channel(true);

    let telemetry = Arc::new(TelemetryHub::default());

    // Feed task: generator -> coordinator -> plot snapshots. It owns both,
    // so ingestion and resize are serialized on one task.
    let feed_app_tx = app_tx.clone();
    let feed_telemetry = telemetry.clone();
    let feed_shutdown = shutdown_rx.clone();
    let feed_config = config.clone();
    tokio::spawn(async move {
        if let Err(e) = run_feed(
            feed_config,
            feed_telemetry,
            feed_app_tx.clone(),
            feed_cmd_rx,
            running_rx,
            feed_shutdown,
        )
        .await
        {
            tracing::error!(error = %e, "Feed task failed");
            let _ = feed_app_tx
                .send(AppEvent::LogMessage(format!("[ERR] Feed failed: {}", e)))
                .await;
        }
    });

    // Bench task: telemetry subscriber tracking tick throughput.
    let bench_app_tx = app_tx.clone();
    let mut bench_rx = telemetry.subscribe();
    let mut bench_shutdown = shutdown_rx.clone();
    tokio::spawn(async move {
        let mut stats = BenchStats::default();
        loop {
            tokio::select! {
                event = bench_rx.recv() => {
                    match event {
                        Ok(TelemetryEvent::TickGenerated { timestamp_ms, .. }) => {
                            stats.record_tick(timestamp_ms);
                            let _ = bench_app_tx
                                .send(AppEvent::BenchUpdate {
                                    ticks_per_second: stats.ticks_per_second(),
                                    total_ticks: stats.total_ticks(),
                                })
                                .await;
                        }
                        Ok(_) => {}
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "Bench subscriber lagged");
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    }
                }
                _ = bench_shutdown.changed() => break,
            }
        }
    });

    // Ctrl+C handler
    let ctrl_c_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received");
        let _ = ctrl_c_shutdown.send(true);
    });

    // TUI main loop
    let mut terminal = ratatui::init();
    let mut app_state = AppState::new(
        config.chart.capacity,
        ChartTheme::from_name(&config.chart.theme),
        config.feed.generator.initial_regime,
    );
    app_state.push_log(format!(
        "tickscope started | window {} | {} ms/tick",
        config.chart.capacity, config.feed.tick_interval_ms
    ));

    loop {
        terminal.draw(|frame| ui::render(frame, &app_state))?;

        // Handle input (non-blocking with timeout)
        if crossterm::event::poll(Duration::from_millis(config.chart.ui_poll_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                    tracing::info!("User quit");
                    let _ = shutdown_tx.send(true);
                    break;
                }
                if let Some(cmd) = parse_main_command(&key.code) {
                    handle_command(cmd, &mut app_state, &running_tx, &feed_cmd_tx);
                }
            }
        }

        // Drain events from channel
        while let Ok(evt) = app_rx.try_recv() {
            app_state.apply(evt);
        }

        if *shutdown_rx.borrow() {
            break;
        }
    }

    ratatui::restore();
    tracing::info!("Shutdown complete");
    println!("Goodbye! Check tickscope.log for details.");
    Ok(())
}

fn handle_command(
    cmd: UiCommand,
    app_state: &mut AppState,
    running_tx: &watch::Sender<bool>,
    feed_cmd_tx: &mpsc::Sender<FeedCommand>,
) {
    match cmd {
        UiCommand::ToggleFeed => {
            app_state.running = !app_state.running;
            let _ = running_tx.send(app_state.running);
            app_state.push_log(if app_state.running {
                "Feed started".to_string()
            } else {
                "Feed stopped".to_string()
            });
        }
        UiCommand::ToggleTheme => {
            app_state.theme = app_state.theme.toggled();
            app_state.push_log(format!("Theme -> {}", app_state.theme.as_label()));
        }
        UiCommand::ToggleBench => {
            app_state.bench_enabled = !app_state.bench_enabled;
        }
        UiCommand::CapacityUp => {
            let next = app_state.capacity.saturating_add(CAPACITY_STEP);
            let _ = feed_cmd_tx.try_send(FeedCommand::SetCapacity(next));
        }
        UiCommand::CapacityDown => {
            let next = app_state.capacity.saturating_sub(CAPACITY_STEP).max(1);
            let _ = feed_cmd_tx.try_send(FeedCommand::SetCapacity(next));
        }
        UiCommand::ResetGenerator => {
            let _ = feed_cmd_tx.try_send(FeedCommand::ResetGenerator);
        }
        UiCommand::ClearWindow => {
            let _ = feed_cmd_tx.try_send(FeedCommand::ClearWindow);
        }
        UiCommand::ForceRegime(regime) => {
            let _ = feed_cmd_tx.try_send(FeedCommand::ForceRegime(regime));
        }
    }
}
