use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::AppError;
use crate::model::tick::Tick;
use crate::store::{PlotData, TickBuffer};
use crate::telemetry::{TelemetryEvent, TelemetryHub};

/// Bridges the generated price stream into the tick window and decides when
/// the chart gets a fresh snapshot.
///
/// The coordinator owns the buffer outright, so capacity changes swap the
/// store without any window in which a concurrent insert could land in the
/// retired buffer: everything is funneled through `&mut self` on one task.
/// The throttle is a timestamp comparison, never a wait.
pub struct ChartCoordinator {
    store: TickBuffer,
    min_refresh: Duration,
    last_refresh: Option<Instant>,
    telemetry: Arc<TelemetryHub>,
}

impl ChartCoordinator {
    pub fn new(
        capacity: usize,
        min_refresh: Duration,
        telemetry: Arc<TelemetryHub>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            store: TickBuffer::new(capacity)?,
            min_refresh,
            last_refresh: None,
            telemetry,
        })
    }

    pub fn count(&self) -> usize {
        self.store.count()
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn latest_tick(&self) -> Option<&Tick> {
        self.store.tail()
    }

    /// Stamp `price` with the current instant, insert it, and return an
    /// ordered snapshot when the refresh throttle allows one.
    pub fn add_tick(&mut self, price: f64) -> Option<PlotData> {
        self.add_tick_at(Tick::now(price), Instant::now())
    }

    /// Clock-explicit variant of `add_tick`.
    pub fn add_tick_at(&mut self, tick: Tick, now: Instant) -> Option<PlotData> {
        self.telemetry.publish(TelemetryEvent::TickGenerated {
            timestamp_ms: tick.timestamp_ms,
            price: tick.price,
        });
        self.store.add(tick);

        let due = match self.last_refresh {
            None => true,
            Some(at) => now.duration_since(at) >= self.min_refresh,
        };
        if !due {
            self.telemetry.publish(TelemetryEvent::RefreshThrottled);
            return None;
        }

        let snapshot = self.store.plot_data();
        self.telemetry.publish(TelemetryEvent::RefreshEmitted {
            points: snapshot.len(),
        });
        // Advance the throttle clock only when a refresh actually happened.
        self.last_refresh = Some(now);
        Some(snapshot)
    }

    /// Swap in a resized window keeping the most recent ticks. The visible
    /// window changed, so a snapshot is returned unconditionally and the
    /// throttle clock restarts. A failed resize leaves the current window
    /// untouched.
    pub fn set_capacity(&mut self, new_capacity: usize) -> Result<PlotData, AppError> {
        self.set_capacity_at(new_capacity, Instant::now())
    }

    pub fn set_capacity_at(
        &mut self,
        new_capacity: usize,
        now: Instant,
    ) -> Result<PlotData, AppError> {
        let resized = self.store.resize(new_capacity)?;
        self.store = resized;
        self.telemetry.publish(TelemetryEvent::WindowResized {
            capacity: new_capacity,
        });

        let snapshot = self.store.plot_data();
        self.telemetry.publish(TelemetryEvent::RefreshEmitted {
            points: snapshot.len(),
        });
        self.last_refresh = Some(now);
        Ok(snapshot)
    }

    /// Drop all buffered ticks and let the next insert refresh immediately.
    pub fn clear(&mut self) {
        self.store.clear();
        self.last_refresh = None;
    }
}
