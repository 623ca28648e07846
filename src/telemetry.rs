use tokio::sync::broadcast;

/// Diagnostic events emitted by the feed path. Consumers subscribe
/// explicitly; there is no process-global channel.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
    TickGenerated { timestamp_ms: u64, price: f64 },
    RefreshEmitted { points: usize },
    RefreshThrottled,
    WindowResized { capacity: usize },
}

/// Broadcast hub for feed telemetry. Owned by whoever wires the app
/// together and handed to the coordinator by reference; a subscription
/// lives exactly as long as the receiver it returns.
#[derive(Debug)]
pub struct TelemetryHub {
    sender: broadcast::Sender<TelemetryEvent>,
}

impl TelemetryHub {
    pub fn new(buffer: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.sender.subscribe()
    }

    /// Fire-and-forget publish. Lagging subscribers lose old events rather
    /// than back-pressuring the feed; no subscribers is not an error.
    pub fn publish(&self, event: TelemetryEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for TelemetryHub {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Rolling tick-rate figures for the dashboard bench panel, fed from
/// `TickGenerated` events.
#[derive(Debug, Default)]
pub struct BenchStats {
    total_ticks: u64,
    ticks_this_second: u64,
    ticks_per_second: u64,
    window_started_ms: u64,
}

impl BenchStats {
    pub fn record_tick(&mut self, timestamp_ms: u64) {
        if self.window_started_ms == 0 {
            self.window_started_ms = timestamp_ms;
        }
        // Latch the closing window before counting; the boundary tick
        // belongs to the window it opens, not the one it closes.
        if timestamp_ms.saturating_sub(self.window_started_ms) >= 1_000 {
            self.ticks_per_second = self.ticks_this_second;
            self.ticks_this_second = 0;
            self.window_started_ms = timestamp_ms;
        }
        self.total_ticks += 1;
        self.ticks_this_second += 1;
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    pub fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
