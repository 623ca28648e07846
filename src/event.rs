use crate::market::generator::Regime;
use crate::store::PlotData;

/// Events flowing from the feed and bench tasks into the TUI loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    PlotRefresh(PlotData),
    TickCount(u64),
    RegimeChanged(Regime),
    CapacityChanged(usize),
    BenchUpdate { ticks_per_second: u64, total_ticks: u64 },
    LogMessage(String),
}

/// Control commands from the TUI loop to the feed task, which owns the
/// coordinator and generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedCommand {
    SetCapacity(usize),
    ResetGenerator,
    ForceRegime(Regime),
    ClearWindow,
}
