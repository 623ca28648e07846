pub mod chart;
pub mod dashboard;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::event::AppEvent;
use crate::market::generator::Regime;
use crate::store::PlotData;

use chart::{ChartTheme, TickChart};
use dashboard::{BenchPanel, KeybindBar, LogPanel, StatusBar};

const MAX_LOG_MESSAGES: usize = 200;

pub struct AppState {
    pub plot: PlotData,
    pub theme: ChartTheme,
    pub capacity: usize,
    pub regime: Regime,
    pub running: bool,
    pub tick_count: u64,
    pub bench_enabled: bool,
    pub bench_tps: u64,
    pub bench_total: u64,
    pub log_messages: Vec<String>,
}

impl AppState {
    pub fn new(capacity: usize, theme: ChartTheme, initial_regime: Regime) -> Self {
        Self {
            plot: PlotData::default(),
            theme,
            capacity,
            regime: initial_regime,
            running: true,
            tick_count: 0,
            bench_enabled: false,
            bench_tps: 0,
            bench_total: 0,
            log_messages: Vec::new(),
        }
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > MAX_LOG_MESSAGES {
            let excess = self.log_messages.len() - MAX_LOG_MESSAGES;
            self.log_messages.drain(..excess);
        }
    }

    pub fn last_price(&self) -> Option<f64> {
        self.plot.prices.last().copied()
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::PlotRefresh(plot) => {
                self.plot = plot;
            }
            AppEvent::TickCount(count) => {
                self.tick_count = count;
            }
            AppEvent::RegimeChanged(regime) => {
                self.regime = regime;
                self.push_log(format!("Regime -> {}", regime.as_label()));
            }
            AppEvent::CapacityChanged(capacity) => {
                self.capacity = capacity;
                self.push_log(format!("Window resized to {} ticks", capacity));
            }
            AppEvent::BenchUpdate {
                ticks_per_second,
                total_ticks,
            } => {
                self.bench_tps = ticks_per_second;
                self.bench_total = total_ticks;
            }
            AppEvent::LogMessage(msg) => {
                self.push_log(msg);
            }
        }
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // chart + bench
            Constraint::Length(5), // log
            Constraint::Length(1), // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            running: state.running,
            regime: state.regime,
            last_price: state.last_price(),
            capacity: state.capacity,
            tick_count: state.tick_count,
            theme_label: state.theme.as_label(),
        },
        outer[0],
    );

    let main_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(22)])
        .split(outer[1]);

    frame.render_widget(
        TickChart::new(&state.plot.times, &state.plot.prices)
            .theme(state.theme)
            .title(" Ticks "),
        main_area[0],
    );

    frame.render_widget(
        BenchPanel {
            enabled: state.bench_enabled,
            ticks_per_second: state.bench_tps,
            total_ticks: state.bench_total,
        },
        main_area[1],
    );

    frame.render_widget(LogPanel::new(&state.log_messages), outer[2]);

    frame.render_widget(KeybindBar, outer[3]);
}
