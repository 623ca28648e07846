use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use crate::model::tick::serial_day_to_label;

/// Named color presets for the chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTheme {
    #[default]
    Dark,
    Light,
}

impl ChartTheme {
    /// Parse a theme name, case-insensitively. `None` for unknown names;
    /// config validation turns that into a load error.
    pub fn parse(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("dark") {
            Some(ChartTheme::Dark)
        } else if name.eq_ignore_ascii_case("light") {
            Some(ChartTheme::Light)
        } else {
            None
        }
    }

    /// Parse a validated theme name. The default covers only the window
    /// between deserialization and validation.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    pub fn toggled(self) -> Self {
        match self {
            ChartTheme::Dark => ChartTheme::Light,
            ChartTheme::Light => ChartTheme::Dark,
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            ChartTheme::Dark => "Dark",
            ChartTheme::Light => "Light",
        }
    }

    fn background(self) -> Color {
        match self {
            ChartTheme::Dark => Color::Black,
            ChartTheme::Light => Color::White,
        }
    }

    fn line(self) -> Color {
        match self {
            ChartTheme::Dark => Color::Cyan,
            ChartTheme::Light => Color::Blue,
        }
    }

    fn axis(self) -> Color {
        match self {
            ChartTheme::Dark => Color::DarkGray,
            ChartTheme::Light => Color::Gray,
        }
    }
}

/// Line chart over an ordered (times, prices) window. The slices come
/// straight from the tick store and are assumed parallel and time-ordered.
pub struct TickChart<'a> {
    times: &'a [f64],
    prices: &'a [f64],
    theme: ChartTheme,
    title: &'a str,
}

impl<'a> TickChart<'a> {
    pub fn new(times: &'a [f64], prices: &'a [f64]) -> Self {
        Self {
            times,
            prices,
            theme: ChartTheme::Dark,
            title: " Ticks ",
        }
    }

    pub fn theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }
}

impl Widget for TickChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .style(Style::default().bg(self.theme.background()))
            .border_style(Style::default().fg(self.theme.axis()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.prices.is_empty() || inner.height < 2 || inner.width < 4 {
            return;
        }

        let chart_height = inner.height.saturating_sub(1) as usize; // leave 1 row for axis labels
        let chart_width = inner.width as usize;

        // When the window holds more points than columns, show the newest.
        let skip = self.prices.len().saturating_sub(chart_width);
        let visible = &self.prices[skip..];
        let visible_times = &self.times[skip..];

        let min_price = visible.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_price = visible.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let range = max_price - min_price;
        let range = if range < 0.01 { 1.0 } else { range };

        for (i, &price) in visible.iter().enumerate() {
            let x = inner.x + i as u16;
            if x >= inner.x + inner.width {
                break;
            }
            let normalized = (price - min_price) / range;
            let y_pos = chart_height
                - 1
                - ((normalized * (chart_height - 1) as f64) as usize).min(chart_height - 1);
            let y = inner.y + y_pos as u16;

            if y < inner.y + inner.height {
                buf.set_string(x, y, "●", Style::default().fg(self.theme.line()));
            }
        }

        // Price extremes on the left edge, newest timestamp bottom-right.
        let axis_style = Style::default().fg(self.theme.axis());
        let label_y = inner.y + inner.height - 1;
        buf.set_string(inner.x, inner.y, format!("{:.2}", max_price), axis_style);
        buf.set_string(inner.x, label_y, format!("{:.2}", min_price), axis_style);

        if let Some(&last_time) = visible_times.last() {
            let time_label = serial_day_to_label(last_time);
            let label_len = time_label.len() as u16;
            if inner.width > label_len {
                buf.set_string(
                    inner.x + inner.width - label_len,
                    label_y,
                    time_label,
                    axis_style,
                );
            }
        }
    }
}
