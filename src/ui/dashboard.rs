use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::market::generator::Regime;

pub struct StatusBar<'a> {
    pub running: bool,
    pub regime: Regime,
    pub last_price: Option<f64>,
    pub capacity: usize,
    pub tick_count: u64,
    pub theme_label: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let feed_status = if self.running {
            Span::styled(" RUNNING ", Style::default().fg(Color::Green))
        } else {
            Span::styled(
                " STOPPED ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        };

        let regime_color = match self.regime {
            Regime::Upward => Color::Green,
            Regime::Downward => Color::Red,
            Regime::Flat => Color::DarkGray,
        };

        let price_label = match self.last_price {
            Some(p) => format!("{:.2}", p),
            None => "---".to_string(),
        };

        let line = Line::from(vec![
            Span::styled(
                " tickscope ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            feed_status,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.regime.as_label(), Style::default().fg(regime_color)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(price_label, Style::default().fg(Color::Cyan)),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("window: {}", self.capacity),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("ticks: {}", self.tick_count),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.theme_label, Style::default().fg(Color::Magenta)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct BenchPanel {
    pub enabled: bool,
    pub ticks_per_second: u64,
    pub total_ticks: u64,
}

impl Widget for BenchPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Bench ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let lines = if self.enabled {
            vec![
                Line::from(vec![
                    Span::styled("TPS:   ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format!("{}", self.ticks_per_second),
                        Style::default().fg(Color::Green),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Total: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format!("{}", self.total_ticks),
                        Style::default().fg(Color::White),
                    ),
                ]),
            ]
        } else {
            vec![Line::from(Span::styled(
                "off ([B] to enable)",
                Style::default().fg(Color::DarkGray),
            ))]
        };

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner_height = block.inner(area).height as usize;

        let lines: Vec<Line> = self
            .messages
            .iter()
            .rev()
            .take(inner_height.max(1))
            .rev()
            .map(|msg| {
                let color = if msg.starts_with("[ERR]") {
                    Color::Red
                } else if msg.starts_with("[WARN]") {
                    Color::Yellow
                } else {
                    Color::Gray
                };
                Line::from(Span::styled(msg.as_str(), Style::default().fg(color)))
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" [Q]", Style::default().fg(Color::Yellow)),
            Span::styled("uit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[S]", Style::default().fg(Color::Yellow)),
            Span::styled("tart/stop  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[T]", Style::default().fg(Color::Yellow)),
            Span::styled("heme  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[+/-]", Style::default().fg(Color::Yellow)),
            Span::styled("window  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[R]", Style::default().fg(Color::Yellow)),
            Span::styled("eset  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[C]", Style::default().fg(Color::Yellow)),
            Span::styled("lear  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[U/D/F]", Style::default().fg(Color::Yellow)),
            Span::styled("regime  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[B]", Style::default().fg(Color::Yellow)),
            Span::styled("ench  ", Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
