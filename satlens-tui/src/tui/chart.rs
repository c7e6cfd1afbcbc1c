use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame, Terminal,
};
use satlens_core::{HistogramSpec, Renderer, Result};

use crate::tui::theme::Theme;

/// Grouped bar chart in the alternate screen; `render` blocks until `q` or `Esc`.
pub struct TerminalRenderer {
    theme: Theme,
}

impl TerminalRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    fn run(&self, spec: &HistogramSpec) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        self.event_loop(&mut terminal, spec)
    }

    fn event_loop(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>, spec: &HistogramSpec) -> io::Result<()> {
        let tick = Duration::from_millis(100);
        loop {
            terminal.draw(|f| draw(f, spec, &self.theme))?;
            if event::poll(tick)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                        return Ok(());
                    }
                }
            }
        }
    }
}

impl Renderer for TerminalRenderer {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn render(&mut self, spec: &HistogramSpec) -> Result<()> {
        enable_raw_mode()?;
        let res = self.run(spec);
        finish(res, restore_terminal())?;
        Ok(())
    }
}

/// Leave raw mode and the alternate screen; every step runs even if an earlier one fails.
fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen, Show);
    raw.and(screen)
}

/// The drawing error wins; a teardown error surfaces only when drawing succeeded.
fn finish(run: io::Result<()>, restore: io::Result<()>) -> io::Result<()> {
    run.and(restore)
}

fn draw(frame: &mut Frame, spec: &HistogramSpec, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
        .split(frame.area());
    render_bars(frame, spec, chunks[0], theme);
    render_legend(frame, spec, chunks[1], theme);
    let footer = format!(" x: {}  y: {}  | q: close", spec.x_label, spec.y_label);
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().bg(theme.bg).fg(theme.muted)),
        chunks[2],
    );
}

fn render_bars(frame: &mut Frame, spec: &HistogramSpec, area: Rect, theme: &Theme) {
    let bins = u16::try_from(spec.edges.bin_count().max(1)).unwrap_or(u16::MAX);
    let per_series = u16::try_from(spec.series.len().max(1)).unwrap_or(u16::MAX);
    // each group holds one bar per series plus a one-cell gap
    let slot = area.width.saturating_sub(2).checked_div(bins).unwrap_or(0);
    let bar_width = slot
        .saturating_sub(1)
        .checked_div(per_series)
        .unwrap_or(0)
        .max(1);

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(spec.title.clone())
                .border_style(Style::default().fg(theme.highlight)),
        )
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(1)
        .style(Style::default().bg(theme.bg).fg(theme.fg));
    for (i, lower) in spec.edges.edges().iter().take(spec.edges.bin_count()).enumerate() {
        let bars: Vec<Bar> = spec
            .series
            .iter()
            .map(|s| {
                let color = theme.series(s.color);
                Bar::default()
                    .value(s.counts.get(i).copied().unwrap_or(0))
                    .style(Style::default().fg(color))
                    .value_style(Style::default().bg(color).fg(theme.bg))
            })
            .collect();
        chart = chart.data(BarGroup::default().label(Line::from(format!("{lower:.1}"))).bars(&bars));
    }
    frame.render_widget(chart, area);
}

fn render_legend(frame: &mut Frame, spec: &HistogramSpec, area: Rect, theme: &Theme) {
    let mut spans = vec![Span::raw(" ")];
    for s in &spec.series {
        spans.push(Span::styled("█ ", Style::default().fg(theme.series(s.color))));
        spans.push(Span::styled(
            format!("{} (n={})   ", s.label, s.values.len()),
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use satlens_core::{BinEdges, HistogramSeries, SeriesColor};

    fn spec_with_bins(bins: usize) -> HistogramSpec {
        let edges = BinEdges::from_range(0.0, 1.0, bins);
        HistogramSpec {
            title: "Customer Satisfaction Statistics With 'A' Feature".into(),
            x_label: "A".into(),
            y_label: "Count".into(),
            series: vec![
                HistogramSeries {
                    label: "Satisfied".into(),
                    outcome: 0,
                    color: SeriesColor::Red,
                    alpha: 0.6,
                    values: vec![0.25],
                    counts: edges.counts(&[0.25]),
                },
                HistogramSeries {
                    label: "Not Satisfied".into(),
                    outcome: 1,
                    color: SeriesColor::Green,
                    alpha: 0.6,
                    values: vec![0.75, 1.0],
                    counts: edges.counts(&[0.75, 1.0]),
                },
            ],
            edges,
            legend_alpha: 0.8,
        }
    }

    fn draw_on(width: u16, height: u16, spec: &HistogramSpec) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, spec, &Theme::dark())).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn draws_title_and_legend() {
        let out = draw_on(80, 20, &spec_with_bins(4));
        assert!(out.contains("Customer Satisfaction Statistics With 'A' Feature"));
        assert!(out.contains("Satisfied (n=1)"));
        assert!(out.contains("Not Satisfied (n=2)"));
    }

    #[test]
    fn more_bins_than_u16_cells_still_draws() {
        let out = draw_on(80, 20, &spec_with_bins(65536));
        assert!(out.contains("q: close"));
    }

    #[test]
    fn narrow_terminal_still_draws() {
        let out = draw_on(3, 5, &spec_with_bins(10));
        assert!(!out.is_empty());
    }

    #[test]
    fn teardown_runs_and_reports_after_draw_error() {
        let draw_err = || io::Error::new(io::ErrorKind::Other, "draw");
        let restore_err = || io::Error::new(io::ErrorKind::Other, "restore");
        assert!(finish(Ok(()), Ok(())).is_ok());
        assert_eq!(finish(Err(draw_err()), Err(restore_err())).unwrap_err().to_string(), "draw");
        assert_eq!(finish(Ok(()), Err(restore_err())).unwrap_err().to_string(), "restore");
    }
}
