//! Ratatui-based terminal dashboard.
//!
//! The TUI provides a settings panel for choosing a granularity, product,
//! and chart view, then renders the reshaped sales data as a multi-series
//! time chart or distribution bars.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{BarChart, Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{self, RunOutput};
use crate::chart::{self, BarSpec, Series};
use crate::cli::ShowArgs;
use crate::data::DataSource;
use crate::domain::{ChartView, DashConfig, KNOWN_PRODUCTS};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::SalesChart;

/// Terminal palette matching `plotters_chart::SERIES_COLORS` by index.
const LEGEND_COLORS: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Blue,
    Color::Red,
    Color::LightCyan,
    Color::LightMagenta,
];

/// Start the TUI.
pub fn run(args: ShowArgs) -> Result<(), AppError> {
    let source = crate::app::source_from_args(&args)?;
    let config = crate::app::dash_config_from_args(&args);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(source, config);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    source: DataSource,
    config: DashConfig,
    selected_field: usize,
    status: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(source: DataSource, config: DashConfig) -> Self {
        let mut app = Self {
            source,
            config,
            selected_field: 0,
            status: "Loading sales data...".to_string(),
            run: None,
        };
        app.reload();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < 2 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('r') => {
                self.reload();
            }
            KeyCode::Char('e') => {
                self.export();
            }
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 => {
                self.config.granularity = if delta >= 0 {
                    self.config.granularity.next()
                } else {
                    self.config.granularity.prev()
                };
                // A granularity change targets a different source table, so
                // the wide table must be loaded fresh.
                self.reload();
            }
            1 => {
                let options = self.product_options();
                self.config.product =
                    cycle_product(self.config.product.as_deref(), &options, delta);
                self.recompute();
            }
            2 => {
                self.config.view = if delta >= 0 {
                    self.config.view.next()
                } else {
                    self.config.view.prev()
                };
                self.status = format!("view: {}", self.config.view.display_name());
            }
            _ => {}
        }
    }

    /// Product codes the selector cycles through. The loaded table is
    /// authoritative; before the first successful load we fall back to the
    /// known product set.
    fn product_options(&self) -> Vec<String> {
        match &self.run {
            Some(run) if !run.value_columns.is_empty() => run.value_columns.clone(),
            _ => KNOWN_PRODUCTS.map(String::from).to_vec(),
        }
    }

    fn reload(&mut self) {
        match pipeline::run_dashboard(&self.source, &self.config) {
            Ok(run) => {
                self.status = format!(
                    "Loaded {} rows from {} ({}).",
                    run.table.row_count(),
                    run.spec.table,
                    self.source.label()
                );
                self.run = Some(run);
            }
            // Keep the previous output on screen; the status line is the
            // user-facing error surface.
            Err(err) => self.status = format!("Load failed: {err}"),
        }
    }

    fn recompute(&mut self) {
        let Some(run) = &self.run else {
            self.reload();
            return;
        };
        match pipeline::run_with_table(&self.config, run.table.clone()) {
            Ok(run) => {
                self.status = match &self.config.product {
                    Some(p) => format!("product: {p}"),
                    None => "product: all".to_string(),
                };
                self.run = Some(run);
            }
            Err(err) => self.status = format!("{err}"),
        }
    }

    fn export(&mut self) {
        let Some(run) = &self.run else {
            self.status = "No data to export.".to_string();
            return;
        };
        let path = PathBuf::from(format!(
            "pdash_{}.csv",
            self.config.granularity.display_name()
        ));
        match crate::io::write_long_csv(&path, &run.records) {
            Ok(()) => {
                self.status = format!(
                    "Exported {} records to {}.",
                    run.records.len(),
                    path.display()
                );
            }
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("pdash", Style::default().fg(Color::Cyan)),
            Span::raw(" — pharma sales dashboard"),
        ]));

        let product = self.config.product.as_deref().unwrap_or("all");
        let (rows, records) = self
            .run
            .as_ref()
            .map(|r| (r.table.row_count(), r.records.len()))
            .unwrap_or((0, 0));

        lines.push(Line::from(Span::styled(
            format!(
                "granularity: {} | product: {product} | view: {} | rows={rows} records={records} | source: {}",
                self.config.granularity.display_name(),
                self.config.view.display_name(),
                self.source.label(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(run) = &self.run else {
            let block = Block::default().title("Sales").borders(Borders::ALL);
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        match self.config.view {
            ChartView::Series => self.draw_series_chart(frame, area, run),
            ChartView::ProductTotals => {
                let spec =
                    chart::product_totals_spec(&run.product_totals, self.config.granularity);
                draw_bar_chart(frame, area, &spec);
            }
            ChartView::YearTotals => {
                let spec =
                    chart::year_totals_spec(&run.year_totals, self.config.product.as_deref());
                draw_bar_chart(frame, area, &spec);
            }
        }
    }

    fn draw_series_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect, run: &RunOutput) {
        let spec = chart::time_series_spec(&run.records, self.config.granularity);

        let block = Block::default()
            .title(spec.title.clone())
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some((x_bounds, y_bounds)) = spec.bounds() else {
            let msg = Paragraph::new("No records for this selection.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        if inner.height < 2 {
            return;
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let widget = SalesChart {
            series: &spec.series,
            x_bounds,
            y_bounds,
            x_label: &spec.x_label,
            y_label: &spec.y_label,
        };
        frame.render_widget(widget, chunks[0]);
        frame.render_widget(Paragraph::new(legend_line(&spec.series)), chunks[1]);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let product = self.config.product.as_deref().unwrap_or("all");
        let items = vec![
            ListItem::new(format!(
                "Granularity: {}",
                self.config.granularity.display_name()
            )),
            ListItem::new(format!("Product: {product}")),
            ListItem::new(format!("View: {}", self.config.view.display_name())),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  r reload  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Cycle the product selection through `[all, options...]`.
fn cycle_product(current: Option<&str>, options: &[String], delta: i32) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    // Position 0 is "all products"; 1..=len are the product codes.
    let len = options.len() as i32 + 1;
    let pos = match current {
        None => 0,
        Some(p) => options
            .iter()
            .position(|o| o == p)
            .map(|i| i as i32 + 1)
            .unwrap_or(0),
    };
    let next = (pos + delta).rem_euclid(len);
    if next == 0 {
        None
    } else {
        Some(options[(next - 1) as usize].clone())
    }
}

fn legend_line(series: &[Series]) -> Line<'static> {
    let mut spans = Vec::with_capacity(series.len());
    for s in series {
        let color = LEGEND_COLORS[s.color_index % LEGEND_COLORS.len()];
        spans.push(Span::styled(
            format!("■ {}  ", s.name),
            Style::default().fg(color),
        ));
    }
    Line::from(spans)
}

fn draw_bar_chart(frame: &mut ratatui::Frame<'_>, area: Rect, spec: &BarSpec) {
    let block = Block::default()
        .title(spec.title.clone())
        .borders(Borders::ALL);

    if spec.bars.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let msg = Paragraph::new("No records for this selection.")
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, inner);
        return;
    }

    let data: Vec<(&str, u64)> = spec.bars.iter().map(|(l, v)| (l.as_str(), *v)).collect();
    let widget = BarChart::default()
        .block(block)
        .bar_width(7)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .data(data.as_slice());
    frame.render_widget(widget, area);
}
