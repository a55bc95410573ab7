use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Clear, Dataset as ChartDataset, GraphType, Paragraph};

use pennant_trends::chart::{ChartModel, series_color, series_marker};
use pennant_trends::export::{default_export_path, export_chart};
use pennant_trends::loader::{self, DataSource};
use pennant_trends::state::{AppState, LoadPhase, LoadEvent};
use pennant_trends::tooltip::{TooltipState, data_to_cell, popup_rect, tooltip_lines};

struct App {
    state: AppState,
    source: DataSource,
    load_tx: mpsc::Sender<LoadEvent>,
    should_quit: bool,
}

impl App {
    fn new(source: DataSource, load_tx: mpsc::Sender<LoadEvent>) -> Self {
        Self {
            state: AppState::new(source.label()),
            source,
            load_tx,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('r') => {
                if matches!(self.state.phase, LoadPhase::Failed(_)) {
                    self.state.begin_retry();
                    loader::spawn_loader(self.source.clone(), self.load_tx.clone());
                }
            }
            KeyCode::Char('l') => self.state.cycle_league(),
            KeyCode::Char('t') => self.state.cycle_team(1),
            KeyCode::Char('T') => self.state.cycle_team(-1),
            KeyCode::Char('m') => self.state.cycle_metric_mode(),
            KeyCode::Char('[') => self.state.nudge_year_lo(-1),
            KeyCode::Char(']') => self.state.nudge_year_lo(1),
            KeyCode::Char('{') => self.state.nudge_year_hi(-1),
            KeyCode::Char('}') => self.state.nudge_year_hi(1),
            KeyCode::Char('0') => self.state.reset_filters(),
            KeyCode::Char('e') => self.export_current_view(),
            _ => {}
        }
    }

    fn export_current_view(&mut self) {
        let (Some(chart), Some(filter)) = (&self.state.chart, &self.state.filter) else {
            self.state.push_log("[INFO] Nothing to export yet".to_string());
            return;
        };
        let path = default_export_path();
        match export_chart(chart, filter, &path) {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} points to {}",
                report.points,
                report.path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {}", err)),
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let source = DataSource::from_env();
    loader::spawn_loader(source.clone(), tx.clone());

    let mut app = App::new(source, tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<LoadEvent>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(load_event) = rx.try_recv() {
            app.state.apply_load_event(load_event);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => {
                    app.state.on_pointer_moved(mouse.column, mouse.row);
                }
                // The stored plot rect and tooltip anchor no longer match
                // the new geometry; the next pointer move re-derives both.
                Event::Resize(_, _) => {
                    app.state.plot = None;
                    app.state.tooltip = TooltipState::Hidden;
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.phase.clone() {
        LoadPhase::Loading => render_loading(frame, chunks[1], &app.state),
        LoadPhase::Failed(err) => render_failed(frame, chunks[1], &err.to_string()),
        LoadPhase::Ready => render_chart_screen(frame, chunks[1], &mut app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let status = match &state.phase {
        LoadPhase::Loading => "loading".to_string(),
        LoadPhase::Failed(_) => "failed".to_string(),
        LoadPhase::Ready => match (&state.filter, &state.chart) {
            (Some(filter), _) => {
                let (lo, hi) = filter.year_range();
                format!(
                    "{} | {} | {} | {}-{}",
                    filter.league().label(),
                    filter.team().label(),
                    filter.mode().label(),
                    lo,
                    hi
                )
            }
            _ => "ready".to_string(),
        },
    };
    format!("PENNANT TRENDS | {} | {}", state.source_label, status)
}

fn footer_text(state: &AppState) -> String {
    match &state.phase {
        LoadPhase::Failed(_) => "r Retry | ? Help | q Quit".to_string(),
        _ => state
            .last_log()
            .map(str::to_string)
            .unwrap_or_else(|| {
                "l League | t/T Team | m Metric | [/] and {/} Years | 0 Reset | e Export | ? Help | q Quit"
                    .to_string()
            }),
    }
}

fn render_loading(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = format!("Loading season data from {}...", state.source_label);
    let panel = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().title("Loading").borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn render_failed(frame: &mut Frame, area: Rect, message: &str) {
    let text = format!("Load failed:\n{}\n\nPress r to retry.", message);
    let panel = Paragraph::new(text)
        .style(Style::default().fg(Color::Red))
        .block(Block::default().title("Error").borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn render_chart_screen(frame: &mut Frame, area: Rect, state: &mut AppState) {
    let Some(model) = state.chart.clone() else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(30)])
        .split(area);

    render_line_chart(frame, columns[0], &model, state);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(1)])
        .split(columns[1]);

    render_legend(frame, side[0], &model);
    render_console(frame, side[1], state);

    if let Some(payload) = state.tooltip.payload() {
        render_tooltip(frame, area, payload);
    }
}

fn render_line_chart(frame: &mut Frame, area: Rect, model: &ChartModel, state: &mut AppState) {
    let block = Block::default()
        .title(model.title.as_str())
        .borders(Borders::ALL);
    let inner = block.inner(area);

    let datasets: Vec<ChartDataset> = model
        .series
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| {
            ChartDataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series_color(s.role, s.metric)))
                .data(&s.points)
        })
        .collect();

    let x_labels: Vec<Span> = model
        .x_labels
        .iter()
        .map(|label| Span::raw(label.clone()))
        .collect();
    let y_labels: Vec<Span> = model
        .y_labels
        .iter()
        .map(|label| Span::raw(label.clone()))
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Year")
                .style(Style::default().fg(Color::Gray))
                .bounds(model.domains.x)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(model.y_title)
                .style(Style::default().fg(Color::Gray))
                .bounds(model.domains.y)
                .labels(y_labels),
        );
    frame.render_widget(chart, area);

    // The Chart widget reserves rows/columns for axis labels inside its
    // inner area; the overlay and hit tests use this same reduced rect so
    // markers land on the plotted lines.
    let plot = plot_area(inner);
    state.plot = Some(plot);
    render_point_markers(frame, plot, model);
}

/// The drawable graph region inside a Chart's inner area: one row at the
/// bottom for x labels, a left gutter for y labels.
fn plot_area(inner: Rect) -> Rect {
    const Y_LABEL_GUTTER: u16 = 5;
    if inner.width <= Y_LABEL_GUTTER + 1 || inner.height <= 2 {
        return Rect::new(inner.x, inner.y, 0, 0);
    }
    Rect {
        x: inner.x + Y_LABEL_GUTTER + 1,
        y: inner.y,
        width: inner.width - Y_LABEL_GUTTER - 1,
        height: inner.height - 2,
    }
}

fn render_point_markers(frame: &mut Frame, plot: Rect, model: &ChartModel) {
    if plot.width == 0 || plot.height == 0 {
        return;
    }
    let buffer = frame.buffer_mut();
    for series in &model.series {
        let color = series_color(series.role, series.metric);
        let marker = series_marker(series.role);
        for &point in &series.points {
            if let Some((col, row)) = data_to_cell(&model.domains, plot, point) {
                buffer
                    .get_mut(col, row)
                    .set_symbol(marker)
                    .set_style(Style::default().fg(color));
            }
        }
    }
}

fn render_legend(frame: &mut Frame, area: Rect, model: &ChartModel) {
    let lines: Vec<Line> = model
        .legend
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(entry.marker, Style::default().fg(entry.color)),
                Span::raw(" "),
                Span::raw(entry.label.clone()),
            ])
        })
        .collect();
    let text = if lines.is_empty() {
        Text::from("No series in range")
    } else {
        Text::from(lines)
    };
    let legend = Paragraph::new(text)
        .block(Block::default().title("Legend").borders(Borders::ALL));
    frame.render_widget(legend, area);
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible = area.height.saturating_sub(2) as usize;
    let text = if state.logs.is_empty() {
        "No activity yet".to_string()
    } else {
        state
            .logs
            .iter()
            .rev()
            .take(visible.max(1))
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join("\n")
    };
    let console = Paragraph::new(text)
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, area);
}

fn render_tooltip(frame: &mut Frame, bounds: Rect, payload: &pennant_trends::tooltip::TooltipPayload) {
    let lines = tooltip_lines(payload);
    let width = (lines.iter().map(String::len).max().unwrap_or(0) as u16 + 4).min(bounds.width);
    let height = (lines.len() as u16 + 2).min(bounds.height);
    if width < 4 || height < 3 {
        return;
    }

    // The anchor cell may predate a terminal resize; popup_rect refuses to
    // place anything outside the current frame.
    let Some(popup) = popup_rect(payload.cell, width, height, bounds) else {
        return;
    };

    frame.render_widget(Clear, popup);
    let tooltip = Paragraph::new(lines.join("\n"))
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(tooltip, popup);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Pennant Trends - Help",
        "",
        "  l            Cycle league (AL / NL / MLB)",
        "  t / T        Next / previous team",
        "  m            Cycle metric (runs, hits, SO, RA, combined)",
        "  [ / ]        Start year -1 / +1",
        "  { / }        End year -1 / +1",
        "  0            Reset filters",
        "  e            Export view to .xlsx",
        "  mouse        Hover a point for details",
        "  r            Retry load (after a failure)",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
