// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use globalview_app::{
    AppCommand, AppEvent, AppMode, AppState, CHART_LEGEND, ChartPoint, CountryRecord, FetchOutcome,
    FetchTarget, Route, ViewPhase, ViewState,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};
use std::io;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const APP_TITLE: &str = "Global View";
const LOADING_TEXT: &str = "Loading...";
const FILTER_PLACEHOLDER: &str = "Filter by Population";
const BAR_COLOR: Color = Color::Rgb(75, 192, 192);
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

pub trait AppRuntime {
    fn fetch_countries(&mut self) -> Result<Vec<CountryRecord>>;

    /// Runs a fetch and reports the outcome through `tx`. The default runs
    /// inline; threaded runtimes override it to keep the UI responsive.
    fn spawn_fetch(
        &mut self,
        target: FetchTarget,
        token: u64,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let outcome = match self.fetch_countries() {
            Ok(countries) => FetchOutcome::Loaded(countries),
            Err(error) => FetchOutcome::Failed(format!("{error:#}")),
        };
        tx.send(InternalEvent::Fetch {
            target,
            token,
            outcome,
        })
        .map_err(|_| anyhow!("fetch result channel closed"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    Fetch {
        target: FetchTarget,
        token: u64,
        outcome: FetchOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    help_visible: bool,
    chart_offset: usize,
    chart_rows: usize,
    goto_input: String,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R, start: Route) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let session = run_session(state, runtime, start);
    finish_session(session, restore_terminal())
}

fn run_session<R: AppRuntime>(state: &mut AppState, runtime: &mut R, start: Route) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    start_app(state, runtime, &mut view_data, &internal_tx, start);

    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);

        terminal
            .draw(|frame| {
                view_data.chart_rows = chart_rows(frame.area());
                render(frame, &*state, &view_data);
            })
            .context("draw frame")?;

        if event::poll(Duration::from_millis(120)).context("poll event")?
            && let Event::Key(key) = event::read().context("read event")?
            && handle_key_event(state, runtime, &mut view_data, &internal_tx, key)
        {
            return Ok(());
        }
    }
}

fn restore_terminal() -> Result<()> {
    let raw = disable_raw_mode().context("disable raw mode");
    let screen =
        execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen");
    raw.and(screen)
}

/// The session error wins over a restore error, which is only logged then.
fn finish_session(session: Result<()>, restore: Result<()>) -> Result<()> {
    match (session, restore) {
        (Err(error), Err(restore_error)) => {
            tracing::warn!(error = %format!("{restore_error:#}"), "terminal restore failed");
            Err(error)
        }
        (Err(error), Ok(())) => Err(error),
        (Ok(()), restore) => restore,
    }
}

fn start_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    start: Route,
) {
    dispatch(state, runtime, view_data, tx, AppCommand::LoadMenu);
    dispatch(state, runtime, view_data, tx, AppCommand::Navigate(start));
}

fn process_internal_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetch {
                target,
                token,
                outcome,
            } => dispatch(
                state,
                runtime,
                view_data,
                tx,
                AppCommand::FetchResolved {
                    target,
                    token,
                    outcome,
                },
            ),
        }
    }
}

/// Dispatches `command` and reacts to every event it produces, including
/// follow-up commands raised while reacting.
fn dispatch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let mut pending = vec![command];
    while let Some(command) = pending.pop() {
        for event in state.dispatch(command) {
            if let Some(follow_up) = handle_app_event(runtime, view_data, tx, event) {
                pending.push(follow_up);
            }
        }
    }
}

fn handle_app_event<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: AppEvent,
) -> Option<AppCommand> {
    match event {
        AppEvent::FetchRequested { target, token } => {
            tracing::debug!(fetch = target.label(), token, "fetch started");
            if let Err(error) = runtime.spawn_fetch(target, token, tx.clone()) {
                return Some(AppCommand::FetchResolved {
                    target,
                    token,
                    outcome: FetchOutcome::Failed(format!("{error:#}")),
                });
            }
        }
        AppEvent::RouteChanged(route) => {
            view_data.chart_offset = 0;
            tracing::info!(%route, "route changed");
        }
        AppEvent::FetchFailed { target, detail } => {
            tracing::warn!(fetch = target.label(), %detail, "fetch failed");
        }
        AppEvent::StaleFetchDropped { target, token } => {
            tracing::debug!(fetch = target.label(), token, "dropped stale fetch result");
        }
        AppEvent::MenuUpdated(count) => {
            tracing::debug!(continents = count, "menu loaded");
        }
        AppEvent::StatusUpdated(_) => {
            view_data.status_token = view_data.status_token.saturating_add(1);
            schedule_status_clear(tx, view_data.status_token);
        }
        AppEvent::ViewUpdated(_)
        | AppEvent::ModeChanged(_)
        | AppEvent::MenuVisibilityChanged(_)
        | AppEvent::StatusCleared => {}
    }
    None
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    dispatch(
        state,
        runtime,
        view_data,
        internal_tx,
        AppCommand::SetStatus(message.into()),
    );
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('q') {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    match state.mode {
        AppMode::Filter => {
            handle_filter_key(state, runtime, view_data, internal_tx, key);
            return false;
        }
        AppMode::Goto => {
            handle_goto_key(state, runtime, view_data, internal_tx, key);
            return false;
        }
        AppMode::Nav => {}
    }

    if state.menu.open {
        handle_menu_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Char('m') => {
            dispatch(state, runtime, view_data, internal_tx, AppCommand::ToggleMenu);
        }
        KeyCode::Char('/') | KeyCode::Char('i') => {
            dispatch(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::EnterFilterMode,
            );
        }
        KeyCode::Char(':') => {
            view_data.goto_input = state.route.path();
            dispatch(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::EnterGotoMode,
            );
        }
        KeyCode::Char('g') | KeyCode::Home => {
            dispatch(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::Navigate(Route::Aggregate),
            );
        }
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            match state.menu.continents.get(index).cloned() {
                Some(name) => dispatch(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::Navigate(Route::Continent(name)),
                ),
                None => emit_status(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    format!("no continent {digit} in the menu"),
                ),
            }
        }
        KeyCode::Char('j') | KeyCode::Down => scroll_chart(state, view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => scroll_chart(state, view_data, -1),
        _ => {}
    }
    false
}

fn handle_menu_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Char('j') | KeyCode::Down => AppCommand::MoveMenuCursor(1),
        KeyCode::Char('k') | KeyCode::Up => AppCommand::MoveMenuCursor(-1),
        KeyCode::Esc | KeyCode::Char('m') => AppCommand::CloseMenu,
        KeyCode::Enter => match state.menu.selected() {
            Some(route) => AppCommand::Navigate(route),
            None => AppCommand::CloseMenu,
        },
        _ => return,
    };
    dispatch(state, runtime, view_data, internal_tx, command);
}

fn handle_filter_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let mut text = state.active_view().filter_text().to_owned();
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            dispatch(state, runtime, view_data, internal_tx, AppCommand::ExitToNav);
            return;
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => text.clear(),
        KeyCode::Backspace => {
            if text.pop().is_none() {
                return;
            }
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => text.push(ch),
        _ => return,
    }
    view_data.chart_offset = 0;
    dispatch(
        state,
        runtime,
        view_data,
        internal_tx,
        AppCommand::SetFilter(text),
    );
}

fn handle_goto_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            view_data.goto_input.clear();
            dispatch(state, runtime, view_data, internal_tx, AppCommand::ExitToNav);
        }
        KeyCode::Enter => {
            let input = std::mem::take(&mut view_data.goto_input);
            dispatch(state, runtime, view_data, internal_tx, AppCommand::ExitToNav);
            match Route::parse(input.trim()) {
                Ok(route) => dispatch(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::Navigate(route),
                ),
                Err(error) => {
                    tracing::warn!(path = %input, %error, "route parse failed");
                    emit_status(state, runtime, view_data, internal_tx, error.to_string());
                }
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.goto_input.clear();
        }
        KeyCode::Backspace => {
            view_data.goto_input.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.goto_input.push(ch);
        }
        _ => {}
    }
}

fn scroll_chart(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let len = state.active_view().filtered_data().len();
    let max_offset = len.saturating_sub(view_data.chart_rows.max(1));
    view_data.chart_offset = view_data
        .chart_offset
        .saturating_add_signed(delta)
        .min(max_offset);
}

fn screen_layout(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(area)
}

/// Bar rows that fit inside the bordered chart area.
fn chart_rows(area: Rect) -> usize {
    usize::from(screen_layout(area)[3].height.saturating_sub(2))
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = screen_layout(frame.area());

    let header = Paragraph::new(header_line(state))
        .block(Block::default().borders(Borders::ALL).title("globalview"));
    frame.render_widget(header, layout[0]);

    let view = state.active_view();
    let mut heading = vec![Line::from(Span::styled(
        view.kind().title(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ))];
    if let Some(message) = view_message(view) {
        let color = match view.phase() {
            ViewPhase::Failed => Color::Red,
            ViewPhase::Loading => Color::Gray,
            _ => Color::Yellow,
        };
        heading.push(Line::from(Span::styled(
            message,
            Style::default().fg(color),
        )));
    }
    frame.render_widget(Paragraph::new(heading), layout[1]);

    render_input(frame, layout[2], state, view_data);
    render_chart(frame, layout[3], view, view_data.chart_offset);

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status_widget, layout[4]);

    if state.menu.open {
        let area = centered_rect(40, 50, frame.area());
        frame.render_widget(Clear, area);
        let menu = Paragraph::new(menu_overlay_text(state)).block(
            Block::default()
                .title("continents")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(menu, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_input(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let (title, text, focused) = match state.mode {
        AppMode::Goto => ("go to path", view_data.goto_input.as_str(), true),
        AppMode::Filter => ("filter", state.active_view().filter_text(), true),
        AppMode::Nav => ("filter", state.active_view().filter_text(), false),
    };
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let body = if text.is_empty() && state.mode != AppMode::Goto {
        Span::styled(FILTER_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(text.to_owned())
    };
    let input = Paragraph::new(Line::from(body)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(input, area);

    if focused {
        let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = area.x.saturating_add(1).saturating_add(width).min(max_x);
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn render_chart(frame: &mut ratatui::Frame<'_>, area: Rect, view: &ViewState, offset: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title_bottom(Line::from(Span::styled(
            format!("■ {CHART_LEGEND}"),
            Style::default().fg(BAR_COLOR),
        )));
    if !view.is_chart_visible() {
        frame.render_widget(block, area);
        return;
    }

    let points = view.filtered_data();
    let rows = usize::from(area.height.saturating_sub(2));
    let bars = chart_window(points, offset, rows)
        .iter()
        .map(|point| {
            Bar::default()
                .value(point.value)
                .label(Line::from(point.label.clone()))
                .text_value(format_population(point.value))
                .style(Style::default().fg(BAR_COLOR))
        })
        .collect::<Vec<_>>();
    let max = points.iter().map(|point| point.value).max().unwrap_or(0);

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .value_style(Style::default().fg(Color::Black).bg(BAR_COLOR))
        .data(BarGroup::default().bars(&bars))
        .max(max.max(1));
    frame.render_widget(chart, area);
}

/// Rows of `points` visible from `offset`, pinned so the last page stays full.
fn chart_window(points: &[ChartPoint], offset: usize, rows: usize) -> &[ChartPoint] {
    if rows == 0 || points.is_empty() {
        return &[];
    }
    let start = offset.min(points.len().saturating_sub(rows));
    let end = (start + rows).min(points.len());
    &points[start..end]
}

fn view_message(view: &ViewState) -> Option<String> {
    match view.phase() {
        ViewPhase::Loading => Some(LOADING_TEXT.to_owned()),
        ViewPhase::Failed => view.error().map(str::to_owned),
        ViewPhase::Ready => view.notice().map(str::to_owned),
        ViewPhase::Idle => None,
    }
}

/// Menu entries in display order with whether each one is the active route.
fn header_entries(state: &AppState) -> Vec<(String, bool)> {
    state
        .menu
        .continents
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let label = if index < 9 {
                format!("{} {name}", index + 1)
            } else {
                name.clone()
            };
            (label, state.route.is_highlighted(name))
        })
        .collect()
}

fn header_line(state: &AppState) -> Line<'static> {
    let mut spans = vec![Span::styled(
        APP_TITLE,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    if state.menu.is_loading() && state.menu.continents.is_empty() {
        spans.push(Span::styled(
            "  loading continents",
            Style::default().fg(Color::DarkGray),
        ));
    }
    for (label, active) in header_entries(state) {
        spans.push(Span::raw("  "));
        let style = if active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
    }
    Line::from(spans)
}

fn menu_overlay_text(state: &AppState) -> String {
    if state.menu.continents.is_empty() {
        return if state.menu.is_loading() {
            "loading continents...".to_owned()
        } else {
            "no continents available".to_owned()
        };
    }
    let mut lines = state
        .menu
        .continents
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let cursor = if index == state.menu.cursor { ">" } else { " " };
            let active = if state.route.is_highlighted(name) {
                " *"
            } else {
                ""
            };
            format!("{cursor} {name}{active}")
        })
        .collect::<Vec<_>>();
    lines.push(String::new());
    lines.push("j/k move | enter open | esc close".to_owned());
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let (mode, hints) = match state.mode {
        AppMode::Nav if state.menu.open => ("MENU", "j/k move | enter open | esc close"),
        AppMode::Nav => (
            "NAV",
            "m menu | 1-9 continent | g global | / filter | : path | j/k scroll | ? help | q quit",
        ),
        AppMode::Filter => ("FILTER", "type a minimum population | ctrl+u clear | esc done"),
        AppMode::Goto => ("GOTO", "/ or /continent/<name> | enter go | esc cancel"),
    };
    let location = state.route.path();
    match &state.status_line {
        Some(status) => format!("{mode} | {location} | {status} | {hints}"),
        None => format!("{mode} | {location} | {hints}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help\n\
nav: m menu | 1-9 jump to continent | g/home global view | : go to path | q quit\n\
nav: / or i edit filter | j/k or up/down scroll chart\n\
menu: j/k move | enter open | esc or m close\n\
filter: type digits | backspace delete | ctrl+u clear | enter/esc back to nav\n\
path: / or /continent/<name> | enter go | esc cancel"
}

/// Compact population label: 1.4B, 67.4M, 950k.
fn format_population(value: u64) -> String {
    const THOUSAND: f64 = 1_000.0;
    const MILLION: f64 = 1_000_000.0;
    const BILLION: f64 = 1_000_000_000.0;

    let amount = value as f64;
    if amount >= BILLION {
        format!("{:.1}B", amount / BILLION)
    } else if amount >= MILLION {
        format!("{:.1}M", amount / MILLION)
    } else if amount >= 10.0 * THOUSAND {
        format!("{:.0}k", amount / THOUSAND)
    } else if amount >= THOUSAND {
        format!("{:.1}k", amount / THOUSAND)
    } else {
        value.to_string()
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
