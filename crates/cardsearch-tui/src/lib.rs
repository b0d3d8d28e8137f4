// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use cardsearch_app::{
    Panel, SearchCommand, SearchError, SearchEvent, SearchOutcome, SearchState, SearchTicket,
    frame_lines, submit_label, view_frame,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const NOTICE_TTL: Duration = Duration::from_secs(4);
const KEY_HINTS: &str = "enter buscar | esc limpiar/volver | ctrl+l limpiar | ctrl+n nueva | ctrl+c salir";

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearNotice {
        token: u64,
    },
    SearchCompleted {
        generation: u64,
        outcome: SearchOutcome,
    },
}

/// Executes searches for the front end. Completions travel back through the
/// internal channel so the draw loop never blocks on a search.
pub trait SearchRuntime {
    fn run_search(&mut self, ticket: &SearchTicket) -> SearchOutcome;

    fn spawn_search(&mut self, ticket: SearchTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let outcome = self.run_search(&ticket);
        tx.send(InternalEvent::SearchCompleted {
            generation: ticket.generation,
            outcome,
        })
        .map_err(|_| anyhow!("search event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ViewData {
    notice_token: u64,
}

#[derive(Debug, Clone, PartialEq)]
enum KeyAction {
    Quit,
    Dispatch(SearchCommand),
    Ignore,
}

pub fn run_app<R: SearchRuntime>(state: &mut SearchState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();
    info!(mode = state.mode.as_str(), "search screen ready");

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut SearchState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearNotice { token } if token == view_data.notice_token => {
                state.dispatch(SearchCommand::DismissNotice);
            }
            InternalEvent::ClearNotice { .. } => {}
            InternalEvent::SearchCompleted {
                generation,
                outcome,
            } => {
                if let SearchOutcome::Failed(error) = &outcome {
                    warn!(generation, kind = error.kind(), %error, "search failed");
                }
                let command = SearchCommand::Complete {
                    generation,
                    outcome,
                };
                apply_command(state, view_data, tx, command, None);
            }
        }
    }
}

fn handle_key_event<R: SearchRuntime>(
    state: &mut SearchState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match key_action(key) {
        KeyAction::Quit => true,
        KeyAction::Dispatch(command) => {
            let runtime: &mut dyn SearchRuntime = runtime;
            apply_command(state, view_data, internal_tx, command, Some(runtime));
            false
        }
        KeyAction::Ignore => false,
    }
}

fn key_action(key: KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => KeyAction::Quit,
            KeyCode::Char('l') => KeyAction::Dispatch(SearchCommand::ClearForm),
            KeyCode::Char('n') => KeyAction::Dispatch(SearchCommand::NewSearch),
            _ => KeyAction::Ignore,
        };
    }

    match key.code {
        KeyCode::Enter => KeyAction::Dispatch(SearchCommand::Submit),
        KeyCode::Esc => KeyAction::Dispatch(SearchCommand::Escape),
        KeyCode::Backspace => KeyAction::Dispatch(SearchCommand::Backspace),
        KeyCode::Char(ch) => KeyAction::Dispatch(SearchCommand::InsertChar(ch)),
        _ => KeyAction::Ignore,
    }
}

fn apply_command(
    state: &mut SearchState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: SearchCommand,
    mut runtime: Option<&mut dyn SearchRuntime>,
) {
    for event in state.dispatch(command) {
        match event {
            SearchEvent::SearchStarted(ticket) => {
                info!(generation = ticket.generation, query = %ticket.query, "search started");
                let Some(runtime) = runtime.as_deref_mut() else {
                    continue;
                };
                let generation = ticket.generation;
                if let Err(error) = runtime.spawn_search(ticket, tx.clone()) {
                    warn!(generation, %error, "search could not start");
                    state.dispatch(SearchCommand::Complete {
                        generation,
                        outcome: SearchOutcome::Failed(SearchError::unexpected(error.to_string())),
                    });
                }
            }
            SearchEvent::NoticeShown(message) => {
                debug!(%message, "validation notice");
                view_data.notice_token = view_data.notice_token.saturating_add(1);
                schedule_notice_clear(tx, view_data.notice_token);
            }
            SearchEvent::StaleCompletion { generation } => {
                debug!(generation, current = state.generation(), "stale completion dropped");
            }
            SearchEvent::ViewChanged(panel) => {
                debug!(panel = panel.as_str(), "view changed");
            }
            SearchEvent::InputChanged
            | SearchEvent::BusyChanged(_)
            | SearchEvent::NoticeCleared => {}
        }
    }
}

fn schedule_notice_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(NOTICE_TTL);
        let _ = sender.send(InternalEvent::ClearNotice { token });
    });
}

fn render(frame: &mut ratatui::Frame<'_>, state: &SearchState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let input = Paragraph::new(input_line_text(state)).block(
        Block::default()
            .title(format!("buscar ({})", state.mode.as_str()))
            .borders(Borders::ALL),
    );
    frame.render_widget(input, layout[0]);

    let view = view_frame(&state.view);
    let body = Paragraph::new(frame_lines(&view).join("\n"))
        .wrap(Wrap { trim: false })
        .style(panel_style(view.panel))
        .block(
            Block::default()
                .title(view.heading.clone())
                .borders(Borders::ALL),
        );
    frame.render_widget(body, layout[1]);

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, layout[2]);
}

fn panel_style(panel: Panel) -> Style {
    let color = match panel {
        Panel::Initial => Color::White,
        Panel::Loading => Color::Gray,
        Panel::Results => Color::Cyan,
        Panel::Empty => Color::Yellow,
        Panel::Error => Color::Red,
    };
    Style::default().fg(color)
}

fn input_line_text(state: &SearchState) -> String {
    format!("> {}_  [{}]", state.input, submit_label(state.busy))
}

fn status_text(state: &SearchState) -> String {
    match &state.notice {
        Some(notice) => format!("⚠ {notice} | {KEY_HINTS}"),
        None => KEY_HINTS.to_owned(),
    }
}
