// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use cardsearch_api::Client;
use cardsearch_app::{
    Record, SearchCommand, SearchEvent, SearchMode, SearchOutcome, SearchState, SearchTicket,
    filter_records,
};
use cardsearch_tui::{InternalEvent, SearchRuntime};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Executor behind the front end, chosen from config and flags.
pub enum CliRuntime {
    /// Sleeps, then answers with the placeholder payload.
    Simulated { delay: Duration },
    Network(Client),
    /// Filters an in-memory catalog instead of calling the endpoint.
    Demo(Vec<Record>),
}

impl SearchRuntime for CliRuntime {
    fn run_search(&mut self, ticket: &SearchTicket) -> SearchOutcome {
        match self {
            Self::Simulated { delay } => {
                thread::sleep(*delay);
                SearchOutcome::Placeholder {
                    query: ticket.query.clone(),
                }
            }
            Self::Network(client) => client.search(&ticket.query),
            Self::Demo(records) => {
                SearchOutcome::Matches(filter_records(records.clone(), &ticket.query))
            }
        }
    }

    // Every search gets its own thread and nothing is cancelled; the state
    // drops completions that belong to superseded searches.
    fn spawn_search(&mut self, ticket: SearchTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let mut worker = match self {
            Self::Simulated { delay } => Self::Simulated { delay: *delay },
            Self::Network(client) => Self::Network(client.clone()),
            Self::Demo(records) => {
                let outcome = SearchOutcome::Matches(filter_records(records.clone(), &ticket.query));
                return send_completion(&tx, ticket.generation, outcome);
            }
        };

        let generation = ticket.generation;
        thread::Builder::new()
            .name(format!("search-{generation}"))
            .spawn(move || {
                let outcome = worker.run_search(&ticket);
                debug!(generation, "search finished");
                // The receiver is gone once the UI has exited.
                let _ = send_completion(&tx, generation, outcome);
            })
            .context("spawn search thread")?;
        Ok(())
    }
}

fn send_completion(
    tx: &Sender<InternalEvent>,
    generation: u64,
    outcome: SearchOutcome,
) -> Result<()> {
    tx.send(InternalEvent::SearchCompleted {
        generation,
        outcome,
    })
    .map_err(|_| anyhow::anyhow!("search event channel closed"))
}

/// Runs one search to completion without the terminal UI and returns the
/// final state.
pub fn search_once<R: SearchRuntime>(
    runtime: &mut R,
    mode: SearchMode,
    raw_query: &str,
) -> SearchState {
    let mut state = SearchState::new(mode);
    state.input = raw_query.to_owned();

    let started = state
        .dispatch(SearchCommand::Submit)
        .into_iter()
        .find_map(|event| match event {
            SearchEvent::SearchStarted(ticket) => Some(ticket),
            _ => None,
        });
    let Some(ticket) = started else {
        return state;
    };

    info!(generation = ticket.generation, query = %ticket.query, "one-shot search");
    let outcome = runtime.run_search(&ticket);
    state.dispatch(SearchCommand::Complete {
        generation: ticket.generation,
        outcome,
    });
    state
}

#[cfg(test)]
mod tests {
    use super::{CliRuntime, search_once};
    use anyhow::{Result, anyhow};
    use cardsearch_api::{Client, ClientOptions};
    use cardsearch_app::{
        Panel, Query, QueryPolicy, SearchCommand, SearchMode, SearchState, SearchTicket,
        render_text, view_frame,
    };
    use cardsearch_testkit::sample_catalog;
    use cardsearch_tui::{InternalEvent, SearchRuntime};
    use std::sync::mpsc::{self, TryRecvError};
    use std::thread;
    use std::time::Duration;
    use tiny_http::{Response, Server};

    fn ticket(generation: u64, raw: &str) -> SearchTicket {
        SearchTicket {
            generation,
            query: Query::parse(raw, QueryPolicy::STRICT).expect("valid query"),
        }
    }

    fn apply(state: &mut SearchState, event: InternalEvent) {
        let InternalEvent::SearchCompleted {
            generation,
            outcome,
        } = event
        else {
            panic!("expected a search completion");
        };
        state.dispatch(SearchCommand::Complete {
            generation,
            outcome,
        });
    }

    #[test]
    fn simulated_search_echoes_query_after_delay() -> Result<()> {
        let mut runtime = CliRuntime::Simulated {
            delay: Duration::from_millis(150),
        };
        let mut state = SearchState::new(SearchMode::Simulated);
        state.input = "bank".to_owned();
        state.dispatch(SearchCommand::Submit);
        assert_eq!(state.view.panel(), Panel::Loading);

        let (tx, rx) = mpsc::channel();
        runtime.spawn_search(ticket(state.generation(), "bank"), tx)?;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(state.view.panel(), Panel::Loading);

        apply(&mut state, rx.recv_timeout(Duration::from_secs(5))?);
        let frame = view_frame(&state.view);
        assert_eq!(frame.panel, Panel::Results);
        assert!(frame.heading.contains("\"bank\""));
        assert!(!state.busy);
        Ok(())
    }

    #[test]
    fn overlapping_simulated_searches_both_complete() -> Result<()> {
        let mut runtime = CliRuntime::Simulated {
            delay: Duration::from_millis(20),
        };
        let (tx, rx) = mpsc::channel();
        runtime.spawn_search(ticket(1, "first"), tx.clone())?;
        runtime.spawn_search(ticket(2, "second"), tx)?;

        let mut generations = Vec::new();
        for _ in 0..2 {
            match rx.recv_timeout(Duration::from_secs(5))? {
                InternalEvent::SearchCompleted { generation, .. } => generations.push(generation),
                other => return Err(anyhow!("unexpected event {other:?}")),
            }
        }
        generations.sort_unstable();
        assert_eq!(generations, vec![1, 2]);
        Ok(())
    }

    #[test]
    fn demo_runtime_filters_catalog() {
        let mut runtime = CliRuntime::Demo(sample_catalog());
        let state = search_once(&mut runtime, SearchMode::Networked, "  visa ");
        let text = render_text(&view_frame(&state.view));
        assert!(text.starts_with("Resultados (2)"));
        assert!(text.contains("Visa Gold"));
        assert!(text.contains("Visa Infinite"));
        assert!(!state.busy);
    }

    #[test]
    fn demo_runtime_reports_empty() {
        let mut runtime = CliRuntime::Demo(sample_catalog());
        let state = search_once(&mut runtime, SearchMode::Networked, "amex");
        assert!(state.view.is_visible(Panel::Empty));
        assert!(!state.view.is_visible(Panel::Results));
    }

    #[test]
    fn search_once_surfaces_validation_per_mode() {
        let mut runtime = CliRuntime::Demo(sample_catalog());

        let networked = search_once(&mut runtime, SearchMode::Networked, "   ");
        assert_eq!(networked.view.panel(), Panel::Error);
        assert_eq!(networked.generation(), 0);

        let simulated = search_once(&mut runtime, SearchMode::Simulated, "x");
        assert_eq!(simulated.view.panel(), Panel::Initial);
        assert!(simulated.notice.is_some());
    }

    #[test]
    fn network_runtime_maps_server_error_to_error_panel() -> Result<()> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let endpoint = format!("http://{}/api/D_Genbco_T/Retrieve", server.server_addr());
        let handle = thread::spawn(move || {
            let request = server.recv().expect("request expected");
            request
                .respond(Response::from_string("").with_status_code(500))
                .expect("response should succeed");
        });

        let client = Client::new(
            &endpoint,
            ClientOptions {
                timeout: Some(Duration::from_secs(2)),
                accept_invalid_certs: false,
            },
        )?;
        let mut runtime = CliRuntime::Network(client);
        let mut state = SearchState::new(SearchMode::Networked);
        state.input = "visa".to_owned();
        state.dispatch(SearchCommand::Submit);
        assert!(state.busy);

        let (tx, rx) = mpsc::channel();
        runtime.spawn_search(ticket(state.generation(), "visa"), tx)?;
        apply(&mut state, rx.recv_timeout(Duration::from_secs(5))?);

        let text = render_text(&view_frame(&state.view));
        assert_eq!(state.view.panel(), Panel::Error);
        assert!(text.contains("500"));
        assert!(!state.busy);

        handle.join().expect("server thread should join");
        Ok(())
    }
}
