// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Panel, Query, QueryPolicy, Record, ResultsPayload, SearchError, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Fixed delay, canned content. Queries need two characters and a
    /// rejected query leaves the view untouched.
    Simulated,
    /// One request to the retrieve endpoint, filtered locally. Only blank
    /// queries are rejected and the rejection shows the Error panel.
    Networked,
}

impl SearchMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Networked => "networked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "simulated" => Some(Self::Simulated),
            "networked" => Some(Self::Networked),
            _ => None,
        }
    }

    pub const fn policy(self) -> QueryPolicy {
        match self {
            Self::Simulated => QueryPolicy::STRICT,
            Self::Networked => QueryPolicy::LENIENT,
        }
    }
}

/// Handed to the executor when a search starts. The generation identifies
/// the attempt when its completion comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub query: Query,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Placeholder { query: Query },
    Matches(Vec<Record>),
    Failed(SearchError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchCommand {
    InsertChar(char),
    Backspace,
    Submit,
    ClearForm,
    NewSearch,
    Escape,
    Complete {
        generation: u64,
        outcome: SearchOutcome,
    },
    DismissNotice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    InputChanged,
    ViewChanged(Panel),
    BusyChanged(bool),
    NoticeShown(String),
    NoticeCleared,
    SearchStarted(SearchTicket),
    StaleCompletion { generation: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub mode: SearchMode,
    pub input: String,
    pub view: ViewState,
    /// Submit button shows "Buscando..." while set.
    pub busy: bool,
    /// Validation alert for the simulated mode.
    pub notice: Option<String>,
    generation: u64,
}

impl SearchState {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            input: String::new(),
            view: ViewState::Initial,
            busy: false,
            notice: None,
            generation: 0,
        }
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dispatch(&mut self, command: SearchCommand) -> Vec<SearchEvent> {
        match command {
            SearchCommand::InsertChar(ch) => {
                self.input.push(ch);
                let mut events = vec![SearchEvent::InputChanged];
                if self.view.panel() == Panel::Error {
                    events.extend(self.set_view(ViewState::Initial));
                }
                events
            }
            SearchCommand::Backspace => {
                if self.input.pop().is_none() {
                    return Vec::new();
                }
                let mut events = vec![SearchEvent::InputChanged];
                if self.view.panel() == Panel::Error {
                    events.extend(self.set_view(ViewState::Initial));
                }
                events
            }
            SearchCommand::Submit => self.submit(),
            SearchCommand::ClearForm => self.clear_form(),
            SearchCommand::NewSearch => self.new_search(),
            SearchCommand::Escape => {
                if self.view.panel() == Panel::Results {
                    self.new_search()
                } else {
                    self.clear_form()
                }
            }
            SearchCommand::Complete {
                generation,
                outcome,
            } => self.complete(generation, outcome),
            SearchCommand::DismissNotice => self.clear_notice().into_iter().collect(),
        }
    }

    /// Shows exactly one panel. Writing the state already shown is a no-op.
    pub fn set_view(&mut self, view: ViewState) -> Vec<SearchEvent> {
        if self.view == view {
            return Vec::new();
        }
        self.view = view;
        vec![SearchEvent::ViewChanged(self.view.panel())]
    }

    fn submit(&mut self) -> Vec<SearchEvent> {
        let query = match Query::parse(&self.input, self.mode.policy()) {
            Ok(query) => query,
            Err(error) => {
                let message = error.to_string();
                return match self.mode {
                    SearchMode::Simulated => {
                        self.notice = Some(message.clone());
                        vec![SearchEvent::NoticeShown(message)]
                    }
                    SearchMode::Networked => self.set_view(ViewState::Error { message }),
                };
            }
        };

        self.generation = self.generation.saturating_add(1);
        let ticket = SearchTicket {
            generation: self.generation,
            query: query.clone(),
        };

        let mut events = Vec::new();
        events.extend(self.clear_notice());
        events.extend(self.set_busy(true));
        events.extend(self.set_view(ViewState::Loading { query }));
        events.push(SearchEvent::SearchStarted(ticket));
        events
    }

    fn complete(&mut self, generation: u64, outcome: SearchOutcome) -> Vec<SearchEvent> {
        if generation != self.generation {
            return vec![SearchEvent::StaleCompletion { generation }];
        }

        let view = match outcome {
            SearchOutcome::Placeholder { query } => {
                ViewState::Results(ResultsPayload::Placeholder { query })
            }
            SearchOutcome::Matches(records) if records.is_empty() => ViewState::Empty,
            SearchOutcome::Matches(records) => ViewState::Results(ResultsPayload::Records(records)),
            SearchOutcome::Failed(error) => ViewState::Error {
                message: error.to_string(),
            },
        };

        let mut events = self.set_view(view);
        events.extend(self.set_busy(false));
        events
    }

    fn clear_form(&mut self) -> Vec<SearchEvent> {
        let mut events = self.clear_input();
        events.extend(self.clear_notice());
        if self.view.panel() == Panel::Results {
            events.extend(self.set_view(ViewState::Initial));
        }
        events
    }

    fn new_search(&mut self) -> Vec<SearchEvent> {
        let mut events = self.set_view(ViewState::Initial);
        events.extend(self.clear_input());
        events.extend(self.clear_notice());
        events
    }

    fn clear_input(&mut self) -> Vec<SearchEvent> {
        if self.input.is_empty() {
            return Vec::new();
        }
        self.input.clear();
        vec![SearchEvent::InputChanged]
    }

    fn clear_notice(&mut self) -> Option<SearchEvent> {
        self.notice.take().map(|_| SearchEvent::NoticeCleared)
    }

    fn set_busy(&mut self, busy: bool) -> Option<SearchEvent> {
        if self.busy == busy {
            return None;
        }
        self.busy = busy;
        Some(SearchEvent::BusyChanged(busy))
    }
}
