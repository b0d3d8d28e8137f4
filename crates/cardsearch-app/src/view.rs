// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Query, Record};

/// The five mutually exclusive panels of the search screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Initial,
    Loading,
    Results,
    Empty,
    Error,
}

impl Panel {
    pub const ALL: [Self; 5] = [
        Self::Initial,
        Self::Loading,
        Self::Results,
        Self::Empty,
        Self::Error,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Loading => "loading",
            Self::Results => "results",
            Self::Empty => "empty",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultsPayload {
    /// Canned content of the simulated search, echoing the query.
    Placeholder { query: Query },
    Records(Vec<Record>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Initial,
    Loading {
        query: Query,
    },
    Results(ResultsPayload),
    Empty,
    Error {
        message: String,
    },
}

impl ViewState {
    pub const fn panel(&self) -> Panel {
        match self {
            Self::Initial => Panel::Initial,
            Self::Loading { .. } => Panel::Loading,
            Self::Results(_) => Panel::Results,
            Self::Empty => Panel::Empty,
            Self::Error { .. } => Panel::Error,
        }
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        self.panel() == panel
    }
}
