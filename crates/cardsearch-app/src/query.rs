// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::QueryError;

/// How strict the input validator is. The simulated search page demands
/// two characters; the networked page only rejects blank input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    pub min_chars: usize,
}

impl QueryPolicy {
    pub const STRICT: Self = Self { min_chars: 2 };
    pub const LENIENT: Self = Self { min_chars: 1 };
}

/// A trimmed search term that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str, policy: QueryPolicy) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        if trimmed.chars().count() < policy.min_chars {
            return Err(QueryError::TooShort {
                min_chars: policy.min_chars,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
