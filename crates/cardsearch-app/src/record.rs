// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::SearchError;

pub const CREDIT_CARD_CODE: &str = "T";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordCode(i64);

impl RecordCode {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RecordCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordKind {
    CreditCard,
    Other(String),
}

impl RecordKind {
    pub fn parse(value: &str) -> Self {
        if value == CREDIT_CARD_CODE {
            Self::CreditCard
        } else {
            Self::Other(value.to_owned())
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::CreditCard => CREDIT_CARD_CODE,
            Self::Other(code) => code,
        }
    }
}

impl From<String> for RecordKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<RecordKind> for String {
    fn from(value: RecordKind) -> Self {
        value.code().to_owned()
    }
}

/// One entry of the card catalog as served by the retrieve endpoint.
/// Field names follow the upstream API; the short names are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Bcocodigo", alias = "code")]
    pub code: RecordCode,
    #[serde(rename = "Bconombre", alias = "name")]
    pub name: String,
    #[serde(rename = "Bcolimite", alias = "limit")]
    pub limit: f64,
    #[serde(rename = "Bcotipo", alias = "type")]
    pub kind: RecordKind,
}

impl Record {
    pub fn new(code: i64, name: &str, limit: f64, kind: RecordKind) -> Self {
        Self {
            code: RecordCode::new(code),
            name: name.to_owned(),
            limit,
            kind,
        }
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.limit.is_finite() {
            return Err(SearchError::unexpected(format!(
                "record {} has a non-finite limit",
                self.code
            )));
        }
        Ok(())
    }
}

/// Decodes a response body into records. The whole body is rejected when any
/// element is malformed.
pub fn decode_records(body: &str) -> Result<Vec<Record>, SearchError> {
    let records: Vec<Record> = serde_json::from_str(body)
        .map_err(|error| SearchError::unexpected(format!("decode records: {error}")))?;
    for record in &records {
        record.validate()?;
    }
    Ok(records)
}
