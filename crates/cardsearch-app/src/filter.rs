// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Query, Record};

/// Keeps records whose name contains the query (ignoring case) or whose
/// decimal code contains the query as typed. Input order is preserved.
pub fn filter_records(records: Vec<Record>, query: &Query) -> Vec<Record> {
    let needle = query.as_str().to_lowercase();
    records
        .into_iter()
        .filter(|record| record_matches(record, query.as_str(), &needle))
        .collect()
}

fn record_matches(record: &Record, raw: &str, lowered: &str) -> bool {
    record.name.to_lowercase().contains(lowered) || record.code.to_string().contains(raw)
}
