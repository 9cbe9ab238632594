//! Merging of search filters into canonical records.
//!
//! A matcher overlays the fields a search filter sets onto a stored record
//! and returns the merged result. Search endpoints keep the records whose
//! merge leaves them unchanged, which is exactly the set of records the
//! filter matches.
//!
//! Rules applied by every matcher:
//!
//! - no filter: the record is returned as is
//! - string fields: the filter value wins unless it is absent or blank
//! - identifier fields: the filter value wins unless it is absent
//! - configuration: see [`merge_configuration`]
//! - derived fields (icon, version override flag, breaking changes, support
//!   state) always come from the record

use serde_json::Value;
use uuid::Uuid;

use crate::models::{DestinationRead, DestinationSearch, SourceRead, SourceSearch};

/// Overlay a search filter of type `Q` onto a record of type `R`.
pub trait Matchable<Q, R> {
    /// Merge `query` into `record`. Never fails and never mutates its inputs.
    fn match_record(&self, query: Option<&Q>, record: &R) -> R;
}

/// Matcher for source records.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceMatcher;

/// Matcher for destination records.
#[derive(Debug, Clone, Copy, Default)]
pub struct DestinationMatcher;

impl Matchable<SourceSearch, SourceRead> for SourceMatcher {
    fn match_record(&self, query: Option<&SourceSearch>, record: &SourceRead) -> SourceRead {
        let Some(query) = query else {
            return record.clone();
        };

        SourceRead {
            source_id: pick_id(query.source_id, record.source_id),
            name: pick_string(query.name.as_deref(), &record.name),
            source_definition_id: pick_id(query.source_definition_id, record.source_definition_id),
            source_name: pick_string(query.source_name.as_deref(), &record.source_name),
            workspace_id: pick_id(query.workspace_id, record.workspace_id),
            connection_configuration: merge_configuration(
                query.connection_configuration.as_ref(),
                &record.connection_configuration,
            ),
            icon: record.icon.clone(),
            is_version_override_applied: record.is_version_override_applied,
            breaking_changes: record.breaking_changes.clone(),
            support_state: record.support_state,
        }
    }
}

impl Matchable<DestinationSearch, DestinationRead> for DestinationMatcher {
    fn match_record(
        &self,
        query: Option<&DestinationSearch>,
        record: &DestinationRead,
    ) -> DestinationRead {
        let Some(query) = query else {
            return record.clone();
        };

        DestinationRead {
            destination_id: pick_id(query.destination_id, record.destination_id),
            name: pick_string(query.name.as_deref(), &record.name),
            destination_definition_id: pick_id(
                query.destination_definition_id,
                record.destination_definition_id,
            ),
            destination_name: pick_string(
                query.destination_name.as_deref(),
                &record.destination_name,
            ),
            workspace_id: pick_id(query.workspace_id, record.workspace_id),
            connection_configuration: merge_configuration(
                query.connection_configuration.as_ref(),
                &record.connection_configuration,
            ),
            icon: record.icon.clone(),
            is_version_override_applied: record.is_version_override_applied,
            breaking_changes: record.breaking_changes.clone(),
            support_state: record.support_state,
        }
    }
}

/// Whether `query` matches `record`, i.e. merging changes nothing.
pub fn matches<Q, R, M>(matcher: &M, query: Option<&Q>, record: &R) -> bool
where
    M: Matchable<Q, R>,
    R: PartialEq,
{
    matcher.match_record(query, record) == *record
}

fn pick_string(query: Option<&str>, record: &str) -> String {
    match query {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => record.to_string(),
    }
}

fn pick_id(query: Option<Uuid>, record: Uuid) -> Uuid {
    query.unwrap_or(record)
}

/// Merge a filter configuration with a record configuration.
///
/// A JSON `null` counts as absent. When both are present the result starts
/// from the filter configuration; if that is an object, every top-level key
/// of the record object missing from it is copied in. Keys present in both
/// keep the filter value and nested objects are not merged. A filter
/// configuration that is not an object is returned unchanged.
#[must_use]
pub fn merge_configuration(query: Option<&Value>, record: &Value) -> Value {
    let query = match query {
        None | Some(Value::Null) => return record.clone(),
        Some(query) => query,
    };
    if record.is_null() {
        return query.clone();
    }

    let mut merged = query.clone();
    if let (Value::Object(merged_map), Value::Object(record_map)) = (&mut merged, record) {
        for (key, value) in record_map {
            if !merged_map.contains_key(key) {
                merged_map.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}
