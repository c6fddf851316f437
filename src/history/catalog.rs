//! Session catalog derived from flat history records

use super::types::{HistoryRecord, SessionSummary};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Group records by session and summarise each group, most recent first
///
/// Records without a session id are dropped. Within a session the earliest
/// record supplies `title` and `created_at` (the first one encountered wins
/// a tie) and the latest supplies `updated_at`.
pub fn build_catalog(records: &[HistoryRecord]) -> Vec<SessionSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut catalog: Vec<SessionSummary> = Vec::new();

    for record in records.iter().filter(|r| r.has_session()) {
        match index.get(record.session_id.as_str()) {
            Some(&slot) => {
                let summary = &mut catalog[slot];
                if record.created_at < summary.created_at {
                    summary.created_at = record.created_at;
                    summary.title = record.user_query.clone();
                }
                if summary
                    .updated_at
                    .map_or(true, |updated| record.created_at > updated)
                {
                    summary.updated_at = Some(record.created_at);
                }
            }
            None => {
                index.insert(record.session_id.as_str(), catalog.len());
                catalog.push(SessionSummary {
                    session_id: record.session_id.clone(),
                    title: record.user_query.clone(),
                    created_at: record.created_at,
                    updated_at: Some(record.created_at),
                });
            }
        }
    }

    sort_catalog(&mut catalog);
    tracing::debug!(
        records = records.len(),
        sessions = catalog.len(),
        "Built session catalog"
    );
    catalog
}

/// Order summaries by last activity, newest first; ties keep their order
pub fn sort_catalog(catalog: &mut [SessionSummary]) {
    catalog.sort_by_key(|s| Reverse(s.last_activity()));
}

/// Resolve a full session id or unique prefix against the catalog
///
/// Returns `Ok(None)` when nothing matches or the input is blank, and
/// `Err(count)` when the prefix is ambiguous.
pub fn find_session<'a>(
    catalog: &'a [SessionSummary],
    id_or_prefix: &str,
) -> std::result::Result<Option<&'a SessionSummary>, usize> {
    if id_or_prefix.trim().is_empty() {
        return Ok(None);
    }
    if let Some(exact) = catalog.iter().find(|s| s.session_id == id_or_prefix) {
        return Ok(Some(exact));
    }
    let matches: Vec<&SessionSummary> = catalog
        .iter()
        .filter(|s| s.session_id.starts_with(id_or_prefix))
        .collect();
    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0])),
        n => Err(n),
    }
}
