//! Save and refresh flows over the record list
//!
//! The save flow runs Idle -> Submitting -> (Saved | SavedLocallyOnly):
//! validation gates the transition out of Idle; the remote upsert decides
//! the terminal state; local persistence happens on both legs
//! (local-first durability). The refresh flow replaces the list wholesale
//! from the remote table and persists the result immediately.

use crate::reconcile::reconcile_rows;
use crate::records::Record;
use crate::store::RecordStore;
use crate::sync::{SyncClient, SyncError};
use crate::validation::{self, ValidationError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Terminal state of one submission
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Remote upsert succeeded; the record carries its remote id
    Saved(Record),
    /// Remote upsert failed; the record is durable locally only
    SavedLocallyOnly { record: Record, warning: String },
}

impl SaveOutcome {
    pub fn record(&self) -> &Record {
        match self {
            Self::Saved(record) => record,
            Self::SavedLocallyOnly { record, .. } => record,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Saved(_) => None,
            Self::SavedLocallyOnly { warning, .. } => Some(warning),
        }
    }
}

/// Finalize a submitted form into a saveable record.
///
/// Preserves the local id on edit, mints epoch milliseconds otherwise;
/// preserves `created_at` when the form carries one; computes the derived
/// display fields.
pub fn prepare_record(mut form: Record, is_edit: bool, now: DateTime<Utc>) -> Record {
    if !(is_edit && form.has_local_id()) {
        form.id = now.timestamp_millis();
    }
    if form.created_at.is_empty() {
        form.created_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    }
    form.main_issues = form.current_issues.join(", ");
    form.main_goal = form.goals.first().cloned().unwrap_or_default();
    form
}

/// Attempt the remote upsert. On success the record adopts any newly
/// assigned remote id; on failure the warning names the reason and the
/// record is left untouched for the local leg.
pub async fn push_remote(client: Option<&SyncClient>, record: &mut Record) -> Option<String> {
    let Some(client) = client else {
        return Some(SyncError::NotConfigured.to_string());
    };

    match client.upsert(record).await {
        Ok(remote_id) => {
            record.remote_id = Some(remote_id);
            None
        }
        Err(e) => {
            tracing::warn!("remote upsert failed: {}", e);
            Some(e.to_string())
        }
    }
}

/// Merge a record into the list by local-id match: replace in place when
/// present, append otherwise.
pub fn merge_record(list: &mut Vec<Record>, record: &Record) {
    match list.iter_mut().find(|r| r.id == record.id) {
        Some(slot) => *slot = record.clone(),
        None => list.push(record.clone()),
    }
}

/// Persist the list, logging write failures instead of raising them; the
/// prior snapshot stands when the write fails.
pub fn persist(store: &RecordStore, list: &[Record]) {
    if let Err(e) = store.save(list) {
        tracing::error!("failed to persist record list: {}", e);
    }
}

/// The local leg of the save flow: merge the record into the list,
/// persist, and fold the remote outcome into the terminal state. Runs
/// after the upsert so callers holding the list behind a lock stay
/// synchronous here.
pub fn finalize_save(
    record: Record,
    warning: Option<String>,
    list: &mut Vec<Record>,
    store: &RecordStore,
) -> SaveOutcome {
    merge_record(list, &record);
    persist(store, list);

    match warning {
        None => SaveOutcome::Saved(record),
        Some(warning) => SaveOutcome::SavedLocallyOnly { record, warning },
    }
}

/// The full save flow for one submission.
pub async fn submit_record(
    form: Record,
    is_edit: bool,
    list: &mut Vec<Record>,
    store: &RecordStore,
    client: Option<&SyncClient>,
) -> Result<SaveOutcome, ValidationError> {
    validation::validate_submission(&form)?;

    let mut record = prepare_record(form, is_edit, Utc::now());
    let warning = push_remote(client, &mut record).await;

    Ok(finalize_save(record, warning, list, store))
}

/// Replace the list with normalized remote rows and persist immediately,
/// keeping the durable cache consistent with the last successful pull.
pub fn apply_refresh(rows: &[Value], list: &mut Vec<Record>, store: &RecordStore) -> usize {
    *list = reconcile_rows(rows);
    persist(store, list);
    list.len()
}

/// Startup refresh: pull everything and replace the local state. Errors
/// propagate so the caller can log and keep the cached list.
pub async fn refresh_from_remote(
    client: &SyncClient,
    list: &mut Vec<Record>,
    store: &RecordStore,
) -> Result<usize, SyncError> {
    let rows = client.pull_all().await?;
    Ok(apply_refresh(&rows, list, store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 29, 7, 0, 0).unwrap()
    }

    #[test]
    fn test_prepare_mints_local_id_for_new_record() {
        let record = prepare_record(Record::default(), false, now());
        assert_eq!(record.id, now().timestamp_millis());
        assert_eq!(record.created_at, "2026-08-29T07:00:00.000Z");
    }

    #[test]
    fn test_prepare_preserves_id_and_created_at_on_edit() {
        let form = Record {
            id: 42,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            ..Record::default()
        };
        let record = prepare_record(form, true, now());
        assert_eq!(record.id, 42);
        assert_eq!(record.created_at, "2026-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_prepare_mints_id_when_edit_never_saved() {
        // An "edit" of a form that never got a local id is a fresh save
        let record = prepare_record(Record::default(), true, now());
        assert_eq!(record.id, now().timestamp_millis());
    }

    #[test]
    fn test_prepare_derives_display_fields() {
        let form = Record {
            current_issues: vec!["Mụn viêm".to_string(), "Da khô".to_string()],
            goals: vec!["Hết mụn".to_string(), "Da sáng khỏe".to_string()],
            ..Record::default()
        };
        let record = prepare_record(form, false, now());
        assert_eq!(record.main_issues, "Mụn viêm, Da khô");
        assert_eq!(record.main_goal, "Hết mụn");
    }

    #[test]
    fn test_prepare_empty_selections_derive_empty() {
        let record = prepare_record(Record::default(), false, now());
        assert_eq!(record.main_issues, "");
        assert_eq!(record.main_goal, "");
    }

    #[test]
    fn test_merge_replaces_in_place() {
        let mut list = vec![
            Record {
                id: 1,
                full_name: "A".to_string(),
                ..Record::default()
            },
            Record {
                id: 2,
                full_name: "B".to_string(),
                ..Record::default()
            },
        ];
        let edited = Record {
            id: 1,
            full_name: "A2".to_string(),
            ..Record::default()
        };

        merge_record(&mut list, &edited);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].full_name, "A2");
    }

    #[test]
    fn test_merge_appends_unknown_id() {
        let mut list = Vec::new();
        merge_record(
            &mut list,
            &Record {
                id: 3,
                ..Record::default()
            },
        );
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_push_remote_without_client_warns() {
        let mut record = Record::default();
        let warning = push_remote(None, &mut record).await;
        assert!(warning.is_some());
        assert_eq!(record.remote_id, None);
    }
}
