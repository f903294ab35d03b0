//! Reconciliation of remote rows into the canonical record shape
//!
//! Remote rows are heterogeneous: fields may live inside the `data`
//! payload column or flattened at the row's top level. Normalization is
//! total; whatever the row looks like, a canonical `Record` comes out.

use crate::records::Record;
use serde_json::Value;

/// Normalize one remote row.
///
/// Fallback order per field: payload value, then the row's top-level
/// column, then empty. The row's own id is always recorded as the remote
/// identifier; it also becomes the local id when the payload never minted
/// one.
pub fn reconcile_row(row: &Value) -> Record {
    let mut record: Record = row
        .get("data")
        .filter(|v| v.is_object())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();

    let remote_id = row.get("id").and_then(Value::as_i64);

    if !record.has_local_id() {
        if let Some(id) = remote_id {
            record.id = id;
        }
    }
    if record.created_at.is_empty() {
        record.created_at = top_level_str(row, "created_at");
    }
    if record.main_issues.is_empty() {
        record.main_issues = top_level_str(row, "main_issues");
    }
    if record.main_goal.is_empty() {
        record.main_goal = top_level_str(row, "main_goal");
    }
    record.remote_id = remote_id;

    record
}

/// Normalize a pulled row set, independently and order-preservingly.
pub fn reconcile_rows(rows: &[Value]) -> Vec<Record> {
    rows.iter().map(reconcile_row).collect()
}

fn top_level_str(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
