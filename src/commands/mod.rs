//! Tauri commands for SkinConsult
//!
//! Commands are organized into domain-specific submodules:
//! - record_commands: startup, list/detail, save, export
//! - sync_commands: remote table configuration
//!
//! Wrappers live here; the `_impl` functions carry the logic so tests can
//! exercise them without a Tauri runtime.

pub mod record_commands;
pub mod sync_commands;

use crate::error::AppError;
use crate::exports::ExportSummary;
use crate::flows::SaveOutcome;
use crate::records::Record;
use crate::AppState;
use serde::{Deserialize, Serialize};
use tauri::State;

/// Result of app initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitResult {
    /// Records loaded from the local snapshot
    pub cached_records: usize,
    /// Whether a remote table is configured
    pub remote_configured: bool,
    /// Records after the startup refresh; `None` when the pull was
    /// skipped or failed and the cached list stands
    pub refreshed_records: Option<usize>,
}

/// Result of one save flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResult {
    pub record: Record,
    /// False on the saved-locally-only leg
    pub remote_saved: bool,
    /// Remote failure reason when `remote_saved` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<SaveOutcome> for SaveResult {
    fn from(outcome: SaveOutcome) -> Self {
        match outcome {
            SaveOutcome::Saved(record) => Self {
                record,
                remote_saved: true,
                warning: None,
            },
            SaveOutcome::SavedLocallyOnly { record, warning } => Self {
                record,
                remote_saved: false,
                warning: Some(warning),
            },
        }
    }
}

/// Initialize the application: open the local store, load the cached
/// record list, and run the startup refresh from the remote table.
#[tauri::command]
pub async fn initialize_app(state: State<'_, AppState>) -> Result<InitResult, AppError> {
    record_commands::initialize_app_impl(state).await
}

/// List records, optionally filtered by name or phone substring.
#[tauri::command]
pub fn list_records(
    state: State<'_, AppState>,
    keyword: Option<String>,
) -> Result<Vec<Record>, AppError> {
    record_commands::list_records_impl(state, keyword)
}

/// Fetch one record by local id.
#[tauri::command]
pub fn get_record(state: State<'_, AppState>, id: i64) -> Result<Record, AppError> {
    record_commands::get_record_impl(state, id)
}

/// Run the save flow for a submitted form.
#[tauri::command]
pub async fn save_record(
    state: State<'_, AppState>,
    form: Record,
    is_edit: bool,
) -> Result<SaveResult, AppError> {
    record_commands::save_record_impl(state, form, is_edit).await
}

/// Export the record list as a spreadsheet into the given directory.
#[tauri::command]
pub fn export_records(
    state: State<'_, AppState>,
    output_dir: String,
) -> Result<ExportSummary, AppError> {
    record_commands::export_records_impl(state, output_dir)
}

/// Whether a remote table is configured.
#[tauri::command]
pub fn is_remote_configured(state: State<'_, AppState>) -> Result<bool, AppError> {
    sync_commands::is_remote_configured_impl(state)
}

/// Store remote table configuration and rebuild the sync client.
#[tauri::command]
pub fn configure_remote(
    state: State<'_, AppState>,
    base_url: String,
    api_key: String,
    allow_http: Option<bool>,
) -> Result<(), AppError> {
    sync_commands::configure_remote_impl(state, base_url, api_key, allow_http)
}
