use super::{InitResult, SaveResult};
use crate::error::AppError;
use crate::exports::{self, ExportSummary};
use crate::flows;
use crate::records::Record;
use crate::store::{self, RecordStore};
use crate::sync::{SyncClient, SyncConfig};
use crate::validation;
use crate::AppState;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tauri::State;

pub(crate) async fn initialize_app_impl(
    state: State<'_, AppState>,
) -> Result<InitResult, AppError> {
    let record_store = RecordStore::open(&store::get_db_path())?;
    record_store.initialize()?;

    let cached = record_store.load();
    let cached_records = cached.len();
    tracing::info!(records = cached_records, "loaded local record snapshot");

    let client = SyncConfig::from_settings(&record_store).map(SyncClient::new);
    let remote_configured = client.is_some();

    {
        *state
            .records
            .lock()
            .map_err(|_| AppError::lock_failed("record list"))? = cached;
        *state
            .store
            .lock()
            .map_err(|_| AppError::lock_failed("record store"))? = Some(record_store);
    }
    *state.sync.write() = client.clone();

    // Startup refresh: a failed pull is logged and the cached list stands
    let mut refreshed_records = None;
    if let Some(client) = client {
        match client.pull_all().await {
            Ok(rows) => {
                let mut records = state
                    .records
                    .lock()
                    .map_err(|_| AppError::lock_failed("record list"))?;
                let store_lock = state
                    .store
                    .lock()
                    .map_err(|_| AppError::lock_failed("record store"))?;
                let record_store = store_lock.as_ref().ok_or_else(AppError::db_not_initialized)?;
                let count = flows::apply_refresh(&rows, &mut records, record_store);
                refreshed_records = Some(count);
                tracing::info!(records = count, "refreshed record list from remote table");
            }
            Err(e) => {
                tracing::warn!("remote pull failed; keeping local snapshot: {}", e);
            }
        }
    }

    Ok(InitResult {
        cached_records,
        remote_configured,
        refreshed_records,
    })
}

pub(crate) fn list_records_impl(
    state: State<'_, AppState>,
    keyword: Option<String>,
) -> Result<Vec<Record>, AppError> {
    let records = state
        .records
        .lock()
        .map_err(|_| AppError::lock_failed("record list"))?;

    let Some(keyword) = keyword.filter(|k| !k.trim().is_empty()) else {
        return Ok(records.clone());
    };
    let kw = keyword.to_lowercase();
    Ok(records
        .iter()
        .filter(|r| {
            r.full_name.to_lowercase().contains(&kw) || r.phone.to_lowercase().contains(&kw)
        })
        .cloned()
        .collect())
}

pub(crate) fn get_record_impl(state: State<'_, AppState>, id: i64) -> Result<Record, AppError> {
    let records = state
        .records
        .lock()
        .map_err(|_| AppError::lock_failed("record list"))?;
    records
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .ok_or_else(|| AppError::record_not_found(id))
}

pub(crate) async fn save_record_impl(
    state: State<'_, AppState>,
    form: Record,
    is_edit: bool,
) -> Result<SaveResult, AppError> {
    validation::validate_submission(&form)?;

    // One save in flight at a time; the UI disables the affordance while
    // submitting but the guard holds regardless.
    if state.submitting.swap(true, Ordering::SeqCst) {
        return Err(AppError::save_in_progress());
    }
    let result = save_record_inner(&state, form, is_edit).await;
    state.submitting.store(false, Ordering::SeqCst);
    result
}

async fn save_record_inner(
    state: &State<'_, AppState>,
    form: Record,
    is_edit: bool,
) -> Result<SaveResult, AppError> {
    let client = state.sync.read().clone();

    let mut record = flows::prepare_record(form, is_edit, Utc::now());
    let warning = flows::push_remote(client.as_ref(), &mut record).await;

    // Locks are taken only for the synchronous local leg, after the await
    let outcome = {
        let mut records = state
            .records
            .lock()
            .map_err(|_| AppError::lock_failed("record list"))?;
        let store_lock = state
            .store
            .lock()
            .map_err(|_| AppError::lock_failed("record store"))?;
        let record_store = store_lock.as_ref().ok_or_else(AppError::db_not_initialized)?;
        flows::finalize_save(record, warning, &mut records, record_store)
    };

    Ok(outcome.into())
}

pub(crate) fn export_records_impl(
    state: State<'_, AppState>,
    output_dir: String,
) -> Result<ExportSummary, AppError> {
    let records = state
        .records
        .lock()
        .map_err(|_| AppError::lock_failed("record list"))?
        .clone();

    let summary = exports::export_records(
        &records,
        &PathBuf::from(output_dir),
        Utc::now().date_naive(),
    )?;
    tracing::info!(rows = summary.rows, path = %summary.path, "exported record list");
    Ok(summary)
}
