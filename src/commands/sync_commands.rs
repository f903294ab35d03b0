use crate::error::AppError;
use crate::sync::{self, SyncClient, SyncConfig};
use crate::validation;
use crate::AppState;
use tauri::State;

pub(crate) fn is_remote_configured_impl(state: State<'_, AppState>) -> Result<bool, AppError> {
    Ok(state.sync.read().is_some())
}

pub(crate) fn configure_remote_impl(
    state: State<'_, AppState>,
    base_url: String,
    api_key: String,
    allow_http: Option<bool>,
) -> Result<(), AppError> {
    validation::validate_url(&base_url)?;

    // Enforce HTTPS by default; HTTP is an explicit opt-in for local testing
    if validation::is_http_url(&base_url) && allow_http != Some(true) {
        return Err(AppError::https_required()
            .with_detail("HTTP exposes the API key in transit; pass allow_http to override"));
    }

    let base_url = base_url.trim_end_matches('/').to_string();

    let table = {
        let store_lock = state
            .store
            .lock()
            .map_err(|_| AppError::lock_failed("record store"))?;
        let record_store = store_lock.as_ref().ok_or_else(AppError::db_not_initialized)?;
        record_store.set_setting(sync::SETTING_REMOTE_BASE_URL, &base_url)?;
        record_store.set_setting(sync::SETTING_REMOTE_API_KEY, &api_key)?;
        record_store
            .get_setting(sync::SETTING_REMOTE_TABLE)?
            .unwrap_or_else(|| sync::DEFAULT_TABLE.to_string())
    };

    let config = SyncConfig {
        base_url,
        api_key,
        table,
        timeout_secs: sync::DEFAULT_TIMEOUT_SECS,
    };
    *state.sync.write() = Some(SyncClient::new(config));

    tracing::info!("remote table configured");
    Ok(())
}
