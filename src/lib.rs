//! SkinConsult - skin-consultation intake forms with local-first remote sync

pub mod commands;
pub mod error;
pub mod exports;
pub mod flows;
pub mod reconcile;
pub mod records;
pub mod store;
pub mod sync;
pub mod validation;

use crate::records::Record;
use crate::store::RecordStore;
use crate::sync::SyncClient;
use parking_lot::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::Mutex;

/// Application state
///
/// The record list is the sole source of truth for the UI after startup;
/// it is touched only by the pull-completion and save-completion paths.
pub struct AppState {
    pub store: Mutex<Option<RecordStore>>,
    pub records: Mutex<Vec<Record>>,
    pub sync: RwLock<Option<SyncClient>>,
    /// Guard: at most one save in flight
    pub submitting: AtomicBool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            store: Mutex::new(None),
            records: Mutex::new(Vec::new()),
            sync: RwLock::new(None),
            submitting: AtomicBool::new(false),
        }
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(AppState::default())
        .invoke_handler(tauri::generate_handler![
            commands::initialize_app,
            commands::list_records,
            commands::get_record,
            commands::save_record,
            commands::export_records,
            commands::is_remote_configured,
            commands::configure_remote,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
