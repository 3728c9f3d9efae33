use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Settings;
use crate::data_mgmt::LatestValues;
use crate::interfaces::firestore::DocumentStore;
use crate::interfaces::sheets::SpreadsheetApi;

use super::gate::SaveGate;

/// Where readings end up
#[derive(Clone, Debug)]
pub struct Targets {
    pub sheet_id: String,
    pub sheet_raw_id: String,
    pub account: String,
}

impl From<&Settings> for Targets {
    fn from(settings: &Settings) -> Self {
        Targets {
            sheet_id: settings.sheet_id.clone(),
            sheet_raw_id: settings.sheet_raw_id.clone(),
            account: settings.account.clone(),
        }
    }
}

/// State shared by the HTTP handlers and the scheduled tasks
pub struct AppContext {
    pub targets: Targets,
    pub sheets: Arc<dyn SpreadsheetApi>,
    pub store: Arc<dyn DocumentStore>,
    pub latest: RwLock<LatestValues>,
    pub save_gate: SaveGate,
    /// Consecutive successful saves; reset on a failed request
    pub saved_count: AtomicU64,
}

pub type SharedContext = Arc<AppContext>;

impl AppContext {
    pub fn new(
        targets: Targets,
        sheets: Arc<dyn SpreadsheetApi>,
        store: Arc<dyn DocumentStore>,
    ) -> SharedContext {
        Arc::new(AppContext {
            targets,
            sheets,
            store,
            latest: RwLock::new(LatestValues::default()),
            save_gate: SaveGate::default(),
            saved_count: AtomicU64::new(0),
        })
    }
}
