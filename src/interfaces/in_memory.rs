//! In-memory collaborators standing in for Google
//!
//! `new()` keeps every write so tests can inspect it. `serve --dry-run` uses
//! `logging_only()`, which logs each write and keeps nothing. Failures can be
//! switched on to exercise error paths.
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use super::firestore::{DocValue, Document, DocumentPath, DocumentStore, StoreError};
use super::sheets::{SheetAppender, SheetsError, SpreadsheetApi};

const SIMULATED_FAILURE_STATUS: u16 = 503;

#[derive(Default)]
struct SheetsLog {
    recording: bool,
    rows: Mutex<Vec<(String, Vec<Value>)>>,
    failing: Mutex<HashSet<String>>,
}

pub struct InMemorySheets {
    log: Arc<SheetsLog>,
    fail_authorize: AtomicBool,
    authorizations: AtomicUsize,
}

impl InMemorySheets {
    /// Keeps every appended row
    pub fn new() -> Self {
        Self::with_recording(true)
    }

    pub fn logging_only() -> Self {
        Self::with_recording(false)
    }

    fn with_recording(recording: bool) -> Self {
        InMemorySheets {
            log: Arc::new(SheetsLog {
                recording,
                ..Default::default()
            }),
            fail_authorize: AtomicBool::new(false),
            authorizations: AtomicUsize::new(0),
        }
    }

    pub fn set_fail_authorize(&self, fail: bool) {
        self.fail_authorize.store(fail, Ordering::SeqCst);
    }

    pub fn fail_sheet(&self, spreadsheet_id: &str) {
        lock(&self.log.failing).insert(spreadsheet_id.to_string());
    }

    pub fn authorizations(&self) -> usize {
        self.authorizations.load(Ordering::SeqCst)
    }

    pub fn rows(&self, spreadsheet_id: &str) -> Vec<Vec<Value>> {
        lock(&self.log.rows)
            .iter()
            .filter(|(id, _)| id == spreadsheet_id)
            .map(|(_, row)| row.clone())
            .collect()
    }
}

impl SpreadsheetApi for InMemorySheets {
    fn authorize(&self) -> Result<Arc<dyn SheetAppender>, SheetsError> {
        self.authorizations.fetch_add(1, Ordering::SeqCst);
        if self.fail_authorize.load(Ordering::SeqCst) {
            return Err(SheetsError::Request(ureq::Error::StatusCode(
                SIMULATED_FAILURE_STATUS,
            )));
        }
        Ok(Arc::new(InMemorySheetSession {
            log: self.log.clone(),
        }))
    }
}

struct InMemorySheetSession {
    log: Arc<SheetsLog>,
}

impl SheetAppender for InMemorySheetSession {
    fn append_row(&self, spreadsheet_id: &str, row: &[Value]) -> Result<(), SheetsError> {
        if lock(&self.log.failing).contains(spreadsheet_id) {
            return Err(SheetsError::Request(ureq::Error::StatusCode(
                SIMULATED_FAILURE_STATUS,
            )));
        }
        log::info!("[dry-run] {} <- {:?}", spreadsheet_id, row);
        if self.log.recording {
            lock(&self.log.rows).push((spreadsheet_id.to_string(), row.to_vec()));
        }
        Ok(())
    }
}

pub struct InMemoryStore {
    recording: bool,
    merges: Mutex<Vec<(DocumentPath, Document)>>,
    documents: Mutex<BTreeMap<String, Document>>,
    fail: AtomicBool,
}

impl InMemoryStore {
    /// Keeps every merge and the merged documents
    pub fn new() -> Self {
        Self::with_recording(true)
    }

    pub fn logging_only() -> Self {
        Self::with_recording(false)
    }

    fn with_recording(recording: bool) -> Self {
        InMemoryStore {
            recording,
            merges: Mutex::new(Vec::new()),
            documents: Mutex::new(BTreeMap::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Every merge issued against `path`, in order
    pub fn merges_to(&self, path: &DocumentPath) -> Vec<Document> {
        lock(&self.merges)
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    pub fn merge_count(&self) -> usize {
        lock(&self.merges).len()
    }

    /// Current content of the document after all merges
    pub fn document(&self, path: &DocumentPath) -> Option<Document> {
        lock(&self.documents).get(&path.to_string()).cloned()
    }
}

impl DocumentStore for InMemoryStore {
    fn merge(&self, path: &DocumentPath, fields: &Document) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Request(ureq::Error::StatusCode(
                SIMULATED_FAILURE_STATUS,
            )));
        }
        log::info!("[dry-run] {} <- {} field(s)", path, fields.len());
        if !self.recording {
            return Ok(());
        }
        lock(&self.merges).push((path.clone(), fields.clone()));
        let mut documents = lock(&self.documents);
        deep_merge(documents.entry(path.to_string()).or_default(), fields);
        Ok(())
    }
}

fn deep_merge(target: &mut Document, fields: &Document) {
    for (name, value) in fields {
        let merged = match (target.get_mut(name), value) {
            (Some(DocValue::Map(existing)), DocValue::Map(incoming)) => {
                deep_merge(existing, incoming);
                true
            }
            _ => false,
        };
        if !merged {
            target.insert(name.clone(), value.clone());
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
