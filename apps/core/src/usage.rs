use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Launch history keyed by application identity.
pub type UsageHistory = BTreeMap<String, UsageRecord>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    #[serde(alias = "count")]
    pub launch_count: u32,
    /// Unix epoch milliseconds.
    #[serde(alias = "lastUsed")]
    pub last_launched_at: i64,
    #[serde(alias = "name", default)]
    pub display_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("failed to read usage history {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write usage history {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode usage history: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode usage history: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Durable home of the usage mapping. `load` reports an absent store as an
/// empty history, not an error.
pub trait UsageStore {
    fn load(&self) -> Result<UsageHistory, UsageError>;
    fn save(&self, history: &UsageHistory) -> Result<(), UsageError>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UsageStore for JsonFileStore {
    fn load(&self) -> Result<UsageHistory, UsageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(UsageHistory::new())
            }
            Err(source) => {
                return Err(UsageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(UsageHistory::new());
        }

        let decoded: UsageHistory = serde_json::from_str(&raw).map_err(UsageError::Decode)?;
        Ok(sanitize(decoded))
    }

    fn save(&self, history: &UsageHistory) -> Result<(), UsageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| UsageError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let encoded = serde_json::to_string_pretty(history).map_err(UsageError::Encode)?;
        std::fs::write(&self.path, encoded).map_err(|source| UsageError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-process store. Clones share the same backing map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Rc<RefCell<UsageHistory>>,
}

impl MemoryStore {
    pub fn with_history(history: UsageHistory) -> Self {
        Self {
            saved: Rc::new(RefCell::new(history)),
        }
    }

    pub fn snapshot(&self) -> UsageHistory {
        self.saved.borrow().clone()
    }
}

impl UsageStore for MemoryStore {
    fn load(&self) -> Result<UsageHistory, UsageError> {
        Ok(self.saved.borrow().clone())
    }

    fn save(&self, history: &UsageHistory) -> Result<(), UsageError> {
        *self.saved.borrow_mut() = history.clone();
        Ok(())
    }
}

/// Reads persisted usage, degrading to an empty history on any failure.
pub fn load(store: &dyn UsageStore) -> UsageHistory {
    match store.load() {
        Ok(history) => history,
        Err(error) => {
            warn!("usage history unavailable, starting empty: {error}");
            UsageHistory::new()
        }
    }
}

pub struct UsageTracker {
    store: Box<dyn UsageStore>,
    history: UsageHistory,
}

impl UsageTracker {
    pub fn open(store: Box<dyn UsageStore>) -> Self {
        let history = load(store.as_ref());
        debug!("usage history loaded entries={}", history.len());
        Self { store, history }
    }

    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStore::default()))
    }

    pub fn history(&self) -> &UsageHistory {
        &self.history
    }

    pub fn get(&self, identity: &str) -> Option<&UsageRecord> {
        self.history.get(identity)
    }

    pub fn launch_count(&self, identity: &str) -> u32 {
        self.get(identity).map_or(0, |record| record.launch_count)
    }

    /// Records a launch stamped with the current time and writes the mapping
    /// through to the store. Returns the new launch count.
    pub fn record_launch(&mut self, identity: &str, display_name: &str) -> u32 {
        self.record_launch_at(identity, display_name, now_epoch_millis())
    }

    pub fn record_launch_at(&mut self, identity: &str, display_name: &str, now_millis: i64) -> u32 {
        if identity.is_empty() {
            debug!("ignoring launch with empty identity");
            return 0;
        }

        let record = self
            .history
            .entry(identity.to_string())
            .and_modify(|record| {
                record.launch_count = record.launch_count.saturating_add(1);
                record.last_launched_at = now_millis;
                record.display_name = display_name.to_string();
            })
            .or_insert_with(|| UsageRecord {
                launch_count: 1,
                last_launched_at: now_millis,
                display_name: display_name.to_string(),
            });
        let count = record.launch_count;

        if let Err(error) = self.persist() {
            warn!("usage history not persisted for '{identity}': {error}");
        }
        count
    }

    pub fn persist(&self) -> Result<(), UsageError> {
        self.store.save(&self.history)
    }

    /// Identities ordered by launch count, most launched first.
    pub fn top_n(&self, n: usize) -> Vec<String> {
        let mut ranked: Vec<(&String, &UsageRecord)> = self.history.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.launch_count
                .cmp(&a.1.launch_count)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked
            .into_iter()
            .take(n)
            .map(|(identity, _)| identity.clone())
            .collect()
    }

    /// Identities ordered by last launch, newest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        let mut ranked: Vec<(&String, &UsageRecord)> = self.history.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.last_launched_at
                .cmp(&a.1.last_launched_at)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked
            .into_iter()
            .take(n)
            .map(|(identity, _)| identity.clone())
            .collect()
    }
}

fn sanitize(mut history: UsageHistory) -> UsageHistory {
    history.retain(|identity, _| !identity.is_empty());
    for record in history.values_mut() {
        record.launch_count = record.launch_count.max(1);
    }
    history
}

fn now_epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
