use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::source::{MetaSource, TableMeta};

/// Immutable view of the friendly-name mapping. Replaced whole, never edited.
#[derive(Debug, Clone, Default)]
pub struct MetaSnapshot {
    tables: HashMap<String, String>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl MetaSnapshot {
    /// Keys are lowercased; if two titles collide the first one wins.
    pub fn from_tables(tables: Vec<TableMeta>, refreshed_at: DateTime<Utc>) -> Self {
        let mut map = HashMap::with_capacity(tables.len());
        for table in tables {
            let key = table.title.to_lowercase();
            if let Some(existing) = map.get(&key) {
                warn!(
                    name = %key,
                    kept = %existing,
                    ignored = %table.id,
                    "Duplicate table name in metadata listing"
                );
                continue;
            }
            map.insert(key, table.id);
        }

        Self {
            tables: map,
            refreshed_at: Some(refreshed_at),
        }
    }

    pub fn get(&self, friendly_name: &str) -> Option<&str> {
        self.tables.get(&friendly_name.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    pub fn tables(&self) -> &HashMap<String, String> {
        &self.tables
    }
}

/// Friendly table name → backend identifier cache.
///
/// Readers take a lock-free load of the current snapshot; `load` builds a
/// fresh snapshot off to the side and swaps the handle, so a reader sees
/// either the old mapping or the new one, never a mix.
pub struct MetaCache {
    current: ArcSwap<MetaSnapshot>,
    source: Arc<dyn MetaSource>,
}

impl MetaCache {
    /// Starts empty; call `load` before serving.
    pub fn new(source: Arc<dyn MetaSource>) -> Self {
        Self {
            current: ArcSwap::from_pointee(MetaSnapshot::default()),
            source,
        }
    }

    /// Fetches the full listing and swaps it in. Failures keep the previous mapping.
    pub async fn load(&self) {
        match self.source.fetch_tables().await {
            Ok(tables) => {
                let snapshot = MetaSnapshot::from_tables(tables, Utc::now());
                let count = snapshot.len();
                self.current.store(Arc::new(snapshot));
                info!(tables = count, "Metadata cache refreshed");
            }
            Err(e) => {
                let current = self.current.load();
                warn!(
                    error = %e,
                    stale_tables = current.len(),
                    "Metadata refresh failed, keeping previous mapping"
                );
            }
        }
    }

    /// Case-insensitive lookup; unknown names are returned unchanged.
    pub fn resolve(&self, friendly_name: &str) -> String {
        self.current
            .load()
            .get(friendly_name)
            .map(str::to_string)
            .unwrap_or_else(|| friendly_name.to_string())
    }

    /// The whole current mapping, for callers that need several consistent reads.
    pub fn snapshot(&self) -> Arc<MetaSnapshot> {
        self.current.load_full()
    }

    pub fn table_count(&self) -> usize {
        self.current.load().len()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.current.load().refreshed_at()
    }

    pub fn is_ready(&self) -> bool {
        self.refreshed_at().is_some()
    }
}
