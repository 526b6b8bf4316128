//! Adaptive selection store.
//!
//! Remembers which candidate *type* the user picked for a given query prefix
//! and turns that history into a small bonus on later queries sharing the
//! prefix. The on-disk shape is a plain JSON object:
//!
//! ```json
//! { "wea": { "ai": 5, "google": 1 } }
//! ```
//!
//! Persistence is best-effort: a missing or corrupt file loads as an empty
//! store, and failed writes are logged while the in-memory update stands.
//!
//! When the prefix cap is reached, the least recently recorded bucket is
//! evicted. Buckets not recorded since load are older than any recorded
//! one; among those the smallest total goes first.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AdaptiveConfig;
use crate::core::candidate::Candidate;
use crate::error::{RankError, RankResult};

/// Prefix -> candidate type -> selection count.
pub type SelectionCounts = BTreeMap<String, BTreeMap<String, u64>>;

/// Per-prefix selection memory with optional file persistence.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveStore {
    buckets: SelectionCounts,
    /// Prefix -> sequence number of its latest recorded selection.
    touched: HashMap<String, u64>,
    clock: u64,
    path: Option<PathBuf>,
    config: AdaptiveConfig,
}

impl AdaptiveStore {
    /// Create an empty store that never touches disk.
    pub fn in_memory(config: AdaptiveConfig) -> Self {
        Self {
            buckets: SelectionCounts::new(),
            touched: HashMap::new(),
            clock: 0,
            path: None,
            config,
        }
    }

    /// Open the store at `path`, failing on unreadable or corrupt data.
    ///
    /// A missing file is not an error; it yields an empty store that will be
    /// created on the first save.
    pub fn open(path: impl Into<PathBuf>, config: AdaptiveConfig) -> RankResult<Self> {
        let path = path.into();

        let buckets = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            SelectionCounts::new()
        };

        Ok(Self {
            buckets,
            touched: HashMap::new(),
            clock: 0,
            path: Some(path),
            config,
        })
    }

    /// Load the store at `path`, falling back to an empty store if the data
    /// is missing or corrupt.
    pub fn load(path: Option<PathBuf>, config: AdaptiveConfig) -> Self {
        let Some(path) = path else {
            return Self::in_memory(config);
        };

        match Self::open(&path, config.clone()) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Adaptive store unreadable, starting empty");
                Self {
                    path: Some(path),
                    ..Self::in_memory(config)
                }
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Lowercase leading characters of the trimmed query used as bucket key.
    pub fn prefix(&self, query: &str) -> String {
        query
            .trim()
            .to_lowercase()
            .chars()
            .take(self.config.prefix_len)
            .collect()
    }

    /// Record that `candidate` was picked for `query`, then persist.
    pub fn record_selection(&mut self, candidate: &Candidate, query: &str) {
        let prefix = self.prefix(query);
        if prefix.is_empty() {
            tracing::debug!("Ignoring selection for blank query");
            return;
        }

        self.increment(prefix, candidate.type_name());

        if let Err(e) = self.save() {
            tracing::warn!(error = %e, "Failed to persist adaptive store");
        }
    }

    fn increment(&mut self, prefix: String, type_name: &str) {
        if !self.buckets.contains_key(&prefix) {
            self.evict_for_new_prefix();
        }

        self.clock += 1;
        self.touched.insert(prefix.clone(), self.clock);

        let count = self
            .buckets
            .entry(prefix)
            .or_default()
            .entry(type_name.to_string())
            .or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Drop the least recently recorded bucket when a new prefix would
    /// exceed the cap.
    fn evict_for_new_prefix(&mut self) {
        let cap = self.config.max_prefixes;
        if cap == 0 || self.buckets.len() < cap {
            return;
        }

        let victim = self
            .buckets
            .iter()
            .min_by_key(|(prefix, counts)| {
                let touched = self.touched.get(*prefix).copied().unwrap_or(0);
                (touched, bucket_total(counts))
            })
            .map(|(prefix, _)| prefix.clone());

        if let Some(prefix) = victim {
            tracing::debug!(prefix = %prefix, "Evicting adaptive bucket");
            self.buckets.remove(&prefix);
            self.touched.remove(&prefix);
        }
    }

    /// Bonus for `candidate` on `query`, scaled so the most picked type for
    /// the prefix gets the full `max_bonus`.
    pub fn bonus(&self, candidate: &Candidate, query: &str) -> f64 {
        let prefix = self.prefix(query);
        let Some(bucket) = self.buckets.get(&prefix) else {
            return 0.0;
        };

        let max = bucket.values().copied().max().unwrap_or(0);
        if max == 0 {
            return 0.0;
        }

        let count = bucket.get(candidate.type_name()).copied().unwrap_or(0);
        let bonus = count as f64 / max as f64 * self.config.max_bonus;
        bonus.min(self.config.max_bonus)
    }

    /// Count recorded for one prefix/type pair.
    pub fn count(&self, prefix: &str, type_name: &str) -> u64 {
        self.buckets
            .get(prefix)
            .and_then(|b| b.get(type_name))
            .copied()
            .unwrap_or(0)
    }

    pub fn counts(&self) -> &SelectionCounts {
        &self.buckets
    }

    /// Write the store to disk via a temp file and rename.
    pub fn save(&self) -> RankResult<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.buckets)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path).map_err(|e| {
            RankError::Storage(format!("rename {} failed: {}", tmp.display(), e))
        })?;

        Ok(())
    }

    /// Get the number of tracked prefixes.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if there are no tracked prefixes.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Get usage statistics for debugging.
    pub fn stats(&self) -> AdaptiveStats {
        let mut total = 0u64;
        let mut by_type: BTreeMap<String, u64> = BTreeMap::new();

        for bucket in self.buckets.values() {
            for (type_name, &count) in bucket {
                total = total.saturating_add(count);
                let entry = by_type.entry(type_name.clone()).or_insert(0);
                *entry = entry.saturating_add(count);
            }
        }

        AdaptiveStats {
            prefixes: self.buckets.len(),
            total_selections: total,
            selections_by_type: by_type,
        }
    }
}

fn bucket_total(counts: &BTreeMap<String, u64>) -> u64 {
    counts.values().fold(0u64, |acc, &c| acc.saturating_add(c))
}

/// Statistics about adaptive selection data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveStats {
    pub prefixes: usize,
    pub total_selections: u64,
    pub selections_by_type: BTreeMap<String, u64>,
}
