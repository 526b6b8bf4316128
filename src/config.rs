use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RankResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ranking: RankingConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the adaptive store location.
    pub adaptive_path: Option<PathBuf>,
}

/// Every tunable constant used by the ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub max_results: usize,
    pub weights: CategoryWeights,
    pub matching: MatchConfig,
    pub intent: IntentConfig,
    pub frecency: FrecencyConfig,
    pub boosts: BoostConfig,
    pub adaptive: AdaptiveConfig,
    /// Bonus per browser visit transition type. Not read by the scorer yet.
    pub visit_type_bonus: BTreeMap<String, f64>,
}

/// Base weight per candidate category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub quick_answer: f64,
    pub app_search: f64,
    pub navigation: f64,
    pub google: f64,
    pub pinned_tab: f64,
    pub ai: f64,
    pub tab: f64,
    pub history: f64,
    pub bookmark: f64,
    pub suggestion: f64,
    pub remote: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Fuzzy similarity for an exact match.
    pub exact: f64,
    /// Fuzzy similarity when the text starts with the query.
    pub prefix: f64,
    /// Fuzzy similarity when the text contains the query.
    pub contains: f64,
    /// Strict tab similarity for a prefix match.
    pub tab_prefix: f64,
    /// Candidates at or below this fuzzy similarity are dropped.
    pub prefilter_threshold: f64,
    pub fuzzy_weight: f64,
    pub overlap_weight: f64,
    pub tab_scale: f64,
    pub navigation_scale: f64,
    pub autofill_match: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    pub question_bonus: f64,
    pub question_min_words: usize,
    pub question_min_chars: usize,
    pub ai: f64,
    pub calc: f64,
    pub convert: f64,
    pub time: f64,
    pub setting: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrecencyConfig {
    pub half_life_days: f64,
    /// Multiplier applied to a navigation candidate's visit count.
    pub navigation_visit_weight: f64,
    /// Multiplier applied to a history/bookmark candidate's frequency.
    pub page_freq_weight: f64,
    pub recent_visit_bonus: f64,
    pub recent_visit_window_hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    pub rich_result: f64,
    pub pinned: f64,
    pub open_domain: f64,
    pub recently_visited: f64,
    pub recently_searched: f64,
    pub autofill_priority: f64,
    pub remote_rank_penalty: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    pub prefix_len: usize,
    pub max_bonus: f64,
    /// Maximum number of prefix buckets kept; 0 disables eviction.
    pub max_prefixes: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            weights: CategoryWeights::default(),
            matching: MatchConfig::default(),
            intent: IntentConfig::default(),
            frecency: FrecencyConfig::default(),
            boosts: BoostConfig::default(),
            adaptive: AdaptiveConfig::default(),
            visit_type_bonus: default_visit_type_bonus(),
        }
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            quick_answer: 12000.0,
            app_search: 10000.0,
            navigation: 9800.0,
            google: 9700.0,
            pinned_tab: 9600.0,
            ai: 9500.0,
            tab: 9400.0,
            history: 8500.0,
            bookmark: 8400.0,
            suggestion: 6000.0,
            remote: 2500.0,
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            exact: 1.0,
            prefix: 0.9,
            contains: 0.7,
            tab_prefix: 0.95,
            prefilter_threshold: 0.3,
            fuzzy_weight: 400.0,
            overlap_weight: 200.0,
            tab_scale: 1200.0,
            navigation_scale: 1000.0,
            autofill_match: 20000.0,
        }
    }
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            question_bonus: 3000.0,
            question_min_words: 7,
            question_min_chars: 40,
            ai: 2000.0,
            calc: 350.0,
            convert: 300.0,
            time: 250.0,
            setting: 250.0,
        }
    }
}

impl Default for FrecencyConfig {
    fn default() -> Self {
        Self {
            half_life_days: 30.0,
            navigation_visit_weight: 10.0,
            page_freq_weight: 100.0,
            recent_visit_bonus: 500.0,
            recent_visit_window_hours: 24.0,
        }
    }
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            rich_result: 500.0,
            pinned: 1000.0,
            open_domain: 1200.0,
            recently_visited: 1800.0,
            recently_searched: 900.0,
            autofill_priority: 50000.0,
            remote_rank_penalty: 10.0,
        }
    }
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            prefix_len: 3,
            max_bonus: 300.0,
            max_prefixes: 5000,
        }
    }
}

fn default_visit_type_bonus() -> BTreeMap<String, f64> {
    [
        ("typed", 2000.0),
        ("link", 100.0),
        ("auto_bookmark", 75.0),
        ("generated", 0.0),
        ("reload", 0.0),
        ("form_submit", 0.0),
        ("keyword", 0.0),
        ("auto_toplevel", 0.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

impl RankingConfig {
    /// Clamp values into ranges the scorer can work with.
    pub fn validate(&mut self) {
        self.max_results = self.max_results.clamp(1, 50);

        // Decay constant is ln2 / half-life
        if self.frecency.half_life_days.is_nan() || self.frecency.half_life_days < 0.1 {
            self.frecency.half_life_days = 0.1;
        }

        self.adaptive.prefix_len = self.adaptive.prefix_len.clamp(1, 16);
        self.adaptive.max_bonus = self.adaptive.max_bonus.max(0.0);

        self.matching.prefilter_threshold = self.matching.prefilter_threshold.clamp(0.0, 1.0);
        self.matching.exact = self.matching.exact.clamp(0.0, 1.0);
        self.matching.prefix = self.matching.prefix.clamp(0.0, 1.0);
        self.matching.contains = self.matching.contains.clamp(0.0, 1.0);
        self.matching.tab_prefix = self.matching.tab_prefix.clamp(0.0, 1.0);
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config"))
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
            })
            .join("quickrank")
            .join("config.toml")
    }

    /// Default location of the adaptive selection store.
    pub fn default_adaptive_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("quickrank").join("adaptive.json"))
    }

    /// Resolved adaptive store path (override first, then the default).
    pub fn adaptive_path(&self) -> Option<PathBuf> {
        self.storage
            .adaptive_path
            .clone()
            .or_else(Self::default_adaptive_path)
    }

    /// Load config from the default location, or return defaults if it is
    /// missing or unreadable.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> RankResult<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.ranking.validate();
        Ok(config)
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> RankResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn to_toml(&self) -> RankResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let config = RankingConfig::default();
        assert_eq!(config.max_results, 10);
        assert_eq!(config.weights.quick_answer, 12000.0);
        assert_eq!(config.weights.remote, 2500.0);
        assert_eq!(config.frecency.half_life_days, 30.0);
        assert_eq!(config.adaptive.prefix_len, 3);
        assert_eq!(config.adaptive.max_bonus, 300.0);
        assert_eq!(config.visit_type_bonus.get("typed"), Some(&2000.0));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            [ranking]
            max_results = 5

            [ranking.frecency]
            half_life_days = 7.0
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.ranking.max_results, 5);
        assert_eq!(config.ranking.frecency.half_life_days, 7.0);
        assert_eq!(config.ranking.frecency.page_freq_weight, 100.0);
        assert_eq!(config.ranking.weights.navigation, 9800.0);
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = RankingConfig::default();
        config.max_results = 0;
        config.frecency.half_life_days = -3.0;
        config.adaptive.prefix_len = 0;
        config.matching.prefilter_threshold = 4.0;
        config.validate();

        assert_eq!(config.max_results, 1);
        assert_eq!(config.frecency.half_life_days, 0.1);
        assert_eq!(config.adaptive.prefix_len, 1);
        assert_eq!(config.matching.prefilter_threshold, 1.0);
    }

    #[test]
    fn test_validate_rejects_nan_half_life() {
        let mut config = RankingConfig::default();
        config.frecency.half_life_days = f64::NAN;
        config.validate();
        assert_eq!(config.frecency.half_life_days, 0.1);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ranking.boosts.pinned = 1234.0;
        config.storage.adaptive_path = Some(dir.path().join("adaptive.json"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ranking.boosts.pinned, 1234.0);
        assert_eq!(
            loaded.adaptive_path(),
            Some(dir.path().join("adaptive.json"))
        );
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "ranking = [not toml").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
