use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_reassign_threshold() -> f64 {
    0.5
}

fn default_containment_score() -> f64 {
    0.9
}

/// Vendor name matching thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum similarity score before an unassigned transaction is
    /// reassigned to a vendor.
    pub reassign_threshold: f64,

    /// Score given when one name contains the other.
    pub containment_score: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            reassign_threshold: default_reassign_threshold(),
            containment_score: default_containment_score(),
        }
    }
}

fn default_reconcile_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// Balance reconciliation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Calculated and asserted balances must agree to strictly within this
    /// amount.
    pub tolerance: Decimal,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            tolerance: default_reconcile_tolerance(),
        }
    }
}

fn default_auto_verify_occurrences() -> u32 {
    5
}

/// Vendor lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    /// Verified-transaction count at which a vendor is auto-verified.
    pub auto_verify_occurrences: u32,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            auto_verify_occurrences: default_auto_verify_occurrences(),
        }
    }
}

fn default_amount_epsilon() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// Duplicate detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateConfig {
    /// Amounts closer than this count as equal when matching against
    /// already-imported transactions.
    pub amount_epsilon: Decimal,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            amount_epsilon: default_amount_epsilon(),
        }
    }
}

fn default_overwrite_confidence() -> f64 {
    0.85
}

/// External categorizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizerConfig {
    /// Suggestion endpoint URL. Categorization is disabled when unset.
    pub endpoint: Option<String>,

    /// Suggestions above this confidence may overwrite provisional fields;
    /// at or below it they only fill gaps.
    pub overwrite_confidence: f64,
}

impl Default for CategorizerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            overwrite_confidence: default_overwrite_confidence(),
        }
    }
}

fn default_concurrency() -> usize {
    1
}

/// Batch operation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// How many per-item operations run at once during bulk processing.
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to data directory. If relative, resolved from config file
    /// location. If not specified, defaults to the config file's directory.
    pub data_dir: Option<PathBuf>,

    /// Free-text description of the business, passed to the categorizer.
    pub business_context: Option<String>,

    pub matching: MatchingConfig,
    pub reconcile: ReconcileConfig,
    pub vendors: VendorConfig,
    pub duplicates: DuplicateConfig,
    pub categorizer: CategorizerConfig,
    pub batch: BatchConfig,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the data directory path.
    ///
    /// If `data_dir` is set and relative, it's resolved relative to
    /// `config_dir`. If `data_dir` is not set, returns `config_dir`.
    pub fn resolve_data_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.data_dir {
            Some(data_dir) if data_dir.is_absolute() => data_dir.clone(),
            Some(data_dir) => config_dir.join(data_dir),
            None => config_dir.to_path_buf(),
        }
    }
}

/// Loaded configuration with resolved paths.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The resolved data directory path.
    pub data_dir: PathBuf,

    pub business_context: Option<String>,
    pub matching: MatchingConfig,
    pub reconcile: ReconcileConfig,
    pub vendors: VendorConfig,
    pub duplicates: DuplicateConfig,
    pub categorizer: CategorizerConfig,
    pub batch: BatchConfig,
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./ledgerbook.toml` if it exists in current directory
/// 2. `~/.local/share/ledgerbook/ledgerbook.toml` (XDG data directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("ledgerbook.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("ledgerbook").join("ledgerbook.toml");
    }

    local_config
}

impl ResolvedConfig {
    fn from_config(config: Config, data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            business_context: config.business_context,
            matching: config.matching,
            reconcile: config.reconcile,
            vendors: config.vendors,
            duplicates: config.duplicates,
            categorizer: config.categorizer,
            batch: config.batch,
        }
    }

    /// Load and resolve config from a file path.
    ///
    /// The data directory is resolved relative to the config file's parent
    /// directory.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_path = config_path
            .canonicalize()
            .with_context(|| format!("Config file not found: {}", config_path.display()))?;

        let config_dir = config_path
            .parent()
            .context("Config file has no parent directory")?;

        let config = Config::load(&config_path)?;
        let data_dir = config.resolve_data_dir(config_dir);

        Ok(Self::from_config(config, data_dir))
    }

    /// Load config, creating a default if the file doesn't exist.
    ///
    /// If the config file doesn't exist, uses the config file's intended
    /// parent directory as the data directory.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            let config_path = if config_path.is_relative() {
                std::env::current_dir()
                    .context("Failed to get current directory")?
                    .join(config_path)
            } else {
                config_path.to_path_buf()
            };

            let config_dir = config_path
                .parent()
                .context("Config path has no parent directory")?;

            Ok(Self::from_config(
                Config::default(),
                config_dir.to_path_buf(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::TempDir;

    #[test]
    fn default_data_dir_is_config_dir() {
        let config = Config::default();
        let config_dir = Path::new("/home/user/books");
        assert_eq!(
            config.resolve_data_dir(config_dir),
            PathBuf::from("/home/user/books")
        );
    }

    #[test]
    fn relative_data_dir_resolves_against_config_dir() {
        let config = Config {
            data_dir: Some(PathBuf::from("data")),
            ..Default::default()
        };
        let config_dir = Path::new("/home/user/books");
        assert_eq!(
            config.resolve_data_dir(config_dir),
            PathBuf::from("/home/user/books/data")
        );
    }

    #[test]
    fn defaults_cover_every_policy_value() {
        let config = Config::default();
        assert_eq!(config.matching.reassign_threshold, 0.5);
        assert_eq!(config.matching.containment_score, 0.9);
        assert_eq!(
            config.reconcile.tolerance,
            Decimal::from_str("0.01").unwrap()
        );
        assert_eq!(config.vendors.auto_verify_occurrences, 5);
        assert_eq!(
            config.duplicates.amount_epsilon,
            Decimal::from_str("0.01").unwrap()
        );
        assert_eq!(config.categorizer.overwrite_confidence, 0.85);
        assert!(config.categorizer.endpoint.is_none());
        assert_eq!(config.batch.concurrency, 1);
    }

    #[test]
    fn load_partial_config_keeps_other_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("ledgerbook.toml");

        let mut file = std::fs::File::create(&config_path)?;
        writeln!(file, "[reconcile]")?;
        writeln!(file, "tolerance = \"0.02\"")?;
        writeln!(file, "[vendors]")?;
        writeln!(file, "auto_verify_occurrences = 3")?;

        let config = Config::load(&config_path)?;
        assert_eq!(
            config.reconcile.tolerance,
            Decimal::from_str("0.02").unwrap()
        );
        assert_eq!(config.vendors.auto_verify_occurrences, 3);
        assert_eq!(config.matching.reassign_threshold, 0.5);

        Ok(())
    }

    #[test]
    fn load_or_default_missing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("missing.toml");

        let config = Config::load_or_default(&config_path)?;
        assert_eq!(config.data_dir, None);

        Ok(())
    }

    #[test]
    fn resolved_config_uses_config_dir_for_data() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("ledgerbook.toml");

        let resolved = ResolvedConfig::load_or_default(&config_path)?;
        assert_eq!(resolved.data_dir, dir.path());

        Ok(())
    }

    #[test]
    fn resolved_config_resolves_relative_data_dir() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("ledgerbook.toml");

        let mut file = std::fs::File::create(&config_path)?;
        writeln!(file, "data_dir = \"./data\"")?;

        let resolved = ResolvedConfig::load(&config_path)?;
        assert_eq!(resolved.data_dir, dir.path().join("data"));

        Ok(())
    }
}
