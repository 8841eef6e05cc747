use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::CompareError;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "benchcmp.toml";

/// Shifts for the shifted geometric mean, by metric position
const DEFAULT_SHIFTS: [f64; 3] = [0.1, 10.0, 1.0];

/// A metric compared across settings, with its shift for the shifted geometric mean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub name: String,

    /// Shift added to every value (None = default for this metric)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<f64>,
}

impl MetricSpec {
    pub fn new(name: impl Into<String>, shift: f64) -> Self {
        Self {
            name: name.into(),
            shift: Some(shift),
        }
    }

    /// Shift used for this metric when it sits at position `index`
    pub fn shift_at(&self, index: usize) -> f64 {
        self.shift.unwrap_or_else(|| default_shift(&self.name, index))
    }
}

/// Default shift for a metric: known metrics by name, others by position
pub fn default_shift(name: &str, index: usize) -> f64 {
    match name {
        "solvetime" => DEFAULT_SHIFTS[0],
        "iters" => DEFAULT_SHIFTS[1],
        _ => DEFAULT_SHIFTS.get(index).copied().unwrap_or(1.0),
    }
}

pub fn default_metrics() -> Vec<MetricSpec> {
    vec![
        MetricSpec::new("solvetime", DEFAULT_SHIFTS[0]),
        MetricSpec::new("iters", DEFAULT_SHIFTS[1]),
    ]
}

fn default_version_prefix() -> String {
    "soplex-".to_string()
}

/// Settings for comparing runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Literal prefix removed from the version parsed out of file names
    #[serde(default = "default_version_prefix")]
    pub version_prefix: String,

    /// Instances always excluded from the comparison
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Metrics shown per setting, in column order
    #[serde(default = "default_metrics")]
    pub metrics: Vec<MetricSpec>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            version_prefix: default_version_prefix(),
            ignore: Vec::new(),
            metrics: default_metrics(),
        }
    }
}

impl CompareConfig {
    /// Metrics with every shift resolved
    pub fn resolved_metrics(&self) -> Vec<MetricSpec> {
        self.metrics
            .iter()
            .enumerate()
            .map(|(index, spec)| MetricSpec::new(spec.name.clone(), spec.shift_at(index)))
            .collect()
    }

    pub fn validate(&self) -> Result<(), CompareError> {
        if self.metrics.is_empty() {
            return Err(CompareError::Config("at least one metric is required".to_string()));
        }

        let mut seen = BTreeSet::new();
        for (index, spec) in self.metrics.iter().enumerate() {
            if spec.name.is_empty() {
                return Err(CompareError::Config("metric names must not be empty".to_string()));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(CompareError::Config(format!(
                    "metric '{}' listed more than once",
                    spec.name
                )));
            }
            let shift = spec.shift_at(index);
            if !shift.is_finite() || shift < 0.0 {
                return Err(CompareError::Config(format!(
                    "shift for metric '{}' must be a non-negative number, got {}",
                    spec.name, shift
                )));
            }
        }

        Ok(())
    }
}

/// Complete benchcmp configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BenchcmpConfig {
    #[serde(default)]
    pub compare: CompareConfig,
}

impl BenchcmpConfig {
    /// Load configuration with priority: env vars > config file > defaults
    ///
    /// An explicit `path` must exist; otherwise `benchcmp.toml` is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, CompareError> {
        let mut config = match path {
            Some(path) => {
                log::info!("loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                log::info!("loading configuration from {}", DEFAULT_CONFIG_FILE);
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                log::debug!("no configuration file, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        config.compare.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CompareError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CompareError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents)
            .map_err(|e| CompareError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(ignore) = std::env::var("BENCHCMP_IGNORE") {
            self.compare.ignore.extend(split_list(&ignore));
        }

        if let Ok(prefix) = std::env::var("BENCHCMP_VERSION_PREFIX") {
            self.compare.version_prefix = prefix;
        }

        if let Ok(metrics) = std::env::var("BENCHCMP_METRICS") {
            let names = split_list(&metrics);
            if !names.is_empty() {
                self.compare.metrics = names
                    .into_iter()
                    .map(|name| MetricSpec { name, shift: None })
                    .collect();
            }
        }
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CompareError> {
        let path = path.as_ref();
        let toml = toml::to_string_pretty(self).map_err(|e| CompareError::Config(e.to_string()))?;
        fs::write(path, toml).map_err(|source| CompareError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Split a comma-separated list, dropping empty entries
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
