//! Loading result files into runs
//!
//! Each file holds the results of one setting on one testset. All file names
//! are checked for a common testset before any file is read.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::{CompareConfig, MetricSpec};
use crate::error::CompareError;
use crate::naming::RunName;
use crate::record::InstanceResult;

/// One loaded result file
#[derive(Debug, Clone)]
pub struct Run {
    pub path: PathBuf,
    pub name: RunName,
    /// Setting name, made unique across the loaded runs
    pub setting: String,
    /// Source revision the run was built from
    pub hash: String,
    pub results: BTreeMap<String, InstanceResult>,
}

impl Run {
    pub fn get(&self, instance: &str) -> Option<&InstanceResult> {
        self.results.get(instance)
    }

    /// Label shown above this run's columns: `version-hash-setting`
    pub fn label(&self) -> String {
        [self.name.version.as_str(), self.hash.as_str(), self.setting.as_str()].join("-")
    }
}

/// Load every file in order; the first one becomes the baseline
pub fn load_runs<P: AsRef<Path>>(
    paths: &[P],
    config: &CompareConfig,
) -> Result<Vec<Run>, CompareError> {
    if paths.is_empty() {
        return Err(CompareError::NoRuns);
    }

    let names = paths
        .iter()
        .map(|path| RunName::parse(path, &config.version_prefix))
        .collect::<Result<Vec<_>, _>>()?;

    let testset = &names[0].testset;
    for (path, name) in paths.iter().zip(&names).skip(1) {
        if &name.testset != testset {
            return Err(CompareError::InconsistentTestset {
                expected: testset.clone(),
                found: name.testset.clone(),
                path: path.as_ref().to_path_buf(),
            });
        }
    }

    let metrics = config.resolved_metrics();
    let mut settings: Vec<String> = Vec::with_capacity(names.len());
    let mut runs = Vec::with_capacity(names.len());

    for (position, (path, name)) in paths.iter().zip(names).enumerate() {
        let path = path.as_ref();
        let setting = unique_setting(&name.setting, position + 1, &settings);
        settings.push(setting.clone());

        let results = load_results(path, &metrics)?;
        let hash = results
            .values()
            .next()
            .map(|record| record.hash.clone())
            .unwrap_or_default();

        log::debug!(
            "loaded setting '{}' from {} ({} instances, version '{}', opt '{}')",
            setting,
            path.display(),
            results.len(),
            name.version,
            name.opt
        );

        runs.push(Run {
            path: path.to_path_buf(),
            name,
            setting,
            hash,
            results,
        });
    }

    Ok(runs)
}

/// Append the 1-based file position to a setting name already taken
fn unique_setting(setting: &str, position: usize, taken: &[String]) -> String {
    if taken.iter().any(|s| s == setting) {
        format!("{}{}", setting, position)
    } else {
        setting.to_string()
    }
}

/// Read a result file: a JSON object mapping instance names to records
pub fn load_results(
    path: &Path,
    metrics: &[MetricSpec],
) -> Result<BTreeMap<String, InstanceResult>, CompareError> {
    let contents = fs::read_to_string(path).map_err(|source| CompareError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: Value = serde_json::from_str(&contents).map_err(|source| CompareError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Object(entries) = root else {
        return Err(CompareError::MalformedRecord {
            file: path.to_path_buf(),
            instance: String::new(),
            field: "<root>".to_string(),
        });
    };

    entries
        .into_iter()
        .map(|(instance, value)| -> Result<_, CompareError> {
            let record = InstanceResult::from_json(path, &instance, value, metrics)?;
            Ok((instance, record))
        })
        .collect()
}
