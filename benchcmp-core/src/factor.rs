//! Speed-up and slow-down factors relative to the baseline setting

use std::collections::{BTreeMap, BTreeSet};

use crate::config::MetricSpec;
use crate::error::CompareError;
use crate::record::MetricValue;
use crate::run::Run;

/// Factors indexed by metric, then setting, then instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorTable {
    factors: BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>,
}

impl FactorTable {
    pub fn get(&self, metric: &str, setting: &str, instance: &str) -> Option<f64> {
        self.factors.get(metric)?.get(setting)?.get(instance).copied()
    }

    fn insert(&mut self, metric: &str, setting: &str, instance: &str, factor: f64) {
        self.factors
            .entry(metric.to_string())
            .or_default()
            .entry(setting.to_string())
            .or_default()
            .insert(instance.to_string(), factor);
    }
}

/// Factor of one value against the baseline value
///
/// The baseline compared with itself stores its raw value; that entry is
/// bookkeeping only and is never rendered.
pub fn factor(value: MetricValue, baseline: MetricValue, is_baseline: bool) -> f64 {
    if is_baseline {
        baseline.as_f64()
    } else if baseline.is_zero() {
        0.0
    } else {
        value.as_f64() / baseline.as_f64()
    }
}

/// Look up a metric that record validation guarantees to be present
pub(crate) fn metric_value(
    run: &Run,
    instance: &str,
    metric: &str,
) -> Result<MetricValue, CompareError> {
    run.get(instance)
        .and_then(|record| record.metric(metric))
        .ok_or_else(|| CompareError::MissingMetric {
            metric: metric.to_string(),
            setting: run.setting.clone(),
            instance: instance.to_string(),
        })
}

/// Compute factors of every setting against the first run
pub fn compute_factors(
    runs: &[Run],
    instances: &BTreeSet<String>,
    metrics: &[MetricSpec],
) -> Result<FactorTable, CompareError> {
    let mut table = FactorTable::default();
    let Some(baseline) = runs.first() else {
        return Ok(table);
    };

    for spec in metrics {
        for (index, run) in runs.iter().enumerate() {
            for instance in instances {
                let base = metric_value(baseline, instance, &spec.name)?;
                let value = metric_value(run, instance, &spec.name)?;
                table.insert(
                    &spec.name,
                    &run.setting,
                    instance,
                    factor(value, base, index == 0),
                );
            }
        }
    }

    Ok(table)
}
