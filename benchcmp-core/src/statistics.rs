//! Aggregate statistics over the compared instances
//!
//! Sums and (shifted) geometric means are maintained incrementally while the
//! instances are walked in sorted order, one update per instance.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::MetricSpec;
use crate::error::CompareError;
use crate::factor::metric_value;
use crate::record::MetricValue;
use crate::run::Run;

/// Substitute for a zero shift, keeping the base of the power positive
pub const ZERO_SHIFT_EPSILON: f64 = 1e-7;

/// Fold one more value into a running geometric mean
///
/// `count` is the number of values already folded in; the result is
/// `mean^(count/(count+1)) * (value+shift)^(1/(count+1))`.
pub fn update_geo_mean(mean: f64, count: usize, value: f64, shift: f64) -> f64 {
    debug_assert!(mean > 0.0, "geometric mean accumulator must stay positive");
    let shift = if shift == 0.0 { ZERO_SHIFT_EPSILON } else { shift };
    let next = (count + 1) as f64;
    mean.powf(count as f64 / next) * (value + shift).powf(1.0 / next)
}

/// Running sum, geometric mean and shifted geometric mean of one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoMeanAccumulator {
    pub count: usize,
    pub sum: MetricValue,
    pub geo_mean: f64,
    pub shifted_geo_mean: f64,
    shift: f64,
}

impl GeoMeanAccumulator {
    pub fn new(shift: f64) -> Self {
        Self {
            count: 0,
            sum: MetricValue::default(),
            geo_mean: 1.0,
            shifted_geo_mean: 1.0,
            shift,
        }
    }

    pub fn push(&mut self, value: MetricValue) {
        let v = value.as_f64();
        self.sum = self.sum + value;
        // the plain mean goes through the same update with a zero shift
        self.geo_mean = update_geo_mean(self.geo_mean, self.count, v, 0.0);
        self.shifted_geo_mean = update_geo_mean(self.shifted_geo_mean, self.count, v, self.shift);
        self.count += 1;
    }

    pub fn shift(&self) -> f64 {
        self.shift
    }
}

/// Aggregates indexed by metric, then setting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    aggregates: BTreeMap<String, BTreeMap<String, GeoMeanAccumulator>>,
}

impl Summary {
    pub fn get(&self, metric: &str, setting: &str) -> Option<&GeoMeanAccumulator> {
        self.aggregates.get(metric)?.get(setting)
    }
}

/// Aggregate every metric of every run over `instances`
pub fn aggregate(
    runs: &[Run],
    instances: &BTreeSet<String>,
    metrics: &[MetricSpec],
) -> Result<Summary, CompareError> {
    let mut summary = Summary::default();

    for (index, spec) in metrics.iter().enumerate() {
        let per_setting = summary.aggregates.entry(spec.name.clone()).or_default();
        for run in runs {
            let mut acc = GeoMeanAccumulator::new(spec.shift_at(index));
            for instance in instances {
                acc.push(metric_value(run, instance, &spec.name)?);
            }
            per_setting.insert(run.setting.clone(), acc);
        }
    }

    Ok(summary)
}
