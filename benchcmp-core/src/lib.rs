//! Compare several test runs of one testset against a baseline run
//!
//! The pipeline is linear: [`run::load_runs`] reads the result files,
//! [`reconcile::reconcile`] keeps the instances every setting solved,
//! [`factor::compute_factors`] and [`statistics::aggregate`] derive the
//! numbers, and [`table::render_report`] lays them out.

pub mod config;
pub mod error;
pub mod factor;
pub mod naming;
pub mod reconcile;
pub mod record;
pub mod run;
pub mod statistics;
pub mod table;

pub use config::{BenchcmpConfig, CompareConfig, MetricSpec};
pub use error::CompareError;
pub use factor::FactorTable;
pub use reconcile::{Exclusion, ExclusionReason, IgnoreSet, Reconciliation};
pub use record::{InstanceResult, MetricValue};
pub use run::{load_runs, Run};
pub use statistics::{GeoMeanAccumulator, Summary};
pub use table::{render_report, TableLayout};

/// Everything needed to print one comparison
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Loaded runs, baseline first
    pub runs: Vec<Run>,
    pub metrics: Vec<MetricSpec>,
    pub reconciliation: Reconciliation,
    pub factors: FactorTable,
    pub summary: Summary,
    pub layout: TableLayout,
}

impl Comparison {
    /// Reconcile the runs and compute factors, aggregates and column widths
    pub fn build(
        runs: Vec<Run>,
        ignore: &IgnoreSet,
        metrics: &[MetricSpec],
    ) -> Result<Self, CompareError> {
        let reconciliation = reconcile::reconcile(&runs, ignore);
        let instances = &reconciliation.instances;

        let factors = factor::compute_factors(&runs, instances, metrics)?;
        let summary = statistics::aggregate(&runs, instances, metrics)?;
        let layout = TableLayout::compute(&runs, instances, metrics)?;

        log::debug!(
            "comparing {} instances across {} settings ({} excluded)",
            instances.len(),
            runs.len(),
            reconciliation.excluded.len()
        );

        Ok(Self {
            runs,
            metrics: metrics.to_vec(),
            reconciliation,
            factors,
            summary,
            layout,
        })
    }

    pub fn baseline(&self) -> Option<&Run> {
        self.runs.first()
    }

    /// Every run except the baseline
    pub fn others(&self) -> &[Run] {
        self.runs.get(1..).unwrap_or(&[])
    }

    /// Load the files and compare them in one go
    pub fn from_files<P: AsRef<std::path::Path>>(
        paths: &[P],
        config: &CompareConfig,
    ) -> Result<Self, CompareError> {
        let runs = load_runs(paths, config)?;
        let ignore: IgnoreSet = config.ignore.iter().cloned().collect();
        Self::build(runs, &ignore, &config.resolved_metrics())
    }
}
