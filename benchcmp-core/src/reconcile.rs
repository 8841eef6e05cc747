//! Aligning the instance sets of all runs
//!
//! Only instances solved by every setting are compared. An instance drops out
//! when some setting lacks it, aborted on it, or when it is ignored by name.

use std::collections::BTreeSet;
use std::fmt;

use crate::run::Run;

/// Instance names excluded from the comparison on request
pub type IgnoreSet = BTreeSet<String>;

/// Why an instance left the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    Missing,
    Aborted,
    Ignored,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExclusionReason::Missing => "missing",
            ExclusionReason::Aborted => "aborted",
            ExclusionReason::Ignored => "ignored",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub instance: String,
    /// Setting whose pass removed the instance
    pub setting: String,
    pub reason: ExclusionReason,
}

/// Common instance set plus the exclusions, in removal order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub instances: BTreeSet<String>,
    pub excluded: Vec<Exclusion>,
}

/// Reconcile starting from every instance of the baseline (first) run
pub fn reconcile(runs: &[Run], ignore: &IgnoreSet) -> Reconciliation {
    let candidates = runs
        .first()
        .map(|baseline| baseline.results.keys().cloned().collect())
        .unwrap_or_default();
    reconcile_within(runs, &candidates, ignore)
}

/// Reconcile a given candidate set against all runs
///
/// Settings are visited in load order, candidates in sorted order. An
/// instance is reported once, by the first setting that removes it.
pub fn reconcile_within(
    runs: &[Run],
    candidates: &BTreeSet<String>,
    ignore: &IgnoreSet,
) -> Reconciliation {
    let mut instances = candidates.clone();
    let mut excluded = Vec::new();

    for run in runs {
        let removed: Vec<(String, ExclusionReason)> = instances
            .iter()
            .filter_map(|instance| {
                exclusion_reason(run, instance, ignore).map(|reason| (instance.clone(), reason))
            })
            .collect();

        for (instance, reason) in removed {
            log::info!(
                "excluding instance '{}' ({} in setting '{}')",
                instance,
                reason,
                run.setting
            );
            instances.remove(&instance);
            excluded.push(Exclusion {
                instance,
                setting: run.setting.clone(),
                reason,
            });
        }
    }

    Reconciliation {
        instances,
        excluded,
    }
}

fn exclusion_reason(run: &Run, instance: &str, ignore: &IgnoreSet) -> Option<ExclusionReason> {
    match run.get(instance) {
        None => Some(ExclusionReason::Missing),
        Some(record) if record.is_aborted() => Some(ExclusionReason::Aborted),
        Some(_) if ignore.contains(instance) => Some(ExclusionReason::Ignored),
        Some(_) => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::naming::RunName;
    use crate::record::{InstanceResult, MetricValue};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    pub(crate) fn record(status: &str, solvetime: MetricValue, iters: MetricValue) -> InstanceResult {
        InstanceResult {
            status: status.to_string(),
            hash: "h".to_string(),
            metrics: BTreeMap::from([
                ("solvetime".to_string(), solvetime),
                ("iters".to_string(), iters),
            ]),
            extra: BTreeMap::new(),
        }
    }

    pub(crate) fn run(setting: &str, records: Vec<(&str, InstanceResult)>) -> Run {
        Run {
            path: PathBuf::from(format!("check.X.{setting}.json")),
            name: RunName {
                testset: "X".to_string(),
                setting: setting.to_string(),
                version: "1.0".to_string(),
                opt: "opt".to_string(),
            },
            setting: setting.to_string(),
            hash: "h".to_string(),
            results: records
                .into_iter()
                .map(|(name, record)| (name.to_string(), record))
                .collect(),
        }
    }

    fn ok() -> InstanceResult {
        record("ok", MetricValue::Int(1), MetricValue::Int(1))
    }

    fn names(reconciliation: &Reconciliation) -> Vec<&str> {
        reconciliation.instances.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_all_present() {
        let runs = vec![
            run("A", vec![("b", ok()), ("a", ok())]),
            run("B", vec![("a", ok()), ("b", ok())]),
        ];
        let result = reconcile(&runs, &IgnoreSet::new());
        assert_eq!(names(&result), vec!["a", "b"]);
        assert!(result.excluded.is_empty());
    }

    #[test]
    fn test_abort_in_any_setting_excludes() {
        let aborted = record("abort", MetricValue::Int(0), MetricValue::Int(0));
        let runs = vec![
            run("A", vec![("a", ok()), ("b", ok())]),
            run("B", vec![("a", ok()), ("b", aborted)]),
        ];
        let result = reconcile(&runs, &IgnoreSet::new());

        assert_eq!(names(&result), vec!["a"]);
        assert_eq!(
            result.excluded,
            vec![Exclusion {
                instance: "b".to_string(),
                setting: "B".to_string(),
                reason: ExclusionReason::Aborted,
            }]
        );
    }

    #[test]
    fn test_missing_and_ignored_reported_once_in_removal_order() {
        let runs = vec![
            run("A", vec![("a", ok()), ("b", ok()), ("c", ok())]),
            run("B", vec![("b", ok())]),
            run("C", vec![("b", ok())]),
        ];
        let ignore = IgnoreSet::from(["b".to_string()]);
        let result = reconcile(&runs, &ignore);

        assert!(result.instances.is_empty());
        let reported: Vec<(&str, &str, ExclusionReason)> = result
            .excluded
            .iter()
            .map(|e| (e.instance.as_str(), e.setting.as_str(), e.reason))
            .collect();
        assert_eq!(
            reported,
            vec![
                ("b", "A", ExclusionReason::Ignored),
                ("a", "B", ExclusionReason::Missing),
                ("c", "B", ExclusionReason::Missing),
            ]
        );
    }

    #[test]
    fn test_instances_only_in_other_settings_are_not_compared() {
        let runs = vec![
            run("A", vec![("a", ok())]),
            run("B", vec![("a", ok()), ("extra", ok())]),
        ];
        let result = reconcile(&runs, &IgnoreSet::new());
        assert_eq!(names(&result), vec!["a"]);
        assert!(result.excluded.is_empty());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let aborted = record("abort", MetricValue::Int(0), MetricValue::Int(0));
        let runs = vec![
            run("A", vec![("a", ok()), ("b", ok()), ("c", ok())]),
            run("B", vec![("a", ok()), ("c", aborted)]),
        ];
        let ignore = IgnoreSet::from(["a".to_string()]);

        let first = reconcile(&runs, &ignore);
        let second = reconcile_within(&runs, &first.instances, &ignore);

        assert_eq!(second.instances, first.instances);
        assert!(second.excluded.is_empty());
    }

    #[test]
    fn test_no_runs() {
        let result = reconcile(&[], &IgnoreSet::new());
        assert_eq!(result, Reconciliation::default());
    }
}
