//! Fixed-width comparison table
//!
//! Layout, left to right: the instance name column, the baseline block with
//! one column per metric, then per other setting a block holding the raw
//! metric values followed by one factor (`Q`) column per metric.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::config::MetricSpec;
use crate::error::CompareError;
use crate::factor::metric_value;
use crate::run::Run;
use crate::Comparison;

/// Minimum width of the instance name column, before the separator space
pub const MIN_NAME_WIDTH: usize = 16;

/// Padding added to every metric column
const COLUMN_PADDING: usize = 2;

/// Label of the trailing list of excluded instances
pub const EXCLUDED_LABEL: &str = "aborted and ignored instances:";

/// Column widths of the table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableLayout {
    pub name_width: usize,
    /// One width per metric, in metric order
    pub metric_widths: Vec<usize>,
    /// Width of every factor column
    pub factor_width: usize,
}

impl TableLayout {
    /// Compute widths from the raw values of all runs over `instances`
    ///
    /// The name column is sized from every baseline instance, including
    /// those later excluded.
    pub fn compute(
        runs: &[Run],
        instances: &BTreeSet<String>,
        metrics: &[MetricSpec],
    ) -> Result<Self, CompareError> {
        let longest_name = runs
            .first()
            .map(|baseline| {
                baseline
                    .results
                    .keys()
                    .map(|name| name.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0);
        let name_width = longest_name.max(MIN_NAME_WIDTH) + 1;

        let mut metric_widths = Vec::with_capacity(metrics.len());
        for spec in metrics {
            let mut width = spec.name.chars().count();
            for run in runs {
                for instance in instances {
                    let value = metric_value(run, instance, &spec.name)?;
                    width = width.max(value.to_string().chars().count());
                }
            }
            metric_widths.push(width + COLUMN_PADDING);
        }

        let factor_width = metric_widths.iter().copied().max().unwrap_or(0);

        Ok(Self {
            name_width,
            metric_widths,
            factor_width,
        })
    }

    /// Width of a block of raw metric values
    fn values_width(&self) -> usize {
        self.metric_widths.iter().sum()
    }

    /// Width of the factor columns of one setting
    fn factors_width(&self) -> usize {
        self.metric_widths.len() * self.factor_width
    }
}

/// Center `text` in `width` columns
///
/// An odd margin is split with the extra column on the left when `width` is
/// odd and on the right otherwise; text wider than `width` is left as is.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let margin = width - len;
    let left = margin / 2 + (margin & width & 1);
    let right = margin - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn rjust(text: &str, width: usize) -> String {
    format!("{:>width$}", text, width = width)
}

fn ljust(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

/// Border, setting labels, column names, border
fn format_header(comparison: &Comparison) -> Vec<String> {
    let layout = &comparison.layout;
    let values_width = layout.values_width();
    let block_width = values_width + layout.factors_width();

    let mut border = format!(
        "{}+{}+",
        "-".repeat(layout.name_width),
        "-".repeat(values_width + 1)
    );
    let mut labels = String::new();
    let mut columns = ljust("name", layout.name_width);
    columns.push(' ');

    if let Some(baseline) = comparison.baseline() {
        labels = rjust(&baseline.label(), layout.name_width + values_width + 1);
    }
    for (spec, width) in comparison.metrics.iter().zip(&layout.metric_widths) {
        columns.push_str(&rjust(&spec.name, *width));
    }

    for run in comparison.others() {
        labels.push_str(" |");
        labels.push_str(&center(&run.label(), block_width));
        border.push_str(&"-".repeat(block_width + 1));
        border.push('+');

        columns.push_str(" |");
        for (spec, width) in comparison.metrics.iter().zip(&layout.metric_widths) {
            columns.push_str(&rjust(&spec.name, *width));
        }
        for spec in &comparison.metrics {
            columns.push_str(&rjust(&format!("{}Q", spec.name), layout.factor_width));
        }
    }

    vec![border.clone(), labels, columns, border]
}

fn format_row(comparison: &Comparison, instance: &str) -> Result<String, CompareError> {
    let layout = &comparison.layout;
    let mut row = ljust(instance, layout.name_width);

    let Some(baseline) = comparison.baseline() else {
        return Ok(row);
    };
    for (spec, width) in comparison.metrics.iter().zip(&layout.metric_widths) {
        let value = metric_value(baseline, instance, &spec.name)?;
        row.push_str(&rjust(&value.to_string(), *width));
    }

    for run in comparison.others() {
        row.push_str("  ");
        for (spec, width) in comparison.metrics.iter().zip(&layout.metric_widths) {
            let value = metric_value(run, instance, &spec.name)?;
            row.push_str(&rjust(&value.to_string(), *width));
        }
        for spec in &comparison.metrics {
            let factor = comparison
                .factors
                .get(&spec.name, &run.setting, instance)
                .unwrap_or(0.0);
            // writing into a String cannot fail
            let _ = write!(row, "{:>width$.2}", factor, width = layout.factor_width);
        }
    }

    Ok(row)
}

/// `sum:`, `geo mean:` and `shifted:` rows
fn format_summary(comparison: &Comparison) -> [String; 3] {
    let layout = &comparison.layout;
    let mut sums = ljust("sum:", layout.name_width);
    let mut means = ljust("geo mean:", layout.name_width);
    let mut shifted = ljust("shifted:", layout.name_width);

    for (index, run) in comparison.runs.iter().enumerate() {
        for (spec, width) in comparison.metrics.iter().zip(&layout.metric_widths) {
            let Some(acc) = comparison.summary.get(&spec.name, &run.setting) else {
                continue;
            };
            sums.push_str(&rjust(&acc.sum.to_string(), *width));
            means.push_str(&rjust(&format!("{:.1}", acc.geo_mean), *width));
            shifted.push_str(&rjust(&format!("{:.1}", acc.shifted_geo_mean), *width));
        }

        // the baseline has no factor columns to skip
        let padding = if index == 0 {
            2
        } else {
            layout.factors_width() + 2
        };
        for line in [&mut sums, &mut means, &mut shifted] {
            line.push_str(&" ".repeat(padding));
        }
    }

    [sums, means, shifted]
}

/// Render the complete report: header, one row per instance, header, summary
/// and the list of excluded instances
pub fn render_report(comparison: &Comparison) -> Result<String, CompareError> {
    let mut out = String::new();
    let header = format_header(comparison);

    for line in &header {
        out.push_str(line);
        out.push('\n');
    }
    for instance in &comparison.reconciliation.instances {
        out.push_str(&format_row(comparison, instance)?);
        out.push('\n');
    }
    for line in header.iter().chain(format_summary(comparison).iter()) {
        out.push_str(line);
        out.push('\n');
    }

    if !comparison.reconciliation.excluded.is_empty() {
        out.push('\n');
        out.push_str(EXCLUDED_LABEL);
        out.push('\n');
        for exclusion in &comparison.reconciliation.excluded {
            out.push_str(&exclusion.instance);
            out.push('\n');
        }
        out.push('\n');
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_metrics;
    use crate::reconcile::tests::{record, run};
    use crate::reconcile::IgnoreSet;
    use crate::record::MetricValue::{Float, Int};

    fn scenario() -> Vec<Run> {
        let mut a = run("A", vec![("inst1", record("ok", Int(10), Int(100)))]);
        a.hash = "h1".to_string();
        let mut b = run("B", vec![("inst1", record("ok", Int(20), Int(50)))]);
        b.hash = "h2".to_string();
        vec![a, b]
    }

    #[test]
    fn test_center_matches_harness_convention() {
        assert_eq!(center("ab", 5), "  ab ");
        assert_eq!(center("ab", 6), "  ab  ");
        assert_eq!(center("abc", 6), " abc  ");
        assert_eq!(center("abc", 7), "  abc  ");
        assert_eq!(center("abcdef", 3), "abcdef");
    }

    #[test]
    fn test_layout_widths() {
        let runs = scenario();
        let instances = BTreeSet::from(["inst1".to_string()]);
        let layout = TableLayout::compute(&runs, &instances, &default_metrics()).unwrap();

        assert_eq!(layout.name_width, 17);
        assert_eq!(layout.metric_widths, vec![11, 7]);
        assert_eq!(layout.factor_width, 11);
    }

    #[test]
    fn test_layout_long_values_and_names() {
        let runs = vec![run(
            "A",
            vec![
                ("a_rather_long_instance_name", record("ok", Float(12345.678), Int(3))),
                ("short", record("ok", Float(0.25), Int(1234567))),
            ],
        )];
        let instances = BTreeSet::from(["short".to_string()]);
        let layout = TableLayout::compute(&runs, &instances, &default_metrics()).unwrap();

        // the excluded long name still sizes the name column
        assert_eq!(layout.name_width, 28);
        assert_eq!(layout.metric_widths, vec![11, 9]);
        assert_eq!(layout.factor_width, 11);
    }

    #[test]
    fn test_render_two_settings() {
        let comparison =
            Comparison::build(scenario(), &IgnoreSet::new(), &default_metrics()).unwrap();
        let report = render_report(&comparison).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        let border = format!("{}+{}+{}+", "-".repeat(17), "-".repeat(19), "-".repeat(41));
        assert_eq!(lines[0], border);
        assert_eq!(
            lines[1],
            format!("{:>36} |{}", "1.0-h1-A", center("1.0-h2-B", 40))
        );
        assert_eq!(
            lines[2],
            "name                solvetime  iters |  solvetime  iters solvetimeQ     itersQ"
        );
        assert_eq!(lines[3], border);
        assert_eq!(
            lines[4],
            "inst1                     10    100           20     50       2.00       0.50"
        );
        assert_eq!(lines[5], border);
        assert_eq!(lines[8], border);
        assert_eq!(
            lines[9],
            format!("{:<17}{:>11}{:>7}  {:>11}{:>7}{}", "sum:", 10, 100, 20, 50, " ".repeat(24))
        );
        assert_eq!(
            lines[10],
            format!(
                "{:<17}{:>11}{:>7}  {:>11}{:>7}{}",
                "geo mean:", "10.0", "100.0", "20.0", "50.0", " ".repeat(24)
            )
        );
        assert_eq!(
            lines[11],
            format!(
                "{:<17}{:>11}{:>7}  {:>11}{:>7}{}",
                "shifted:", "10.1", "110.0", "20.1", "60.0", " ".repeat(24)
            )
        );
        assert_eq!(lines.len(), 12);
        assert!(!report.contains(EXCLUDED_LABEL));
    }

    #[test]
    fn test_render_lists_excluded_instances() {
        let mut runs = scenario();
        runs[0]
            .results
            .insert("inst2".to_string(), record("ok", Int(1), Int(1)));
        runs[1]
            .results
            .insert("inst2".to_string(), record("ok", Int(1), Int(1)));
        runs[1]
            .results
            .insert("inst3".to_string(), record("abort", Int(0), Int(0)));
        runs[0]
            .results
            .insert("inst3".to_string(), record("ok", Int(3), Int(3)));
        let ignore = IgnoreSet::from(["inst2".to_string()]);

        let comparison = Comparison::build(runs, &ignore, &default_metrics()).unwrap();
        let report = render_report(&comparison).unwrap();

        assert!(report.ends_with("\naborted and ignored instances:\ninst2\ninst3\n\n"));
        let rows: Vec<&str> = report
            .lines()
            .filter(|line| line.starts_with("inst"))
            .collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("inst1 "));
    }

    #[test]
    fn test_render_baseline_only() {
        let runs = vec![run("A", vec![("inst1", record("ok", Float(1.5), Int(9)))])];
        let comparison = Comparison::build(runs, &IgnoreSet::new(), &default_metrics()).unwrap();
        let report = render_report(&comparison).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], format!("{}+{}+", "-".repeat(17), "-".repeat(19)));
        assert_eq!(lines[2], "name                solvetime  iters");
        assert_eq!(lines[4], "inst1                    1.5      9");
    }
}
