use std::collections::BTreeMap;
use std::fmt;
use std::ops::Add;
use std::path::Path;

use serde_json::Value;

use crate::config::MetricSpec;
use crate::error::CompareError;

/// Status written by the harness when the solver did not produce a valid result
pub const ABORT_STATUS: &str = "abort";

/// A numeric metric as written in the result file
///
/// Integers and floats are kept apart so raw values print the way the
/// harness wrote them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl MetricValue {
    pub fn from_json(value: &Value) -> Option<Self> {
        let Value::Number(number) = value else {
            return None;
        };
        if let Some(i) = number.as_i64() {
            Some(MetricValue::Int(i))
        } else {
            number.as_f64().map(MetricValue::Float)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            MetricValue::Int(i) => i as f64,
            MetricValue::Float(f) => f,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            MetricValue::Int(i) => i == 0,
            MetricValue::Float(f) => f == 0.0,
        }
    }
}

impl Default for MetricValue {
    fn default() -> Self {
        MetricValue::Int(0)
    }
}

impl Add for MetricValue {
    type Output = MetricValue;

    fn add(self, rhs: MetricValue) -> MetricValue {
        match (self, rhs) {
            (MetricValue::Int(a), MetricValue::Int(b)) => match a.checked_add(b) {
                Some(sum) => MetricValue::Int(sum),
                None => MetricValue::Float(a as f64 + b as f64),
            },
            (a, b) => MetricValue::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(i) => write!(f, "{}", i),
            MetricValue::Float(x) => {
                let text = x.to_string();
                // floats always carry a fractional part, `3.0` rather than `3`
                if x.is_finite() && !text.contains(['.', 'e']) {
                    write!(f, "{}.0", text)
                } else {
                    f.write_str(&text)
                }
            }
        }
    }
}

/// One instance entry of a result file
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceResult {
    pub status: String,
    pub hash: String,
    /// Tracked metrics, keyed by metric name
    pub metrics: BTreeMap<String, MetricValue>,
    /// Remaining fields, carried along but never compared
    pub extra: BTreeMap<String, Value>,
}

impl InstanceResult {
    /// Validate a raw JSON record, extracting `status`, `hash` and every tracked metric
    pub fn from_json(
        file: &Path,
        instance: &str,
        value: Value,
        tracked: &[MetricSpec],
    ) -> Result<Self, CompareError> {
        let malformed = |field: &str| CompareError::MalformedRecord {
            file: file.to_path_buf(),
            instance: instance.to_string(),
            field: field.to_string(),
        };

        let Value::Object(mut fields) = value else {
            return Err(malformed("<record>"));
        };

        let status = take_string(&mut fields, "status").ok_or_else(|| malformed("status"))?;
        let hash = take_string(&mut fields, "hash").ok_or_else(|| malformed("hash"))?;

        let mut metrics = BTreeMap::new();
        for spec in tracked {
            let value = fields
                .remove(&spec.name)
                .as_ref()
                .and_then(MetricValue::from_json)
                .ok_or_else(|| malformed(&spec.name))?;
            metrics.insert(spec.name.clone(), value);
        }

        Ok(Self {
            status,
            hash,
            metrics,
            extra: fields.into_iter().collect(),
        })
    }

    pub fn is_aborted(&self) -> bool {
        self.status == ABORT_STATUS
    }

    pub fn metric(&self, name: &str) -> Option<MetricValue> {
        self.metrics.get(name).copied()
    }
}

fn take_string(fields: &mut serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}
