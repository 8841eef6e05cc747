use std::path::PathBuf;

/// Errors produced while loading and comparing test runs
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("no result files given")]
    NoRuns,

    #[error("cannot derive run metadata from file name '{}': {reason}", path.display())]
    MalformedFileName { path: PathBuf, reason: String },

    #[error("inconsistent testsets: expected '{expected}', found '{found}' in '{}'", path.display())]
    InconsistentTestset {
        expected: String,
        found: String,
        path: PathBuf,
    },

    #[error("malformed record '{instance}' in '{}': missing or invalid field '{field}'", file.display())]
    MalformedRecord {
        file: PathBuf,
        instance: String,
        field: String,
    },

    #[error("metric '{metric}' not recorded for instance '{instance}' of setting '{setting}'")]
    MissingMetric {
        metric: String,
        setting: String,
        instance: String,
    },

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}
