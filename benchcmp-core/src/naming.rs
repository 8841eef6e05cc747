//! Run metadata encoded in result file names
//!
//! The test harness names its result files as dot-separated segments:
//!
//! ```text
//! check.<testset>.<version>.<os>.<arch>.<compiler>.<opt>.<setting>.json
//! ```
//!
//! The version itself may contain dots, so fields are located by position:
//! the testset is the second segment, the setting the last-but-one, the
//! optimization mode the third from last, and the version spans everything
//! from the third segment up to (excluding) the sixth from last. Result files
//! already in the wild depend on these offsets.

use std::path::Path;

use crate::error::CompareError;

/// Index of the testset segment, counted from the front
const TESTSET_SEGMENT: usize = 1;
/// First version segment, counted from the front
const VERSION_START: usize = 2;
/// Number of trailing segments after the version
const VERSION_TAIL: usize = 6;
/// Position of the optimization mode, counted from the back
const OPT_FROM_END: usize = 3;
/// Position of the setting name, counted from the back
const SETTING_FROM_END: usize = 2;

/// Metadata parsed from a result file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunName {
    pub testset: String,
    pub setting: String,
    pub version: String,
    pub opt: String,
}

impl RunName {
    /// Parse the basename of `path`, stripping `version_prefix` from the version once
    pub fn parse<P: AsRef<Path>>(path: P, version_prefix: &str) -> Result<Self, CompareError> {
        let path = path.as_ref();
        let basename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| CompareError::MalformedFileName {
                path: path.to_path_buf(),
                reason: "path has no file name".to_string(),
            })?;

        let segments: Vec<&str> = basename.split('.').collect();
        let n = segments.len();
        if n < OPT_FROM_END {
            return Err(CompareError::MalformedFileName {
                path: path.to_path_buf(),
                reason: format!(
                    "expected at least {} dot-separated segments, found {}",
                    OPT_FROM_END, n
                ),
            });
        }

        let version_end = n.saturating_sub(VERSION_TAIL);
        let version = if version_end > VERSION_START {
            segments[VERSION_START..version_end].join(".")
        } else {
            String::new()
        };
        let version = version
            .strip_prefix(version_prefix)
            .map(str::to_string)
            .unwrap_or(version);

        Ok(Self {
            testset: segments[TESTSET_SEGMENT].to_string(),
            setting: segments[n - SETTING_FROM_END].to_string(),
            version,
            opt: segments[n - OPT_FROM_END].to_string(),
        })
    }
}
