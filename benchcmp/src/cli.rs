use std::path::PathBuf;

use benchcmp_core::config::split_list;
use clap::{ArgAction, Parser};

/// Marker of the positional token listing instances to ignore
pub const IGNORE_TOKEN: &str = "ignore=";

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "benchcmp",
    version,
    about = "compare several runs of the same testset",
    override_usage = "benchcmp [OPTIONS] [ignore=<instance1>,<instance2>,...] <run1>.json [<run2>.json ...]"
)]
pub struct Args {
    /// Result files; the first one is the baseline. An `ignore=a,b` token names instances to skip.
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Instances to leave out of the comparison (comma-separated, repeatable)
    #[arg(long, value_delimiter = ',', value_name = "INSTANCE")]
    pub ignore: Vec<String>,

    /// Configuration file (default: benchcmp.toml in the working directory, if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Positional inputs split into result files and ignored instances
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Inputs {
    pub files: Vec<PathBuf>,
    pub ignore: Vec<String>,
}

impl Inputs {
    /// Pull every `ignore=` token out of the positional arguments
    pub fn split(tokens: &[String]) -> Self {
        let mut inputs = Self::default();
        for token in tokens {
            match token.strip_prefix(IGNORE_TOKEN) {
                Some(list) => inputs.ignore.extend(split_list(list)),
                None => inputs.files.push(PathBuf::from(token)),
            }
        }
        inputs
    }
}
