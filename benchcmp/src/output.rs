//! User-facing output of the command-line tool
//!
//! The report goes to stdout uncolored; diagnostics go to stderr.

use std::io::{self, Write};

use colored::*;

/// Print usage to stderr
pub fn print_usage() {
    eprintln!("{}", "compare several runs of the same testset".bold());
    eprintln!(
        "{} benchcmp [OPTIONS] [ignore=<instance1>,<instance2>,...] <run1>.json [<run2>.json ...]",
        "usage:".cyan().bold()
    );
    eprintln!("       the first run is the baseline; all others are compared to it");
    eprintln!("       run `benchcmp --help` for all options");
}

/// Print a fatal error to stderr
pub fn print_error(message: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
}

/// Print a note about excluded instances to stderr
pub fn print_exclusion_note(count: usize) {
    if count == 0 {
        return;
    }
    eprintln!(
        "{} {} {} left out of the comparison (listed below the table)",
        "Note:".yellow().bold(),
        count,
        if count == 1 { "instance" } else { "instances" }
    );
}

/// Write the report; a reader that went away early is not an error
pub fn write_report<W: Write>(mut out: W, report: &str) -> io::Result<()> {
    match out.write_all(report.as_bytes()).and_then(|_| out.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            log::debug!("stdout closed early, report truncated");
            Ok(())
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Full;

    impl Write for Full {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_report() {
        let mut buffer = Vec::new();
        write_report(&mut buffer, "line\n").unwrap();
        assert_eq!(buffer, b"line\n");
    }

    #[test]
    fn test_broken_pipe_is_ignored() {
        assert!(write_report(ClosedPipe, "line\n").is_ok());
    }

    #[test]
    fn test_other_write_errors_propagate() {
        assert!(write_report(Full, "line\n").is_err());
    }
}
