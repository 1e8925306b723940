//! Exit codes of the `trendlog` binary. Part of the CLI contract for CI scripts.

use trendlog_core::{ErrorKind, IngestError};

pub const EXIT_SUCCESS: i32 = 0;
/// Run directory unusable: missing record dir, no records, nothing parsed.
pub const EXIT_INPUT_ERROR: i32 = 1;
/// Invalid arguments or config file.
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Reading or appending a log failed.
pub const EXIT_IO_ERROR: i32 = 3;
/// Anything not classified above.
pub const EXIT_INTERNAL_ERROR: i32 = 4;

/// Exit code for a command failure. Errors that are not `IngestError` are internal.
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<IngestError>().map(IngestError::kind) {
        Some(ErrorKind::Input) => EXIT_INPUT_ERROR,
        Some(ErrorKind::Config) => EXIT_CONFIG_ERROR,
        Some(ErrorKind::Io) => EXIT_IO_ERROR,
        None => EXIT_INTERNAL_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_onto_cli_codes() {
        let cases = [
            (
                IngestError::NoTestResults { skipped: 0 },
                EXIT_INPUT_ERROR,
            ),
            (
                IngestError::InvalidDate {
                    value: String::new(),
                },
                EXIT_CONFIG_ERROR,
            ),
            (
                IngestError::io("x", std::io::Error::other("boom")),
                EXIT_IO_ERROR,
            ),
        ];
        for (err, code) in cases {
            let msg = err.to_string();
            assert_eq!(for_error(&anyhow::Error::new(err)), code, "{msg}");
        }
    }

    #[test]
    fn context_does_not_hide_the_cause() {
        let err = anyhow::Error::new(IngestError::NoRecordFiles {
            dir: "run/test-cases".into(),
        })
        .context("ingest failed");
        assert_eq!(for_error(&err), EXIT_INPUT_ERROR);
    }

    #[test]
    fn foreign_errors_are_internal() {
        let err = anyhow::anyhow!("serializer exploded");
        assert_eq!(for_error(&err), EXIT_INTERNAL_ERROR);
    }
}
