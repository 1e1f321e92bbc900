use std::path::PathBuf;

use thiserror::Error;

/// Fatal run errors. Per-request failures never surface here — they are
/// contained in `RequestOutcome` records and reported, not propagated.
#[derive(Debug, Error)]
pub enum StampedeError {
    #[error("failed to write report to {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
