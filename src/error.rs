// Errors that abort a whole resolution pass

use std::path::PathBuf;

/// The only failure that surfaces from a pass. Every other source degrades to an
/// empty contribution instead.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot read interface counters from {}: {source}", path.display())]
    Counters {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
