use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions that abort a run. A field tag that is simply absent
/// from a trial block is not one of these; it becomes a `None` in the
/// record and `n/a` in the output.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-16")]
    Decode { path: PathBuf },

    /// A field tag must identify at most one line per trial block.
    #[error("tag {tag:?} occurs {count} times in one trial block")]
    DuplicateTag { tag: &'static str, count: usize },

    #[error("malformed value for {tag:?}: {value:?}")]
    MalformedValue { tag: &'static str, value: String },

    #[error("unrecognized response code {value:?}")]
    UnknownResponse { value: String },

    #[error("no sync pulse line in log; cannot anchor trial onsets")]
    MissingSync,

    #[error("cannot derive a subject id from {path}")]
    NoSubjectId { path: PathBuf },
}
