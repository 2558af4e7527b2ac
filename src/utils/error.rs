use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BinsweepError>;

#[derive(Error, Debug)]
pub enum BinsweepError {
    #[error("{0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Fs(String),

    #[error("unreadable trash info {path}: {reason}")]
    TrashInfo { path: PathBuf, reason: String },

    #[error("can not determine free space for {path}: the filesystem reported a zero block size; space-based options may not be supported here")]
    FreeSpaceQuery { path: PathBuf },

    #[error("run finished with {0} failure(s)")]
    Failures(u64),
}

impl BinsweepError {
    pub fn invalid_args<S: Into<String>>(msg: S) -> Self {
        BinsweepError::InvalidArgs(msg.into())
    }

    pub fn fs_error<S: Into<String>>(msg: S) -> Self {
        BinsweepError::Fs(msg.into())
    }

    pub fn trash_info<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        BinsweepError::TrashInfo {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn free_space_query<P: Into<PathBuf>>(path: P) -> Self {
        BinsweepError::FreeSpaceQuery { path: path.into() }
    }

    pub fn failures(count: u64) -> Self {
        BinsweepError::Failures(count)
    }
}
