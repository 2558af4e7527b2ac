pub mod error;
pub mod format;
pub mod logging;

pub use error::{BinsweepError, Result};
pub use format::fmt_bytes;
