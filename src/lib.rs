pub mod cli;
pub mod config;
pub mod core;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Policy;
pub use core::access::{FsStat, RealTrashAccess, TrashAccess};
pub use core::engine::SelectionEngine;
pub use core::record::TrashRecord;
pub use core::stats::RunStats;
pub use utils::{BinsweepError, Result};
