pub mod install;
pub mod prune;
