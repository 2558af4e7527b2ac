pub mod access;
pub mod discovery;
pub mod engine;
pub mod purge;
pub mod record;
pub mod size;
pub mod stats;
pub mod trash_info;
