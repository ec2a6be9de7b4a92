pub mod formatter;
pub mod outline;
pub mod snapshot_store;
