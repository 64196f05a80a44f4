pub mod config_io;
pub mod logging;
pub mod persist;
pub mod recovery;
pub mod store;
