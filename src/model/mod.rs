pub mod checkout;
pub mod config;
pub mod snapshot;
pub mod tool;

pub use checkout::*;
pub use config::*;
pub use snapshot::*;
pub use tool::*;
