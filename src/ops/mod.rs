pub mod board;
pub mod drop;
pub mod report;
pub mod schedule;
pub mod state;
pub mod validate;
