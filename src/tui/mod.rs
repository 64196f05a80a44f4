pub mod announce;
pub mod app;
pub mod hit_map;
pub mod input;
pub mod render;
pub mod theme;
pub mod view;

pub use app::run;
