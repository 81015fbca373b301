pub mod app;
pub mod feedback;
pub mod input;
pub mod render;
pub mod theme;

pub use app::{LaunchOptions, run};
