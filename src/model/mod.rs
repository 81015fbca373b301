pub mod chat;
pub mod config;
pub mod distortion;
pub mod session;
pub mod settings;
pub mod task;
pub mod timer;

pub use chat::*;
pub use config::*;
pub use distortion::*;
pub use session::*;
pub use settings::*;
pub use task::*;
pub use timer::*;
