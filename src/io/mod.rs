pub mod config_io;
pub mod paths;
pub mod settings_store;
pub mod store;
pub mod watcher;
