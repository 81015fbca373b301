use std::path::{Path, PathBuf};

/// Overrides the data directory when set
pub const DATA_DIR_ENV: &str = "TIMEWARP_HOME";

/// Resolve the data directory: explicit override, then `$TIMEWARP_HOME`,
/// then `$XDG_DATA_HOME/timewarp`, then `~/.local/share/timewarp`.
pub fn data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    resolve_data_dir(
        std::env::var(DATA_DIR_ENV).ok(),
        std::env::var("XDG_DATA_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

fn resolve_data_dir(
    timewarp_home: Option<String>,
    xdg_data_home: Option<String>,
    home: Option<String>,
) -> PathBuf {
    if let Some(dir) = timewarp_home.filter(|s| !s.is_empty()) {
        return PathBuf::from(dir);
    }
    let base = xdg_data_home
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            home.filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/"))
                .join(".local")
                .join("share")
        });
    base.join("timewarp")
}

/// Default location of config.toml inside the data directory
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Log file inside the data directory
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("timewarp.log")
}

/// Abbreviate a path by replacing $HOME with ~
pub fn abbreviate_path(path: &Path) -> String {
    let s = path.display().to_string();
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() && s.starts_with(&home) {
            return format!("~{}", &s[home.len()..]);
        }
    }
    s
}
