use serde::{Deserialize, Serialize};

/// User preferences, persisted as `{"theme": bool, "sounds": bool, "haptics": bool}`.
///
/// Every field defaults independently so older or partial blobs still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Dark palette when true, light when false
    #[serde(rename = "theme", default = "default_true")]
    pub dark_theme: bool,
    #[serde(default = "default_true")]
    pub sounds: bool,
    #[serde(default = "default_true")]
    pub haptics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dark_theme: true,
            sounds: true,
            haptics: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// A single toggleable preference, as listed on the profile screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Theme,
    Sounds,
    Haptics,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [SettingKey::Theme, SettingKey::Sounds, SettingKey::Haptics];

    pub fn label(self) -> &'static str {
        match self {
            SettingKey::Theme => "Dark theme",
            SettingKey::Sounds => "Sounds",
            SettingKey::Haptics => "Haptics",
        }
    }
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::Theme => self.dark_theme,
            SettingKey::Sounds => self.sounds,
            SettingKey::Haptics => self.haptics,
        }
    }

    pub fn toggle(&mut self, key: SettingKey) {
        match key {
            SettingKey::Theme => self.dark_theme = !self.dark_theme,
            SettingKey::Sounds => self.sounds = !self.sounds,
            SettingKey::Haptics => self.haptics = !self.haptics,
        }
    }
}
