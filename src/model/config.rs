use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::timer::TimerMode;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub companion: CompanionConfig,
    #[serde(default)]
    pub tasks: TaskConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_deep_minutes")]
    pub deep_minutes: u32,
    #[serde(default = "default_flow_minutes")]
    pub flow_minutes: u32,
    #[serde(default = "default_light_minutes")]
    pub light_minutes: u32,
    /// Starting value for the custom preset
    #[serde(default = "default_custom_minutes")]
    pub custom_minutes: u32,
    /// Length of the completion celebration
    #[serde(default = "default_celebration_secs")]
    pub celebration_secs: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        TimerConfig {
            deep_minutes: default_deep_minutes(),
            flow_minutes: default_flow_minutes(),
            light_minutes: default_light_minutes(),
            custom_minutes: default_custom_minutes(),
            celebration_secs: default_celebration_secs(),
        }
    }
}

impl TimerConfig {
    /// Preset duration in seconds, never zero.
    pub fn duration_secs(&self, mode: TimerMode) -> u32 {
        let minutes = match mode {
            TimerMode::Deep => self.deep_minutes,
            TimerMode::Flow => self.flow_minutes,
            TimerMode::Light => self.light_minutes,
            TimerMode::Custom => self.custom_minutes,
        };
        minutes.saturating_mul(60).max(1)
    }
}

fn default_deep_minutes() -> u32 {
    50
}

fn default_flow_minutes() -> u32 {
    25
}

fn default_light_minutes() -> u32 {
    15
}

fn default_custom_minutes() -> u32 {
    30
}

fn default_celebration_secs() -> u64 {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionConfig {
    /// Base URL of the generative text API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// API key; `TIMEWARP_API_KEY` takes precedence when set
    #[serde(default)]
    pub api_key: Option<String>,
    /// Live calls allowed per session before going offline
    #[serde(default = "default_call_budget")]
    pub call_budget: u32,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        CompanionConfig {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            call_budget: default_call_budget(),
        }
    }
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_call_budget() -> u32 {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// How many tasks to generate on mount
    #[serde(default = "default_task_count")]
    pub count: usize,
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig {
            count: default_task_count(),
        }
    }
}

fn default_task_count() -> usize {
    12
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Hex colour overrides keyed by theme slot (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Show the key hint line at the bottom of each screen
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            colors: HashMap::new(),
            show_key_hints: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.timer.deep_minutes, 50);
        assert_eq!(config.timer.flow_minutes, 25);
        assert_eq!(config.timer.light_minutes, 15);
        assert_eq!(config.timer.celebration_secs, 5);
        assert_eq!(config.companion.call_budget, 5);
        assert!(config.companion.api_key.is_none());
        assert_eq!(config.tasks.count, 12);
        assert!(config.ui.colors.is_empty());
        assert!(config.ui.show_key_hints);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[timer]
flow_minutes = 30

[companion]
call_budget = 0
api_key = "abc"
"#,
        )
        .unwrap();
        assert_eq!(config.timer.flow_minutes, 30);
        assert_eq!(config.timer.deep_minutes, 50);
        assert_eq!(config.companion.call_budget, 0);
        assert_eq!(config.companion.api_key.as_deref(), Some("abc"));
        assert_eq!(config.companion.model, "gemini-2.0-flash");
    }

    #[test]
    fn preset_durations_in_seconds() {
        let timer = TimerConfig::default();
        assert_eq!(timer.duration_secs(TimerMode::Deep), 3000);
        assert_eq!(timer.duration_secs(TimerMode::Flow), 1500);
        assert_eq!(timer.duration_secs(TimerMode::Light), 900);
        let zero = TimerConfig {
            light_minutes: 0,
            ..TimerConfig::default()
        };
        assert_eq!(zero.duration_secs(TimerMode::Light), 1);
    }
}
