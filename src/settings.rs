//! Per-browser UI preferences, kept in localStorage.

use serde::{Deserialize, Serialize};

pub const STORAGE_KEY: &str = "pt_ui_settings";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SidebarTab {
    #[default]
    Creatures,
    Combat,
    Notes,
}

impl SidebarTab {
    pub const ALL: [SidebarTab; 3] = [SidebarTab::Creatures, SidebarTab::Combat, SidebarTab::Notes];

    pub fn label(self) -> &'static str {
        match self {
            SidebarTab::Creatures => "Creatures",
            SidebarTab::Combat => "Combat",
            SidebarTab::Notes => "Notes",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub sidebar_tab: SidebarTab,
    pub zoom_sensitivity: f64,
    pub log_level: LogLevel,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            sidebar_tab: SidebarTab::Creatures,
            zoom_sensitivity: 0.5,
            log_level: LogLevel::Info,
        }
    }
}

impl UiSettings {
    /// Parses stored settings, falling back to defaults for anything unreadable.
    pub fn from_json(raw: &str) -> UiSettings {
        let mut settings: UiSettings = serde_json::from_str(raw).unwrap_or_default();
        if !(settings.zoom_sensitivity.is_finite() && settings.zoom_sensitivity > 0.0) {
            settings.zoom_sensitivity = UiSettings::default().zoom_sensitivity;
        }
        settings
    }

    pub fn load() -> UiSettings {
        if let Some(win) = web_sys::window() {
            if let Ok(Some(store)) = win.local_storage() {
                if let Ok(Some(raw)) = store.get_item(STORAGE_KEY) {
                    return UiSettings::from_json(&raw);
                }
            }
        }
        UiSettings::default()
    }

    pub fn save(&self) {
        if let Some(win) = web_sys::window() {
            if let Ok(Some(store)) = win.local_storage() {
                if let Ok(s) = serde_json::to_string(self) {
                    if store.set_item(STORAGE_KEY, &s).is_err() {
                        tracing::warn!("could not persist UI settings");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_falls_back_to_defaults() {
        assert_eq!(UiSettings::from_json("not json"), UiSettings::default());
        assert_eq!(UiSettings::from_json(""), UiSettings::default());
    }

    #[test]
    fn partial_settings_keep_the_rest_default() {
        let s = UiSettings::from_json(r#"{"sidebar_tab": "Notes"}"#);
        assert_eq!(s.sidebar_tab, SidebarTab::Notes);
        assert_eq!(s.zoom_sensitivity, 0.5);
        assert_eq!(s.log_level, LogLevel::Info);
    }

    #[test]
    fn nonsense_sensitivity_is_reset() {
        let s = UiSettings::from_json(r#"{"zoom_sensitivity": -2.0, "log_level": "debug"}"#);
        assert_eq!(s.zoom_sensitivity, 0.5);
        assert_eq!(tracing::Level::from(s.log_level), tracing::Level::DEBUG);
    }
}
