pub mod keybindings;
pub mod keys;
pub mod loader;
mod snooze;

use std::collections::BTreeMap;

pub use keybindings::{GlobalAction, KeybindingsConfig, PromptKeybindings};
pub use loader::load;
use serde::{Deserialize, Serialize};
pub use snooze::{NEGATIVE_SNOOZE_DEFAULT_MS, SnoozeDirective};

use crate::host::TriggerSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// Raw opt-in dialog options as they appear in the config file.
///
/// Every field is optional; resolution against the translator and the
/// icon resolver happens once in [`crate::dialog::DialogOptions`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    pub title: Option<String>,
    pub message: Option<String>,
    pub positive_button: Option<String>,
    pub negative_button: Option<String>,
    /// Icon glyph override. An explicitly empty string hides the icon.
    pub icon: Option<String>,
    /// Extra container style properties (`background-color`, `color`,
    /// `border-color`).
    pub style: BTreeMap<String, String>,
    pub hide_attribution: bool,
    /// Extra snooze when the close affordance is clicked.
    pub close_snooze: SnoozeDirective,
    /// Extra snooze when the negative button is clicked.
    #[serde(default = "default_negative_snooze")]
    pub negative_snooze: SnoozeDirective,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    /// Locale tag override; the host's active locales apply otherwise.
    pub locale: Option<String>,
    pub positive_button_background_color: Option<String>,
    pub positive_button_text_color: Option<String>,
    pub negative_button_background_color: Option<String>,
    pub negative_button_text_color: Option<String>,
    /// Trigger condition, passed through opaquely to the trigger service.
    pub triggers: TriggerSpec,
}

fn default_negative_snooze() -> SnoozeDirective {
    SnoozeDirective::For(NEGATIVE_SNOOZE_DEFAULT_MS)
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            title: None,
            message: None,
            positive_button: None,
            negative_button: None,
            icon: None,
            style: BTreeMap::new(),
            hide_attribution: false,
            close_snooze: SnoozeDirective::default(),
            negative_snooze: default_negative_snooze(),
            background_color: None,
            text_color: None,
            locale: None,
            positive_button_background_color: None,
            positive_button_text_color: None,
            negative_button_background_color: None,
            negative_button_text_color: None,
            triggers: TriggerSpec::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub dialog: DialogConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_has_spec_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.dialog.close_snooze, SnoozeDirective::Default);
        assert_eq!(
            config.dialog.negative_snooze,
            SnoozeDirective::For(NEGATIVE_SNOOZE_DEFAULT_MS)
        );
        assert!(!config.dialog.hide_attribution);
        assert!(config.dialog.title.is_none());
    }

    #[test]
    fn test_dialog_section_parses() {
        let config: AppConfig = toml::from_str(
            r##"
            [dialog]
            title = "Stay in the loop?"
            negative_snooze = true
            background_color = "#1e1e2e"

            [dialog.triggers]
            delay_ms = 5000
            "##,
        )
        .unwrap();
        assert_eq!(config.dialog.title.as_deref(), Some("Stay in the loop?"));
        assert_eq!(config.dialog.negative_snooze, SnoozeDirective::Never);
        assert_eq!(config.dialog.triggers.0["delay_ms"], 5000);
    }
}
