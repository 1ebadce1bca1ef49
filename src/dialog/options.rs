use std::collections::BTreeMap;
use std::str::FromStr;

use ratatui::style::Color;
use tracing::warn;

use crate::config::{DialogConfig, SnoozeDirective};
use crate::host::{IconResolver, TriggerSpec};
use crate::i18n::{
    ATTRIBUTION, DEFAULT_MESSAGE, DEFAULT_NEGATIVE, DEFAULT_POSITIVE, DEFAULT_TITLE, Translator,
};

/// Fully resolved dialog options. Built once at construction and never
/// mutated.
#[derive(Debug, Clone)]
pub struct DialogOptions {
    pub title: String,
    pub message: String,
    pub positive_label: String,
    pub negative_label: String,
    pub icon: Option<String>,
    /// Localized attribution line; `None` when hidden.
    pub attribution: Option<String>,
    pub style: BTreeMap<String, String>,
    pub close_snooze: SnoozeDirective,
    pub negative_snooze: SnoozeDirective,
    pub background: Option<Color>,
    pub text_color: Option<Color>,
    pub positive_background: Option<Color>,
    pub positive_text: Option<Color>,
    pub negative_background: Option<Color>,
    pub negative_text: Option<Color>,
    pub triggers: TriggerSpec,
}

impl DialogOptions {
    /// Resolve raw configuration against the translator and the host's
    /// icon resolver.
    ///
    /// A title or message explicitly set to the empty string stays
    /// empty (its node is skipped), unless BOTH end up empty — a fully
    /// blank dialog is never rendered, so both then revert to the
    /// localized defaults.
    pub fn resolve(config: &DialogConfig, tr: &Translator, icons: &dyn IconResolver) -> Self {
        let default_title = tr.tr(DEFAULT_TITLE);
        let default_message = tr.tr(DEFAULT_MESSAGE);

        let mut title = config.title.clone().unwrap_or_else(|| default_title.clone());
        let mut message = config
            .message
            .clone()
            .unwrap_or_else(|| default_message.clone());
        if title.is_empty() && message.is_empty() {
            title = default_title;
            message = default_message;
        }

        let positive_label = config
            .positive_button
            .clone()
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| tr.tr(DEFAULT_POSITIVE));
        let negative_label = config
            .negative_button
            .clone()
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| tr.tr(DEFAULT_NEGATIVE));

        let icon = match &config.icon {
            Some(glyph) if glyph.is_empty() => None,
            Some(glyph) => Some(glyph.clone()),
            None => icons.default_notification_icon(),
        };

        let attribution = (!config.hide_attribution).then(|| tr.tr(ATTRIBUTION));

        Self {
            title,
            message,
            positive_label,
            negative_label,
            icon,
            attribution,
            style: config.style.clone(),
            close_snooze: config.close_snooze,
            negative_snooze: config.negative_snooze,
            background: parse_color(config.background_color.as_deref(), "background_color"),
            text_color: parse_color(config.text_color.as_deref(), "text_color"),
            positive_background: parse_color(
                config.positive_button_background_color.as_deref(),
                "positive_button_background_color",
            ),
            positive_text: parse_color(
                config.positive_button_text_color.as_deref(),
                "positive_button_text_color",
            ),
            negative_background: parse_color(
                config.negative_button_background_color.as_deref(),
                "negative_button_background_color",
            ),
            negative_text: parse_color(
                config.negative_button_text_color.as_deref(),
                "negative_button_text_color",
            ),
            triggers: config.triggers.clone(),
        }
    }

    /// Container style overrides from the inline style map, falling
    /// back to the dedicated color options.
    pub fn container_background(&self) -> Option<Color> {
        self.style_color("background-color").or(self.background)
    }

    pub fn container_text(&self) -> Option<Color> {
        self.style_color("color").or(self.text_color)
    }

    pub fn container_border(&self) -> Option<Color> {
        // Like the background, the border follows the configured
        // background color unless the style map overrides it.
        self.style_color("border-color").or(self.background)
    }

    fn style_color(&self, property: &str) -> Option<Color> {
        self.style
            .get(property)
            .and_then(|value| parse_color(Some(value.as_str()), property))
    }
}

fn parse_color(value: Option<&str>, field: &str) -> Option<Color> {
    let value = value?;
    match Color::from_str(value) {
        Ok(color) => Some(color),
        Err(_) => {
            warn!(field, value, "ignoring unparsable color");
            None
        }
    }
}
