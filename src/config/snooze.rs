use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default extra snooze after a negative-button dismissal: 7 days.
pub const NEGATIVE_SNOOZE_DEFAULT_MS: u64 = 604_800_000;

/// Extra snooze requested from the trigger service when the dialog is
/// dismissed.
///
/// The wire encoding is the historical one: `false` for no extra snooze
/// (the host's own default applies), `true` for "never present again",
/// or a duration in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnoozeDirective {
    /// No extra snooze; the trigger service falls back to its default.
    #[default]
    Default,
    /// Never present the dialog again.
    Never,
    /// Suppress re-triggering for this many milliseconds.
    For(u64),
}

impl SnoozeDirective {
    /// Whether this directive carries an explicit snooze request.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        !matches!(self, Self::Default)
    }
}

impl fmt::Display for SnoozeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Never => write!(f, "never again"),
            Self::For(ms) => write!(f, "{ms}ms"),
        }
    }
}

impl Serialize for SnoozeDirective {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Default => serializer.serialize_bool(false),
            Self::Never => serializer.serialize_bool(true),
            Self::For(ms) => serializer.serialize_u64(*ms),
        }
    }
}

impl<'de> Deserialize<'de> for SnoozeDirective {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Millis(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => Self::Default,
            Raw::Flag(true) => Self::Never,
            Raw::Millis(ms) => Self::For(ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper {
        snooze: SnoozeDirective,
    }

    #[test]
    fn test_false_is_default() {
        let w: Wrapper = toml::from_str("snooze = false").unwrap();
        assert_eq!(w.snooze, SnoozeDirective::Default);
    }

    #[test]
    fn test_true_is_never() {
        let w: Wrapper = toml::from_str("snooze = true").unwrap();
        assert_eq!(w.snooze, SnoozeDirective::Never);
    }

    #[test]
    fn test_number_is_duration() {
        let w: Wrapper = toml::from_str("snooze = 604800000").unwrap();
        assert_eq!(w.snooze, SnoozeDirective::For(NEGATIVE_SNOOZE_DEFAULT_MS));
    }

    #[test]
    fn test_roundtrip() {
        for directive in [
            SnoozeDirective::Default,
            SnoozeDirective::Never,
            SnoozeDirective::For(42),
        ] {
            let serialized = toml::to_string(&Wrapper { snooze: directive }).unwrap();
            let back: Wrapper = toml::from_str(&serialized).unwrap();
            assert_eq!(back.snooze, directive);
        }
    }
}
