use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single key with optional modifiers, parsed from strings like
/// `"enter"`, `"ctrl+z"` or `"y"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub const fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        let code_matches = match (self.code, event.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        let relevant = KeyModifiers::CONTROL | KeyModifiers::ALT;
        code_matches && (self.modifiers & relevant) == (event.modifiers & relevant)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "alt+")?;
        }
        match self.code {
            KeyCode::Char(' ') => write!(f, "space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Enter => write!(f, "enter"),
            KeyCode::Esc => write!(f, "esc"),
            KeyCode::Tab => write!(f, "tab"),
            KeyCode::Backspace => write!(f, "backspace"),
            _ => write!(f, "?"),
        }
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = s.trim();
        loop {
            if let Some(stripped) = rest.strip_prefix("ctrl+") {
                modifiers |= KeyModifiers::CONTROL;
                rest = stripped;
            } else if let Some(stripped) = rest.strip_prefix("alt+") {
                modifiers |= KeyModifiers::ALT;
                rest = stripped;
            } else {
                break;
            }
        }

        let code = match rest.to_ascii_lowercase().as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "space" => KeyCode::Char(' '),
            k if k.chars().count() == 1 => {
                // Preserve case from the original input for single chars
                KeyCode::Char(rest.chars().next().ok_or("empty key")?)
            }
            _ => return Err(format!("Unknown key: {rest}")),
        };

        Ok(Self { code, modifiers })
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// One or more keys bound to the same action.
///
/// Serialized as a single key string or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyBinding(Vec<Key>);

impl KeyBinding {
    pub fn of(keys: impl IntoIterator<Item = Key>) -> Self {
        Self(keys.into_iter().collect())
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.0.iter().any(|k| k.matches(event))
    }

    pub fn display(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl From<Key> for KeyBinding {
    fn from(key: Key) -> Self {
        Self(vec![key])
    }
}

impl<'de> Deserialize<'de> for KeyBinding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(Key),
            Many(Vec<Key>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::One(key) => Self(vec![key]),
            Raw::Many(keys) => Self(keys),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parsing() {
        assert_eq!(Key::from_str("y").unwrap(), Key::new(KeyCode::Char('y')));
        assert_eq!(Key::from_str("Enter").unwrap(), Key::new(KeyCode::Enter));
        assert_eq!(
            Key::from_str("ctrl+z").unwrap(),
            Key::ctrl(KeyCode::Char('z'))
        );
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::new(KeyCode::Esc).to_string(), "esc");
        assert_eq!(Key::ctrl(KeyCode::Char('z')).to_string(), "ctrl+z");
    }

    #[test]
    fn test_key_matches_ignores_case() {
        let key = Key::new(KeyCode::Char('y'));
        let event = KeyEvent::new(KeyCode::Char('Y'), KeyModifiers::SHIFT);
        assert!(key.matches(&event));
    }

    #[test]
    fn test_binding_matches_any() {
        let binding = KeyBinding::of([Key::new(KeyCode::Enter), Key::new(KeyCode::Char('y'))]);
        assert!(binding.matches(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(binding.matches(&KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE)));
        assert!(!binding.matches(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
    }

    #[test]
    fn test_binding_deserializes_single_or_list() {
        #[derive(Deserialize)]
        struct Wrapper {
            keys: KeyBinding,
        }

        let single: Wrapper = toml::from_str(r#"keys = "enter""#).unwrap();
        assert!(single.keys.matches(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));

        let list: Wrapper = toml::from_str(r#"keys = ["enter", "y"]"#).unwrap();
        assert!(list.keys.matches(&KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE)));
    }
}
