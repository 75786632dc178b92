//! Raw host settings to native values.
//!
//! Coercion never fails: a value that does not parse becomes the zero of
//! its kind, and reading a key that is absent or of another kind yields the
//! zero of the requested kind.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::schema::{Setting, SettingKind};
use crate::host::RawSetting;

/// A coerced setting value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Int(i64),
    Float(f32),
    Bool(bool),
    Text(String),
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Int(_) => SettingKind::Int,
            SettingValue::Float(_) => SettingKind::Float,
            SettingValue::Bool(_) => SettingKind::Bool,
            SettingValue::Text(_) => SettingKind::Text,
        }
    }
}

/// Host setting id -> coerced value, produced fresh on every reload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedSettings {
    values: HashMap<String, SettingValue>,
}

impl TypedSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: SettingValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reads an integer setting.
    ///
    /// A slider that coerced to a float is truncated toward zero.
    pub fn int(&self, setting: Setting) -> i64 {
        match self.lookup(setting, SettingKind::Int) {
            Some(SettingValue::Int(v)) => *v,
            Some(SettingValue::Float(v)) => *v as i64,
            _ => 0,
        }
    }

    /// Reads a float setting. A slider that coerced to an integer is widened.
    pub fn float(&self, setting: Setting) -> f32 {
        match self.lookup(setting, SettingKind::Float) {
            Some(SettingValue::Float(v)) => *v,
            Some(SettingValue::Int(v)) => *v as f32,
            _ => 0.0,
        }
    }

    pub fn flag(&self, setting: Setting) -> bool {
        matches!(
            self.lookup(setting, SettingKind::Bool),
            Some(SettingValue::Bool(true))
        )
    }

    pub fn text(&self, setting: Setting) -> String {
        match self.lookup(setting, SettingKind::Text) {
            Some(SettingValue::Text(v)) => v.clone(),
            _ => String::new(),
        }
    }

    fn lookup(&self, setting: Setting, wanted: SettingKind) -> Option<&SettingValue> {
        let key = setting.as_str();
        let value = self.values.get(key)?;

        let numeric = |k: SettingKind| matches!(k, SettingKind::Int | SettingKind::Float);
        if value.kind() == wanted || (numeric(value.kind()) && numeric(wanted)) {
            return Some(value);
        }

        tracing::warn!(
            "Setting '{}' holds {:?}, expected {:?}; using default",
            key,
            value.kind(),
            wanted
        );
        None
    }
}

fn parse_int(value: &str) -> i64 {
    value.parse().unwrap_or(0)
}

fn parse_float(value: &str) -> f32 {
    value.parse().unwrap_or(0.0)
}

/// Coerces a single raw setting according to its declared type.
pub fn coerce_value(raw: &RawSetting) -> SettingValue {
    match raw.kind.as_str() {
        "enum" | "number" => SettingValue::Int(parse_int(&raw.value)),
        "slider" => {
            let (as_int, as_float) = match raw.option.as_str() {
                "percent" | "int" => (parse_float(&raw.value) as i64, 0.0),
                "float" => (0, parse_float(&raw.value)),
                _ => (0, 0.0),
            };
            // Only a strictly positive float is kept as a float; zero and
            // negative values fall back to the integer form.
            if as_float > 0.0 {
                SettingValue::Float(as_float)
            } else {
                SettingValue::Int(as_int)
            }
        }
        "bool" => SettingValue::Bool(raw.value == "true"),
        _ => SettingValue::Text(raw.value.clone()),
    }
}

/// Coerces every raw setting. Later duplicates of a key win.
pub fn coerce(raw: &[RawSetting]) -> TypedSettings {
    let mut typed = TypedSettings::new();
    for setting in raw {
        typed.insert(setting.key.clone(), coerce_value(setting));
    }
    typed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_and_number() {
        assert_eq!(
            coerce_value(&RawSetting::new("k", "enum", "3")),
            SettingValue::Int(3)
        );
        assert_eq!(
            coerce_value(&RawSetting::new("k", "number", "-12")),
            SettingValue::Int(-12)
        );
        assert_eq!(
            coerce_value(&RawSetting::new("k", "enum", "garbage")),
            SettingValue::Int(0)
        );
        // Integers are parsed strictly.
        assert_eq!(
            coerce_value(&RawSetting::new("k", "number", "4.5")),
            SettingValue::Int(0)
        );
    }

    #[test]
    fn test_slider_percent_truncates() {
        assert_eq!(
            coerce_value(&RawSetting::slider("k", "percent", "42.0")),
            SettingValue::Int(42)
        );
        assert_eq!(
            coerce_value(&RawSetting::slider("k", "int", "7.9")),
            SettingValue::Int(7)
        );
    }

    #[test]
    fn test_slider_float_keeps_fraction() {
        assert_eq!(
            coerce_value(&RawSetting::slider("k", "float", "0.5")),
            SettingValue::Float(0.5)
        );
    }

    #[test]
    fn test_slider_non_positive_float_stored_as_int() {
        // Observed behavior: zero and negative floats lose their float form.
        assert_eq!(
            coerce_value(&RawSetting::slider("k", "float", "-1.5")),
            SettingValue::Int(0)
        );
        assert_eq!(
            coerce_value(&RawSetting::slider("k", "float", "0.0")),
            SettingValue::Int(0)
        );
    }

    #[test]
    fn test_slider_unknown_option() {
        assert_eq!(
            coerce_value(&RawSetting::slider("k", "", "12")),
            SettingValue::Int(0)
        );
    }

    #[test]
    fn test_bool_requires_exact_true() {
        assert_eq!(
            coerce_value(&RawSetting::new("k", "bool", "true")),
            SettingValue::Bool(true)
        );
        for value in ["True", "1", "yes", ""] {
            assert_eq!(
                coerce_value(&RawSetting::new("k", "bool", value)),
                SettingValue::Bool(false)
            );
        }
    }

    #[test]
    fn test_text_is_unchanged() {
        assert_eq!(
            coerce_value(&RawSetting::new("k", "text", "  spaced  ")),
            SettingValue::Text("  spaced  ".to_string())
        );
        assert_eq!(
            coerce_value(&RawSetting::new("k", "folder", "/a/b")),
            SettingValue::Text("/a/b".to_string())
        );
    }

    #[test]
    fn test_float_read_widens_int_slider() {
        let typed = coerce(&[
            RawSetting::slider("memory_size", "int", "40"),
            RawSetting::slider("buffer_size", "float", "2.5"),
            RawSetting::new("proxy_host", "text", "h"),
        ]);

        assert_eq!(typed.float(Setting::MemorySize), 40.0);
        assert_eq!(typed.float(Setting::BufferSize), 2.5);
        assert_eq!(typed.float(Setting::ProxyHost), 0.0);
        assert_eq!(typed.float(Setting::ProxyPort), 0.0);
    }

    #[test]
    fn test_typed_reads_default_on_missing_or_mismatch() {
        let typed = coerce(&[
            RawSetting::new("proxy_host", "bool", "true"),
            RawSetting::slider("memory_size", "float", "12.75"),
            RawSetting::new("proxy_port", "number", "1080"),
        ]);

        assert_eq!(typed.len(), 3);
        assert_eq!(typed.text(Setting::ProxyHost), "");
        assert_eq!(typed.int(Setting::MemorySize), 12);
        assert_eq!(typed.int(Setting::ProxyPort), 1080);
        assert!(!typed.flag(Setting::ProxyEnabled));
        assert_eq!(typed.int(Setting::ConnectionsLimit), 0);
    }

    #[test]
    fn test_unknown_keys_are_kept_but_unread() {
        let typed = coerce(&[RawSetting::new("future_setting", "enum", "2")]);
        assert_eq!(typed.get("future_setting"), Some(&SettingValue::Int(2)));
        assert!(!typed.is_empty());
    }
}
