//! UI string lookup.
//!
//! Dictionaries are nested JSON objects flattened to dotted keys, so
//! `{"buttons": {"convert": "Convert"}}` is looked up as `buttons.convert`.
//! Missing keys fall back to English, then to the key itself.

use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_LANGUAGE: &str = "en";

const BUILTIN: [(&str, &str); 2] = [
    ("en", include_str!("../locales/en.json")),
    ("tr", include_str!("../locales/tr.json")),
];

#[derive(Debug, Clone)]
pub struct Translator {
    language: String,
    strings: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Translator {
    pub fn new(language: &str) -> Self {
        let fallback = builtin(DEFAULT_LANGUAGE).unwrap_or_default();
        let strings = builtin(language).unwrap_or_else(|| fallback.clone());
        Self {
            language: language.to_string(),
            strings,
            fallback,
        }
    }

    pub fn builtin_languages() -> Vec<&'static str> {
        BUILTIN.iter().map(|(code, _)| *code).collect()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Overlays a server-provided dictionary for the current language.
    pub fn merge_locale(&mut self, locale: &Value) {
        let flat = flatten(locale);
        tracing::debug!("Merging {} strings for '{}'", flat.len(), self.language);
        self.strings.extend(flat);
    }

    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings
            .get(key)
            .or_else(|| self.fallback.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }

    /// Looks up `key` and substitutes `{name}` placeholders.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.get(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

fn builtin(language: &str) -> Option<HashMap<String, String>> {
    let (_, raw) = BUILTIN.iter().find(|(code, _)| *code == language)?;
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => Some(flatten(&value)),
        Err(e) => {
            tracing::error!("Built-in locale '{}' is invalid: {}", language, e);
            None
        }
    }
}

pub fn flatten(value: &Value) -> HashMap<String, String> {
    let mut out = HashMap::new();
    flatten_into(value, String::new(), &mut out);
    out
}

fn flatten_into(value: &Value, prefix: String, out: &mut HashMap<String, String>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(child, join(key), out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten_into(child, join(&i.to_string()), out);
            }
        }
        Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        Value::Null => {}
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}
