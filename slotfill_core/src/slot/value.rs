use fancy_regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::validate_name;
use crate::error::{Result, SlotError};
use crate::template;

/// Extraction callback of a function slot.
pub type SlotFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Rule a leaf slot uses to obtain its value from the latest request.
#[derive(Clone)]
pub enum Extractor {
    /// The value is assigned programmatically and survives extraction.
    Static,
    /// The value is a capture group of the first match. Look-around and
    /// backreferences are supported.
    Regexp { regex: Regex, target_group: usize },
    Function(SlotFn),
}

impl Extractor {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Static => "value",
            Self::Regexp { .. } => "regexp",
            Self::Function(_) => "function",
        }
    }

    /// Run the rule against `input`. Static extractors never produce a value.
    #[must_use]
    pub fn extract(&self, input: &str) -> Option<String> {
        match self {
            Self::Static => None,
            Self::Regexp {
                regex,
                target_group,
            } => match regex.captures(input) {
                Ok(caps) => caps
                    .and_then(|caps| caps.get(*target_group))
                    .map(|m| m.as_str().to_string()),
                Err(e) => {
                    debug!("Pattern '{}' gave up on input: {e}", regex.as_str());
                    None
                }
            },
            Self::Function(func) => func(input),
        }
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => f.write_str("Static"),
            Self::Regexp {
                regex,
                target_group,
            } => f
                .debug_struct("Regexp")
                .field("pattern", &regex.as_str())
                .field("target_group", target_group)
                .finish(),
            Self::Function(_) => f.write_str("Function(<fn>)"),
        }
    }
}

impl PartialEq for Extractor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Static, Self::Static) => true,
            (
                Self::Regexp {
                    regex: a,
                    target_group: ga,
                },
                Self::Regexp {
                    regex: b,
                    target_group: gb,
                },
            ) => a.as_str() == b.as_str() && ga == gb,
            (Self::Function(a), Self::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Leaf slot holding an optional string value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSlot {
    name: String,
    value: Option<String>,
    extractor: Extractor,
}

impl ValueSlot {
    /// Plain value slot, filled with [`ValueSlot::set_value`] or [`ValueSlot::with_value`].
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_extractor(name, Extractor::Static)
    }

    /// Slot that takes the whole match of `pattern`.
    ///
    /// Use [`ValueSlot::with_target_group`] to pick a capture group instead.
    pub fn regexp(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|source| SlotError::InvalidRegex {
            name: name.clone(),
            source: Box::new(source),
        })?;
        Self::with_extractor(
            name,
            Extractor::Regexp {
                regex,
                target_group: 0,
            },
        )
    }

    pub fn function<F>(name: impl Into<String>, func: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self::with_extractor(name, Extractor::Function(Arc::new(func)))
    }

    pub fn with_extractor(name: impl Into<String>, extractor: Extractor) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            value: None,
            extractor,
        })
    }

    /// Select the capture group a regexp slot keeps. No-op for other kinds.
    #[must_use]
    pub fn with_target_group(mut self, group: usize) -> Self {
        if let Extractor::Regexp { target_group, .. } = &mut self.extractor {
            *target_group = group;
        }
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    #[must_use]
    pub const fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    pub fn unset_value(&mut self) {
        self.value = None;
    }

    /// Value this slot would hold after extracting from `input`, without storing it.
    #[must_use]
    pub fn evaluate(&self, input: &str) -> Option<String> {
        match self.extractor {
            Extractor::Static => self.value.clone(),
            _ => self.extractor.extract(input),
        }
    }

    pub fn extract_value(&mut self, input: &str) -> Option<String> {
        self.value = self.evaluate(input);
        self.value.clone()
    }

    /// Replace `{name}` with the value. Unset slots leave the template untouched.
    #[must_use]
    pub fn fill_template(&self, template: &str) -> String {
        match &self.value {
            Some(value) => {
                template::fill(template, |name| (name == self.name).then_some(value.as_str()))
            }
            None => template.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regexp_whole_match() {
        let Ok(mut slot) = ValueSlot::regexp("email", r"[a-zA-Z.]+@[a-zA-Z.]+") else {
            panic!("pattern should compile");
        };
        let value = slot.extract_value("My email is groot@gmail.com");
        assert_eq!(value.as_deref(), Some("groot@gmail.com"));
        assert!(slot.is_set());
    }

    #[test]
    fn test_regexp_target_group() {
        let Ok(slot) = ValueSlot::regexp("cuisine", r" ([A-Za-z]+) cuisine") else {
            panic!("pattern should compile");
        };
        let mut slot = slot.with_target_group(1);
        assert_eq!(
            slot.extract_value("I want some Italian cuisine").as_deref(),
            Some("Italian")
        );
    }

    #[test]
    fn test_regexp_look_around() {
        let Ok(mut slot) = ValueSlot::regexp("name", r"(?<=am ).+?(?=\.)") else {
            panic!("look-around should compile");
        };
        assert_eq!(
            slot.extract_value("I am Groot. My email is groot@gmail.com").as_deref(),
            Some("Groot")
        );
        assert_eq!(slot.extract_value("I am Groot"), None);
    }

    #[test]
    fn test_regexp_no_match_is_unset() {
        let Ok(mut slot) = ValueSlot::regexp("name", r"name is (.+)$") else {
            panic!("pattern should compile");
        };
        slot = slot.with_target_group(1);
        assert_eq!(slot.extract_value("I won't tell you my name"), None);
        assert!(!slot.is_set());
    }

    #[test]
    fn test_missing_group_is_unset() {
        let Ok(slot) = ValueSlot::regexp("address", r"at (.+)|in (.+)") else {
            panic!("pattern should compile");
        };
        let mut slot = slot.with_target_group(1);
        assert_eq!(slot.extract_value("somewhere in Paris"), None);
        assert_eq!(slot.extract_value("at Baker street").as_deref(), Some("Baker street"));
    }

    #[test]
    fn test_extraction_not_cached_across_inputs() {
        let Ok(mut slot) = ValueSlot::regexp("number", r"[0-9]+") else {
            panic!("pattern should compile");
        };
        assert_eq!(slot.extract_value("table for 4").as_deref(), Some("4"));
        assert_eq!(slot.extract_value("no idea"), None);
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let result = ValueSlot::regexp("broken", r"(unclosed");
        assert!(matches!(result, Err(SlotError::InvalidRegex { .. })));
    }

    #[test]
    fn test_function_slot() {
        let Ok(mut slot) = ValueSlot::function("word", |msg| {
            msg.split(' ').nth(2).map(str::to_string)
        }) else {
            panic!("name should be valid");
        };
        assert_eq!(slot.extract_value("I am Groot").as_deref(), Some("Groot"));
        assert_eq!(slot.extract_value("Hi"), None);
    }

    #[test]
    fn test_static_value_survives_extraction() {
        let Ok(slot) = ValueSlot::new("plan") else {
            panic!("name should be valid");
        };
        let mut slot = slot.with_value("basic");
        assert_eq!(slot.extract_value("anything").as_deref(), Some("basic"));
        slot.unset_value();
        assert!(!slot.is_set());
    }

    #[test]
    fn test_fill_template() {
        let Ok(slot) = ValueSlot::new("name") else {
            panic!("name should be valid");
        };
        assert_eq!(slot.fill_template("Hi {name}"), "Hi {name}");
        let slot = slot.with_value("Groot");
        assert_eq!(slot.fill_template("Hi {name}, {name}!"), "Hi Groot, Groot!");
    }

    #[test]
    fn test_function_equality_is_identity() {
        let func: SlotFn = Arc::new(|_: &str| -> Option<String> { None });
        let a = ValueSlot::with_extractor("a", Extractor::Function(Arc::clone(&func)));
        let b = ValueSlot::with_extractor("a", Extractor::Function(func));
        let c = ValueSlot::function("a", |_| None);
        assert!(matches!((a, b, c), (Ok(a), Ok(b), Ok(c)) if a == b && a != c));
    }
}
