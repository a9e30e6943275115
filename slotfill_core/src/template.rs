//! Placeholder handling for response templates.
//!
//! Placeholders are slot paths in curly braces: `{username}`,
//! `{person/username}`. The dotted spelling `{person.username}` is accepted
//! as an alias of the slash-separated path.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::slot::SEPARATOR;

#[expect(clippy::unwrap_used, reason = "Pattern is a compile-time constant")]
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}\s]+)\}").unwrap());

/// Replace every placeholder `lookup` knows a value for, in a single pass.
///
/// Inserted values are never scanned again, so a value that itself looks like
/// `{other}` stays literal. A dotted placeholder falls back to its slash path.
#[must_use]
pub fn fill<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let Some(name) = caps.get(1).map(|m| m.as_str()) else {
                return whole.to_string();
            };
            lookup(name)
                .or_else(|| {
                    name.contains('.')
                        .then(|| name.replace('.', &SEPARATOR.to_string()))
                        .and_then(|path| lookup(&path))
                })
                .map_or_else(|| whole.to_string(), str::to_string)
        })
        .into_owned()
}

/// Placeholder names still present in `template`, in order of appearance.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(values: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<&'a str> {
        move |name| {
            values
                .iter()
                .find(|(path, _)| *path == name)
                .map(|(_, value)| *value)
        }
    }

    #[test]
    fn test_fill_plain_and_dotted() {
        let values = [("name", "Groot"), ("person/name", "Groot")];
        assert_eq!(fill("Hi {name}", lookup(&values)), "Hi Groot");
        assert_eq!(
            fill("{person/name} / {person.name}", lookup(&values)),
            "Groot / Groot"
        );
        assert_eq!(fill("{other}", lookup(&values)), "{other}");
    }

    #[test]
    fn test_inserted_values_are_not_rescanned() {
        let values = [("name", "{email}"), ("email", "groot@gmail.com")];
        assert_eq!(
            fill("{name} <{email}>", lookup(&values)),
            "{email} <groot@gmail.com>"
        );
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            placeholders("Your friend is {friend/first_name} {friend.last_name}"),
            vec!["friend/first_name", "friend.last_name"]
        );
        assert!(placeholders("no braces { here }").is_empty());
    }
}
