//! Checks applied to user text before it is embedded into a prompt.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::framework::Error;

pub const DEFAULT_MAX_LENGTH: usize = 10_000;

lazy_static! {
    static ref SCRIPT_BLOCK: Regex = Regex::new(r"(?i)<script[^>]*>.*?</script>").unwrap();
    static ref MARKUP_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Config {
    pub max_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

/// Removes script blocks and markup tags, then trims surrounding whitespace.
pub fn sanitize(text: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(text, "");
    let without_tags = MARKUP_TAG.replace_all(&without_scripts, "");

    without_tags.trim().to_string()
}

/// Returns the sanitized text, or a validation error when the input is empty,
/// longer than `max_length` characters, or nothing but markup.
pub fn validate_input(text: &str, max_length: usize) -> Result<String, Error> {
    if text.is_empty() {
        return Err(Error::validation("input must be a non-empty string"));
    }

    if text.chars().count() > max_length {
        return Err(Error::validation(format!(
            "input exceeds maximum length of {max_length} characters"
        )));
    }

    let sanitized = sanitize(text);

    if sanitized.is_empty() {
        return Err(Error::validation("input contains no valid content"));
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_input() {
        let err = validate_input("", DEFAULT_MAX_LENGTH).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn rejects_oversized_input() {
        let text = "a".repeat(11);

        assert!(validate_input(&text, 10).is_err());
        assert_eq!(validate_input(&text[..10], 10).unwrap(), "a".repeat(10));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let text = "é".repeat(10);
        assert!(validate_input(&text, 10).is_ok());
    }

    #[test]
    fn strips_scripts_and_tags() {
        let text = "  Today was <b>good</b>.<SCRIPT type=\"x\">alert(1)</script> Really. ";
        assert_eq!(validate_input(text, 200).unwrap(), "Today was good. Really.");
    }

    #[test]
    fn rejects_markup_only_input() {
        let err = validate_input("<div><br/></div>   ", 200).unwrap_err();

        match err {
            Error::Validation(msg) => assert_eq!(msg, "input contains no valid content"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn rejects_whitespace_only_input() {
        assert!(validate_input("   \n\t", 200).is_err());
    }
}
