//! String helpers.

use regex::Regex;

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reverse a string character by character.
pub fn reverse(text: &str) -> String {
    text.chars().rev().collect()
}

/// Capture groups of the first `regex` match in `text`, without the full
/// match itself.
///
/// Returns `None` when nothing matches; groups that did not participate in
/// the match come back as empty strings.
pub fn captures(text: &str, regex: &Regex) -> Option<Vec<String>> {
    regex.captures(text).map(|caps| {
        caps.iter()
            .skip(1)
            .map(|group| group.map_or(String::new(), |m| m.as_str().to_string()))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_first_letter() {
        assert_eq!(capitalize("hello"), "Hello");
    }

    #[test]
    fn test_capitalize_leaves_rest_untouched() {
        assert_eq!(capitalize("hello World"), "Hello World");
        assert_eq!(capitalize("HELLO"), "HELLO");
    }

    #[test]
    fn test_capitalize_empty_string() {
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_capitalize_expanding_uppercase() {
        // One character may uppercase into several.
        assert_eq!(capitalize("ßut"), "SSut");
    }

    #[test]
    fn test_reverse_ascii() {
        assert_eq!(reverse("hello"), "olleh");
    }

    #[test]
    fn test_reverse_is_character_wise() {
        assert_eq!(reverse("héllo"), "olléh");
    }

    #[test]
    fn test_reverse_empty_string() {
        assert_eq!(reverse(""), "");
    }

    #[test]
    fn test_captures_returns_groups_without_full_match() {
        let regex = Regex::new(r"(\d+)-(\d+)").unwrap();
        assert_eq!(
            captures("call 12-34 now", &regex),
            Some(vec!["12".to_string(), "34".to_string()])
        );
    }

    #[test]
    fn test_captures_none_when_no_match() {
        let regex = Regex::new(r"(\d+)").unwrap();
        assert_eq!(captures("no digits here", &regex), None);
    }

    #[test]
    fn test_captures_unmatched_group_is_empty() {
        let regex = Regex::new(r"(a)(b)?").unwrap();
        assert_eq!(
            captures("a", &regex),
            Some(vec!["a".to_string(), String::new()])
        );
    }
}
