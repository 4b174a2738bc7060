//! Identifier case conversion.
//!
//! Storage uses `snake_case`, application code uses `camelCase`. The two
//! converters here are the only place either convention is encoded.
//!
//! # Word boundaries
//!
//! [`to_snake_case`] only inserts a separator on a lower-to-upper transition
//! between two ASCII letters. Digits, underscores and punctuation never start
//! a new word and never count as the lower-case half of a transition, and a
//! run of capitals stays one word:
//!
//! ```
//! use tablekit_core::case::to_snake_case;
//!
//! assert_eq!(to_snake_case("fooBar"), "foo_bar");
//! assert_eq!(to_snake_case("fooBAR"), "foo_bar");
//! assert_eq!(to_snake_case("foo1Bar"), "foo1bar");
//! assert_eq!(to_snake_case("foo_Bar"), "foo_bar");
//! ```

/// Converts a `camelCase` or `PascalCase` identifier to `snake_case`.
///
/// Strings shorter than two characters are only lower-cased.
pub fn to_snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() < 2 {
        return input.to_lowercase();
    }

    let mut out = String::with_capacity(input.len() + 4);
    out.extend(chars[0].to_lowercase());

    for pair in chars.windows(2) {
        let (prev, ch) = (pair[0], pair[1]);
        if ch.is_ascii_uppercase() && prev.is_ascii_lowercase() {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
    }

    out
}

/// Converts an identifier in any common convention to `camelCase`.
///
/// Words are split on non-alphanumeric characters and on camel boundaries
/// (`fooBar`, `HTTPServer`), lower-cased, and joined with the initial of
/// every word after the first upper-cased.
///
/// # Examples
///
/// ```
/// use tablekit_core::case::to_camel_case;
///
/// assert_eq!(to_camel_case("created_at"), "createdAt");
/// assert_eq!(to_camel_case("FOO_BAR"), "fooBar");
/// assert_eq!(to_camel_case("fooBar"), "fooBar");
/// ```
pub fn to_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for (i, word) in split_words(input).into_iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut rest = lower.chars();
        if let Some(first) = rest.next() {
            out.extend(first.to_uppercase());
            out.push_str(rest.as_str());
        }
    }

    out
}

fn split_words(input: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut words = Vec::new();
    let mut start: Option<usize> = None;

    for (pos, &(idx, ch)) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if let Some(s) = start.take() {
                words.push(&input[s..idx]);
            }
            continue;
        }

        let Some(s) = start else {
            start = Some(idx);
            continue;
        };

        // `start` is only set after an alphanumeric char, so `pos > 0`.
        let prev = chars[pos - 1].1;
        let next = chars.get(pos + 1).map(|&(_, c)| c);
        let boundary = ch.is_uppercase()
            && (prev.is_lowercase()
                || (prev.is_uppercase() && next.is_some_and(char::is_lowercase)));

        if boundary {
            words.push(&input[s..idx]);
            start = Some(idx);
        }
    }

    if let Some(s) = start {
        words.push(&input[s..]);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_basic_boundaries() {
        assert_eq!(to_snake_case("fooBar"), "foo_bar");
        assert_eq!(to_snake_case("FooBarBaz"), "foo_bar_baz");
        assert_eq!(to_snake_case("createdAt"), "created_at");
    }

    #[test]
    fn test_snake_case_short_inputs() {
        assert_eq!(to_snake_case(""), "");
        assert_eq!(to_snake_case("a"), "a");
        assert_eq!(to_snake_case("A"), "a");
    }

    #[test]
    fn test_snake_case_capital_runs_are_not_split() {
        assert_eq!(to_snake_case("fooBAR"), "foo_bar");
        assert_eq!(to_snake_case("ABC"), "abc");
        assert_eq!(to_snake_case("userID"), "user_id");
    }

    #[test]
    fn test_snake_case_digits_and_symbols_never_split() {
        assert_eq!(to_snake_case("foo1Bar"), "foo1bar");
        assert_eq!(to_snake_case("foo_Bar"), "foo_bar");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("v2"), "v2");
    }

    #[test]
    fn test_camel_case_from_snake() {
        assert_eq!(to_camel_case("foo_bar"), "fooBar");
        assert_eq!(to_camel_case("foo_bar_baz"), "fooBarBaz");
        assert_eq!(to_camel_case("id"), "id");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_camel_case_other_conventions() {
        assert_eq!(to_camel_case("FOO_BAR"), "fooBar");
        assert_eq!(to_camel_case("foo-bar baz"), "fooBarBaz");
        assert_eq!(to_camel_case("HTTPServer"), "httpServer");
        assert_eq!(to_camel_case("__leading"), "leading");
    }

    #[test]
    fn test_snake_then_camel_round_trips_without_capital_runs() {
        for ident in ["fooBar", "createdAt", "a", "userAccountId", "x", "abc"] {
            assert_eq!(to_camel_case(&to_snake_case(ident)), ident, "{ident}");
        }
    }

    #[test]
    fn test_capital_runs_collapse_on_round_trip() {
        assert_eq!(to_camel_case(&to_snake_case("fooBAR")), "fooBar");
    }
}
