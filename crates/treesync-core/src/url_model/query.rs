//! Query-parameter extraction and percent decoding for wrapped links.

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::error::{Error, Result};

/// Returns the raw (still encoded) value of `name` from `url`, using the
/// loose `name=(.*?)(&|$)` match redirect wrappers need: the value runs to
/// the next `&` or the end of the string.
pub fn extract_query_param(url: &str, name: &str) -> Result<String> {
    let pattern =
        Regex::new(&format!(r"{}=(.*?)(?:&|$)", regex::escape(name))).expect("valid regex");
    pattern
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "the URL doesn't contain required query parameter '{}'",
                name
            ))
        })
}

/// Form-style URL decoding: `+` becomes a space, `%XX` sequences are decoded,
/// malformed escapes are left as they are.
pub fn url_decode(s: &str) -> String {
    let plus_decoded = s.replace('+', " ");
    percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Removes every whitespace character.
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_value_up_to_ampersand() {
        let v = extract_query_param(
            "https://www.google.com/url?q=http://tinyurl.com/abc&sa=D&ust=1",
            "q",
        )
        .unwrap();
        assert_eq!(v, "http://tinyurl.com/abc");
    }

    #[test]
    fn extracts_value_at_end() {
        let v = extract_query_param("https://www.google.com/url?sa=t&q=goo.gl/xyz", "q").unwrap();
        assert_eq!(v, "goo.gl/xyz");
    }

    #[test]
    fn empty_value_is_allowed() {
        assert_eq!(extract_query_param("https://google.com/url?q=&x=1", "q").unwrap(), "");
    }

    #[test]
    fn missing_param_is_invalid_input() {
        let err = extract_query_param("https://www.google.com/url?x=1", "q").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("'q'"));
    }

    #[test]
    fn decodes_percent_and_plus() {
        assert_eq!(
            url_decode("https%3A%2F%2Fpathofexile.com%2Fpassive-skill-tree%2FAAAA"),
            "https://pathofexile.com/passive-skill-tree/AAAA"
        );
        assert_eq!(url_decode("a+b%2Bc"), "a b+c");
        assert_eq!(url_decode("100%"), "100%");
    }

    #[test]
    fn strips_all_whitespace() {
        assert_eq!(strip_whitespace(" https://goo.gl/\tab c\n"), "https://goo.gl/abc");
    }
}
