//! Scheme/host completion for known build hosts.

use regex::Regex;
use std::collections::HashMap;

/// Known hosts and the prefix they are completed to. Where a host serves
/// both http and https, https is preferred.
const COMPLETIONS: &[(&str, &str)] = &[
    ("goo.gl", "https://goo.gl"),
    ("poeurl.com", "http://poeurl.com"),
    ("tinyurl.com", "https://tinyurl.com"),
    ("pathofexile.com", "https://pathofexile.com"),
    ("br.pathofexile.com", "https://br.pathofexile.com"),
    ("ru.pathofexile.com", "https://ru.pathofexile.com"),
];

/// Immutable hostname → `scheme://host` table plus the prefix matcher.
#[derive(Debug, Clone)]
pub struct CompletionTable {
    rules: HashMap<&'static str, &'static str>,
    prefix: Regex,
}

impl CompletionTable {
    pub fn new() -> Self {
        Self {
            rules: COMPLETIONS.iter().copied().collect(),
            // Optional scheme, optional `www.`, then the bare host up to the
            // first `/`, `?` or `#`.
            prefix: Regex::new(r"^(?P<prefix>(?:https?://)?(?:www\.)?(?P<host>.*?))[/?#]")
                .expect("valid regex"),
        }
    }

    /// Canonical prefix for `host`, if it is a known build host.
    pub fn lookup(&self, host: &str) -> Option<&'static str> {
        self.rules.get(host.to_ascii_lowercase().as_str()).copied()
    }

    pub fn hosts(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }

    /// Replaces the scheme/`www.`/host prefix of `url` with the canonical
    /// prefix when the host is known. Unknown hosts and URLs with no path,
    /// query or fragment delimiter are returned unchanged.
    pub fn complete(&self, url: &str) -> String {
        let Some(caps) = self.prefix.captures(url) else {
            return url.to_string();
        };
        let (Some(prefix), Some(host)) = (caps.name("prefix"), caps.name("host")) else {
            return url.to_string();
        };
        match self.lookup(host.as_str()) {
            Some(canonical) => format!("{}{}", canonical, &url[prefix.end()..]),
            None => url.to_string(),
        }
    }
}

impl Default for CompletionTable {
    fn default() -> Self {
        Self::new()
    }
}
