//! `WWW-Authenticate` challenge parsing.
//!
//! Only what is needed to recognize a bearer challenge
//! ([RFC 6750 section 3](https://datatracker.ietf.org/doc/html/rfc6750#section-3)) is parsed.
use http::header::WWW_AUTHENTICATE;
use http::HeaderMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub scheme: String,
    pub params: Vec<(String, String)>,
}

impl Challenge {
    /// Parses the first challenge of a header value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::parse_all(value).into_iter().next()
    }
    /// Parses every challenge of a header value.
    ///
    /// A comma-separated item whose first token is not followed by `=` starts a new
    /// challenge, so `Basic realm="x", Bearer error="invalid_token"` yields two.
    pub fn parse_all(value: &str) -> Vec<Self> {
        let mut challenges: Vec<Self> = Vec::new();
        for item in split_items(value) {
            let item = item.trim();
            let end = item.find(|c: char| c.is_whitespace() || c == '=').unwrap_or(item.len());
            let (name, rest) = item.split_at(end);
            if name.is_empty() {
                continue;
            }
            let rest = rest.trim_start();
            if let Some(value) = rest.strip_prefix('=') {
                if let Some(challenge) = challenges.last_mut() {
                    challenge.params.push((name.into(), unquote(value.trim())));
                }
                continue;
            }
            let mut challenge = Self { scheme: name.into(), params: Vec::new() };
            // a token68 credential has no parameter name and is not kept
            if let Some((key, value)) = rest.split_once('=') {
                let key = key.trim();
                if !key.is_empty() && !key.contains(char::is_whitespace) {
                    challenge.params.push((key.into(), unquote(value.trim())));
                }
            }
            challenges.push(challenge);
        }
        challenges
    }
    pub fn is_bearer(&self) -> bool {
        self.scheme.eq_ignore_ascii_case("bearer")
    }
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }
}

/// Returns the first `Bearer` challenge found in the `WWW-Authenticate` headers.
pub fn bearer_challenge(headers: &HeaderMap) -> Option<Challenge> {
    headers
        .get_all(WWW_AUTHENTICATE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Challenge::parse_all)
        .find(Challenge::is_bearer)
}

/// Splits at the commas outside quoted strings.
fn split_items(input: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let (mut start, mut quoted, mut escaped) = (0, false, false);
    for (i, c) in input.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ',' if !quoted => {
                items.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&input[start..]);
    items
}

fn unquote(value: &str) -> String {
    let Some(quoted) = value.strip_prefix('"') else {
        return value.to_string();
    };
    let mut unquoted = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => unquoted.extend(chars.next()),
            c => unquoted.push(c),
        }
    }
    unquoted
}
