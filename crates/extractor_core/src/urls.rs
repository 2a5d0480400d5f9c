use thiserror::Error;
use url::{ParseError, Url};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("URL cannot be empty")]
    EmptyInput,
    #[error("URL must use HTTP or HTTPS protocol (got {0})")]
    InvalidScheme(String),
    #[error("URL must have a valid hostname")]
    MissingHost,
    #[error("Invalid URL format: {0}")]
    MalformedUrl(String),
}

/// An input token that failed validation, kept for bulk reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedUrl {
    pub input: String,
    pub error: UrlError,
}

/// Validates one URL after defaulting a missing scheme to `https://`.
/// No network resolution happens here.
pub fn validate_url(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::EmptyInput);
    }

    let candidate = with_default_scheme(trimmed);
    let parsed = Url::parse(&candidate).map_err(|err| match err {
        ParseError::EmptyHost => UrlError::MissingHost,
        other => UrlError::MalformedUrl(other.to_string()),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }
    Ok(parsed)
}

/// Defaults the scheme and re-serializes through the URL parser. Input that
/// does not parse is returned trimmed so validation can report it verbatim.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    let candidate = with_default_scheme(trimmed);
    match Url::parse(&candidate) {
        Ok(url) => url.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

/// Splits free text on newline, comma or semicolon and normalizes every
/// non-empty token, preserving input order.
pub fn parse_url_list(input: &str) -> Vec<String> {
    input
        .split(['\n', ',', ';'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(normalize_url)
        .collect()
}

/// Parses and validates free text, returning the accepted URLs and every
/// rejection together.
pub fn partition_urls(input: &str) -> (Vec<String>, Vec<RejectedUrl>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for url in parse_url_list(input) {
        match validate_url(&url) {
            Ok(_) => accepted.push(url),
            Err(error) => rejected.push(RejectedUrl { input: url, error }),
        }
    }
    (accepted, rejected)
}

fn with_default_scheme(input: &str) -> String {
    if has_scheme(input) {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}

// `example.com:8080` is a host with a port, not a scheme. A dotted prefix
// such as `example.com:abc` is a host with a bad port.
fn has_scheme(input: &str) -> bool {
    let Some((scheme, rest)) = input.split_once(':') else {
        return false;
    };
    if scheme.contains('.') {
        return false;
    }
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid = starts_alpha
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-'));
    if !valid {
        return false;
    }
    if rest.starts_with("//") {
        return true;
    }
    !rest.is_empty() && !rest.starts_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_detection_skips_host_port() {
        assert!(has_scheme("https://a.com"));
        assert!(has_scheme("mailto:someone@a.com"));
        assert!(!has_scheme("a.com"));
        assert!(!has_scheme("a.com:8080/path"));
        assert!(!has_scheme("localhost:"));
        assert!(!has_scheme("example.com:abc"));
    }

    #[test]
    fn normalize_keeps_unparseable_input() {
        assert_eq!(normalize_url("  exa mple.com "), "exa mple.com");
    }
}
