//! Input URL validation and normalization.

use url::Url;

/// Validate user input into an absolute URL.
///
/// Bare hostnames are accepted by retrying with an `http://` prefix, so
/// `example.com` normalizes to `http://example.com/`. Returns `None` when
/// no parse succeeds. Pure and synchronous.
pub fn validate(input: &str) -> Option<Url> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(input) {
        return Some(url);
    }

    if !input.starts_with("http") {
        return Url::parse(&format!("http://{input}")).ok();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hostname_gets_http_scheme() {
        let url = validate("example.com").unwrap();
        assert_eq!(url.as_str(), "http://example.com/");
    }

    #[test]
    fn absolute_url_is_unchanged() {
        let url = validate("https://acme.com/about?tab=team").unwrap();
        assert_eq!(url.as_str(), "https://acme.com/about?tab=team");
    }

    #[test]
    fn validation_is_idempotent() {
        let once = validate("example.com").unwrap();
        let twice = validate(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(validate("???").is_none());
    }

    #[test]
    fn empty_and_whitespace_are_rejected() {
        assert!(validate("").is_none());
        assert!(validate("   ").is_none());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let url = validate("  example.com  ").unwrap();
        assert_eq!(url.as_str(), "http://example.com/");
    }
}
