use tinylink_core::ValidationError;
use url::Url;

/// Checks that `url` may be shortened and returns the form to store.
///
/// Accepts absolute `http`/`https` URLs with a host, at most `max_length`
/// characters long and without surrounding whitespace or control characters.
/// The returned string is the parser's serialization: scheme and host are
/// lowercased, IDN hosts become punycode, spaces and non-ASCII path bytes are
/// percent-encoded and backslashes become slashes. It is always a valid
/// absolute `Location` value.
pub fn normalize_url(url: &str, max_length: usize) -> Result<String, ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    check_length(url, max_length)?;

    // The parser silently strips these, which would make the stored target
    // differ from what was validated.
    if url.trim() != url {
        return Err(ValidationError::UrlWhitespace);
    }
    if url.chars().any(char::is_control) {
        return Err(ValidationError::MalformedUrl(
            "control characters are not allowed".to_string(),
        ));
    }

    let parsed = Url::parse(url).map_err(|e| ValidationError::MalformedUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::MissingHost);
    }

    // percent-encoding and punycode can grow the input
    let normalized = String::from(parsed);
    check_length(&normalized, max_length)?;

    Ok(normalized)
}

fn check_length(url: &str, max_length: usize) -> Result<(), ValidationError> {
    let length = url.chars().count();
    if length > max_length {
        return Err(ValidationError::UrlTooLong {
            length,
            max: max_length,
        });
    }
    Ok(())
}
