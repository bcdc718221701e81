use chrono::{DateTime, Utc};

/// Derive a human-readable local name from a URI.
///
/// Takes the text after the last `#`, else after the last `/`, else the
/// input unchanged.
pub fn local_name(uri: &str) -> &str {
    if let Some(pos) = uri.rfind('#') {
        &uri[pos + 1..]
    } else if let Some(pos) = uri.rfind('/') {
        &uri[pos + 1..]
    } else {
        uri
    }
}

/// Render an RFC 3339 timestamp as `YYYY-MM-DD HH:MM:SS` UTC.
///
/// Falls back to the raw string when the input cannot be parsed.
pub fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_prefers_fragment() {
        assert_eq!(local_name("http://example.com/ont#Person"), "Person");
        assert_eq!(local_name("https://schema.org/name"), "name");
        assert_eq!(local_name("simple"), "simple");
    }

    #[test]
    fn fragment_wins_over_path() {
        assert_eq!(local_name("http://example.com/a/b#frag"), "frag");
    }

    #[test]
    fn formats_rfc3339_as_utc() {
        assert_eq!(
            format_timestamp("2026-03-01T12:30:45+02:00"),
            "2026-03-01 10:30:45"
        );
    }

    #[test]
    fn keeps_unparseable_input() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }
}
