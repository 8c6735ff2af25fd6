use crate::url::SiteUrl;
use crate::UrlError;
use url::Url;

/// Base used to normalize scheme-less links; its host is never kept
const RELATIVE_BASE: &str = "http://relative.invalid/";

/// Parses an absolute or relative URL string into a [`SiteUrl`]
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject control characters
/// 2. Remove fragment (everything after #)
/// 3. Reject any scheme other than `http`/`https`
/// 4. Parse: absolute forms directly, scheme-less forms against a
///    placeholder root (dot segments are resolved, host is kept only for
///    `//host/...` links)
/// 5. Remove a single trailing slash from the path (root becomes empty)
/// 6. Drop an empty query string (trailing ?)
///
/// # Examples
///
/// ```
/// use site_mapper::url::parse_url;
///
/// let url = parse_url("/home/#top").unwrap();
/// assert_eq!(url.path(), "/home");
/// assert_eq!(url.host(), "");
/// ```
pub fn parse_url(raw: &str) -> Result<SiteUrl, UrlError> {
    let raw = raw.trim();
    if raw.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlError::Invalid(raw.escape_debug().to_string()));
    }

    let without_fragment = match raw.split_once('#') {
        Some((before, _)) => before,
        None => raw,
    };

    match split_scheme(without_fragment)? {
        Some(scheme) => {
            let scheme = scheme.to_ascii_lowercase();
            if scheme != "http" && scheme != "https" {
                return Err(UrlError::InvalidScheme(scheme));
            }
            let url = Url::parse(without_fragment)
                .map_err(|e| UrlError::Invalid(format!("{}: {}", raw, e)))?;
            let host = host_with_port(&url);
            Ok(into_site_url(&url, scheme, host))
        }
        None => {
            let base =
                Url::parse(RELATIVE_BASE).map_err(|e| UrlError::Invalid(e.to_string()))?;
            let url = base
                .join(without_fragment)
                .map_err(|e| UrlError::Invalid(format!("{}: {}", raw, e)))?;
            let host = if without_fragment.starts_with("//") {
                host_with_port(&url)
            } else {
                String::new()
            };
            Ok(into_site_url(&url, String::new(), host))
        }
    }
}

/// Parses a URL string that must carry both a scheme and a host
///
/// # Examples
///
/// ```
/// use site_mapper::url::parse_absolute_url;
///
/// assert!(parse_absolute_url("https://example.com").is_ok());
/// assert!(parse_absolute_url("/web").is_err());
/// ```
pub fn parse_absolute_url(raw: &str) -> Result<SiteUrl, UrlError> {
    let url = parse_url(raw)?;
    if url.scheme().is_empty() || url.host().is_empty() {
        return Err(UrlError::NotAbsolute(raw.to_string()));
    }
    Ok(url)
}

/// Splits off a leading `scheme:` label, if there is one
///
/// A scheme starts with a letter followed by letters, digits, `+`, `-` or
/// `.`. Anything else before the first `:` means the string has no scheme.
fn split_scheme(raw: &str) -> Result<Option<&str>, UrlError> {
    for (i, c) in raw.char_indices() {
        match c {
            'a'..='z' | 'A'..='Z' => {}
            '0'..='9' | '+' | '-' | '.' if i > 0 => {}
            ':' if i == 0 => {
                return Err(UrlError::Invalid(format!("{}: missing protocol scheme", raw)))
            }
            ':' => return Ok(Some(&raw[..i])),
            _ => return Ok(None),
        }
    }
    Ok(None)
}

fn host_with_port(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

fn into_site_url(url: &Url, scheme: String, host: String) -> SiteUrl {
    let path = url.path();
    let path = path.strip_suffix('/').unwrap_or(path).to_string();
    let query = url
        .query()
        .filter(|q| !q.is_empty())
        .map(|q| q.to_string());
    SiteUrl::from_parts(scheme, host, path, query)
}
