use crate::crawler::Site;
use crate::url::SiteUrl;

/// Path extensions treated as non-HTML resources (matched case-sensitively)
pub const MEDIA_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "svg", "gif", "pdf", "csv"];

/// Returns true if the URL lacks a scheme or a host
pub fn is_relative(url: &SiteUrl) -> bool {
    url.scheme().is_empty() || url.host().is_empty()
}

/// Returns true if the path ends in one of [`MEDIA_EXTENSIONS`]
pub fn is_media(url: &SiteUrl) -> bool {
    url.path()
        .rsplit_once('.')
        .is_some_and(|(_, extension)| MEDIA_EXTENSIONS.contains(&extension))
}

/// Returns true if the site lives on a different host than the page linking to it
///
/// The seed has no parent and is never external.
pub fn is_external(site: &Site) -> bool {
    site.parent()
        .is_some_and(|parent| site.url().host() != parent.host())
}

/// Computes the deduplication key of a URL
///
/// The scheme label is stripped so the `http` and `https` variants of the
/// same host and path collapse to a single key.
///
/// # Examples
///
/// ```
/// use site_mapper::url::{canonical_key, parse_url};
///
/// let plain = parse_url("http://example.com/p").unwrap();
/// let secure = parse_url("https://example.com/p").unwrap();
/// assert_eq!(canonical_key(&plain), canonical_key(&secure));
/// ```
pub fn canonical_key(url: &SiteUrl) -> String {
    let full = url.to_string();
    match full.strip_prefix(url.scheme()) {
        Some(rest) => rest.to_string(),
        None => full,
    }
}
