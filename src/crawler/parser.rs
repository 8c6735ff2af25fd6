//! HTML parser for extracting links
//!
//! Link extraction is raw: every `<a href>` value is returned as
//! written, in document order, duplicates included. Resolution, validation
//! and deduplication happen later in the worker.

use crate::ExtractError;
use scraper::{Html, Selector};

/// Capability to list the hyperlinks found in fetched page content
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, content: &[u8]) -> Result<Vec<String>, ExtractError>;
}

/// [`LinkExtractor`] for HTML documents, backed by `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    /// Returns the `href` of every `<a>` element in the document
    ///
    /// Content is decoded as UTF-8; invalid sequences are replaced.
    fn extract_links(&self, content: &[u8]) -> Result<Vec<String>, ExtractError> {
        let html = String::from_utf8_lossy(content);
        extract_hrefs(&html)
    }
}

/// Parses an HTML document and returns its raw anchor hrefs
///
/// # Example
///
/// ```
/// use site_mapper::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/page">Link</a><a>no href</a></body></html>"#;
/// assert_eq!(extract_hrefs(html).unwrap(), vec!["/page".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Result<Vec<String>, ExtractError> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("a[href]").map_err(|e| ExtractError(format!("bad selector: {:?}", e)))?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_links_in_order() {
        let html = r#"<!DOCTYPE html>
<html>
<head><title>Test page</title></head>
<body>
<a href="/home">home</a>
<a href="mailto:test@test.mock">
<a href="/help">help</a>
<a href="ftp://example.com">
<a href="https://twitter.com/"></a>
<a href="/">/</a>
</body>
</html>"#;
        let links = HtmlLinkExtractor.extract_links(html.as_bytes()).unwrap();
        assert_eq!(
            links,
            vec![
                "/home",
                "mailto:test@test.mock",
                "/help",
                "ftp://example.com",
                "https://twitter.com/",
                "/",
            ]
        );
    }

    #[test]
    fn test_duplicates_preserved() {
        let html = r#"<body><a href="/a">1</a><a href="/a">2</a></body>"#;
        let links = extract_hrefs(html).unwrap();
        assert_eq!(links, vec!["/a", "/a"]);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<body><a name="top">Top</a><a href="/x">X</a></body>"#;
        assert_eq!(extract_hrefs(html).unwrap(), vec!["/x"]);
    }

    #[test]
    fn test_non_anchor_links_ignored() {
        let html = r#"<html><head><link rel="stylesheet" href="/style.css"></head>
            <body><img src="/logo.png"><script src="/app.js"></script></body></html>"#;
        assert!(extract_hrefs(html).unwrap().is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert!(HtmlLinkExtractor.extract_links(b"").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_recovered() {
        let mut content = b"<a href=\"/ok\">".to_vec();
        content.push(0xff);
        content.extend_from_slice(b"</a>");
        let links = HtmlLinkExtractor.extract_links(&content).unwrap();
        assert_eq!(links, vec!["/ok"]);
    }
}
