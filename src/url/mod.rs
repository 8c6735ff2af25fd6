//! URL handling module for Site-Mapper
//!
//! This module provides the crawler's URL representation, parsing of absolute
//! and relative link forms, and the classification rules that decide whether
//! a discovered link is followed.

mod classify;
mod normalize;

use std::fmt;
use std::str::FromStr;

use crate::UrlError;

// Re-export main functions
pub use classify::{canonical_key, is_external, is_media, is_relative, MEDIA_EXTENSIONS};
pub use normalize::{parse_absolute_url, parse_url};

/// A parsed, normalized URL as seen by the crawler
///
/// Only the parts that matter for page identity are kept: scheme, host
/// (including a non-default port), path and query. The fragment is always
/// dropped and a single trailing slash is removed from the path, so the root
/// page has an empty path.
///
/// Relative forms (empty scheme and/or host) are representable; they are
/// completed against the page they were found on with [`SiteUrl::resolve_against`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteUrl {
    scheme: String,
    host: String,
    path: String,
    query: Option<String>,
}

impl SiteUrl {
    pub(crate) fn from_parts(
        scheme: String,
        host: String,
        path: String,
        query: Option<String>,
    ) -> Self {
        Self {
            scheme,
            host,
            path,
            query,
        }
    }

    /// The scheme label (`http`, `https`) or empty for relative forms
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name, with `:port` appended when the port is not the default
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Completes a relative URL with the scheme and host of `base`
    ///
    /// Parts already present are kept, so a scheme-relative link
    /// (`//cdn.example.com/x`) only inherits the scheme. Absolute URLs are
    /// returned unchanged.
    pub fn resolve_against(mut self, base: &SiteUrl) -> SiteUrl {
        if self.scheme.is_empty() {
            self.scheme = base.scheme.clone();
        }
        if self.host.is_empty() {
            self.host = base.host.clone();
        }
        self
    }
}

impl fmt::Display for SiteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if !self.host.is_empty() {
            write!(f, "//{}", self.host)?;
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

impl FromStr for SiteUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_url(s)
    }
}
