//! Pipeline data carried between crawl stages

use crate::url::SiteUrl;

/// A discovered page reference: its URL and the page that linked to it
///
/// Sites are immutable once built and move by value from stage to stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    url: SiteUrl,
    parent: Option<SiteUrl>,
}

impl Site {
    /// The crawl's starting point; it has no parent
    pub fn seed(url: SiteUrl) -> Self {
        Self { url, parent: None }
    }

    /// A link found on the `parent` page
    pub fn child(url: SiteUrl, parent: SiteUrl) -> Self {
        Self {
            url,
            parent: Some(parent),
        }
    }

    pub fn url(&self) -> &SiteUrl {
        &self.url
    }

    pub fn parent(&self) -> Option<&SiteUrl> {
        self.parent.as_ref()
    }
}

/// Links discovered on one successfully fetched page
///
/// `children` holds the distinct resolved links in first-seen order, before
/// any external/media/duplicate filtering.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub source: Site,
    pub children: Vec<Site>,
}
