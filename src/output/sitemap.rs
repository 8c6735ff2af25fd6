//! Site map builder: serializes page results as `parent -> child` lines

use crate::crawler::PageResult;
use std::io::{self, Write};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Totals reported by the site map builder once its input is exhausted
#[derive(Debug, Default)]
pub struct SitemapStats {
    /// Page results consumed
    pub results: u64,

    /// Edge lines written
    pub edges: u64,

    /// First write error, if any; later results were drained but not written
    pub error: Option<io::Error>,
}

/// Writes every edge of one result, returning the number of lines written
///
/// # Example
///
/// ```
/// use site_mapper::crawler::{PageResult, Site};
/// use site_mapper::output::write_edges;
/// use site_mapper::url::parse_absolute_url;
///
/// let page = parse_absolute_url("https://example.com").unwrap();
/// let about = parse_absolute_url("https://example.com/about").unwrap();
/// let result = PageResult {
///     source: Site::seed(page.clone()),
///     children: vec![Site::child(about, page)],
/// };
///
/// let mut out = Vec::new();
/// write_edges(&mut out, &result).unwrap();
/// assert_eq!(out, b"https://example.com -> https://example.com/about\n");
/// ```
pub fn write_edges<W: Write + ?Sized>(out: &mut W, result: &PageResult) -> io::Result<u64> {
    let source = result.source.url();
    for child in &result.children {
        writeln!(out, "{} -> {}", source, child.url())?;
    }
    Ok(result.children.len() as u64)
}

/// Starts the site map builder on a blocking thread
///
/// The builder drains `results` until every sender is dropped, then flushes
/// the sink. A write failure never stops the draining, so producers cannot
/// block on a dead sink.
pub fn spawn_sitemap_builder(
    results: mpsc::Receiver<PageResult>,
    sink: Box<dyn Write + Send>,
) -> JoinHandle<SitemapStats> {
    tokio::task::spawn_blocking(move || build_sitemap(results, sink))
}

fn build_sitemap(mut results: mpsc::Receiver<PageResult>, sink: Box<dyn Write + Send>) -> SitemapStats {
    tracing::debug!("Site map builder started");
    let mut out = io::BufWriter::new(sink);
    let mut stats = SitemapStats::default();

    while let Some(result) = results.blocking_recv() {
        stats.results += 1;
        if stats.error.is_some() {
            continue;
        }
        match write_edges(&mut out, &result) {
            Ok(edges) => stats.edges += edges,
            Err(e) => {
                tracing::error!(url = %result.source.url(), error = %e, "Failed to write site map");
                stats.error = Some(e);
            }
        }
    }

    if stats.error.is_none() {
        if let Err(e) = out.flush() {
            tracing::error!(error = %e, "Failed to flush site map");
            stats.error = Some(e);
        }
    }

    tracing::debug!(results = stats.results, edges = stats.edges, "Site map builder stopped");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::Site;
    use crate::url::parse_absolute_url;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn result(source: &str, children: &[&str]) -> PageResult {
        let source = parse_absolute_url(source).unwrap();
        PageResult {
            source: Site::seed(source.clone()),
            children: children
                .iter()
                .map(|c| Site::child(parse_absolute_url(c).unwrap(), source.clone()))
                .collect(),
        }
    }

    #[test]
    fn test_write_edges_verbatim() {
        let mut out = Vec::new();
        let written = write_edges(
            &mut out,
            &result(
                "http://h.test",
                &["http://h.test/about", "https://twitter.com/", "http://h.test/a.pdf"],
            ),
        )
        .unwrap();

        assert_eq!(written, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "http://h.test -> http://h.test/about\n\
             http://h.test -> https://twitter.com\n\
             http://h.test -> http://h.test/a.pdf\n"
        );
    }

    #[test]
    fn test_leaf_page_writes_nothing() {
        let mut out = Vec::new();
        assert_eq!(write_edges(&mut out, &result("http://h.test/x", &[])).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_builder_drains_and_flushes() {
        let buffer = SharedBuffer::default();
        let (tx, rx) = mpsc::channel(2);
        let builder = spawn_sitemap_builder(rx, Box::new(buffer.clone()));

        tx.send(result("http://h.test", &["http://h.test/a"])).await.unwrap();
        tx.send(result("http://h.test/a", &["http://h.test", "http://h.test/b"]))
            .await
            .unwrap();
        tx.send(result("http://h.test/b", &[])).await.unwrap();
        drop(tx);

        let stats = builder.await.unwrap();
        assert_eq!(stats.results, 3);
        assert_eq!(stats.edges, 3);
        assert!(stats.error.is_none());

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert!(written.contains("http://h.test/a -> http://h.test/b\n"));
    }

    #[tokio::test]
    async fn test_builder_keeps_draining_after_write_error() {
        let (tx, rx) = mpsc::channel(1);
        let builder = spawn_sitemap_builder(rx, Box::new(BrokenSink));

        // BufWriter defers the failure until its buffer is flushed
        for i in 0..200 {
            let source = format!("http://h.test/page-with-a-fairly-long-path/{}", i);
            let child = format!("http://h.test/another-fairly-long-child-path/{}", i);
            tx.send(result(&source, &[child.as_str()])).await.unwrap();
        }
        drop(tx);

        let stats = builder.await.unwrap();
        assert_eq!(stats.results, 200);
        assert!(stats.error.is_some());
    }
}
