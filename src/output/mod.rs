//! Output module for the site map and crawl statistics
//!
//! This module handles:
//! - Opening the site map sink (stdout or a file)
//! - Serializing page results as `parent -> child` edge lines
//! - Summarizing a finished crawl

mod sitemap;
pub mod stats;

pub use sitemap::{spawn_sitemap_builder, write_edges, SitemapStats};
pub use stats::CrawlStats;

use crate::ConfigError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Opens the destination for the site map
///
/// `None` or `-` selects standard output; any other path is created or
/// truncated.
///
/// # Example
///
/// ```no_run
/// use site_mapper::output::open_sink;
/// use std::io::Write;
/// use std::path::Path;
///
/// let mut sink = open_sink(Some(Path::new("sitemap.txt"))).unwrap();
/// writeln!(sink, "https://example.com -> https://example.com/about").unwrap();
/// ```
pub fn open_sink(path: Option<&Path>) -> Result<Box<dyn Write + Send>, ConfigError> {
    match path {
        None => Ok(Box::new(std::io::stdout())),
        Some(path) if path.as_os_str() == "-" => Ok(Box::new(std::io::stdout())),
        Some(path) => {
            let file = File::create(path).map_err(|source| ConfigError::Output {
                path: path.display().to_string(),
                source,
            })?;
            Ok(Box::new(file))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_open_sink_creates_and_truncates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.txt");
        std::fs::write(&path, "stale content\n").unwrap();

        {
            let mut sink = open_sink(Some(&path)).unwrap();
            sink.write_all(b"a -> b\n").unwrap();
        }

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "a -> b\n");
    }

    #[test]
    fn test_open_sink_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_sink(Some(dir.path()));
        assert!(matches!(result, Err(ConfigError::Output { .. })));
    }

    #[test]
    fn test_open_sink_stdout() {
        assert!(open_sink(None).is_ok());
        assert!(open_sink(Some(Path::new("-"))).is_ok());
    }
}
