//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl pipeline end-to-end over real HTTP.

use site_mapper::config::DEFAULT_NUM_WORKERS;
use site_mapper::{Config, ConfigError, CrawlError, Crawler, UrlError};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Sink that can still be read after the crawler has consumed it
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn sorted_lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        let mut lines: Vec<String> = String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect();
        lines.sort();
        lines
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn html_page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{}\">link</a>\n", href))
        .collect();
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>{}</title></head>\n<body>\n{}</body>\n</html>\n",
        title, anchors
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

/// Three linked pages, a missing `/help` page and three external links
async fn start_reference_site() -> MockServer {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(
            "Main page",
            &["/about", "mailto:test@test.mock", "/help", "https://twitter.com/"],
        ),
    )
    .await;
    mount_page(
        &server,
        "/about",
        html_page("About page", &["/", "/help", "https://fb.com", "/careers"]),
    )
    .await;
    mount_page(
        &server,
        "/careers",
        html_page("Careers page", &["/", "https://golang.org/", "/help"]),
    )
    .await;

    // `/help` is not mounted, so wiremock answers 404
    server
}

fn expected_site_map(base: &str) -> Vec<String> {
    let main = base.to_string();
    let about = format!("{}/about", base);
    let help = format!("{}/help", base);
    let careers = format!("{}/careers", base);

    let edges = [
        (&main, about.as_str()),
        (&main, help.as_str()),
        (&main, "https://twitter.com"),
        (&about, main.as_str()),
        (&about, help.as_str()),
        (&about, "https://fb.com"),
        (&about, careers.as_str()),
        (&careers, main.as_str()),
        (&careers, "https://golang.org"),
        (&careers, help.as_str()),
    ];

    let mut lines: Vec<String> = edges
        .iter()
        .map(|(parent, child)| format!("{} -> {}", parent, child))
        .collect();
    lines.sort();
    lines
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_reference_site() {
    let server = start_reference_site().await;
    let base = server.uri();

    let mut config = Config::new(base.clone());
    config.num_workers = DEFAULT_NUM_WORKERS;

    let sink = SharedBuffer::default();
    let crawler = Crawler::builder(config)
        .sink(sink.clone())
        .build()
        .expect("Failed to build crawler");

    let stats = crawler.run().await.expect("Crawl should succeed");

    assert_eq!(sink.sorted_lines(), expected_site_map(&base));
    assert_eq!(stats.pages_mapped, 3);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.external_links, 3);
    assert_eq!(stats.edges_written, 10);

    // Every internal page requested exactly once, externals never
    let requests = server.received_requests().await.unwrap();
    let mut paths: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
    paths.sort();
    assert_eq!(paths, vec!["/", "/about", "/careers", "/help"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_single_worker_produces_same_map() {
    let server = start_reference_site().await;
    let base = server.uri();

    let mut config = Config::new(base.clone());
    config.num_workers = 1;

    let sink = SharedBuffer::default();
    Crawler::builder(config)
        .sink(sink.clone())
        .build()
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(sink.sorted_lines(), expected_site_map(&base));
}

#[tokio::test]
async fn test_site_map_written_to_output_file() {
    let server = start_reference_site().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("sitemap.txt");

    let mut config = Config::new(base.clone());
    config.output_file = Some(output.clone());

    let stats = site_mapper::crawl(config).await.unwrap();
    assert_eq!(stats.edges_written, 10);

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.ends_with('\n'));
    let mut lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
    lines.sort();
    assert_eq!(lines, expected_site_map(&base));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_page_times_out_without_aborting() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page("Main page", &["/slow", "/fast"])).await;
    mount_page(&server, "/fast", html_page("Fast page", &[])).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Slow page", &["/never"]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let base = server.uri();
    let mut config = Config::new(base.clone());
    config.client_timeout_secs = 1;

    let sink = SharedBuffer::default();
    let stats = Crawler::builder(config)
        .sink(sink.clone())
        .build()
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(stats.pages_mapped, 2);
    assert_eq!(stats.pages_failed, 1);

    let mut expected = vec![
        format!("{} -> {}/fast", base, base),
        format!("{} -> {}/slow", base, base),
    ];
    expected.sort();
    assert_eq!(sink.sorted_lines(), expected);
}

#[tokio::test]
async fn test_invalid_config_sends_no_requests() {
    let server = start_reference_site().await;

    let mut zero_workers = Config::new(server.uri());
    zero_workers.num_workers = 0;
    assert!(matches!(
        Crawler::new(zero_workers),
        Err(CrawlError::Config(ConfigError::InvalidWorkers(0)))
    ));

    let mut negative_timeout = Config::new(server.uri());
    negative_timeout.client_timeout_secs = -1;
    assert!(matches!(
        Crawler::new(negative_timeout),
        Err(CrawlError::Config(ConfigError::InvalidTimeout(-1)))
    ));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_seed_rejected() {
    let result = site_mapper::crawl(Config::new("/home")).await;
    assert!(matches!(
        result,
        Err(CrawlError::Config(ConfigError::Url(UrlError::NotAbsolute(_))))
    ));

    let result = site_mapper::crawl(Config::new("ftp://example.com")).await;
    assert!(matches!(
        result,
        Err(CrawlError::Config(ConfigError::Url(UrlError::InvalidScheme(_))))
    ));
}

#[tokio::test]
async fn test_unwritable_output_file_rejected() {
    let dir = tempfile::tempdir().unwrap();

    let mut config = Config::new("https://example.com");
    config.output_file = Some(dir.path().to_path_buf());

    assert!(matches!(
        Crawler::new(config),
        Err(CrawlError::Config(ConfigError::Output { .. }))
    ));
}

#[tokio::test]
async fn test_seed_failure_completes_with_empty_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sink = SharedBuffer::default();
    let stats = Crawler::builder(Config::new(server.uri()))
        .sink(sink.clone())
        .build()
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(stats.pages_mapped, 0);
    assert_eq!(stats.pages_failed, 1);
    assert!(sink.sorted_lines().is_empty());
}
