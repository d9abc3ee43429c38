use reqwest::Client;
use scraper::Html;
use tracing::Instrument;
use url::Url;

use crate::telemetry::{self};
use crate::telemetry::ops::extract::Phase as ExtractPhase;

use super::error::ExtractError;
use super::extractor::{Registry, Site};
use super::fetch;
use super::types::{Extraction, ExtractionResult};

/// Fetch one page and run its site extractor. Never fails: every error ends up
/// as a `Failure` carrying the reason.
pub async fn process(client: &Client, registry: &Registry, url: &str, timeout_secs: u64) -> ExtractionResult {
    match try_process(client, registry, url, timeout_secs).await {
        Ok(extraction) => ExtractionResult::success(url, extraction),
        Err(e) => {
            telemetry::extract().debug_kv("url failed", [("url", url.to_string()), ("kind", e.kind().to_string())]);
            ExtractionResult::failure(url, e.to_string())
        }
    }
}

async fn try_process(client: &Client, registry: &Registry, url: &str, timeout_secs: u64) -> Result<Extraction, ExtractError> {
    let log = telemetry::extract();
    let site = { let _s = log.span(&ExtractPhase::Resolve).entered(); resolve(registry, url)? };
    let body = fetch::fetch_page(client, url, timeout_secs)
        .instrument(log.span(&ExtractPhase::Fetch))
        .await?;
    extract_page(site, &body)
}

/// Map a URL to the site that knows its layout.
pub fn resolve(registry: &Registry, url: &str) -> Result<Site, ExtractError> {
    let invalid = |reason: String| ExtractError::InvalidUrl { url: url.to_string(), reason };
    let parsed = Url::parse(url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    let host = parsed.host_str().ok_or_else(|| invalid("missing host".to_string()))?;
    registry.lookup(host).ok_or_else(|| ExtractError::UnsupportedSite(host.to_string()))
}

// Html is !Send, so parsing stays in this synchronous step after the last await.
fn extract_page(site: Site, body: &str) -> Result<Extraction, ExtractError> {
    let log = telemetry::extract();
    let doc = {
        let _s = log.span(&ExtractPhase::Parse).entered();
        if body.trim().is_empty() { return Err(ExtractError::Parse("empty response body".to_string())); }
        Html::parse_document(body)
    };
    let _s = log.span(&ExtractPhase::Extract).entered();
    Ok(site.extract(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fetch::build_client;
    use crate::extraction::types::MediaItem;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> Client { build_client(Duration::from_secs(5)).unwrap() }

    fn local_registry(site: Site) -> Registry { Registry::builtin().with_host("127.0.0.1", site) }

    fn reason(r: &ExtractionResult) -> &str {
        match r {
            ExtractionResult::Failure { failure_reason, .. } => failure_reason,
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unsupported_host_names_the_host() {
        let r = process(&client(), &Registry::builtin(), "http://unknown.example/x", 5).await;
        assert_eq!(r.source_url(), "http://unknown.example/x");
        assert_eq!(reason(&r), "Site não suportado: unknown.example");
    }

    #[tokio::test]
    async fn malformed_url_is_a_failure() {
        let r = process(&client(), &Registry::builtin(), "not a url", 5).await;
        assert!(reason(&r).starts_with("invalid URL"), "{r:?}");
        let r = process(&client(), &Registry::builtin(), "ftp://www.erome.com/a", 5).await;
        assert!(reason(&r).contains("unsupported scheme"), "{r:?}");
    }

    #[test]
    fn resolve_matches_builtin_hosts() {
        let reg = Registry::builtin();
        assert_eq!(resolve(&reg, "https://www.erome.com/a/abc").unwrap(), Site::Erome);
        assert_eq!(resolve(&reg, "https://www.imagepond.net/v/1").unwrap(), Site::ImagePond);
        assert!(matches!(resolve(&reg, "https://erome.com/a"), Err(ExtractError::UnsupportedSite(h)) if h == "erome.com"));
    }

    #[test]
    fn empty_body_is_a_parse_error() {
        assert!(matches!(extract_page(Site::Erome, "  \n "), Err(ExtractError::Parse(_))));
    }

    #[tokio::test]
    async fn fetches_and_extracts_page() {
        let server = MockServer::start().await;
        let html = r#"<html><head><meta property="og:title" content="Beach day"></head><body>
            <div class="item"><img class="img-back" data-src="http://cdn/1.jpg"></div>
        </body></html>"#;
        Mock::given(method("GET"))
            .and(path("/a/beach"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        let url = format!("{}/a/beach", server.uri());
        let r = process(&client(), &local_registry(Site::Erome), &url, 5).await;
        assert_eq!(r, ExtractionResult::Success {
            source_url: url,
            title: "Beach day".to_string(),
            items: vec![MediaItem::image("http://cdn/1.jpg")],
        });
    }

    #[tokio::test]
    async fn sends_browser_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<title>ok</title>"))
            .mount(&server)
            .await;

        let r = process(&client(), &local_registry(Site::ImagePond), &format!("{}/v/1", server.uri()), 5).await;
        assert!(r.is_success(), "{r:?}");
        let received = server.received_requests().await.unwrap();
        let ua = received[0].headers.get("user-agent").unwrap().to_str().unwrap();
        assert_eq!(ua, fetch::USER_AGENT);
    }

    #[tokio::test]
    async fn http_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let r = process(&client(), &local_registry(Site::Erome), &format!("{}/gone", server.uri()), 5).await;
        assert_eq!(reason(&r), "HTTP 404 Not Found");
    }

    #[tokio::test]
    async fn page_without_media_is_still_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><head><title>Empty</title></head></html>"))
            .mount(&server)
            .await;

        let r = process(&client(), &local_registry(Site::ImagePond), &server.uri(), 5).await;
        match r {
            ExtractionResult::Success { title, items, .. } => {
                assert_eq!(title, "Empty");
                assert!(items.is_empty());
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_refused_is_network_failure() {
        // bind then drop to get a port nobody listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let r = process(&client(), &local_registry(Site::Erome), &format!("http://127.0.0.1:{port}/x"), 5).await;
        assert!(reason(&r).starts_with("network error"), "{r:?}");
    }
}
