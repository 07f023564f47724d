use reqwest::Url;
use reqwest::blocking::Client;
use tracing::debug;

use crate::document::Document;
use crate::domain::LVError;

/// Source of the list document and of per entry detail content.
/// The model only talks to this trait so tests can substitute an
/// in-memory source for the HTTP client.
pub trait ContentSource {
    fn fetch_document(&self, url: &str) -> Result<Document, LVError>;
    fn fetch_content(&self, url: &str) -> Result<String, LVError>;
}

pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(endpoint: &str) -> Result<Self, LVError> {
        let base = Url::parse(endpoint)
            .map_err(|e| LVError::FetchFailed(format!("Invalid endpoint \"{endpoint}\": {e}")))?;
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    // Entry content urls are usually relative ("/a"), resolve them
    // against the list endpoint.
    fn resolve(&self, url: &str) -> Result<Url, LVError> {
        self.base
            .join(url)
            .map_err(|e| LVError::FetchFailed(format!("Invalid url \"{url}\": {e}")))
    }
}

impl ContentSource for HttpSource {
    fn fetch_document(&self, url: &str) -> Result<Document, LVError> {
        let url = self.resolve(url)?;
        debug!("Fetching list document from {url}");
        let raw = self.client.get(url).send()?.error_for_status()?.text()?;
        Document::from_json(&raw)
    }

    fn fetch_content(&self, url: &str) -> Result<String, LVError> {
        let url = self.resolve(url)?;
        debug!("Fetching content from {url}");
        let body = self.client.get(url).send()?.error_for_status()?.text()?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LIST: &str = r#"{
        "columns": [{"name": "id", "width": "2em"}],
        "entries": [{"fields": {"id": "1"}, "content_url": "/a"}]
    }"#;

    // The fetcher is blocking, so the mock server runs on a runtime we
    // drive manually instead of a #[tokio::test].
    fn start_server() -> (tokio::runtime::Runtime, MockServer) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/list.json"))
                .respond_with(ResponseTemplate::new(200).set_body_raw(LIST, "application/json"))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/bad.json"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_raw("{\"columns\": 42}", "application/json"),
                )
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/a"))
                .respond_with(ResponseTemplate::new(200).set_body_string("<p>Alpha</p>"))
                .mount(&server)
                .await;
            server
        });
        (rt, server)
    }

    #[test]
    fn fetch_document_and_content() {
        let (_rt, server) = start_server();
        let endpoint = format!("{}/list.json", server.uri());
        let source = HttpSource::new(&endpoint).unwrap();

        let doc = source.fetch_document(&endpoint).unwrap();
        assert_eq!(doc.columns.len(), 1);
        assert_eq!(doc.entries[0].content_url.as_deref(), Some("/a"));

        // Relative content url is resolved against the endpoint
        let body = source.fetch_content("/a").unwrap();
        assert_eq!(body, "<p>Alpha</p>");
    }

    #[test]
    fn missing_document_is_an_error() {
        let (_rt, server) = start_server();
        let endpoint = format!("{}/nosuch.json", server.uri());
        let source = HttpSource::new(&endpoint).unwrap();
        assert!(source.fetch_document(&endpoint).is_err());
    }

    #[test]
    fn malformed_document_body_is_a_json_error() {
        let (_rt, server) = start_server();
        let endpoint = format!("{}/bad.json", server.uri());
        let source = HttpSource::new(&endpoint).unwrap();
        assert!(matches!(
            source.fetch_document(&endpoint),
            Err(LVError::JsonError(_))
        ));
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        assert!(HttpSource::new("not a url").is_err());
    }
}
