//! Read-only HTTP gateway to the article service.
//!
//! Two queries, both fresh round trips: the server performs no response
//! caching and read/star state must always be observed current, so the
//! gateway holds no cache of its own. Interpreting an empty list is the
//! caller's job; only transport-level problems surface as errors.

use crate::model::{ArticleDetail, ArticleSummary, FilterStatus};
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

/// Errors from the two article queries.
///
/// `Network` and `Status` are transport failures; `NotFound` is the detail
/// query's signal for a missing id. The coordinator swallows all of these
/// at its commit boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network-level error (DNS, connection, TLS, timeout).
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-success HTTP status other than a detail 404.
    #[error("HTTP error: status {0}")]
    Status(u16),
    /// Detail query for an id the server does not know.
    #[error("Article not found")]
    NotFound,
    /// Article id that cannot form a valid request path.
    #[error("Invalid article id: {0:?}")]
    InvalidId(String),
}

/// Client for the article service's two read endpoints.
///
/// Cheap to clone behind an `Arc`; the inner `reqwest::Client` already
/// pools connections. Request timeouts come from the client builder.
#[derive(Debug, Clone)]
pub struct ArticleGateway {
    client: reqwest::Client,
    base_url: Url,
}

impl ArticleGateway {
    /// `base_url` is the articles resource root, e.g.
    /// `http://127.0.0.1:8000/rss/`. A missing trailing slash is tolerated.
    pub fn new(client: reqwest::Client, mut base_url: Url) -> Self {
        // Url::join treats "rss" and "rss/" differently; normalize once here
        // so detail paths land under the resource instead of beside it.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    /// Fetch the article list scoped by `filter`.
    ///
    /// An empty array is a successful result, not an error.
    pub async fn fetch_list(
        &self,
        filter: FilterStatus,
    ) -> Result<Vec<ArticleSummary>, GatewayError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("status", filter.as_query());

        tracing::debug!(%filter, "Fetching article list");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%filter, status = status.as_u16(), "List query failed");
            return Err(GatewayError::Status(status.as_u16()));
        }

        let items: Vec<ArticleSummary> = response.json().await?;
        tracing::debug!(%filter, count = items.len(), "Article list fetched");
        Ok(items)
    }

    /// Fetch the full detail for one article id.
    pub async fn fetch_detail(&self, id: &str) -> Result<ArticleDetail, GatewayError> {
        // Ids come from server list payloads, but an id with a slash or an
        // empty id would resolve to the wrong resource; reject it up front.
        if id.is_empty() || id.contains('/') || id.contains('?') || id.contains('#') {
            return Err(GatewayError::InvalidId(id.to_string()));
        }
        let url = self
            .base_url
            .join(id)
            .map_err(|_| GatewayError::InvalidId(id.to_string()))?;

        tracing::debug!(article_id = %id, "Fetching article detail");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::warn!(article_id = %id, "Article not found");
            return Err(GatewayError::NotFound);
        }
        if !status.is_success() {
            tracing::warn!(article_id = %id, status = status.as_u16(), "Detail query failed");
            return Err(GatewayError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> ArticleGateway {
        let base = Url::parse(&format!("{}/rss", server.uri())).unwrap();
        ArticleGateway::new(reqwest::Client::new(), base)
    }

    #[tokio::test]
    async fn test_fetch_list_sends_status_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/"))
            .and(query_param("status", "starred"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "title": "First", "summary": "s", "source_name": "Src"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let items = gateway_for(&server)
            .fetch_list(FilterStatus::Starred)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "1");
        assert_eq!(items[0].title, "First");
    }

    #[tokio::test]
    async fn test_fetch_list_empty_array_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let items = gateway_for(&server)
            .fetch_list(FilterStatus::Unread)
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_list_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .fetch_list(FilterStatus::All)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Status(500)));
    }

    #[tokio::test]
    async fn test_fetch_list_connection_refused() {
        // Port from a server that has been shut down: connection refused.
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);
        drop(server);

        let err = gateway.fetch_list(FilterStatus::Unread).await.unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)));
    }

    #[tokio::test]
    async fn test_fetch_detail_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "7",
                "title": "Full title",
                "content": "<p>Body</p>",
                "source_name": "Src",
                "published_at": "2026-01-14T12:00:00Z"
            })))
            .mount(&server)
            .await;

        let detail = gateway_for(&server).fetch_detail("7").await.unwrap();
        assert_eq!(detail.id, "7");
        assert_eq!(detail.content, "<p>Body</p>");
    }

    #[tokio::test]
    async fn test_fetch_detail_404_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = gateway_for(&server).fetch_detail("missing").await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound));
    }

    #[tokio::test]
    async fn test_fetch_detail_other_error_is_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/7"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = gateway_for(&server).fetch_detail("7").await.unwrap_err();
        assert!(matches!(err, GatewayError::Status(503)));
    }

    #[tokio::test]
    async fn test_fetch_detail_rejects_path_breaking_ids() {
        let server = MockServer::start().await;
        let gateway = gateway_for(&server);

        for bad in ["", "a/b", "x?y=1", "frag#ment"] {
            let err = gateway.fetch_detail(bad).await.unwrap_err();
            assert!(matches!(err, GatewayError::InvalidId(_)), "id {:?}", bad);
        }
    }

    #[tokio::test]
    async fn test_base_url_without_trailing_slash() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "9", "title": "T", "content": "c"
            })))
            .mount(&server)
            .await;

        // Constructed without the trailing slash; detail must still resolve
        // under /rss/, not replace the last path segment.
        let base = Url::parse(&format!("{}/rss", server.uri())).unwrap();
        let gateway = ArticleGateway::new(reqwest::Client::new(), base);
        let detail = gateway.fetch_detail("9").await.unwrap();
        assert_eq!(detail.id, "9");
    }
}
