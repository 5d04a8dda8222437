use crate::domain::errors::FeedError;
use crate::domain::ports::ResultFeed;
use crate::domain::round::Round;
use crate::infrastructure::core::HttpClientFactory;
use crate::infrastructure::core::http_client_factory::build_url_with_query;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Fields arrive as JSON strings or numbers depending on the endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Int(i64),
}

impl RawField {
    fn as_text(&self) -> String {
        match self {
            RawField::Text(s) => s.clone(),
            RawField::Int(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    #[serde(rename = "issueNumber")]
    issue_number: Option<RawField>,
    number: Option<RawField>,
}

#[derive(Debug, Deserialize)]
struct FeedData {
    list: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    data: Option<FeedData>,
}

/// Paginated history endpoint: `GET <url>?size=<n>&pageNo=<p>` returning
/// `{"data":{"list":[{"issueNumber":..,"number":..}]}}`.
pub struct HttpResultFeed {
    client: ClientWithMiddleware,
    base_url: Url,
}

impl HttpResultFeed {
    pub fn new(base_url: Url, timeout: Duration, max_retries: u32) -> Self {
        Self {
            client: HttpClientFactory::create_client(timeout, max_retries),
            base_url,
        }
    }

    /// Decodes one page body, dropping items that do not form a valid round.
    pub fn parse_page(body: &str) -> Result<Vec<Round>, FeedError> {
        let envelope: FeedEnvelope =
            serde_json::from_str(body).map_err(|e| FeedError::MalformedPayload {
                reason: e.to_string(),
            })?;
        let data = envelope.data.ok_or_else(|| FeedError::MalformedPayload {
            reason: "missing data object".to_string(),
        })?;

        let mut rounds = Vec::with_capacity(data.list.len());
        for item in data.list {
            let raw_id = item.issue_number.map(|f| f.as_text()).unwrap_or_default();
            let raw_number = item.number.map(|f| f.as_text()).unwrap_or_default();
            match Round::from_raw(&raw_id, &raw_number) {
                Ok(round) => rounds.push(round),
                Err(e) => warn!("HttpResultFeed: skipping malformed round: {}", e),
            }
        }
        Ok(rounds)
    }
}

#[async_trait]
impl ResultFeed for HttpResultFeed {
    async fn fetch_page(&self, page_no: u32, page_size: u32) -> Result<Vec<Round>> {
        let url = build_url_with_query(
            &self.base_url,
            &[
                ("size", page_size.to_string()),
                ("pageNo", page_no.to_string()),
            ],
        );

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .context("Failed to fetch result page")?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus {
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .context("Failed to read result page body")?;
        let rounds = Self::parse_page(&body)?;
        debug!(
            "HttpResultFeed: page {} (size {}) -> {} rounds",
            page_no,
            page_size,
            rounds.len()
        );
        Ok(rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_and_numeric_fields() {
        let body = r#"{"data":{"list":[
            {"issueNumber":"20240101003","number":"7","color":"green"},
            {"issueNumber":20240101002,"number":0}
        ]}}"#;
        let rounds = HttpResultFeed::parse_page(body).unwrap();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].id(), 20240101003);
        assert_eq!(rounds[0].number(), 7);
        assert_eq!(rounds[1].id(), 20240101002);
        assert_eq!(rounds[1].number(), 0);
    }

    #[test]
    fn test_malformed_items_are_skipped() {
        let body = r#"{"data":{"list":[
            {"issueNumber":"5","number":"12"},
            {"issueNumber":"6","number":"x"},
            {"number":"3"},
            {"issueNumber":"abc","number":"3"},
            {"issueNumber":"7","number":"3"}
        ]}}"#;
        let rounds = HttpResultFeed::parse_page(body).unwrap();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].id(), 7);
    }

    #[test]
    fn test_missing_data_is_an_error() {
        assert!(matches!(
            HttpResultFeed::parse_page(r#"{"code":500}"#),
            Err(FeedError::MalformedPayload { .. })
        ));
        assert!(matches!(
            HttpResultFeed::parse_page("<html>"),
            Err(FeedError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_empty_list() {
        let rounds = HttpResultFeed::parse_page(r#"{"data":{"list":[]}}"#).unwrap();
        assert!(rounds.is_empty());
    }
}
