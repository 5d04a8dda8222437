use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use url::Url;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client with retry middleware
    ///
    /// Transient failures (connect errors, 5xx, 429) are retried with
    /// exponential backoff up to `max_retries` times.
    pub fn create_client(timeout: Duration, max_retries: u32) -> ClientWithMiddleware {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

        let client = Client::builder()
            .pool_max_idle_per_host(2)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

/// Appends query parameters to `base`, keeping any it already carries.
pub fn build_url_with_query<K, V>(base: &Url, params: &[(K, V)]) -> Url
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = base.clone();
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k.as_ref(), v.as_ref());
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_appended() {
        let base = Url::parse("https://feed.example/api/get_history").unwrap();
        let url = build_url_with_query(&base, &[("size", "20"), ("pageNo", "3")]);
        assert_eq!(
            url.as_str(),
            "https://feed.example/api/get_history?size=20&pageNo=3"
        );
    }

    #[test]
    fn test_existing_query_is_kept_and_values_encoded() {
        let base = Url::parse("https://feed.example/history?game=wingo").unwrap();
        let url = build_url_with_query(&base, &[("pageNo", "1"), ("tag", "a&b")]);
        assert_eq!(url.query(), Some("game=wingo&pageNo=1&tag=a%26b"));
    }

    #[test]
    fn test_client_builds() {
        let _client = HttpClientFactory::create_client(Duration::from_secs(5), 3);
    }
}
