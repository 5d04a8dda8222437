use crate::domain::round::Round;
use anyhow::Result;
use async_trait::async_trait;

/// Upstream source of resolved rounds.
///
/// Implementations map raw feed fields into `Round`s and drop malformed
/// entries before returning; the order of the returned page is not guaranteed.
#[async_trait]
pub trait ResultFeed: Send + Sync {
    /// Fetch one page of the newest rounds (`page_no` starts at 1).
    async fn fetch_page(&self, page_no: u32, page_size: u32) -> Result<Vec<Round>>;
}
