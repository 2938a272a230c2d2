use async_trait::async_trait;

use crate::movie::errors::ScraperError;
use crate::movie::models::Movie;

/// Source of the ranked top-250 movie chart.
#[async_trait]
pub trait MovieChartPort: Send + Sync + 'static {
    /// Fetch the current chart, in rank order.
    ///
    /// # Errors
    /// * `Request` - Transport failure or non-success status
    /// * `NextDataNotFound` - Page carries no embedded chart data
    /// * `Parse` - Embedded data is malformed or misses the chart
    async fn fetch_top_250(&self) -> Result<Vec<Movie>, ScraperError>;
}
