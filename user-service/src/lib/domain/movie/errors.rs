use thiserror::Error;

/// Failures while fetching or decoding the chart page.
#[derive(Debug, Clone, Error)]
pub enum ScraperError {
    #[error("Scraper setup failed: {0}")]
    Setup(String),

    #[error("Chart request failed: {0}")]
    Request(String),

    #[error("Chart page has no __NEXT_DATA__ script")]
    NextDataNotFound,

    #[error("Chart data could not be parsed: {0}")]
    Parse(String),
}
