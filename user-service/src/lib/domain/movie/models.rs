/// One entry of the ranked top-250 chart.
///
/// Every field but the identifier may be absent from the scraped page.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub rank: Option<u32>,
    pub imdb_id: String,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub rating_count: Option<u64>,
    pub plot: Option<String>,
    pub genres: Vec<String>,
}
