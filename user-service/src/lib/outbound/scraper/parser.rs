use regex::Regex;
use serde::Deserialize;

use crate::movie::errors::ScraperError;
use crate::movie::models::Movie;

/// Extracts the top-250 chart from the JSON payload embedded in the chart page.
pub struct ChartPageParser {
    next_data: Regex,
}

impl ChartPageParser {
    pub fn new() -> Result<Self, regex::Error> {
        let next_data =
            Regex::new(r#"(?s)<script[^>]*\bid\s*=\s*["']__NEXT_DATA__["'][^>]*>(.*?)</script>"#)?;

        Ok(Self { next_data })
    }

    /// Parse a chart page into movies, in page order.
    ///
    /// # Errors
    /// * `NextDataNotFound` - No `__NEXT_DATA__` script, or an empty one
    /// * `Parse` - Script content is not the expected JSON document
    pub fn parse(&self, html: &str) -> Result<Vec<Movie>, ScraperError> {
        let payload = self
            .next_data
            .captures(html)
            .and_then(|captures| captures.get(1))
            .map(|script| script.as_str().trim())
            .filter(|script| !script.is_empty())
            .ok_or(ScraperError::NextDataNotFound)?;

        let document: NextData =
            serde_json::from_str(payload).map_err(|e| ScraperError::Parse(e.to_string()))?;

        let movies = document
            .props
            .page_props
            .page_data
            .chart_titles
            .edges
            .into_iter()
            .filter_map(Edge::into_movie)
            .collect();

        Ok(movies)
    }
}

#[derive(Deserialize)]
struct NextData {
    props: Props,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Props {
    page_props: PageProps,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageProps {
    page_data: PageData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageData {
    chart_titles: ChartTitles,
}

#[derive(Deserialize)]
struct ChartTitles {
    edges: Vec<Edge>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Edge {
    current_rank: Option<u32>,
    #[serde(default)]
    node: Option<Node>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Node {
    id: Option<String>,
    title_text: Option<Text>,
    release_year: Option<ReleaseYear>,
    ratings_summary: Option<RatingsSummary>,
    plot: Option<Plot>,
    title_genres: Option<TitleGenres>,
}

#[derive(Deserialize)]
struct Text {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ReleaseYear {
    year: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingsSummary {
    aggregate_rating: Option<f64>,
    vote_count: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Plot {
    plot_text: Option<PlainText>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlainText {
    plain_text: Option<String>,
}

#[derive(Deserialize)]
struct TitleGenres {
    genres: Option<Vec<GenreEntry>>,
}

#[derive(Deserialize)]
struct GenreEntry {
    genre: Option<Text>,
}

impl Edge {
    fn into_movie(self) -> Option<Movie> {
        let Some(node) = self.node else {
            tracing::debug!(rank = ?self.current_rank, "Skipping chart entry without node");
            return None;
        };
        let Some(imdb_id) = node.id else {
            tracing::debug!(rank = ?self.current_rank, "Skipping chart entry without id");
            return None;
        };

        let (rating, rating_count) = node
            .ratings_summary
            .map(|summary| (summary.aggregate_rating, summary.vote_count))
            .unwrap_or_default();

        Some(Movie {
            rank: self.current_rank,
            imdb_id,
            title: node.title_text.and_then(|t| t.text),
            year: node.release_year.and_then(|y| y.year),
            rating,
            rating_count,
            plot: node
                .plot
                .and_then(|p| p.plot_text)
                .and_then(|p| p.plain_text),
            genres: node
                .title_genres
                .and_then(|g| g.genres)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|entry| entry.genre.and_then(|g| g.text))
                .collect(),
        })
    }
}
