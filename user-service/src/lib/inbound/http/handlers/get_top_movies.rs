use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::movie::models::Movie;
use crate::movie::ports::MovieChartPort;

pub async fn get_top_movies(
    State(state): State<AppState>,
) -> Result<ApiSuccess<TopMoviesResponseData>, ApiError> {
    let movies = state.movie_chart.fetch_top_250().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TopMoviesResponseData {
            count: movies.len(),
            results: movies.into_iter().map(MovieData::from).collect(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMoviesResponseData {
    pub count: usize,
    pub results: Vec<MovieData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieData {
    pub rank: Option<u32>,
    pub imdb_id: String,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub rating_count: Option<u64>,
    pub plot: Option<String>,
    pub genres: Vec<String>,
}

impl From<Movie> for MovieData {
    fn from(movie: Movie) -> Self {
        Self {
            rank: movie.rank,
            imdb_id: movie.imdb_id,
            title: movie.title,
            year: movie.year,
            rating: movie.rating,
            rating_count: movie.rating_count,
            plot: movie.plot,
            genres: movie.genres,
        }
    }
}
