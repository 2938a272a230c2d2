pub mod repositories;
pub mod scraper;
