pub mod imdb;
pub mod parser;
pub mod proxy;

pub use imdb::ImdbScraper;
