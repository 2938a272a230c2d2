use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::redirect;
use reqwest::Client;
use reqwest::Proxy;

use crate::config::ScraperConfig;
use crate::movie::errors::ScraperError;
use crate::movie::models::Movie;
use crate::movie::ports::MovieChartPort;
use crate::outbound::scraper::parser::ChartPageParser;
use crate::outbound::scraper::proxy::ProxyRotator;

const MAX_REDIRECTS: usize = 10;

/// IMDb top-250 chart scraper.
///
/// Holds one HTTP client per configured proxy (or a single direct client when
/// none are configured) and rotates through them on every fetch.
pub struct ImdbScraper {
    url: String,
    clients: ProxyRotator<Client>,
    parser: ChartPageParser,
    cooldown: Duration,
}

impl ImdbScraper {
    /// Build the scraper and its HTTP clients.
    ///
    /// # Errors
    /// * `Setup` - Invalid proxy URL, header value or client configuration
    pub fn new(config: &ScraperConfig) -> Result<Self, ScraperError> {
        let clients = if config.proxies.is_empty() {
            vec![Self::client(config, None)?]
        } else {
            config
                .proxies
                .iter()
                .map(|proxy| Self::client(config, Some(proxy)))
                .collect::<Result<Vec<_>, _>>()?
        };

        let parser = ChartPageParser::new().map_err(|e| ScraperError::Setup(e.to_string()))?;

        tracing::debug!(
            url = %config.url,
            proxies = config.proxies.len(),
            "IMDb scraper configured"
        );

        Ok(Self {
            url: config.url.clone(),
            clients: ProxyRotator::new(clients),
            parser,
            cooldown: config.cooldown(),
        })
    }

    fn client(config: &ScraperConfig, proxy: Option<&str>) -> Result<Client, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .map_err(|e| ScraperError::Setup(e.to_string()))?,
        );

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(config.timeout())
            .redirect(redirect::Policy::limited(MAX_REDIRECTS));

        if let Some(proxy) = proxy {
            let proxy = Proxy::all(proxy).map_err(|e| ScraperError::Setup(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| ScraperError::Setup(e.to_string()))
    }

    async fn fetch_page(&self) -> Result<String, ScraperError> {
        let client = self
            .clients
            .next()
            .await
            .ok_or_else(|| ScraperError::Request("No HTTP client available".to_string()))?;

        let response = client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ScraperError::Request(e.to_string()))?;

        response
            .text()
            .await
            .map_err(|e| ScraperError::Request(e.to_string()))
    }
}

#[async_trait]
impl MovieChartPort for ImdbScraper {
    async fn fetch_top_250(&self) -> Result<Vec<Movie>, ScraperError> {
        let page = self.fetch_page().await;

        // Cool down after every attempt, failed ones included.
        tokio::time::sleep(self.cooldown).await;

        let movies = self.parser.parse(&page?)?;
        tracing::info!(count = movies.len(), "Fetched IMDb top chart");

        Ok(movies)
    }
}
