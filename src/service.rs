use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tower::Service;
use tracing::info;

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::gmaps::{GmapsScraper, Review};
use crate::traits::Scraper;

/// スクレイピングリクエスト
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub url: String,
    pub max_reviews: Option<usize>,
    pub output_path: PathBuf,
    pub headless: bool,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_reviews: None,
            output_path: PathBuf::from("reviews_output.json"),
            headless: true,
        }
    }

    pub fn with_max_reviews(mut self, max_reviews: usize) -> Self {
        self.max_reviews = Some(max_reviews);
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

impl From<ScrapeRequest> for ScraperConfig {
    fn from(req: ScrapeRequest) -> Self {
        ScraperConfig {
            url: req.url,
            max_reviews: req.max_reviews,
            output_path: req.output_path,
            headless: req.headless,
            debug: false,
            timeout: Duration::from_secs(60),
        }
    }
}

/// スクレイピング結果
#[derive(Debug)]
pub struct ScrapeResult {
    pub reviews: Vec<Review>,
    pub output_path: Option<PathBuf>,
    pub json_content: Option<Vec<u8>>,
}

impl ScrapeResult {
    pub fn new(reviews: Vec<Review>, output_path: Option<PathBuf>) -> std::io::Result<Self> {
        let json_content = match &output_path {
            Some(path) => Some(std::fs::read(path)?),
            None => None,
        };
        Ok(Self {
            reviews,
            output_path,
            json_content,
        })
    }
}

/// tower::Serviceを実装したスクレイパーサービス
#[derive(Debug, Clone, Default)]
pub struct ScraperService {
    // 将来的な拡張用（レートリミット、キャッシュなど）
}

impl ScraperService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<ScrapeRequest> for ScraperService {
    type Response = ScrapeResult;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ScrapeRequest) -> Self::Future {
        info!("スクレイピングリクエスト受信: url={}", req.url);

        Box::pin(async move {
            let config: ScraperConfig = req.into();
            let mut scraper = GmapsScraper::new(config);

            // スクレイピング実行
            let result = scraper.execute().await?;

            // 結果を作成
            let response = ScrapeResult::new(result.reviews, result.output_path)?;

            info!(
                "スクレイピング完了: {}件, path={:?}",
                response.reviews.len(),
                response.output_path
            );

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_request_builder() {
        let req = ScrapeRequest::new("https://example.com/maps")
            .with_max_reviews(10)
            .with_output_path("/tmp/out.json")
            .with_headless(false);

        assert_eq!(req.url, "https://example.com/maps");
        assert_eq!(req.max_reviews, Some(10));
        assert_eq!(req.output_path, PathBuf::from("/tmp/out.json"));
        assert!(!req.headless);
    }

    #[test]
    fn test_scrape_request_to_config() {
        let req = ScrapeRequest::new("https://example.com/maps").with_max_reviews(3);
        let config: ScraperConfig = req.into();

        assert_eq!(config.url, "https://example.com/maps");
        assert_eq!(config.max_reviews, Some(3));
        assert!(config.headless);
    }
}
