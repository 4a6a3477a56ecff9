//! Googleマップ クチコミスクレイパー
//!
//! ヘッドレスChromiumでクチコミ一覧を開き、仮想化リストを
//! スクロールしながらクチコミを収集してJSONファイルに保存する。
//!
//! # 使用例
//!
//! ```rust,ignore
//! use gmaps_review_scraper::{GmapsScraper, Scraper, ScraperConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScraperConfig::new("https://www.google.com/maps/place/...")
//!         .with_max_reviews(50);
//!
//!     let mut scraper = GmapsScraper::new(config);
//!     let result = scraper.execute().await.unwrap();
//!     println!("Collected {} reviews", result.reviews.len());
//! }
//! ```
//!
//! # tower::Service 経由の使用例
//!
//! ```rust,ignore
//! use gmaps_review_scraper::{ScrapeRequest, ScraperService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ScraperService::new();
//!
//!     let request = ScrapeRequest::new("https://www.google.com/maps/place/...")
//!         .with_max_reviews(20)
//!         .with_output_path("./reviews_output.json");
//!
//!     let result = service.call(request).await.unwrap();
//!     println!("Saved to {:?}", result.output_path);
//! }
//! ```

pub mod config;
pub mod error;
pub mod gmaps;
pub mod service;
pub mod traits;

// 主要な型をリエクスポート
pub use config::ScraperConfig;
pub use error::ScraperError;
pub use gmaps::{GmapsScraper, RawReview, Review, ReviewsResult, StopReason};
pub use service::{ScrapeRequest, ScrapeResult, ScraperService};
pub use traits::Scraper;
