use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::ScraperError;
use crate::gmaps::{Review, ReviewsResult};

#[async_trait]
pub trait Scraper: Send + Sync {
    /// ブラウザ初期化
    async fn initialize(&mut self) -> Result<(), ScraperError>;

    /// クチコミ収集
    async fn scrape(&mut self) -> Result<ReviewsResult, ScraperError>;

    /// 収集結果をJSONファイルに保存（0件の場合は書き込まない）
    async fn save(&self, reviews: &[Review]) -> Result<Option<PathBuf>, ScraperError>;

    /// リソース解放
    async fn close(&mut self) -> Result<(), ScraperError>;

    /// 一括実行（initialize → scrape → save → close）
    ///
    /// scrapeが失敗してもcloseは必ず実行する
    async fn execute(&mut self) -> Result<ReviewsResult, ScraperError> {
        self.initialize().await?;
        let scraped = self.scrape().await;
        self.close().await?;

        let mut result = scraped?;
        result.output_path = self.save(&result.reviews).await?;
        Ok(result)
    }
}
