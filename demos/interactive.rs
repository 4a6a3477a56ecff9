//! 対話式クチコミスクレイパー
//!
//! 標準入力から取得件数を読み込み、デモ対象ページのクチコミを
//! 収集してJSONに保存する。
//!
//! 実行方法:
//! ```
//! cargo run --example interactive
//! ```

use std::io::Write;

use gmaps_review_scraper::{GmapsScraper, Scraper, ScraperConfig};
use tracing_subscriber::EnvFilter;

/// デモ対象: Pequod's Pizza (シカゴ) のクチコミタブ
const TARGET_URL: &str = "https://www.google.com/maps/place/Pequod's+Pizza/@41.921934,-87.6669261,676m/data=!3m1!1e3!4m8!3m7!1s0x880fd2e43edcab43:0xfa179f0b298abc4d!8m2!3d41.921934!4d-87.6643512!9m1!1b1!16s%2Fg%2F1hc0v95qd?entry=ttu";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 取得件数を標準入力から読み込む（0以下・数値以外は無制限）
    print!("取得するクチコミ件数を入力してください: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let max_reviews = match line.trim().parse::<i64>() {
        Ok(count) if count > 0 => Some(count as usize),
        _ => None,
    };

    let mut config = ScraperConfig::new(TARGET_URL);
    if let Some(max) = max_reviews {
        config = config.with_max_reviews(max);
    } else {
        println!("件数指定なし: 取得できる限り収集します");
    }

    let mut scraper = GmapsScraper::new(config);
    let result = scraper.execute().await?;

    println!();
    println!("=== Results ===");
    println!("Session ID: {}", result.session_id);
    println!("Stop reason: {:?}", result.stop_reason);
    println!("Reviews collected: {}", result.reviews.len());
    if let Some(path) = &result.output_path {
        println!("保存先: {:?}", path);
    }

    Ok(())
}
