//! Googleマップ クチコミスクレイパー実装
//!
//! クチコミタブを開き、仮想化リストをスクロールしながら
//! data-review-id単位で重複を除いてクチコミを収集する

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use chrono::Utc;
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::Scraper;

use super::types::{RawReview, Review, ReviewsResult, StopReason};

// クチコミ面のCSSセレクタ
// GoogleマップのDOMはクラス名が難読化されているため固定値で持つ
const REVIEW_SELECTOR: &str = ".jftiEf";
const REVIEWER_NAME_SELECTOR: &str = ".d4r55";
const REVIEWER_LINK_SELECTOR: &str = "button[data-href]";
const REVIEWER_IMAGE_SELECTOR: &str = ".NBa7we";
const RATING_SELECTOR: &str = ".hCCjke.google-symbols.NhBTye.elGi1d";
const DATE_SELECTOR: &str = ".rsqaWe";
const TEXT_SELECTOR: &str = ".wiI7pd";
const MORE_BUTTON_SELECTOR: &str = "button.w8nwRe.kyuRq";
const PHOTO_SELECTOR: &str = ".Tya61d";
const LIKES_SELECTOR: &str = ".pkWtMe";
const SCROLL_CONTAINER_SELECTOR: &str = ".m6QErb.DxyBCb.kA9KIf.dS8AEf";
const REVIEW_ID_ATTRIBUTE: &str = "data-review-id";

/// スクロール・初回表示後のレンダリング待ち（ミリ秒）
const RENDER_WAIT_MS: u64 = 3000;
/// 「もっと見る」展開後のテキスト再読み込みポーリング間隔（ミリ秒）
const EXPAND_POLL_INTERVAL_MS: u64 = 200;
/// 展開ポーリングの最大回数
const EXPAND_POLL_MAX: u32 = 15;
/// 新規ノードが現れないスクロールを何回連続で許容するか
const MAX_CONSECUTIVE_FAILURES: u32 = 10;

/// ネットワークアイドル待機のタイムアウト（ミリ秒）
const NETWORK_IDLE_TIMEOUT_MS: u64 = 30_000;
/// ネットワークアイドル判定のインターバル（ミリ秒）
const NETWORK_IDLE_CHECK_INTERVAL_MS: u64 = 500;

/// 自動操縦の痕跡を隠すための固定User-Agent
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

/// Googleマップ クチコミスクレイパー
pub struct GmapsScraper {
    config: ScraperConfig,
    browser: Option<Browser>,
}

impl GmapsScraper {
    /// 新しいスクレイパーを作成
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            browser: None,
        }
    }

    /// ナビゲーションとスクロール収集の本体
    ///
    /// ここで返すエラーはscrape側で吸収され、収集済み分はそのまま残る
    async fn run_loop(
        &self,
        page: &Page,
        collector: &mut ReviewCollector,
    ) -> Result<StopReason, ScraperError> {
        self.navigate(page).await?;

        let mut tracker = ScrollTracker::new(MAX_CONSECUTIVE_FAILURES);

        loop {
            if collector.is_full() {
                return Ok(StopReason::TargetReached);
            }
            if tracker.exhausted() {
                info!(
                    "No new reviews after {} consecutive scrolls, stopping",
                    MAX_CONSECUTIVE_FAILURES
                );
                return Ok(StopReason::ScrollExhausted);
            }

            let snapshot = self.snapshot_reviews(page).await?;
            for value in snapshot {
                if collector.is_full() {
                    break;
                }

                // ノード単位の不整合は読み飛ばして続行する
                let raw: RawReview = match serde_json::from_value(value) {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!("Skipping malformed review node: {}", e);
                        continue;
                    }
                };

                if raw.id.is_empty() || collector.contains(&raw.id) {
                    continue;
                }

                // 折りたたまれた本文は先に展開してから変換する
                let expanded = if raw.has_more {
                    self.expand_text(page, &raw.id).await
                } else {
                    None
                };

                let id = raw.id.clone();
                let review = review_from_raw(raw, expanded);
                if collector.insert(id, review) {
                    match self.config.max_reviews {
                        Some(max) => info!("Collected {}/{} reviews", collector.len(), max),
                        None => info!("Collected {} reviews", collector.len()),
                    }
                }
            }

            if collector.is_full() {
                return Ok(StopReason::TargetReached);
            }

            let progressed = self.scroll_reviews(page).await;
            tracker.record(progressed);
        }
    }

    /// クチコミページへナビゲートし、描画が落ち着くまで待機する
    async fn navigate(&self, page: &Page) -> Result<(), ScraperError> {
        info!("Navigating to review page: {}", self.config.url);

        page.goto(self.config.url.as_str())
            .await
            .map_err(|e| ScraperError::Navigation(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ScraperError::Navigation(e.to_string()))?;

        // ページの完全なロードを待機
        for i in 0..30 {
            let ready_state = page
                .evaluate("document.readyState")
                .await
                .map_err(|e| ScraperError::JavaScript(e.to_string()))?;

            let state = ready_state.into_value::<String>().unwrap_or_default();
            if state == "complete" {
                debug!("Page load complete after {}s", i + 1);
                break;
            }

            if i % 5 == 0 {
                info!("Waiting for page load... ({}/30) state={}", i + 1, state);
            }
            sleep(Duration::from_secs(1)).await;
        }

        // ネットワークアイドル待機
        self.wait_request_idle(page).await?;

        // 初回レンダリング待ち
        sleep(Duration::from_millis(RENDER_WAIT_MS)).await;

        if self.config.debug {
            self.log_debug_screenshot(page).await;
        }

        Ok(())
    }

    /// navigator.webdriverを偽装するスクリプトを新規ドキュメントに注入する
    async fn mask_automation(&self, page: &Page) -> Result<(), ScraperError> {
        let params = AddScriptToEvaluateOnNewDocumentParams::builder()
            .source("Object.defineProperty(navigator, 'webdriver', { get: () => false });")
            .build()
            .map_err(|e| ScraperError::BrowserInit(format!("偽装スクリプト設定エラー: {}", e)))?;

        page.execute(params)
            .await
            .map_err(|e| ScraperError::BrowserInit(format!("偽装スクリプト設定エラー: {}", e)))?;

        Ok(())
    }

    /// ネットワークリクエストがアイドル状態になるまで待機する
    ///
    /// タイムアウトしても失敗にはせず、警告を出して続行する
    async fn wait_request_idle(&self, page: &Page) -> Result<(), ScraperError> {
        debug!("Waiting for network to become idle...");
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(NETWORK_IDLE_TIMEOUT_MS);

        // Performance API で直近のリソース取得を監視
        let mut idle_count = 0;
        const REQUIRED_IDLE_CHECKS: u32 = 3; // 連続3回アイドルでOK

        while start.elapsed() < timeout {
            let result = page
                .evaluate(
                    r#"
                    (() => {
                        const entries = performance.getEntriesByType('resource');
                        const now = performance.now();
                        const recent = entries.filter((e) => {
                            return (now - e.startTime) < 500 && e.duration === 0;
                        });
                        return recent.length === 0;
                    })()
                "#,
                )
                .await;

            match result {
                Ok(val) => {
                    if val.into_value::<bool>().unwrap_or(false) {
                        idle_count += 1;
                        if idle_count >= REQUIRED_IDLE_CHECKS {
                            debug!("Network idle after {:?}", start.elapsed());
                            return Ok(());
                        }
                    } else {
                        idle_count = 0;
                    }
                }
                Err(e) => {
                    debug!("Network idle check error: {}", e);
                    idle_count = 0;
                }
            }

            sleep(Duration::from_millis(NETWORK_IDLE_CHECK_INTERVAL_MS)).await;
        }

        warn!(
            "Network idle timeout after {:?}, proceeding anyway",
            start.elapsed()
        );
        Ok(())
    }

    /// デバッグ用にスクリーンショットをbase64でログ出力する
    async fn log_debug_screenshot(&self, page: &Page) {
        if let Ok(screenshot) = page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
        {
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(&screenshot);
            debug!("Review page screenshot: data:image/png;base64,{}", encoded);
        }
    }

    /// 現在レンダリングされているクチコミノードを生データとして取得する
    async fn snapshot_reviews(&self, page: &Page) -> Result<Vec<serde_json::Value>, ScraperError> {
        let result = page
            .evaluate(snapshot_script().as_str())
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;

        let json_str = result
            .into_value::<String>()
            .unwrap_or_else(|_| "[]".to_string());
        serde_json::from_str(&json_str).map_err(|e| ScraperError::Json(e.to_string()))
    }

    /// 「もっと見る」ボタンを押して全文を取得する
    ///
    /// 展開に失敗しても元のテキストのまま続行するため、エラーはNoneに潰す
    async fn expand_text(&self, page: &Page, review_id: &str) -> Option<String> {
        let clicked = page
            .evaluate(expand_click_script(review_id).as_str())
            .await
            .ok()?
            .into_value::<bool>()
            .unwrap_or(false);

        if !clicked {
            return None;
        }

        // テキストが安定するまで短い間隔でポーリングする
        let mut last: Option<String> = None;
        for _ in 0..EXPAND_POLL_MAX {
            sleep(Duration::from_millis(EXPAND_POLL_INTERVAL_MS)).await;

            let text = match page.evaluate(node_text_script(review_id).as_str()).await {
                Ok(val) => val.into_value::<Option<String>>().unwrap_or(None),
                Err(e) => {
                    debug!("Expanded text read error: {}", e);
                    return last;
                }
            };

            match (&last, &text) {
                // 連続2回同じ内容なら確定
                (Some(prev), Some(curr)) if prev == curr => return text,
                _ => last = text,
            }
        }
        last
    }

    /// クチコミコンテナを末尾までスクロールし、新規ノードが現れたかを返す
    ///
    /// コンテナが見つからない場合はウィンドウスクロールにフォールバックし、
    /// 進展ありとして扱う
    async fn scroll_reviews(&self, page: &Page) -> bool {
        let before = match self.count_review_nodes(page).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Error counting review nodes: {}", e);
                return false;
            }
        };

        let container_found = match page.evaluate(scroll_script().as_str()).await {
            Ok(val) => val.into_value::<bool>().unwrap_or(false),
            Err(e) => {
                warn!("Error scrolling reviews: {}", e);
                return false;
            }
        };

        sleep(Duration::from_millis(RENDER_WAIT_MS)).await;

        if !container_found {
            // フォールバックスクロールはノード数の比較ができないため成功扱い
            return true;
        }

        match self.count_review_nodes(page).await {
            Ok(after) => after > before,
            Err(e) => {
                warn!("Error counting review nodes: {}", e);
                false
            }
        }
    }

    async fn count_review_nodes(&self, page: &Page) -> Result<usize, ScraperError> {
        let result = page
            .evaluate(count_script().as_str())
            .await
            .map_err(|e| ScraperError::JavaScript(e.to_string()))?;

        Ok(result.into_value::<usize>().unwrap_or(0))
    }
}

#[async_trait]
impl Scraper for GmapsScraper {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        info!("Initializing browser for gmaps review scraper...");

        // ユニークなユーザーデータディレクトリを生成
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let user_data_dir = std::env::temp_dir().join(format!("gmaps-reviews-{}", unique_id));

        // Chrome パスを取得
        let chrome_path = std::env::var("CHROME_PATH")
            .or_else(|_| std::env::var("CHROMIUM_PATH"))
            .unwrap_or_else(|_| "chromium".to_string());

        // ブラウザ設定を構築
        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(&user_data_dir)
            .window_size(1920, 1080);

        if !self.config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .no_sandbox()
            .request_timeout(self.config.timeout)
            .arg("--disable-blink-features=AutomationControlled")
            .arg(format!("--user-agent={}", USER_AGENT))
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu");

        let browser_config = builder
            .build()
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // ブラウザを起動
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // ブラウザイベントハンドラをバックグラウンドで実行
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        self.browser = Some(browser);
        info!("Browser initialized successfully");

        Ok(())
    }

    async fn scrape(&mut self) -> Result<ReviewsResult, ScraperError> {
        info!("Starting gmaps review scrape...");

        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("ブラウザが初期化されていません".into()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        self.mask_automation(&page).await?;

        let mut collector = ReviewCollector::new(self.config.max_reviews);

        // ループ内で何が起きても収集済み分は返す
        let stop_reason = match self.run_loop(&page, &mut collector).await {
            Ok(reason) => reason,
            Err(e) => {
                warn!(
                    "Scrape aborted, keeping {} collected reviews: {}",
                    collector.len(),
                    e
                );
                StopReason::ScrollExhausted
            }
        };

        if let Err(e) = page.close().await {
            debug!("Failed to close page: {}", e);
        }

        let session_id = format!("run_{}", Utc::now().timestamp());
        info!(
            "Scrape finished: {} reviews, reason={:?}",
            collector.len(),
            stop_reason
        );

        Ok(ReviewsResult {
            reviews: collector.into_reviews(),
            session_id,
            stop_reason,
            output_path: None,
        })
    }

    async fn save(&self, reviews: &[Review]) -> Result<Option<PathBuf>, ScraperError> {
        if reviews.is_empty() {
            info!("No reviews collected, skipping save");
            return Ok(None);
        }

        let json =
            serde_json::to_string_pretty(reviews).map_err(|e| ScraperError::Json(e.to_string()))?;
        std::fs::write(&self.config.output_path, json)?;

        info!(
            "Saved {} reviews to {:?}",
            reviews.len(),
            self.config.output_path
        );
        Ok(Some(self.config.output_path.clone()))
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        info!("ブラウザを終了中...");

        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                debug!("Browser close error: {}", e);
            }
        }

        info!("ブラウザ終了完了");
        Ok(())
    }
}

/// 生データをReviewに変換する
///
/// 欠落フィールドは空文字・空リストに畳み込む。展開後テキストは
/// 元より長い場合のみ採用する。
fn review_from_raw(raw: RawReview, expanded_text: Option<String>) -> Review {
    let text = longer_text(raw.text.unwrap_or_default(), expanded_text);

    Review {
        reviewer_name: raw.name.unwrap_or_default(),
        reviewer_link: raw.link.unwrap_or_default(),
        reviewer_image: raw.image.unwrap_or_default(),
        rating: raw.stars,
        date: raw.date.unwrap_or_default(),
        text,
        photos: raw
            .photo_styles
            .iter()
            .filter_map(|style| background_image_url(style))
            .collect(),
        likes_count: raw.likes.unwrap_or_default(),
    }
}

/// 展開後テキストが元より長ければ置き換える
fn longer_text(original: String, expanded: Option<String>) -> String {
    match expanded {
        Some(expanded) if expanded.len() > original.len() => expanded,
        _ => original,
    }
}

/// インラインスタイルのbackground-image:url(...)からURLを取り出す
fn background_image_url(style: &str) -> Option<String> {
    let start = style.find("url(")? + 4;
    let rest = &style[start..];
    let end = rest.find(')')?;
    let url = rest[..end].trim().trim_matches(|c| c == '"' || c == '\'');

    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

/// 取得済みクチコミの蓄積と重複排除
///
/// data-review-idはスクロールによる再レンダリング後も安定している前提。
/// 空IDのノードは呼び出し側でスキップされる。
#[derive(Debug)]
struct ReviewCollector {
    reviews: Vec<Review>,
    seen_ids: HashSet<String>,
    max_reviews: Option<usize>,
}

impl ReviewCollector {
    fn new(max_reviews: Option<usize>) -> Self {
        Self {
            reviews: Vec::new(),
            seen_ids: HashSet::new(),
            max_reviews,
        }
    }

    fn is_full(&self) -> bool {
        matches!(self.max_reviews, Some(max) if self.reviews.len() >= max)
    }

    fn contains(&self, id: &str) -> bool {
        self.seen_ids.contains(id)
    }

    /// 未収集のIDであれば追加してtrueを返す
    fn insert(&mut self, id: String, review: Review) -> bool {
        if self.is_full() || self.seen_ids.contains(&id) {
            return false;
        }
        self.seen_ids.insert(id);
        self.reviews.push(review);
        true
    }

    fn len(&self) -> usize {
        self.reviews.len()
    }

    fn into_reviews(self) -> Vec<Review> {
        self.reviews
    }
}

/// 進展のないスクロールの連続回数を数える
#[derive(Debug)]
struct ScrollTracker {
    consecutive_failures: u32,
    max_consecutive_failures: u32,
}

impl ScrollTracker {
    fn new(max_consecutive_failures: u32) -> Self {
        Self {
            consecutive_failures: 0,
            max_consecutive_failures,
        }
    }

    /// スクロール結果を記録する。新規ノードが現れたらカウンタをリセット
    fn record(&mut self, progressed: bool) {
        if progressed {
            self.consecutive_failures = 0;
        } else {
            self.consecutive_failures += 1;
        }
    }

    fn exhausted(&self) -> bool {
        self.consecutive_failures >= self.max_consecutive_failures
    }
}

/// 表示中の全クチコミノードを走査して生データの配列をJSON文字列で返すスクリプト
fn snapshot_script() -> String {
    format!(
        r#"
        (() => {{
            const text = (node, sel) => {{
                const el = node.querySelector(sel);
                return el ? el.innerText : null;
            }};
            const attr = (node, sel, name) => {{
                const el = node.querySelector(sel);
                return el ? el.getAttribute(name) : null;
            }};
            const out = [];
            document.querySelectorAll('{review}').forEach((node) => {{
                const styles = [];
                node.querySelectorAll('{photo}').forEach((p) => {{
                    styles.push(p.getAttribute('style') || '');
                }});
                out.push({{
                    id: node.getAttribute('{id_attr}') || '',
                    name: text(node, '{name}'),
                    link: attr(node, '{link}', 'data-href'),
                    image: attr(node, '{image}', 'src'),
                    stars: node.querySelectorAll('{stars}').length,
                    date: text(node, '{date}'),
                    text: text(node, '{body}'),
                    has_more: node.querySelector('{more}') !== null,
                    photo_styles: styles,
                    likes: text(node, '{likes}'),
                }});
            }});
            return JSON.stringify(out);
        }})()
        "#,
        review = REVIEW_SELECTOR,
        photo = PHOTO_SELECTOR,
        id_attr = REVIEW_ID_ATTRIBUTE,
        name = REVIEWER_NAME_SELECTOR,
        link = REVIEWER_LINK_SELECTOR,
        image = REVIEWER_IMAGE_SELECTOR,
        stars = RATING_SELECTOR,
        date = DATE_SELECTOR,
        body = TEXT_SELECTOR,
        more = MORE_BUTTON_SELECTOR,
        likes = LIKES_SELECTOR,
    )
}

/// 指定IDのノード内の「もっと見る」ボタンをクリックするスクリプト
fn expand_click_script(review_id: &str) -> String {
    format!(
        r#"
        (() => {{
            const node = document.querySelector('[{attr}="{id}"]');
            if (!node) return false;
            const button = node.querySelector('{more}');
            if (!button) return false;
            button.click();
            return true;
        }})()
        "#,
        attr = REVIEW_ID_ATTRIBUTE,
        id = review_id,
        more = MORE_BUTTON_SELECTOR,
    )
}

/// 指定IDのノードの本文テキストを読むスクリプト
fn node_text_script(review_id: &str) -> String {
    format!(
        r#"
        (() => {{
            const node = document.querySelector('[{attr}="{id}"]');
            if (!node) return null;
            const el = node.querySelector('{body}');
            return el ? el.innerText : null;
        }})()
        "#,
        attr = REVIEW_ID_ATTRIBUTE,
        id = review_id,
        body = TEXT_SELECTOR,
    )
}

/// クチコミコンテナを末尾までスクロールするスクリプト
///
/// コンテナが見つかった場合はtrueを返す。見つからない場合は
/// ウィンドウスクロールにフォールバックしてfalseを返す
fn scroll_script() -> String {
    format!(
        r#"
        (() => {{
            const container = document.querySelector('{container}');
            if (!container) {{
                window.scrollBy(0, 500);
                return false;
            }}
            container.scrollTop = container.scrollHeight;
            return true;
        }})()
        "#,
        container = SCROLL_CONTAINER_SELECTOR,
    )
}

/// 表示中のクチコミノード数を数えるスクリプト
fn count_script() -> String {
    format!("document.querySelectorAll('{}').length", REVIEW_SELECTOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_text(text: &str) -> RawReview {
        RawReview {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    fn dummy_review() -> Review {
        review_from_raw(RawReview::default(), None)
    }

    #[test]
    fn test_review_from_raw_defaults() {
        // サブ要素が一つも取れなかったノードは空のReviewになる
        let review = review_from_raw(RawReview::default(), None);
        assert_eq!(review.reviewer_name, "");
        assert_eq!(review.reviewer_link, "");
        assert_eq!(review.reviewer_image, "");
        assert_eq!(review.rating, 0);
        assert_eq!(review.date, "");
        assert_eq!(review.text, "");
        assert!(review.photos.is_empty());
        assert_eq!(review.likes_count, "");
    }

    #[test]
    fn test_rating_equals_star_count() {
        for stars in [0u32, 3, 5] {
            let raw = RawReview {
                stars,
                ..Default::default()
            };
            assert_eq!(review_from_raw(raw, None).rating, stars);
        }
    }

    #[test]
    fn test_background_image_url() {
        assert_eq!(
            background_image_url(r#"background-image:url("http://x/1.jpg")"#),
            Some("http://x/1.jpg".to_string())
        );
        assert_eq!(
            background_image_url("background-image:url('http://x/2.jpg')"),
            Some("http://x/2.jpg".to_string())
        );
        assert_eq!(
            background_image_url("background-image:url(http://x/3.jpg)"),
            Some("http://x/3.jpg".to_string())
        );
        assert_eq!(background_image_url("width:72px;height:72px"), None);
        assert_eq!(background_image_url("background-image:url()"), None);
    }

    #[test]
    fn test_photo_styles_to_urls() {
        let raw = RawReview {
            photo_styles: vec![
                r#"background-image:url("http://x/1.jpg")"#.to_string(),
                "width:72px".to_string(),
                r#"background-image:url("http://x/2.jpg")"#.to_string(),
            ],
            ..Default::default()
        };
        let review = review_from_raw(raw, None);
        assert_eq!(review.photos, vec!["http://x/1.jpg", "http://x/2.jpg"]);
    }

    #[test]
    fn test_expanded_text_kept_only_when_longer() {
        let review = review_from_raw(
            raw_with_text("short"),
            Some("a much longer expanded text".to_string()),
        );
        assert_eq!(review.text, "a much longer expanded text");

        let review = review_from_raw(
            raw_with_text("already the full text"),
            Some("oops".to_string()),
        );
        assert_eq!(review.text, "already the full text");

        let review = review_from_raw(raw_with_text("unchanged"), None);
        assert_eq!(review.text, "unchanged");
    }

    #[test]
    fn test_raw_review_snapshot_parse() {
        // ページ内スクリプトが返す形式をそのままパースできること
        let json = r#"[{"id":"abc","name":"Taro","link":"https://maps.example/c/1","image":"https://img.example/a.png","stars":4,"date":"2 months ago","text":"Great pizza","has_more":false,"photo_styles":["background-image:url(\"http://x/1.jpg\")"],"likes":"12"}]"#;
        let values: Vec<serde_json::Value> = serde_json::from_str(json).unwrap();
        let raw: RawReview = serde_json::from_value(values[0].clone()).unwrap();
        assert_eq!(raw.id, "abc");
        assert_eq!(raw.stars, 4);

        let review = review_from_raw(raw, None);
        assert_eq!(review.reviewer_name, "Taro");
        assert_eq!(review.rating, 4);
        assert_eq!(review.photos, vec!["http://x/1.jpg"]);
        assert_eq!(review.likes_count, "12");
    }

    #[test]
    fn test_collector_stops_at_max() {
        let mut collector = ReviewCollector::new(Some(2));
        assert!(collector.insert("a".to_string(), dummy_review()));
        assert!(!collector.is_full());
        assert!(collector.insert("b".to_string(), dummy_review()));
        assert!(collector.is_full());

        // 上限到達後は挿入されない
        assert!(!collector.insert("c".to_string(), dummy_review()));
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_collector_rejects_duplicate_ids() {
        let mut collector = ReviewCollector::new(None);
        assert!(collector.insert("a".to_string(), dummy_review()));
        assert!(!collector.insert("a".to_string(), dummy_review()));
        assert_eq!(collector.len(), 1);
        assert!(collector.contains("a"));
    }

    #[test]
    fn test_collector_unbounded_never_full() {
        let mut collector = ReviewCollector::new(None);
        for i in 0..100 {
            collector.insert(format!("id-{}", i), dummy_review());
        }
        assert!(!collector.is_full());
        assert_eq!(collector.len(), 100);
    }

    #[test]
    fn test_scroll_tracker_exhausts_after_max_failures() {
        let mut tracker = ScrollTracker::new(3);
        tracker.record(false);
        tracker.record(false);
        assert!(!tracker.exhausted());
        tracker.record(false);
        assert!(tracker.exhausted());
    }

    #[test]
    fn test_scroll_tracker_resets_on_progress() {
        let mut tracker = ScrollTracker::new(2);
        tracker.record(false);
        tracker.record(true);
        tracker.record(false);
        assert!(!tracker.exhausted());
        tracker.record(false);
        assert!(tracker.exhausted());
    }

    #[test]
    fn test_gmaps_scraper_new() {
        let config = ScraperConfig::new("https://example.com/maps");
        let scraper = GmapsScraper::new(config);
        assert!(scraper.browser.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ScraperConfig::new("https://example.com/maps")
            .with_max_reviews(25)
            .with_output_path("/tmp/reviews.json")
            .with_headless(false)
            .with_debug(true)
            .with_timeout(Duration::from_secs(120));

        assert_eq!(config.url, "https://example.com/maps");
        assert_eq!(config.max_reviews, Some(25));
        assert_eq!(config.output_path, PathBuf::from("/tmp/reviews.json"));
        assert!(!config.headless);
        assert!(config.debug);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[tokio::test]
    #[ignore] // 実環境テスト用: GMAPS_URL を設定して cargo test -- --ignored --nocapture
    async fn test_live_scrape() {
        tracing_subscriber::fmt()
            .with_env_filter("info,gmaps_review_scraper=debug")
            .init();

        let url = std::env::var("GMAPS_URL").expect("GMAPS_URL not set");
        let config = ScraperConfig::new(url).with_max_reviews(5);

        let mut scraper = GmapsScraper::new(config);
        scraper
            .initialize()
            .await
            .expect("Failed to initialize browser");

        let result = scraper.scrape().await.expect("Scrape failed");
        scraper.close().await.expect("Failed to close browser");

        println!("\n=== Scrape Result ===");
        println!("Reviews: {}", result.reviews.len());
        for review in &result.reviews {
            println!(
                "  - {} ({}): {}",
                review.reviewer_name, review.rating, review.date
            );
        }
        assert!(!result.reviews.is_empty());
    }
}
