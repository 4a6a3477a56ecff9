use std::path::PathBuf;
use std::time::Duration;

/// クチコミスクレイパーの設定
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// 対象ページのURL（Googleマップのクチコミタブ）
    pub url: String,
    /// 取得する最大クチコミ件数（Noneで無制限）
    pub max_reviews: Option<usize>,
    /// 収集結果の保存先JSONファイル
    pub output_path: PathBuf,
    /// ヘッドレスモード
    pub headless: bool,
    /// デバッグモード（ナビゲーション後のスクリーンショットをログ出力）
    pub debug: bool,
    /// CDPリクエストタイムアウト
    pub timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_reviews: None,
            output_path: PathBuf::from("reviews_output.json"),
            headless: true,
            debug: false,
            timeout: Duration::from_secs(60),
        }
    }
}

impl ScraperConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
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

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
