//! Googleマップ クチコミ関連の型定義

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// クチコミ1件分のデータ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// 投稿者の表示名
    pub reviewer_name: String,
    /// 投稿者のプロフィールリンク
    pub reviewer_link: String,
    /// 投稿者のアバター画像URL
    pub reviewer_image: String,
    /// 評価（描画された星アイコンの個数）
    pub rating: u32,
    /// 表示用の日付文字列（"2 months ago" など）
    pub date: String,
    /// 本文（折りたたみがあれば展開後のもの）
    pub text: String,
    /// 添付写真のURL（表示順）
    pub photos: Vec<String>,
    /// いいね数の表示文字列
    pub likes_count: String,
}

/// ページ内スクリプトが返す生データ（クチコミノード1件分）
///
/// 取得できなかったフィールドはnull/欠落になる。
/// Reviewへの変換時に空文字・空リストへ畳み込む。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub has_more: bool,
    /// 写真要素のインラインstyle属性（background-image:url(...)を含む）
    #[serde(default)]
    pub photo_styles: Vec<String>,
    #[serde(default)]
    pub likes: Option<String>,
}

/// 収集ループの終了理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// 要求件数に到達した
    TargetReached,
    /// スクロールしても新規ノードが現れない状態が規定回数続いた
    ScrollExhausted,
}

/// クチコミスクレイプ結果
#[derive(Debug, Clone)]
pub struct ReviewsResult {
    /// 発見順のクチコミ一覧
    pub reviews: Vec<Review>,
    /// 実行ID
    pub session_id: String,
    /// 収集ループの終了理由
    pub stop_reason: StopReason,
    /// 保存先（saveを実行した場合のみ）
    pub output_path: Option<PathBuf>,
}
