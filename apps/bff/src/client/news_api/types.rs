//! ニュース API クライアントの DTO / リクエスト型
//!
//! ニュース API の JSON は camelCase。欠落しうるフィールドは `Option` で受ける。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use trending_domain::comment::CommentSort;
use trending_infra::CredentialCookie;
use trending_shared::OffsetPage;

// --- 一覧の要約型 ---

/// ニュースの要約
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSummary {
   #[serde(default)]
   pub news_id:       Option<i64>,
   pub url:           String,
   pub title:         String,
   #[serde(default)]
   pub thumbnail_url: Option<String>,
   #[serde(default)]
   pub published_at:  Option<String>,
   #[serde(default)]
   pub platform:      Option<String>,
   #[serde(default)]
   pub summary:       Option<String>,
}

/// 動画の要約
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
   #[serde(default)]
   pub video_id:      Option<i64>,
   pub url:           String,
   pub title:         String,
   #[serde(default)]
   pub thumbnail_url: Option<String>,
   #[serde(default)]
   pub published_at:  Option<String>,
   #[serde(default)]
   pub platform:      Option<String>,
}

/// 投稿に紐づく関連ニュース・関連動画
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
   pub id:            i64,
   pub url:           String,
   #[serde(default)]
   pub thumbnail_url: Option<String>,
   pub title:         String,
}

/// 投稿の要約（詳細 API も同じ形で返す）
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
   pub post_id:       i64,
   pub keyword:       String,
   pub title:         String,
   pub summary:       String,
   #[serde(default)]
   pub thumbnail_url: Option<String>,
   #[serde(default)]
   pub source:        Option<String>,
   #[serde(default)]
   pub created_at:    Option<String>,
}

/// 急上昇キーワード
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSummary {
   pub keyword_id: i64,
   pub text:       String,
   #[serde(default)]
   pub platform:   Option<String>,
   #[serde(default)]
   pub bucket_at:  Option<String>,
   #[serde(default)]
   pub volume:     f64,
   #[serde(default)]
   pub score:      f64,
}

/// トップ一覧
///
/// ニュース API のリビジョンによって素の配列と `{ list, meta }` の両方が返るため、
/// どちらも受け付ける。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TopList<T> {
   Bare(Vec<T>),
   Paged(OffsetPage<T>),
}

impl<T> TopList<T> {
   pub fn into_vec(self) -> Vec<T> {
      match self {
         Self::Bare(list) => list,
         Self::Paged(page) => page.list,
      }
   }
}

// --- コメント ---

/// コメント
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
   pub comment_id:  i64,
   #[serde(deserialize_with = "string_or_number")]
   pub member_id:   String,
   pub nickname:    String,
   pub body:        String,
   #[serde(default)]
   pub like_count:  u64,
   pub created_at:  DateTime<Utc>,
   #[serde(default)]
   pub profile_url: Option<String>,
}

/// いいね後のコメント
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentLike {
   pub id:         i64,
   #[serde(deserialize_with = "string_or_number")]
   pub member_id:  String,
   pub body:       String,
   #[serde(default)]
   pub like_count: u64,
   pub created_at: DateTime<Utc>,
}

/// コメント一覧の取得条件（ページは 0 始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentListQuery {
   pub page: u32,
   pub size: u32,
   pub sort: CommentSort,
}

/// コメント作成・更新リクエスト（ニュース API 用）
#[derive(Debug, Serialize)]
pub(super) struct CommentBodyRequest<'a> {
   pub body: &'a str,
}

// --- 投稿検索 ---

/// 投稿検索の条件（ページは 0 始まり）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSearchQuery {
   pub keyword: String,
   pub page:    u32,
   pub size:    u32,
   pub sort:    &'static str,
}

// --- 認証 ---

/// 会員登録リクエスト（ニュース API 用）
///
/// ニュース API のフィールド名は `passwordHash` だが、値は平文のパスワードを送る。
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
   pub email:         String,
   pub password_hash: String,
   pub nickname:      String,
   pub birth_date:    String,
}

impl std::fmt::Debug for SignupRequest {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_struct("SignupRequest")
         .field("email", &self.email)
         .field("password_hash", &"[REDACTED]")
         .field("nickname", &self.nickname)
         .field("birth_date", &self.birth_date)
         .finish()
   }
}

/// 会員登録の結果
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResult {
   pub email:      String,
   pub nickname:   String,
   pub birth_date: String,
   pub role:       String,
}

/// ログインリクエスト（ニュース API 用）
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
   pub email:         String,
   pub password_hash: String,
}

impl std::fmt::Debug for LoginRequest {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_struct("LoginRequest")
         .field("email", &self.email)
         .field("password_hash", &"[REDACTED]")
         .finish()
   }
}

/// メール認証コード確認リクエスト（ニュース API 用）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CheckEmailRequest<'a> {
   pub email:     &'a str,
   pub auth_code: &'a str,
}

/// 認証メール送信リクエスト（ニュース API 用）
#[derive(Debug, Serialize)]
pub(super) struct SendVerificationEmailRequest<'a> {
   pub email: &'a str,
}

/// `Set-Cookie` で認証情報を受け取ったレスポンス
#[derive(Debug, Clone, PartialEq)]
pub struct Authenticated<T> {
   pub data:        T,
   pub credentials: Vec<CredentialCookie>,
}

/// 文字列・数値のどちらで来ても文字列として受け取る
///
/// ニュース API は `memberId` をエンドポイントによって文字列と数値で返す。
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
   D: Deserializer<'de>,
{
   #[derive(Deserialize)]
   #[serde(untagged)]
   enum StringOrNumber {
      String(String),
      Number(i64),
   }

   Ok(match StringOrNumber::deserialize(deserializer)? {
      StringOrNumber::String(s) => s,
      StringOrNumber::Number(n) => n.to_string(),
   })
}
