//! ニュース API クライアントのエラー型

use thiserror::Error;

/// ニュース API クライアントエラー
///
/// 通信エラー、HTTP ステータスによるエラー、エンベロープの業務エラーを区別する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewsApiError {
   /// 投稿が見つからない（404）
   #[error("投稿が見つかりません")]
   PostNotFound,

   /// コメントが見つからない（404）
   #[error("コメントが見つかりません")]
   CommentNotFound,

   /// 認証切れ・未認証（401）
   #[error("認証が必要です")]
   Unauthorized,

   /// 権限不足（403）
   #[error("権限がありません: {0}")]
   Forbidden(String),

   /// バリデーションエラー（400）
   #[error("バリデーションエラー: {0}")]
   Validation(String),

   /// 競合（409）
   #[error("競合が発生しました: {0}")]
   Conflict(String),

   /// 2xx だがエンベロープの `code` が成功値ではない
   #[error("業務エラー [{code}]: {message}")]
   Business { code: String, message: String },

   /// ネットワークエラー（接続失敗、レスポンスのデコード失敗）
   #[error("ネットワークエラー: {0}")]
   Network(String),

   /// 予期しないエラー
   #[error("予期しないエラー: {0}")]
   Unexpected(String),
}

impl NewsApiError {
   /// 通信・想定外エラーなど、ログに残して調査すべきエラーかどうか
   pub fn is_internal(&self) -> bool {
      matches!(self, Self::Network(_) | Self::Unexpected(_))
   }
}

impl From<reqwest::Error> for NewsApiError {
   fn from(err: reqwest::Error) -> Self {
      NewsApiError::Network(err.to_string())
   }
}
