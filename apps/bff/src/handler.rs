//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ランキングや検索はニュース API に委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `auth`: 認証関連（ログイン、ログアウト、会員登録、メール認証）
//! - `page`: 画面ごとのビューモデル（ホーム、人気、キーワード、投稿詳細）
//! - `comment`: コメント関連（一覧、作成、更新、削除、いいね）

pub mod auth;
pub mod comment;
pub mod health;
pub mod page;

pub use auth::{
   AuthState,
   check_email,
   csrf,
   login,
   logout,
   me,
   resend_verification_email,
   send_verification_email,
   signup,
   verification_status,
};
pub use comment::{
   CommentState,
   create_comment,
   delete_comment,
   like_comment,
   list_comments,
   update_comment,
};
pub use health::{ReadinessState, health_check, readiness_check};
pub use page::{
   PageState,
   home_page,
   keyword_page,
   popular_news_page,
   popular_videos_page,
   post_page,
   top_keywords,
};

#[cfg(test)]
pub(crate) mod test_utils;
