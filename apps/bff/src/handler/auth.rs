//! # 認証ハンドラ
//!
//! BFF の認証・会員登録エンドポイントを提供する。
//!
//! ## エンドポイント
//!
//! - `POST /api/v1/auth/login` - ログイン
//! - `POST /api/v1/auth/logout` - ログアウト
//! - `GET /api/v1/auth/me` - ログイン中の会員
//! - `GET /api/v1/auth/csrf` - CSRF トークン取得
//! - `POST /api/v1/auth/signup` - 会員登録
//! - `POST /api/v1/auth/verify-email` - 認証メール送信
//! - `POST /api/v1/auth/verify-email/resend` - 認証メール再送信
//! - `GET /api/v1/auth/verify-email/status` - 認証コードの残り時間
//! - `POST /api/v1/auth/check-email` - 認証コード確認
//!
//! ニュース API の認証 Cookie はブラウザに渡さず、Redis のセッションに保存する。
//! ブラウザが持つのは `session_id` Cookie だけ。

mod login;
mod session;
mod signup;
mod verification;

use std::sync::Arc;

pub use login::*;
use serde::{Deserialize, Serialize};
pub use session::*;
pub use signup::*;
use trending_domain::{clock::Clock, member::Member, verification::CountdownStatus};
use trending_infra::{SessionManager, VerificationStore};
use utoipa::{IntoParams, ToSchema};
pub use verification::*;

use crate::client::{NewsApiAuthClient, NewsApiMemberClient};

/// 認証ハンドラの共有状態
pub struct AuthState {
   pub auth_client:        Arc<dyn NewsApiAuthClient>,
   pub member_client:      Arc<dyn NewsApiMemberClient>,
   pub session_manager:    Arc<dyn SessionManager>,
   pub verification_store: Arc<dyn VerificationStore>,
   pub clock:              Arc<dyn Clock>,
}

// --- リクエスト/レスポンス型 ---

/// ログインリクエスト
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
   pub email:    String,
   pub password: String,
}

impl std::fmt::Debug for LoginRequest {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_struct("LoginRequest")
         .field("email", &self.email)
         .field("password", &"[REDACTED]")
         .finish()
   }
}

/// ログイン中の会員
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberData {
   pub id:          String,
   pub nickname:    String,
   pub email:       String,
   pub role:        String,
   pub profile_url: Option<String>,
}

impl From<&Member> for MemberData {
   fn from(member: &Member) -> Self {
      Self {
         id:          member.id.to_string(),
         nickname:    member.nickname.clone(),
         email:       member.email.clone(),
         role:        member.role.clone(),
         profile_url: member.profile_url.clone(),
      }
   }
}

/// ログインレスポンスデータ
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponseData {
   pub member: MemberData,
}

/// CSRF トークンデータ
#[derive(Debug, Serialize, ToSchema)]
pub struct CsrfResponseData {
   pub token: String,
}

/// 会員登録リクエスト
///
/// 生年月日は年・月・日を別々の入力欄から文字列で受け取る。
#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
   #[serde(default)]
   pub email:       String,
   #[serde(default)]
   pub password:    String,
   #[serde(default)]
   pub nickname:    String,
   #[serde(default)]
   pub birth_year:  String,
   #[serde(default)]
   pub birth_month: String,
   #[serde(default)]
   pub birth_day:   String,
}

impl std::fmt::Debug for SignupRequest {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_struct("SignupRequest")
         .field("email", &self.email)
         .field("password", &"[REDACTED]")
         .field("nickname", &self.nickname)
         .finish_non_exhaustive()
   }
}

/// 会員登録レスポンスデータ
#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponseData {
   pub email:      String,
   pub nickname:   String,
   pub birth_date: String,
   pub role:       String,
   /// 次に表示する画面（メール認証）
   pub next:       String,
}

/// 認証メール送信リクエスト
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerificationEmailRequest {
   #[serde(default)]
   pub email: String,
}

/// 認証コードの残り時間のクエリパラメータ
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerificationStatusQuery {
   pub email: String,
}

/// 認証コードの残り時間
#[derive(Debug, Serialize, ToSchema)]
pub struct VerificationStatusData {
   pub email:          String,
   pub remaining_secs: u32,
   /// `m:ss` 形式
   pub label:          String,
   pub expired:        bool,
   /// 認証コードを送信できるか（期限切れなら送信ボタンを無効にする）
   pub can_submit:     bool,
}

impl VerificationStatusData {
   fn new(email: String, status: CountdownStatus) -> Self {
      Self {
         email,
         remaining_secs: status.remaining_secs,
         label: status.label,
         can_submit: !status.expired,
         expired: status.expired,
      }
   }
}

/// 認証コード確認リクエスト
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckEmailRequest {
   #[serde(default)]
   pub email: String,
   #[serde(default)]
   pub code:  String,
}

/// 認証コード確認レスポンスデータ
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckEmailResponseData {
   /// 次に表示する画面（ログイン）
   pub next: String,
}

// --- テストユーティリティ ---
