//! # BFF エラーハンドリング
//!
//! HTTP API のエラー定義と、axum レスポンスへの変換。
//!
//! BFF の各ハンドラが共通で使うエラー型とヘルパー関数を集約する。
//!
//! ## 認証エラー
//!
//! 未ログイン・セッション切れ・リフレッシュ後も残る 401 はすべて
//! [`unauthorized_redirect_response`] に集約する。ブラウザは
//! `X-Auth-Redirect` ヘッダーを見てサインイン画面へ 1 度だけ遷移する。

use axum::{
   Json,
   http::{HeaderValue, StatusCode},
   response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use trending_domain::DomainError;
use trending_infra::{SessionData, SessionManager};
use trending_shared::{ErrorResponse, event_log::error};

use crate::{
   client::NewsApiError,
   cookie::{SESSION_COOKIE_NAME, build_clear_cookie},
};

/// サインイン画面への遷移を指示するヘッダー名
pub const AUTH_REDIRECT_HEADER: &str = "X-Auth-Redirect";

/// サインイン画面のパス
pub const SIGNIN_PATH: &str = "/auth/signin";

// --- 共通ヘルパー関数 ---

/// Cookie からセッションを取得する
///
/// セッション ID とセッションデータの組を返す。
/// Cookie がない、またはセッションが存在しない場合はサインインへの遷移を指示する。
pub async fn get_session(
   session_manager: &dyn SessionManager,
   jar: &CookieJar,
) -> Result<(String, SessionData), Response> {
   let session_id = jar
      .get(SESSION_COOKIE_NAME)
      .map(|cookie| cookie.value().to_string())
      .ok_or_else(unauthorized_redirect_response)?;

   match session_manager.get(&session_id).await {
      Ok(Some(data)) => Ok((session_id, data)),
      Ok(None) => Err(unauthorized_redirect_response()),
      Err(e) => {
         tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::SESSION,
            "セッション取得で内部エラー: {}",
            e
         );
         Err(internal_error_response())
      }
   }
}

// --- IntoResponse for NewsApiError ---

impl IntoResponse for NewsApiError {
   fn into_response(self) -> Response {
      match self {
         NewsApiError::PostNotFound => not_found_response(
            "post-not-found",
            "Post Not Found",
            "게시글을 찾을 수 없습니다.",
         ),
         NewsApiError::CommentNotFound => not_found_response(
            "comment-not-found",
            "Comment Not Found",
            "댓글을 찾을 수 없습니다.",
         ),
         NewsApiError::Unauthorized => unauthorized_redirect_response(),
         NewsApiError::Validation(ref detail) => validation_error_response(detail),
         NewsApiError::Business { ref message, .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(message.as_str())),
         )
            .into_response(),
         NewsApiError::Forbidden(ref detail) => forbidden_response(detail),
         NewsApiError::Conflict(ref detail) => conflict_response(detail),
         NewsApiError::Network(_) | NewsApiError::Unexpected(_) => internal_error_response(),
      }
   }
}

/// ニュース API エラーをログ付きでレスポンスに変換する
///
/// `Network`/`Unexpected` エラーと業務エラーはコンテキスト付きでログに残す。
/// その他のエラーは `IntoResponse` でレスポンスに変換するのみ。
pub fn log_and_convert_news_api_error(context: &str, err: NewsApiError) -> Response {
   log_news_api_error(context, &err);
   err.into_response()
}

/// ニュース API エラーをログに残す
///
/// 画面のビューモデル取得のように、エラーを空の一覧に縮退させる場合にも使う。
pub fn log_news_api_error(context: &str, err: &NewsApiError) {
   match err {
      NewsApiError::Network(_) | NewsApiError::Unexpected(_) => {
         tracing::error!(
            error.category = error::category::EXTERNAL_SERVICE,
            error.kind = error::kind::SERVICE_COMMUNICATION,
            "{}で内部エラー: {}",
            context,
            err
         );
      }
      NewsApiError::Business { .. } => {
         tracing::warn!(
            error.category = error::category::EXTERNAL_SERVICE,
            error.kind = error::kind::BUSINESS_CODE,
            "{}で業務エラー: {}",
            context,
            err
         );
      }
      _ => {
         tracing::debug!("{}でエラー: {}", context, err);
      }
   }
}

// --- DomainError のレスポンス変換 ---

/// ドメインの検証エラーを 400 レスポンスに変換する
///
/// `DomainError` は domain クレートの型なので `IntoResponse` は実装できない。
pub fn domain_error_response(err: DomainError) -> Response {
   match err {
      DomainError::Validation(ref detail) => validation_error_response(detail),
      DomainError::VerificationExpired => (
         StatusCode::BAD_REQUEST,
         Json(ErrorResponse::new(
            "verification-expired",
            "Verification Expired",
            400,
            err.to_string(),
         )),
      )
         .into_response(),
   }
}

// --- レスポンスヘルパー ---

/// ログイン失敗レスポンス
pub fn authentication_failed_response() -> Response {
   (
      StatusCode::UNAUTHORIZED,
      Json(ErrorResponse::new(
         "authentication-failed",
         "Authentication Failed",
         401,
         "이메일 또는 비밀번호가 올바르지 않습니다.",
      )),
   )
      .into_response()
}

/// 未認証レスポンス（サインイン画面への遷移指示付き）
///
/// ブラウザの `session_id` Cookie も同時にクリアする。
pub fn unauthorized_redirect_response() -> Response {
   let jar = CookieJar::new().add(build_clear_cookie());
   let mut response = (
      StatusCode::UNAUTHORIZED,
      jar,
      Json(ErrorResponse::unauthorized("로그인이 필요합니다.")),
   )
      .into_response();
   response.headers_mut().insert(
      AUTH_REDIRECT_HEADER,
      HeaderValue::from_static(SIGNIN_PATH),
   );
   response
}

/// 内部エラーレスポンス
pub fn internal_error_response() -> Response {
   (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(ErrorResponse::internal_error()),
   )
      .into_response()
}

/// 404 Not Found レスポンス
pub fn not_found_response(error_type_suffix: &str, title: &str, detail: &str) -> Response {
   (
      StatusCode::NOT_FOUND,
      Json(ErrorResponse::new(error_type_suffix, title, 404, detail)),
   )
      .into_response()
}

/// バリデーションエラーレスポンス
pub fn validation_error_response(detail: &str) -> Response {
   (
      StatusCode::BAD_REQUEST,
      Json(ErrorResponse::validation_error(detail)),
   )
      .into_response()
}

/// 403 Forbidden レスポンス
pub fn forbidden_response(detail: &str) -> Response {
   (
      StatusCode::FORBIDDEN,
      Json(ErrorResponse::forbidden(detail)),
   )
      .into_response()
}

/// 409 Conflict レスポンス
pub fn conflict_response(detail: &str) -> Response {
   (StatusCode::CONFLICT, Json(ErrorResponse::conflict(detail))).into_response()
}
