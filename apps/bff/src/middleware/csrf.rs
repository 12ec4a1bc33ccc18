//! # CSRF 検証ミドルウェア
//!
//! 状態変更リクエスト（POST/PUT/PATCH/DELETE）で CSRF トークンを検証する。
//!
//! トークンはセッションごとに Redis に保存し、`GET /api/v1/auth/csrf` で取得する。
//! セッションを持たない段階で呼ばれるエンドポイント（ログイン・会員登録・メール認証）は
//! 検証の対象外とする。

use std::sync::Arc;

use axum::{
   Json,
   body::Body,
   extract::State,
   http::{Method, Request, StatusCode},
   middleware::Next,
   response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use subtle::ConstantTimeEq;
use trending_infra::SessionManager;
use trending_shared::{ErrorResponse, event_log::error};

use crate::cookie::SESSION_COOKIE_NAME;

/// CSRF 検証用のヘッダー名
const CSRF_HEADER: &str = "X-CSRF-Token";

/// CSRF 検証をスキップするパス
const CSRF_SKIP_PATHS: &[&str] = &[
   "/api/v1/auth/login",
   "/api/v1/auth/signup",
   "/api/v1/auth/verify-email",
   "/api/v1/auth/verify-email/resend",
   "/api/v1/auth/check-email",
   "/api/v1/auth/csrf",
   "/health",
];

/// CSRF 検証の状態
#[derive(Clone)]
pub struct CsrfState {
   pub session_manager: Arc<dyn SessionManager>,
}

fn csrf_error_response(detail: &str) -> Response {
   (
      StatusCode::FORBIDDEN,
      Json(ErrorResponse::new(
         "csrf-validation-failed",
         "CSRF Validation Failed",
         403,
         detail,
      )),
   )
      .into_response()
}

/// CSRF 検証が必要なメソッドかどうか
fn requires_csrf_validation(method: &Method) -> bool {
   matches!(
      *method,
      Method::POST | Method::PUT | Method::PATCH | Method::DELETE
   )
}

/// CSRF 検証をスキップするパスかどうか
fn should_skip_csrf(path: &str) -> bool {
   CSRF_SKIP_PATHS.contains(&path)
}

/// CSRF 検証ミドルウェア
pub async fn csrf_middleware(
   State(state): State<CsrfState>,
   jar: CookieJar,
   request: Request<Body>,
   next: Next,
) -> Response {
   if !requires_csrf_validation(request.method()) || should_skip_csrf(request.uri().path()) {
      return next.run(request).await;
   }

   let Some(session_id) = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string()) else {
      return csrf_error_response("세션이 필요합니다.");
   };

   let Some(provided_token) = request
      .headers()
      .get(CSRF_HEADER)
      .and_then(|v| v.to_str().ok())
      .map(ToString::to_string)
   else {
      return csrf_error_response("CSRF 토큰이 필요합니다.");
   };

   // タイミング攻撃対策として定数時間比較を使用
   match state.session_manager.get_csrf_token(&session_id).await {
      Ok(Some(stored_token)) => {
         let is_valid: bool = stored_token
            .as_bytes()
            .ct_eq(provided_token.as_bytes())
            .into();
         if !is_valid {
            return csrf_error_response("CSRF 토큰이 유효하지 않습니다.");
         }
      }
      Ok(None) => return csrf_error_response("CSRF 토큰이 유효하지 않습니다."),
      Err(e) => {
         tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::CSRF_TOKEN,
            "CSRF トークン取得で内部エラー: {}",
            e
         );
         return csrf_error_response("일시적인 오류가 발생했습니다. 잠시 후 다시 시도해주세요.");
      }
   }

   next.run(request).await
}
