//! セッション参照ハンドラ（me, csrf）

use std::sync::Arc;

use axum::{
   Json,
   extract::State,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use trending_shared::{ApiResponse, ErrorResponse, event_log::error};

use super::{AuthState, CsrfResponseData, MemberData};
use crate::error::{get_session, internal_error_response};

/// GET /api/v1/auth/me
///
/// ログイン時にセッションへ保存した会員情報を返す。
/// ニュース API には問い合わせない。
#[utoipa::path(
   get,
   path = "/api/v1/auth/me",
   tag = "auth",
   security(("session_auth" = [])),
   responses(
      (status = 200, description = "会員情報", body = ApiResponse<MemberData>),
      (status = 401, description = "未ログイン", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn me(State(state): State<Arc<AuthState>>, jar: CookieJar) -> Response {
   match get_session(state.session_manager.as_ref(), &jar).await {
      Ok((_, session)) => {
         let response = ApiResponse::new(MemberData::from(session.member()));
         (StatusCode::OK, Json(response)).into_response()
      }
      Err(response) => response,
   }
}

/// GET /api/v1/auth/csrf
///
/// CSRF トークンを取得する。
/// トークンが存在しない場合は新規作成し、存在する場合は既存のトークンを返す。
#[utoipa::path(
   get,
   path = "/api/v1/auth/csrf",
   tag = "auth",
   security(("session_auth" = [])),
   responses(
      (status = 200, description = "CSRF トークン", body = ApiResponse<CsrfResponseData>),
      (status = 401, description = "未ログイン", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn csrf(State(state): State<Arc<AuthState>>, jar: CookieJar) -> Response {
   let (session_id, _) = match get_session(state.session_manager.as_ref(), &jar).await {
      Ok(s) => s,
      Err(response) => return response,
   };

   let token = match state.session_manager.get_csrf_token(&session_id).await {
      Ok(Some(token)) => token,
      Ok(None) => match state.session_manager.create_csrf_token(&session_id).await {
         Ok(token) => token,
         Err(e) => {
            tracing::error!(
               error.category = error::category::INFRASTRUCTURE,
               error.kind = error::kind::CSRF_TOKEN,
               "CSRF トークン作成で内部エラー: {}",
               e
            );
            return internal_error_response();
         }
      },
      Err(e) => {
         tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::CSRF_TOKEN,
            "CSRF トークン取得で内部エラー: {}",
            e
         );
         return internal_error_response();
      }
   };

   let response = ApiResponse::new(CsrfResponseData { token });
   (StatusCode::OK, Json(response)).into_response()
}
