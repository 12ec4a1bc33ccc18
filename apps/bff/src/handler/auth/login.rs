//! ログイン・ログアウトハンドラ

use std::sync::Arc;

use axum::{
   Json,
   extract::State,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use trending_infra::SessionData;
use trending_shared::{
   ApiResponse,
   ErrorResponse,
   event_log::{error, event},
   log_business_event,
};

use super::{AuthState, LoginRequest, LoginResponseData, MemberData};
use crate::{
   client::{LoginRequest as NewsApiLoginRequest, NewsApiError},
   cookie::{SESSION_COOKIE_NAME, build_clear_cookie, build_session_cookie},
   error::{
      authentication_failed_response,
      internal_error_response,
      log_and_convert_news_api_error,
      validation_error_response,
   },
};

/// POST /api/v1/auth/login
///
/// メール/パスワードでログインし、セッションを確立する。
///
/// ## 認証フロー
///
/// 1. ニュース API でログインし、`Set-Cookie` の認証 Cookie を受け取る
/// 2. 受け取った Cookie で `GET /api/v1/members/me` を 1 度だけ呼び、会員情報を得る
/// 3. 会員情報と認証 Cookie をセッションに保存し、`session_id` Cookie を設定
///
/// 2 が失敗した場合はログインレスポンスの会員情報を使う。
#[utoipa::path(
   post,
   path = "/api/v1/auth/login",
   tag = "auth",
   request_body = LoginRequest,
   responses(
      (status = 200, description = "ログイン成功", body = ApiResponse<LoginResponseData>),
      (status = 400, description = "入力不足", body = ErrorResponse),
      (status = 401, description = "認証失敗", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn login(
   State(state): State<Arc<AuthState>>,
   jar: CookieJar,
   Json(req): Json<LoginRequest>,
) -> Response {
   let email = req.email.trim();
   if email.is_empty() || req.password.is_empty() {
      return validation_error_response("이메일과 비밀번호를 입력해주세요.");
   }

   // Step 1: ニュース API でログイン
   let authenticated = match state
      .auth_client
      .login(&NewsApiLoginRequest {
         email:         email.to_string(),
         password_hash: req.password,
      })
      .await
   {
      Ok(authenticated) => authenticated,
      Err(NewsApiError::Unauthorized | NewsApiError::Validation(_)) => {
         log_business_event!(
            event.category = event::category::AUTH,
            event.action = event::action::LOGIN_FAILURE,
            event.entity_type = event::entity_type::MEMBER,
            event.result = event::result::FAILURE,
            event.reason = "invalid_credentials",
            "ログイン失敗"
         );
         return authentication_failed_response();
      }
      Err(e) => return log_and_convert_news_api_error("ログイン", e),
   };

   // Step 2: セッションに載せる会員情報を取得
   let member = match state.member_client.me(&authenticated.credentials).await {
      Ok(member) => member,
      Err(e) => {
         tracing::warn!("会員情報の取得に失敗したためログイン応答の会員情報を使う: {}", e);
         authenticated.data
      }
   };

   // Step 3: セッションを作成
   let session_data = SessionData::new(member, authenticated.credentials, state.clock.now());

   let session_id = match state.session_manager.create(&session_data).await {
      Ok(id) => id,
      Err(e) => {
         tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::SESSION,
            "セッション作成に失敗: {}",
            e
         );
         return internal_error_response();
      }
   };

   if let Err(e) = state.session_manager.create_csrf_token(&session_id).await {
      tracing::error!(
         error.category = error::category::INFRASTRUCTURE,
         error.kind = error::kind::CSRF_TOKEN,
         "CSRF トークン作成に失敗: {}",
         e
      );
      return internal_error_response();
   }

   let jar = jar.add(build_session_cookie(&session_id));

   let member = session_data.member();
   log_business_event!(
      event.category = event::category::AUTH,
      event.action = event::action::LOGIN_SUCCESS,
      event.entity_type = event::entity_type::SESSION,
      event.entity_id = %session_id,
      event.actor_id = %member.id,
      event.result = event::result::SUCCESS,
      "ログイン成功"
   );

   let response = ApiResponse::new(LoginResponseData {
      member: MemberData::from(member),
   });
   (jar, Json(response)).into_response()
}

/// POST /api/v1/auth/logout
///
/// ニュース API からログアウトし、セッションを破棄する。
/// ニュース API 側の失敗は無視し、常に Cookie をクリアする。
#[utoipa::path(
   post,
   path = "/api/v1/auth/logout",
   tag = "auth",
   security(("session_auth" = [])),
   responses(
      (status = 204, description = "ログアウト成功")
   )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<Arc<AuthState>>, jar: CookieJar) -> Response {
   if let Some(session_cookie) = jar.get(SESSION_COOKIE_NAME) {
      let session_id = session_cookie.value();

      match state.session_manager.get(session_id).await {
         Ok(Some(session)) => {
            if let Err(e) = state.auth_client.logout(session.credentials()).await {
               tracing::warn!("ニュース API のログアウトに失敗（無視）: {}", e);
            }
            log_business_event!(
               event.category = event::category::AUTH,
               event.action = event::action::LOGOUT,
               event.entity_type = event::entity_type::SESSION,
               event.entity_id = %session_id,
               event.actor_id = %session.member().id,
               event.result = event::result::SUCCESS,
               "ログアウト"
            );
         }
         Ok(None) => {}
         Err(e) => tracing::warn!("セッション取得に失敗（無視）: {}", e),
      }

      // CSRF トークンを削除（エラーは無視）
      if let Err(e) = state.session_manager.delete_csrf_token(session_id).await {
         tracing::warn!("CSRF トークン削除に失敗（無視）: {}", e);
      }

      // セッションを削除（エラーは無視）
      if let Err(e) = state.session_manager.delete(session_id).await {
         tracing::warn!("セッション削除に失敗（無視）: {}", e);
      }
   }

   let jar = jar.add(build_clear_cookie());

   (jar, StatusCode::NO_CONTENT).into_response()
}
