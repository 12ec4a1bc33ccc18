//! メール認証ハンドラ
//!
//! 認証メールの送信と認証コードの確認を行う。
//!
//! 認証コードの有効期限（300 秒）は BFF がメールアドレスごとに管理する。
//! 期限切れ、または送信前のコードはニュース API に送らずに 400 を返す。

use std::sync::Arc;

use axum::{
   Json,
   extract::{Query, State},
   response::{IntoResponse, Response},
};
use trending_domain::{
   signup::Email,
   verification::{self, CountdownStatus, VerificationCode, VerificationCountdown},
};
use trending_shared::{
   ApiResponse,
   ErrorResponse,
   event_log::{error, event},
   log_business_event,
};

use super::{
   AuthState,
   CheckEmailRequest,
   CheckEmailResponseData,
   VerificationEmailRequest,
   VerificationStatusData,
   VerificationStatusQuery,
};
use crate::error::{
   SIGNIN_PATH,
   domain_error_response,
   internal_error_response,
   log_and_convert_news_api_error,
};

/// POST /api/v1/auth/verify-email
///
/// 認証メールを送信し、カウントダウンを開始する。
#[utoipa::path(
   post,
   path = "/api/v1/auth/verify-email",
   tag = "auth",
   request_body = VerificationEmailRequest,
   responses(
      (status = 200, description = "送信成功", body = ApiResponse<VerificationStatusData>),
      (status = 400, description = "メールアドレスが不正", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn send_verification_email(
   State(state): State<Arc<AuthState>>,
   Json(req): Json<VerificationEmailRequest>,
) -> Response {
   start_verification(&state, req.email, false).await
}

/// POST /api/v1/auth/verify-email/resend
///
/// 認証メールを再送信し、カウントダウンを 300 秒に戻す。
#[utoipa::path(
   post,
   path = "/api/v1/auth/verify-email/resend",
   tag = "auth",
   request_body = VerificationEmailRequest,
   responses(
      (status = 200, description = "再送信成功", body = ApiResponse<VerificationStatusData>),
      (status = 400, description = "メールアドレスが不正", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn resend_verification_email(
   State(state): State<Arc<AuthState>>,
   Json(req): Json<VerificationEmailRequest>,
) -> Response {
   start_verification(&state, req.email, true).await
}

async fn start_verification(state: &AuthState, email: String, resend: bool) -> Response {
   let email = match Email::new(email) {
      Ok(email) => email,
      Err(e) => return domain_error_response(e),
   };

   if let Err(e) = state.auth_client.send_verification_email(email.as_str()).await {
      return log_and_convert_news_api_error("認証メール送信", e);
   }

   let now = state.clock.now();
   let countdown = VerificationCountdown::start(now);
   if let Err(e) = state.verification_store.start(email.as_str(), &countdown).await {
      tracing::error!(
         error.category = error::category::INFRASTRUCTURE,
         error.kind = error::kind::VERIFICATION,
         "カウントダウンの保存に失敗: {}",
         e
      );
      return internal_error_response();
   }

   log_business_event!(
      event.category = event::category::SIGNUP,
      event.action = event::action::VERIFICATION_SENT,
      event.entity_type = event::entity_type::EMAIL_VERIFICATION,
      event.result = event::result::SUCCESS,
      resend,
      "認証メール送信"
   );

   Json(ApiResponse::new(VerificationStatusData::new(
      email.to_string(),
      countdown.status(now),
   )))
   .into_response()
}

/// GET /api/v1/auth/verify-email/status
///
/// 認証コードの残り時間を返す。送信前や期限切れ後は残り 0 秒で `expired: true`。
#[utoipa::path(
   get,
   path = "/api/v1/auth/verify-email/status",
   tag = "auth",
   params(VerificationStatusQuery),
   responses(
      (status = 200, description = "残り時間", body = ApiResponse<VerificationStatusData>)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn verification_status(
   State(state): State<Arc<AuthState>>,
   Query(query): Query<VerificationStatusQuery>,
) -> Response {
   let status = match state.verification_store.get(&query.email).await {
      Ok(Some(countdown)) => countdown.status(state.clock.now()),
      Ok(None) => CountdownStatus::not_started(),
      Err(e) => {
         tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::VERIFICATION,
            "カウントダウンの取得に失敗: {}",
            e
         );
         return internal_error_response();
      }
   };

   Json(ApiResponse::new(VerificationStatusData::new(
      query.email.trim().to_string(),
      status,
   )))
   .into_response()
}

/// POST /api/v1/auth/check-email
///
/// 認証コードを確認する。成功したらカウントダウンを破棄し、ログイン画面へ進む。
#[utoipa::path(
   post,
   path = "/api/v1/auth/check-email",
   tag = "auth",
   request_body = CheckEmailRequest,
   responses(
      (status = 200, description = "認証成功", body = ApiResponse<CheckEmailResponseData>),
      (status = 400, description = "コード未入力・期限切れ・不一致", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn check_email(
   State(state): State<Arc<AuthState>>,
   Json(req): Json<CheckEmailRequest>,
) -> Response {
   let code = match VerificationCode::new(req.code) {
      Ok(code) => code,
      Err(e) => return domain_error_response(e),
   };
   let email = match Email::new(req.email) {
      Ok(email) => email,
      Err(e) => return domain_error_response(e),
   };

   let countdown = match state.verification_store.get(email.as_str()).await {
      Ok(countdown) => countdown,
      Err(e) => {
         tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::VERIFICATION,
            "カウントダウンの取得に失敗: {}",
            e
         );
         return internal_error_response();
      }
   };

   // 期限切れのコードはニュース API に送らない
   if let Err(e) = verification::ensure_submittable(countdown.as_ref(), state.clock.now()) {
      return domain_error_response(e);
   }

   if let Err(e) = state
      .auth_client
      .check_email(email.as_str(), code.as_str())
      .await
   {
      return log_and_convert_news_api_error("認証コード確認", e);
   }

   if let Err(e) = state.verification_store.clear(email.as_str()).await {
      tracing::warn!("カウントダウンの削除に失敗（無視）: {}", e);
   }

   log_business_event!(
      event.category = event::category::SIGNUP,
      event.action = event::action::VERIFICATION_CHECKED,
      event.entity_type = event::entity_type::EMAIL_VERIFICATION,
      event.result = event::result::SUCCESS,
      "メール認証完了"
   );

   Json(ApiResponse::new(CheckEmailResponseData {
      next: SIGNIN_PATH.to_string(),
   }))
   .into_response()
}

#[cfg(test)]
mod tests {
   use axum::{
      body::Body,
      http::{Method, Request, StatusCode},
   };
   use pretty_assertions::assert_eq;
   use rstest::rstest;
   use tower::ServiceExt;
   use trending_domain::verification::VerificationCountdown;
   use trending_infra::VerificationStore;

   use super::super::test_utils::*;
   use crate::{
      client::NewsApiError,
      handler::test_utils::{StubNewsApiClient, response_json},
   };

   const EMAIL: &str = "reader@example.com";

   fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
      Request::builder()
         .method(Method::POST)
         .uri(uri)
         .header("content-type", "application/json")
         .body(Body::from(body.to_string()))
         .unwrap()
   }

   fn status_request() -> Request<Body> {
      Request::builder()
         .uri("/api/v1/auth/verify-email/status?email=reader%40example.com")
         .body(Body::empty())
         .unwrap()
   }

   async fn start_countdown(sut: &TestApp) {
      sut.store
         .start(EMAIL, &VerificationCountdown::start(base_time()))
         .await
         .unwrap();
   }

   // --- 送信 ---

   #[tokio::test]
   async fn test_認証メール送信でカウントダウンが5分から始まる() {
      // Given
      let sut = create_test_app(StubNewsApiClient::success());

      // When
      let response = sut
         .router
         .oneshot(post_json(
            "/api/v1/auth/verify-email",
            serde_json::json!({ "email": EMAIL }),
         ))
         .await
         .unwrap();
      let (status, json) = response_json(response).await;

      // Then
      assert_eq!(status, StatusCode::OK);
      assert_eq!(json["data"]["remaining_secs"], 300);
      assert_eq!(json["data"]["label"], "5:00");
      assert_eq!(json["data"]["can_submit"], true);
      assert!(sut.store.countdown(EMAIL).is_some());
      assert_eq!(
         sut.stub.calls(),
         vec![format!("send_verification_email email={EMAIL}")]
      );
   }

   #[tokio::test]
   async fn test_再送信でカウントダウンが5分に戻る() {
      // Given
      let sut = create_test_app(StubNewsApiClient::success());
      start_countdown(&sut).await;
      sut.clock.advance_secs(200);

      // When
      let response = sut
         .router
         .oneshot(post_json(
            "/api/v1/auth/verify-email/resend",
            serde_json::json!({ "email": EMAIL }),
         ))
         .await
         .unwrap();
      let (_, json) = response_json(response).await;

      // Then
      assert_eq!(json["data"]["remaining_secs"], 300);
      assert_eq!(
         sut.store.countdown(EMAIL).unwrap().issued_at(),
         base_time() + chrono::Duration::seconds(200)
      );
   }

   #[tokio::test]
   async fn test_送信に失敗した場合はカウントダウンを開始しない() {
      // Given
      let mut stub = StubNewsApiClient::success();
      stub.verification = Err(NewsApiError::Network("timeout".to_string()));
      let sut = create_test_app(stub);

      // When
      let response = sut
         .router
         .oneshot(post_json(
            "/api/v1/auth/verify-email",
            serde_json::json!({ "email": EMAIL }),
         ))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
      assert!(sut.store.countdown(EMAIL).is_none());
   }

   // --- 残り時間 ---

   #[rstest]
   #[case(0, 300, "5:00", false)]
   #[case(1, 299, "4:59", false)]
   #[case(241, 59, "0:59", false)]
   #[case(300, 0, "0:00", true)]
   #[case(1000, 0, "0:00", true)]
   #[tokio::test]
   async fn test_残り時間は1秒ごとに減り0で止まる(
      #[case] elapsed: i64,
      #[case] remaining: u32,
      #[case] label: &str,
      #[case] expired: bool,
   ) {
      // Given
      let sut = create_test_app(StubNewsApiClient::success());
      start_countdown(&sut).await;
      sut.clock.advance_secs(elapsed);

      // When
      let response = sut.router.oneshot(status_request()).await.unwrap();
      let (_, json) = response_json(response).await;

      // Then
      assert_eq!(json["data"]["remaining_secs"], remaining);
      assert_eq!(json["data"]["label"], label);
      assert_eq!(json["data"]["expired"], expired);
      assert_eq!(json["data"]["can_submit"], !expired);
   }

   #[tokio::test]
   async fn test_送信前の残り時間は0で期限切れ扱い() {
      // Given
      let sut = create_test_app(StubNewsApiClient::success());

      // When
      let response = sut.router.oneshot(status_request()).await.unwrap();
      let (status, json) = response_json(response).await;

      // Then
      assert_eq!(status, StatusCode::OK);
      assert_eq!(json["data"]["expired"], true);
      assert_eq!(json["data"]["can_submit"], false);
   }

   // --- 認証コード確認 ---

   #[tokio::test]
   async fn test_認証成功でカウントダウンを破棄しログイン画面へ進む() {
      // Given
      let sut = create_test_app(StubNewsApiClient::success());
      start_countdown(&sut).await;
      sut.clock.advance_secs(120);

      // When
      let response = sut
         .router
         .oneshot(post_json(
            "/api/v1/auth/check-email",
            serde_json::json!({ "email": EMAIL, "code": "123456" }),
         ))
         .await
         .unwrap();
      let (status, json) = response_json(response).await;

      // Then
      assert_eq!(status, StatusCode::OK);
      assert_eq!(json["data"]["next"], "/auth/signin");
      assert!(sut.store.countdown(EMAIL).is_none());
      assert_eq!(
         sut.stub.calls(),
         vec![format!("check_email email={EMAIL} code=123456")]
      );
   }

   #[tokio::test]
   async fn test_コードが空なら400でニュースapiを呼ばない() {
      // Given
      let sut = create_test_app(StubNewsApiClient::success());
      start_countdown(&sut).await;

      // When
      let response = sut
         .router
         .oneshot(post_json(
            "/api/v1/auth/check-email",
            serde_json::json!({ "email": EMAIL, "code": "  " }),
         ))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::BAD_REQUEST);
      assert!(sut.stub.calls().is_empty());
   }

   #[tokio::test]
   async fn test_期限切れのコードはニュースapiに送らない() {
      // Given
      let sut = create_test_app(StubNewsApiClient::success());
      start_countdown(&sut).await;
      sut.clock.advance_secs(300);

      // When
      let response = sut
         .router
         .oneshot(post_json(
            "/api/v1/auth/check-email",
            serde_json::json!({ "email": EMAIL, "code": "123456" }),
         ))
         .await
         .unwrap();
      let (status, json) = response_json(response).await;

      // Then
      assert_eq!(status, StatusCode::BAD_REQUEST);
      assert!(
         json["type"]
            .as_str()
            .unwrap()
            .ends_with("/verification-expired")
      );
      assert!(sut.stub.calls().is_empty());
   }

   #[tokio::test]
   async fn test_送信前のコード確認は期限切れ扱い() {
      // Given
      let sut = create_test_app(StubNewsApiClient::success());

      // When
      let response = sut
         .router
         .oneshot(post_json(
            "/api/v1/auth/check-email",
            serde_json::json!({ "email": EMAIL, "code": "123456" }),
         ))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::BAD_REQUEST);
      assert!(sut.stub.calls().is_empty());
   }

   #[tokio::test]
   async fn test_コード不一致ではカウントダウンを残す() {
      // Given
      let mut stub = StubNewsApiClient::success();
      stub.check_email = Err(NewsApiError::Business {
         code:    "A004".to_string(),
         message: "인증 코드가 일치하지 않습니다.".to_string(),
      });
      let sut = create_test_app(stub);
      start_countdown(&sut).await;

      // When
      let response = sut
         .router
         .oneshot(post_json(
            "/api/v1/auth/check-email",
            serde_json::json!({ "email": EMAIL, "code": "000000" }),
         ))
         .await
         .unwrap();
      let (status, json) = response_json(response).await;

      // Then
      assert_eq!(status, StatusCode::BAD_REQUEST);
      assert_eq!(json["detail"], "인증 코드가 일치하지 않습니다.");
      assert!(sut.store.countdown(EMAIL).is_some());
   }
}
