//! 会員登録ハンドラ

use std::sync::Arc;

use axum::{
   Json,
   extract::State,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use trending_domain::signup::{SignupForm, SignupInput};
use trending_shared::{ApiResponse, ErrorResponse, event_log::event, log_business_event};

use super::{AuthState, SignupRequest, SignupResponseData};
use crate::{
   client::SignupRequest as NewsApiSignupRequest,
   error::{domain_error_response, log_and_convert_news_api_error},
};

/// 登録後に表示するメール認証画面
const VERIFY_EMAIL_PATH: &str = "/auth/verify-email";

/// POST /api/v1/auth/signup
///
/// 入力を検証してからニュース API に会員登録を依頼する。
/// 検証に失敗した場合はニュース API を呼ばない。
#[utoipa::path(
   post,
   path = "/api/v1/auth/signup",
   tag = "auth",
   request_body = SignupRequest,
   responses(
      (status = 201, description = "登録成功", body = ApiResponse<SignupResponseData>),
      (status = 400, description = "入力エラー", body = ErrorResponse),
      (status = 409, description = "登録済みのメールアドレス", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn signup(
   State(state): State<Arc<AuthState>>,
   Json(req): Json<SignupRequest>,
) -> Response {
   let today = state.clock.now().date_naive();
   let form = match SignupForm::new(
      SignupInput {
         email:       &req.email,
         password:    &req.password,
         nickname:    &req.nickname,
         birth_year:  &req.birth_year,
         birth_month: &req.birth_month,
         birth_day:   &req.birth_day,
      },
      today,
   ) {
      Ok(form) => form,
      Err(e) => return domain_error_response(e),
   };

   let request = NewsApiSignupRequest {
      email:         form.email.to_string(),
      password_hash: form.password.into_string(),
      nickname:      form.nickname.into_string(),
      birth_date:    form.birth_date.to_string(),
   };

   let created = match state.auth_client.signup(&request).await {
      Ok(created) => created,
      Err(e) => return log_and_convert_news_api_error("会員登録", e),
   };

   log_business_event!(
      event.category = event::category::SIGNUP,
      event.action = event::action::SIGNUP_COMPLETED,
      event.entity_type = event::entity_type::MEMBER,
      event.result = event::result::SUCCESS,
      "会員登録"
   );

   let next = format!(
      "{VERIFY_EMAIL_PATH}?email={}",
      urlencoding::encode(&created.email)
   );
   let response = ApiResponse::new(SignupResponseData {
      email: created.email,
      nickname: created.nickname,
      birth_date: created.birth_date,
      role: created.role,
      next,
   });

   (StatusCode::CREATED, Json(response)).into_response()
}
