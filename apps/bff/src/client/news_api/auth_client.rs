//! 認証・会員登録関連のニュース API クライアント
//!
//! ログインとトークンリフレッシュは `Set-Cookie` で認証情報を返すため、
//! ボディを読む前に Cookie を取り出す。

use async_trait::async_trait;
use reqwest::Method;
use trending_domain::member::Member;
use trending_infra::CredentialCookie;

use super::{
   client_impl::{NewsApiClientImpl, capture_credentials},
   error::NewsApiError,
   response::{handle_empty, handle_envelope},
   types::{
      Authenticated,
      CheckEmailRequest,
      LoginRequest,
      SendVerificationEmailRequest,
      SignupRequest,
      SignupResult,
   },
};

/// 認証・会員登録関連のニュース API クライアントトレイト
#[async_trait]
pub trait NewsApiAuthClient: Send + Sync {
   /// 会員登録する
   ///
   /// ニュース API の `POST /api/v1/members/signup` を呼び出す。
   async fn signup(&self, req: &SignupRequest) -> Result<SignupResult, NewsApiError>;

   /// ログインする
   ///
   /// ニュース API の `POST /api/v1/auth/login` を呼び出し、
   /// レスポンスの `Set-Cookie` を認証情報として返す。
   async fn login(&self, req: &LoginRequest) -> Result<Authenticated<Member>, NewsApiError>;

   /// ログアウトする
   ///
   /// ニュース API の `POST /api/v1/auth/logout` を呼び出す。
   async fn logout(&self, credentials: &[CredentialCookie]) -> Result<(), NewsApiError>;

   /// 認証情報をリフレッシュする
   ///
   /// ニュース API の `POST /api/v1/auth/refresh` を呼び出し、
   /// 新しく発行された Cookie を返す。
   async fn refresh(
      &self,
      credentials: &[CredentialCookie],
   ) -> Result<Vec<CredentialCookie>, NewsApiError>;

   /// 認証メールを送信する
   ///
   /// ニュース API の `POST /api/v1/auth/verify-email` を呼び出す。
   async fn send_verification_email(&self, email: &str) -> Result<(), NewsApiError>;

   /// 認証コードを確認する
   ///
   /// ニュース API の `POST /api/v1/auth/check-email` を呼び出す。
   async fn check_email(&self, email: &str, auth_code: &str) -> Result<(), NewsApiError>;
}

#[async_trait]
impl NewsApiAuthClient for NewsApiClientImpl {
   async fn signup(&self, req: &SignupRequest) -> Result<SignupResult, NewsApiError> {
      let response = self
         .request(Method::POST, "/api/v1/members/signup")
         .json(req)
         .send()
         .await?;
      handle_envelope(response, None, &self.success_codes).await
   }

   async fn login(&self, req: &LoginRequest) -> Result<Authenticated<Member>, NewsApiError> {
      let response = self
         .request(Method::POST, "/api/v1/auth/login")
         .json(req)
         .send()
         .await?;
      let credentials = capture_credentials(&response);
      let data = handle_envelope(response, None, &self.success_codes).await?;
      Ok(Authenticated { data, credentials })
   }

   async fn logout(&self, credentials: &[CredentialCookie]) -> Result<(), NewsApiError> {
      let response = self
         .authed_request(Method::POST, "/api/v1/auth/logout", credentials)
         .send()
         .await?;
      handle_empty(response, None, &self.success_codes).await
   }

   async fn refresh(
      &self,
      credentials: &[CredentialCookie],
   ) -> Result<Vec<CredentialCookie>, NewsApiError> {
      let response = self
         .authed_request(Method::POST, "/api/v1/auth/refresh", credentials)
         .send()
         .await?;
      let refreshed = capture_credentials(&response);
      handle_empty(response, None, &self.success_codes).await?;
      Ok(refreshed)
   }

   async fn send_verification_email(&self, email: &str) -> Result<(), NewsApiError> {
      let response = self
         .request(Method::POST, "/api/v1/auth/verify-email")
         .json(&SendVerificationEmailRequest { email })
         .send()
         .await?;
      handle_empty(response, None, &self.success_codes).await
   }

   async fn check_email(&self, email: &str, auth_code: &str) -> Result<(), NewsApiError> {
      let response = self
         .request(Method::POST, "/api/v1/auth/check-email")
         .json(&CheckEmailRequest { email, auth_code })
         .send()
         .await?;
      handle_empty(response, None, &self.success_codes).await
   }
}
