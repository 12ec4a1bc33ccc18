//! 会員関連のニュース API クライアント

use async_trait::async_trait;
use reqwest::Method;
use trending_domain::member::Member;
use trending_infra::CredentialCookie;

use super::{client_impl::NewsApiClientImpl, error::NewsApiError, response::handle_envelope};

/// 会員関連のニュース API クライアントトレイト
#[async_trait]
pub trait NewsApiMemberClient: Send + Sync {
   /// ログイン中の会員情報を取得する
   ///
   /// ニュース API の `GET /api/v1/members/me` を呼び出す。
   /// ログイン直後にセッションへ保存する会員情報の取得に使う。
   async fn me(&self, credentials: &[CredentialCookie]) -> Result<Member, NewsApiError>;
}

#[async_trait]
impl NewsApiMemberClient for NewsApiClientImpl {
   async fn me(&self, credentials: &[CredentialCookie]) -> Result<Member, NewsApiError> {
      let response = self
         .authed_request(Method::GET, "/api/v1/members/me", credentials)
         .send()
         .await?;
      handle_envelope(response, None, &self.success_codes).await
   }
}
