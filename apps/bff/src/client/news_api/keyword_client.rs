//! キーワード関連のニュース API クライアント

use async_trait::async_trait;
use reqwest::Method;

use super::{
   client_impl::NewsApiClientImpl,
   error::NewsApiError,
   response::handle_envelope,
   types::{KeywordSummary, TopList},
};

/// キーワード関連のニュース API クライアントトレイト
#[async_trait]
pub trait NewsApiKeywordClient: Send + Sync {
   /// 急上昇キーワードを取得する
   ///
   /// ニュース API の `GET /api/v1/keywords/top` を呼び出す。
   async fn top_keywords(&self) -> Result<Vec<KeywordSummary>, NewsApiError>;
}

#[async_trait]
impl NewsApiKeywordClient for NewsApiClientImpl {
   async fn top_keywords(&self) -> Result<Vec<KeywordSummary>, NewsApiError> {
      let response = self
         .request(Method::GET, "/api/v1/keywords/top")
         .send()
         .await?;
      handle_envelope::<TopList<KeywordSummary>>(response, None, &self.success_codes)
         .await
         .map(TopList::into_vec)
   }
}
