//! 投稿関連のニュース API クライアント

use async_trait::async_trait;
use reqwest::Method;
use trending_shared::OffsetPage;

use super::{
   client_impl::NewsApiClientImpl,
   error::NewsApiError,
   response::handle_envelope,
   types::{PostSearchQuery, PostSummary, TopList},
};

/// 投稿関連のニュース API クライアントトレイト
#[async_trait]
pub trait NewsApiPostClient: Send + Sync {
   /// トップ投稿を取得する
   ///
   /// ニュース API の `GET /api/v1/posts/top` を呼び出す。
   async fn top_posts(&self) -> Result<Vec<PostSummary>, NewsApiError>;

   /// キーワードで投稿を検索する
   ///
   /// ニュース API の `GET /api/v1/posts/search` を呼び出す。
   async fn search_posts(
      &self,
      query: &PostSearchQuery,
   ) -> Result<OffsetPage<PostSummary>, NewsApiError>;

   /// 投稿を取得する
   ///
   /// ニュース API の `GET /api/v1/posts/{id}` を呼び出す。
   /// 存在しなければ `NewsApiError::PostNotFound`。
   async fn get_post(&self, post_id: i64) -> Result<PostSummary, NewsApiError>;
}

#[async_trait]
impl NewsApiPostClient for NewsApiClientImpl {
   async fn top_posts(&self) -> Result<Vec<PostSummary>, NewsApiError> {
      let response = self.request(Method::GET, "/api/v1/posts/top").send().await?;
      handle_envelope::<TopList<PostSummary>>(response, None, &self.success_codes)
         .await
         .map(TopList::into_vec)
   }

   async fn search_posts(
      &self,
      query: &PostSearchQuery,
   ) -> Result<OffsetPage<PostSummary>, NewsApiError> {
      let path = format!(
         "/api/v1/posts/search?keyword={}&page={}&size={}&sort={}",
         urlencoding::encode(&query.keyword),
         query.page,
         query.size,
         query.sort
      );
      let response = self.request(Method::GET, &path).send().await?;
      handle_envelope(response, None, &self.success_codes).await
   }

   async fn get_post(&self, post_id: i64) -> Result<PostSummary, NewsApiError> {
      let path = format!("/api/v1/posts/{}", post_id);
      let response = self.request(Method::GET, &path).send().await?;
      handle_envelope(
         response,
         Some(NewsApiError::PostNotFound),
         &self.success_codes,
      )
      .await
   }
}
