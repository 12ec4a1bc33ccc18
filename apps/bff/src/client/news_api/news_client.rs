//! ニュース関連のニュース API クライアント

use async_trait::async_trait;
use reqwest::Method;
use trending_shared::OffsetPage;

use super::{
   client_impl::NewsApiClientImpl,
   error::NewsApiError,
   response::handle_envelope,
   types::{NewsSummary, SourceSummary, TopList},
};

/// ニュース関連のニュース API クライアントトレイト
#[async_trait]
pub trait NewsApiNewsClient: Send + Sync {
   /// トップニュースを取得する
   ///
   /// ニュース API の `GET /api/v1/news/top` を呼び出す。
   async fn top_news(&self) -> Result<Vec<NewsSummary>, NewsApiError>;

   /// 人気ニュースを取得する（`page` は 0 始まり）
   ///
   /// ニュース API の `GET /api/v1/news/popular` を呼び出す。
   async fn popular_news(
      &self,
      page: u32,
      size: u32,
   ) -> Result<OffsetPage<NewsSummary>, NewsApiError>;

   /// キーワードに関連するニュースを取得する（`page` は 0 始まり）
   ///
   /// ニュース API の `GET /api/v1/news/search` を呼び出す。
   async fn news_by_keyword(
      &self,
      keyword: &str,
      page: u32,
      size: u32,
   ) -> Result<OffsetPage<NewsSummary>, NewsApiError>;

   /// 投稿の関連ニュースを取得する
   ///
   /// ニュース API の `GET /api/v1/posts/{id}/news` を呼び出す。
   async fn post_news(&self, post_id: i64) -> Result<Vec<SourceSummary>, NewsApiError>;
}

#[async_trait]
impl NewsApiNewsClient for NewsApiClientImpl {
   async fn top_news(&self) -> Result<Vec<NewsSummary>, NewsApiError> {
      let response = self.request(Method::GET, "/api/v1/news/top").send().await?;
      handle_envelope::<TopList<NewsSummary>>(response, None, &self.success_codes)
         .await
         .map(TopList::into_vec)
   }

   async fn popular_news(
      &self,
      page: u32,
      size: u32,
   ) -> Result<OffsetPage<NewsSummary>, NewsApiError> {
      let path = format!("/api/v1/news/popular?page={}&size={}", page, size);
      let response = self.request(Method::GET, &path).send().await?;
      handle_envelope(response, None, &self.success_codes).await
   }

   async fn news_by_keyword(
      &self,
      keyword: &str,
      page: u32,
      size: u32,
   ) -> Result<OffsetPage<NewsSummary>, NewsApiError> {
      let path = format!(
         "/api/v1/news/search?keyword={}&page={}&size={}",
         urlencoding::encode(keyword),
         page,
         size
      );
      let response = self.request(Method::GET, &path).send().await?;
      handle_envelope(response, None, &self.success_codes).await
   }

   async fn post_news(&self, post_id: i64) -> Result<Vec<SourceSummary>, NewsApiError> {
      let path = format!("/api/v1/posts/{}/news", post_id);
      let response = self.request(Method::GET, &path).send().await?;
      handle_envelope::<TopList<SourceSummary>>(
         response,
         Some(NewsApiError::PostNotFound),
         &self.success_codes,
      )
      .await
      .map(TopList::into_vec)
   }
}
