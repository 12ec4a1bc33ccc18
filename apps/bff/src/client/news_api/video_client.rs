//! 動画関連のニュース API クライアント

use async_trait::async_trait;
use reqwest::Method;
use trending_shared::OffsetPage;

use super::{
   client_impl::NewsApiClientImpl,
   error::NewsApiError,
   response::handle_envelope,
   types::{SourceSummary, TopList, VideoSummary},
};

/// 動画関連のニュース API クライアントトレイト
#[async_trait]
pub trait NewsApiVideoClient: Send + Sync {
   /// トップ動画を取得する
   ///
   /// ニュース API の `GET /api/v1/videos/top` を呼び出す。
   async fn top_videos(&self) -> Result<Vec<VideoSummary>, NewsApiError>;

   /// 人気動画を取得する（`page` は 0 始まり）
   ///
   /// ニュース API の `GET /api/v1/videos/popular` を呼び出す。
   async fn popular_videos(
      &self,
      page: u32,
      size: u32,
   ) -> Result<OffsetPage<VideoSummary>, NewsApiError>;

   /// 投稿の関連動画を取得する
   ///
   /// ニュース API の `GET /api/v1/posts/{id}/videos` を呼び出す。
   async fn post_videos(&self, post_id: i64) -> Result<Vec<SourceSummary>, NewsApiError>;
}

#[async_trait]
impl NewsApiVideoClient for NewsApiClientImpl {
   async fn top_videos(&self) -> Result<Vec<VideoSummary>, NewsApiError> {
      let response = self.request(Method::GET, "/api/v1/videos/top").send().await?;
      handle_envelope::<TopList<VideoSummary>>(response, None, &self.success_codes)
         .await
         .map(TopList::into_vec)
   }

   async fn popular_videos(
      &self,
      page: u32,
      size: u32,
   ) -> Result<OffsetPage<VideoSummary>, NewsApiError> {
      let path = format!("/api/v1/videos/popular?page={}&size={}", page, size);
      let response = self.request(Method::GET, &path).send().await?;
      handle_envelope(response, None, &self.success_codes).await
   }

   async fn post_videos(&self, post_id: i64) -> Result<Vec<SourceSummary>, NewsApiError> {
      let path = format!("/api/v1/posts/{}/videos", post_id);
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
