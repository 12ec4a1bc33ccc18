//! 人気ニュース・人気動画画面
//!
//! メインの一覧と横に並べる関連一覧は独立に取得し、片方が失敗しても
//! もう片方は表示する。

use std::sync::Arc;

use axum::{
   Json,
   extract::{Query, State},
   response::{IntoResponse, Response},
};
use serde::Serialize;
use trending_domain::pagination::{POPULAR_PAGE_SIZE, PageNumber, PaginationView};
use trending_shared::{ApiResponse, ErrorResponse, OffsetPage};
use utoipa::ToSchema;

use super::{
   PageQuery,
   PageState,
   cards::{NewsCard, VideoCard, cards},
};
use crate::{
   client::NewsApiError,
   error::{domain_error_response, log_news_api_error},
};

/// 人気ニュース画面のビューモデル
#[derive(Debug, Serialize, ToSchema)]
pub struct PopularNewsPageView {
   pub news:           Vec<NewsCard>,
   #[schema(value_type = Object)]
   pub pagination:     PaginationView,
   pub related_videos: Vec<VideoCard>,
   pub empty:          bool,
}

/// 人気動画画面のビューモデル
#[derive(Debug, Serialize, ToSchema)]
pub struct PopularVideosPageView {
   pub videos:       Vec<VideoCard>,
   #[schema(value_type = Object)]
   pub pagination:   PaginationView,
   pub related_news: Vec<NewsCard>,
   pub empty:        bool,
}

/// 取得結果を一覧に縮退させる（失敗時は空の 1 ページ）
fn or_empty<T>(result: Result<OffsetPage<T>, NewsApiError>, context: &str) -> OffsetPage<T> {
   result.unwrap_or_else(|e| {
      log_news_api_error(context, &e);
      OffsetPage::empty()
   })
}

/// GET /api/v1/pages/popular-news
///
/// 人気ニュース（1 ページ 5 件）と、同じページの人気動画を取得する。
#[utoipa::path(
   get,
   path = "/api/v1/pages/popular-news",
   tag = "pages",
   params(PageQuery),
   responses(
      (status = 200, description = "人気ニュース画面", body = ApiResponse<PopularNewsPageView>),
      (status = 400, description = "ページ番号が不正", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn popular_news_page(
   State(state): State<Arc<PageState>>,
   Query(query): Query<PageQuery>,
) -> Response {
   let page = match PageNumber::from_query(query.page) {
      Ok(page) => page,
      Err(e) => return domain_error_response(e),
   };

   let client = &state.news_api_client;
   let (news, videos) = tokio::join!(
      client.popular_news(page.zero_based(), POPULAR_PAGE_SIZE),
      client.popular_videos(page.zero_based(), POPULAR_PAGE_SIZE),
   );
   let news = or_empty(news, "人気ニュースの取得");
   let videos = or_empty(videos, "関連動画の取得");

   let view = PopularNewsPageView {
      pagination:     PaginationView::for_page(page, news.total_pages_or_one()),
      empty:          news.list.is_empty(),
      news:           cards(news.list, usize::MAX),
      related_videos: cards(videos.list, usize::MAX),
   };

   Json(ApiResponse::new(view)).into_response()
}

/// GET /api/v1/pages/popular-videos
///
/// 人気動画（1 ページ 5 件）と、同じページの人気ニュースを取得する。
#[utoipa::path(
   get,
   path = "/api/v1/pages/popular-videos",
   tag = "pages",
   params(PageQuery),
   responses(
      (status = 200, description = "人気動画画面", body = ApiResponse<PopularVideosPageView>),
      (status = 400, description = "ページ番号が不正", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn popular_videos_page(
   State(state): State<Arc<PageState>>,
   Query(query): Query<PageQuery>,
) -> Response {
   let page = match PageNumber::from_query(query.page) {
      Ok(page) => page,
      Err(e) => return domain_error_response(e),
   };

   let client = &state.news_api_client;
   let (videos, news) = tokio::join!(
      client.popular_videos(page.zero_based(), POPULAR_PAGE_SIZE),
      client.popular_news(page.zero_based(), POPULAR_PAGE_SIZE),
   );
   let videos = or_empty(videos, "人気動画の取得");
   let news = or_empty(news, "関連ニュースの取得");

   let view = PopularVideosPageView {
      pagination:   PaginationView::for_page(page, videos.total_pages_or_one()),
      empty:        videos.list.is_empty(),
      videos:       cards(videos.list, usize::MAX),
      related_news: cards(news.list, usize::MAX),
   };

   Json(ApiResponse::new(view)).into_response()
}
