//! 投稿詳細画面

use std::sync::Arc;

use axum::{
   Json,
   extract::{Path, Query, State},
   response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use trending_domain::{comment::CommentSort, pagination::PageNumber};
use trending_shared::{ApiResponse, ErrorResponse};
use utoipa::{IntoParams, ToSchema};

use super::{
   PageState,
   cards::{PLACEHOLDER_THUMBNAIL, RelatedSource, cards},
};
use crate::{
   client::PostSummary,
   error::{domain_error_response, log_and_convert_news_api_error, log_news_api_error},
   handler::comment::{CommentSectionView, load_comment_section},
};

/// 投稿本文
#[derive(Debug, Serialize, ToSchema)]
pub struct PostDetail {
   pub post_id:       i64,
   pub keyword:       String,
   pub title:         String,
   pub summary:       String,
   pub thumbnail_url: String,
   pub source:        Option<String>,
   pub created_at:    Option<String>,
}

impl From<PostSummary> for PostDetail {
   fn from(post: PostSummary) -> Self {
      Self {
         post_id:       post.post_id,
         keyword:       post.keyword,
         title:         post.title,
         summary:       post.summary,
         thumbnail_url: post
            .thumbnail_url
            .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string()),
         source:        post.source,
         created_at:    post.created_at,
      }
   }
}

/// 投稿詳細画面のビューモデル
#[derive(Debug, Serialize, ToSchema)]
pub struct PostPageView {
   pub post:           PostDetail,
   pub related_news:   Vec<RelatedSource>,
   pub related_videos: Vec<RelatedSource>,
   pub comments:       CommentSectionView,
}

/// 投稿詳細画面のクエリパラメータ
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostPageQuery {
   /// コメント一覧のページ番号（1 始まり、省略時は 1）
   pub comment_page: Option<u32>,
   /// コメントの並び順（`latest` / `popular`）
   #[param(value_type = Option<String>)]
   pub sort:         Option<CommentSort>,
}

/// GET /api/v1/pages/posts/{id}
///
/// 投稿本文・関連ニュース・関連動画を並行に取得し、コメント一覧は別に取得する。
///
/// 投稿側のいずれかが失敗した場合は画面全体をエラーにする。
/// コメント一覧の失敗は空のコメント欄に縮退させる。
#[utoipa::path(
   get,
   path = "/api/v1/pages/posts/{id}",
   tag = "pages",
   params(
      ("id" = i64, Path, description = "投稿 ID"),
      PostPageQuery
   ),
   responses(
      (status = 200, description = "投稿詳細画面", body = ApiResponse<PostPageView>),
      (status = 400, description = "ページ番号が不正", body = ErrorResponse),
      (status = 404, description = "投稿が見つからない", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn post_page(
   State(state): State<Arc<PageState>>,
   Path(post_id): Path<i64>,
   Query(query): Query<PostPageQuery>,
) -> Response {
   let comment_page = match PageNumber::from_query(query.comment_page) {
      Ok(page) => page,
      Err(e) => return domain_error_response(e),
   };
   let sort = query.sort.unwrap_or_default();

   let client = &state.news_api_client;
   let (post, news, videos) = match tokio::try_join!(
      client.get_post(post_id),
      client.post_news(post_id),
      client.post_videos(post_id),
   ) {
      Ok(result) => result,
      Err(e) => return log_and_convert_news_api_error("投稿詳細の取得", e),
   };

   let comments = match load_comment_section(client.as_ref(), post_id, comment_page, sort).await {
      Ok(section) => section,
      Err(e) => {
         log_news_api_error("コメント一覧の取得", &e);
         CommentSectionView::empty(sort)
      }
   };

   let view = PostPageView {
      post: PostDetail::from(post),
      related_news: cards(news, usize::MAX),
      related_videos: cards(videos, usize::MAX),
      comments,
   };

   Json(ApiResponse::new(view)).into_response()
}
