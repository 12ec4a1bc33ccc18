//! # コメント API ハンドラ
//!
//! 投稿詳細画面のコメント欄を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /api/v1/posts/{id}/comments` - コメント一覧（ログイン不要）
//! - `POST /api/v1/posts/{id}/comments` - コメント作成
//! - `PATCH /api/v1/comments/{id}` - コメント更新
//! - `DELETE /api/v1/comments/{id}` - コメント削除
//! - `POST /api/v1/comments/{id}/like` - いいね
//!
//! 作成・更新・削除・いいねはセッションが必要。ニュース API が 401 を返した場合は
//! [`SessionRefresher`] で 1 度だけリフレッシュして再試行する。
//!
//! ## コメント作成
//!
//! 本文が空白だけならニュース API を呼ばずに 400 を返す。
//! 作成に成功したら現在のページを取得し直し、`input_cleared: true` を返す。
//! 楽観的な追加はしない。

use std::sync::Arc;

use axum::{
   Json,
   extract::{Path, Query, State},
   http::StatusCode,
   response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trending_domain::{
   comment::{CommentBody, CommentSort},
   pagination::{COMMENT_PAGE_SIZE, PageNumber, PaginationView},
};
use trending_infra::SessionManager;
use trending_shared::{ApiResponse, ErrorResponse, event_log::event, log_business_event};
use utoipa::{IntoParams, ToSchema};

use crate::{
   client::{Comment, CommentListQuery, NewsApiCommentClient, NewsApiError},
   error::{domain_error_response, get_session, log_and_convert_news_api_error, log_news_api_error},
   session_refresh::SessionRefresher,
};

/// コメント API の共有状態
pub struct CommentState {
   pub comment_client:  Arc<dyn NewsApiCommentClient>,
   pub session_manager: Arc<dyn SessionManager>,
   pub refresher:       Arc<SessionRefresher>,
}

// --- リクエスト/レスポンス型 ---

/// コメント作成・更新リクエスト
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
   pub body: String,
}

/// コメント一覧のクエリパラメータ
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CommentListParams {
   /// 1 始まりのページ番号（省略時は 1）
   pub page: Option<u32>,
   /// 並び順（`latest` / `popular`、省略時は `latest`）
   #[param(value_type = Option<String>)]
   pub sort: Option<CommentSort>,
}

/// コメント 1 件
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CommentItem {
   pub comment_id:  i64,
   pub member_id:   String,
   pub nickname:    String,
   pub body:        String,
   pub like_count:  u64,
   pub created_at:  DateTime<Utc>,
   pub profile_url: Option<String>,
}

impl From<Comment> for CommentItem {
   fn from(comment: Comment) -> Self {
      Self {
         comment_id:  comment.comment_id,
         member_id:   comment.member_id,
         nickname:    comment.nickname,
         body:        comment.body,
         like_count:  comment.like_count,
         created_at:  comment.created_at,
         profile_url: comment.profile_url,
      }
   }
}

/// コメント欄のビューモデル
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentSectionView {
   pub comments:      Vec<CommentItem>,
   pub total_count:   u64,
   #[schema(value_type = Object)]
   pub pagination:    PaginationView,
   #[schema(value_type = String)]
   pub sort:          CommentSort,
   /// 作成に成功し、入力欄をクリアすべきか
   pub input_cleared: bool,
}

impl CommentSectionView {
   /// 取得に失敗した場合の空のコメント欄
   pub fn empty(sort: CommentSort) -> Self {
      Self {
         comments: Vec::new(),
         total_count: 0,
         pagination: PaginationView::new(1, 1),
         sort,
         input_cleared: false,
      }
   }
}

/// いいね後のコメント
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentLikeData {
   pub comment_id: i64,
   pub like_count: u64,
}

/// コメント欄を取得する
///
/// 投稿詳細画面とコメント API の両方から使う。
pub async fn load_comment_section<C>(
   client: &C,
   post_id: i64,
   page: PageNumber,
   sort: CommentSort,
) -> Result<CommentSectionView, NewsApiError>
where
   C: NewsApiCommentClient + ?Sized,
{
   let query = CommentListQuery {
      page: page.zero_based(),
      size: COMMENT_PAGE_SIZE,
      sort,
   };
   let comments = client.list_comments(post_id, query).await?;

   Ok(CommentSectionView {
      total_count: comments.meta.total_elements,
      pagination: PaginationView::for_page(page, comments.total_pages_or_one()),
      comments: comments.list.into_iter().map(CommentItem::from).collect(),
      sort,
      input_cleared: false,
   })
}

// --- ハンドラ ---

/// GET /api/v1/posts/{id}/comments
///
/// コメント一覧を取得する（1 ページ 10 件）。
#[utoipa::path(
   get,
   path = "/api/v1/posts/{id}/comments",
   tag = "comments",
   params(
      ("id" = i64, Path, description = "投稿 ID"),
      CommentListParams
   ),
   responses(
      (status = 200, description = "コメント一覧", body = ApiResponse<CommentSectionView>),
      (status = 400, description = "ページ番号が不正", body = ErrorResponse),
      (status = 404, description = "投稿が見つからない", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn list_comments(
   State(state): State<Arc<CommentState>>,
   Path(post_id): Path<i64>,
   Query(params): Query<CommentListParams>,
) -> Response {
   let page = match PageNumber::from_query(params.page) {
      Ok(page) => page,
      Err(e) => return domain_error_response(e),
   };
   let sort = params.sort.unwrap_or_default();

   match load_comment_section(state.comment_client.as_ref(), post_id, page, sort).await {
      Ok(section) => Json(ApiResponse::new(section)).into_response(),
      Err(e) => log_and_convert_news_api_error("コメント一覧の取得", e),
   }
}

/// POST /api/v1/posts/{id}/comments
///
/// コメントを作成し、現在のページを取得し直して返す。
#[utoipa::path(
   post,
   path = "/api/v1/posts/{id}/comments",
   tag = "comments",
   security(("session_auth" = [])),
   params(
      ("id" = i64, Path, description = "投稿 ID"),
      CommentListParams
   ),
   request_body = CommentRequest,
   responses(
      (status = 201, description = "作成後のコメント欄", body = ApiResponse<CommentSectionView>),
      (status = 400, description = "本文が空", body = ErrorResponse),
      (status = 401, description = "未ログイン", body = ErrorResponse),
      (status = 403, description = "CSRF 検証失敗", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn create_comment(
   State(state): State<Arc<CommentState>>,
   jar: CookieJar,
   Path(post_id): Path<i64>,
   Query(params): Query<CommentListParams>,
   Json(req): Json<CommentRequest>,
) -> Response {
   let page = match PageNumber::from_query(params.page) {
      Ok(page) => page,
      Err(e) => return domain_error_response(e),
   };
   let sort = params.sort.unwrap_or_default();

   // 空白だけの本文はニュース API を呼ばない
   let body = match CommentBody::new(req.body) {
      Ok(body) => body,
      Err(e) => return domain_error_response(e),
   };

   let (session_id, session) = match get_session(state.session_manager.as_ref(), &jar).await {
      Ok(s) => s,
      Err(response) => return response,
   };

   let client = &state.comment_client;
   let text = body.as_str();
   let created = match state
      .refresher
      .call_with_refresh(&session_id, &session, |credentials| async move {
         client.create_comment(&credentials, post_id, text).await
      })
      .await
   {
      Ok(comment) => comment,
      Err(e) => return log_and_convert_news_api_error("コメント作成", e),
   };

   log_business_event!(
      event.category = event::category::COMMENT,
      event.action = event::action::COMMENT_CREATED,
      event.entity_type = event::entity_type::COMMENT,
      event.entity_id = created.comment_id,
      event.actor_id = %session.member().id,
      event.result = event::result::SUCCESS,
      post_id,
      "コメント作成"
   );

   let section = match load_comment_section(client.as_ref(), post_id, page, sort).await {
      Ok(section) => section,
      Err(e) => {
         log_news_api_error("作成後のコメント一覧の取得", &e);
         CommentSectionView::empty(sort)
      }
   };

   (
      StatusCode::CREATED,
      Json(ApiResponse::new(CommentSectionView {
         input_cleared: true,
         ..section
      })),
   )
      .into_response()
}

/// PATCH /api/v1/comments/{id}
///
/// コメント本文を更新する。
#[utoipa::path(
   patch,
   path = "/api/v1/comments/{id}",
   tag = "comments",
   security(("session_auth" = [])),
   params(("id" = i64, Path, description = "コメント ID")),
   request_body = CommentRequest,
   responses(
      (status = 200, description = "更新後のコメント", body = ApiResponse<CommentItem>),
      (status = 400, description = "本文が空", body = ErrorResponse),
      (status = 401, description = "未ログイン", body = ErrorResponse),
      (status = 403, description = "他人のコメント", body = ErrorResponse),
      (status = 404, description = "コメントが見つからない", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn update_comment(
   State(state): State<Arc<CommentState>>,
   jar: CookieJar,
   Path(comment_id): Path<i64>,
   Json(req): Json<CommentRequest>,
) -> Response {
   let body = match CommentBody::new(req.body) {
      Ok(body) => body,
      Err(e) => return domain_error_response(e),
   };

   let (session_id, session) = match get_session(state.session_manager.as_ref(), &jar).await {
      Ok(s) => s,
      Err(response) => return response,
   };

   let client = &state.comment_client;
   let text = body.as_str();
   match state
      .refresher
      .call_with_refresh(&session_id, &session, |credentials| async move {
         client.update_comment(&credentials, comment_id, text).await
      })
      .await
   {
      Ok(comment) => {
         log_business_event!(
            event.category = event::category::COMMENT,
            event.action = event::action::COMMENT_UPDATED,
            event.entity_type = event::entity_type::COMMENT,
            event.entity_id = comment_id,
            event.actor_id = %session.member().id,
            event.result = event::result::SUCCESS,
            "コメント更新"
         );
         Json(ApiResponse::new(CommentItem::from(comment))).into_response()
      }
      Err(e) => log_and_convert_news_api_error("コメント更新", e),
   }
}

/// DELETE /api/v1/comments/{id}
///
/// コメントを削除する。
#[utoipa::path(
   delete,
   path = "/api/v1/comments/{id}",
   tag = "comments",
   security(("session_auth" = [])),
   params(("id" = i64, Path, description = "コメント ID")),
   responses(
      (status = 204, description = "削除成功"),
      (status = 401, description = "未ログイン", body = ErrorResponse),
      (status = 403, description = "他人のコメント", body = ErrorResponse),
      (status = 404, description = "コメントが見つからない", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_comment(
   State(state): State<Arc<CommentState>>,
   jar: CookieJar,
   Path(comment_id): Path<i64>,
) -> Response {
   let (session_id, session) = match get_session(state.session_manager.as_ref(), &jar).await {
      Ok(s) => s,
      Err(response) => return response,
   };

   let client = &state.comment_client;
   match state
      .refresher
      .call_with_refresh(&session_id, &session, |credentials| async move {
         client.delete_comment(&credentials, comment_id).await
      })
      .await
   {
      Ok(()) => {
         log_business_event!(
            event.category = event::category::COMMENT,
            event.action = event::action::COMMENT_DELETED,
            event.entity_type = event::entity_type::COMMENT,
            event.entity_id = comment_id,
            event.actor_id = %session.member().id,
            event.result = event::result::SUCCESS,
            "コメント削除"
         );
         StatusCode::NO_CONTENT.into_response()
      }
      Err(e) => log_and_convert_news_api_error("コメント削除", e),
   }
}

/// POST /api/v1/comments/{id}/like
///
/// コメントにいいねする。
#[utoipa::path(
   post,
   path = "/api/v1/comments/{id}/like",
   tag = "comments",
   security(("session_auth" = [])),
   params(("id" = i64, Path, description = "コメント ID")),
   responses(
      (status = 200, description = "いいね後の件数", body = ApiResponse<CommentLikeData>),
      (status = 401, description = "未ログイン", body = ErrorResponse),
      (status = 404, description = "コメントが見つからない", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn like_comment(
   State(state): State<Arc<CommentState>>,
   jar: CookieJar,
   Path(comment_id): Path<i64>,
) -> Response {
   let (session_id, session) = match get_session(state.session_manager.as_ref(), &jar).await {
      Ok(s) => s,
      Err(response) => return response,
   };

   let client = &state.comment_client;
   match state
      .refresher
      .call_with_refresh(&session_id, &session, |credentials| async move {
         client.like_comment(&credentials, comment_id).await
      })
      .await
   {
      Ok(liked) => {
         log_business_event!(
            event.category = event::category::COMMENT,
            event.action = event::action::COMMENT_LIKED,
            event.entity_type = event::entity_type::COMMENT,
            event.entity_id = comment_id,
            event.actor_id = %session.member().id,
            event.result = event::result::SUCCESS,
            "コメントいいね"
         );
         Json(ApiResponse::new(CommentLikeData {
            comment_id: liked.id,
            like_count: liked.like_count,
         }))
         .into_response()
      }
      Err(e) => log_and_convert_news_api_error("コメントいいね", e),
   }
}
