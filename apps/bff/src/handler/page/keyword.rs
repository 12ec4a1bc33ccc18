//! キーワード別投稿画面

use std::sync::Arc;

use axum::{
   Json,
   extract::{Path, Query, State},
   response::{IntoResponse, Response},
};
use serde::Serialize;
use trending_domain::pagination::{POST_SEARCH_PAGE_SIZE, PageNumber, PaginationView};
use trending_shared::{ApiResponse, ErrorResponse};
use utoipa::ToSchema;

use super::{
   PageQuery,
   PageState,
   cards::{NewsCard, PostCard, cards},
};
use crate::{
   client::PostSearchQuery,
   error::{domain_error_response, log_news_api_error},
};

/// 投稿の並び順
const POST_SORT: &str = "createdAt";
/// 関連ニュースの取得件数と表示件数
const RELATED_NEWS_FETCH: u32 = 10;
const RELATED_NEWS_SHOWN: usize = 5;

/// キーワード別投稿画面のビューモデル
#[derive(Debug, Serialize, ToSchema)]
pub struct KeywordPageView {
   pub keyword:      String,
   pub posts:        Vec<PostCard>,
   pub total_count:  u64,
   /// 投稿が 1 件以上あるときだけ表示する
   #[schema(value_type = Option<Object>)]
   pub pagination:   Option<PaginationView>,
   pub related_news: Vec<NewsCard>,
   pub empty:        bool,
}

/// GET /api/v1/pages/keywords/{keyword}
///
/// キーワードの投稿（1 ページ 10 件、新しい順）と関連ニュース（先頭 5 件）を並行に取得する。
/// どちらかが失敗した場合は両方を空にする。
#[utoipa::path(
   get,
   path = "/api/v1/pages/keywords/{keyword}",
   tag = "pages",
   params(
      ("keyword" = String, Path, description = "キーワード"),
      PageQuery
   ),
   responses(
      (status = 200, description = "キーワード別投稿画面", body = ApiResponse<KeywordPageView>),
      (status = 400, description = "ページ番号が不正", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn keyword_page(
   State(state): State<Arc<PageState>>,
   Path(keyword): Path<String>,
   Query(query): Query<PageQuery>,
) -> Response {
   let page = match PageNumber::from_query(query.page) {
      Ok(page) => page,
      Err(e) => return domain_error_response(e),
   };

   let client = &state.news_api_client;
   let search = PostSearchQuery {
      keyword: keyword.clone(),
      page:    page.zero_based(),
      size:    POST_SEARCH_PAGE_SIZE,
      sort:    POST_SORT,
   };

   let (posts, total_count, total_pages, related_news) = match tokio::try_join!(
      client.search_posts(&search),
      client.news_by_keyword(&keyword, 0, RELATED_NEWS_FETCH),
   ) {
      Ok((posts, news)) => {
         let total_pages = posts.total_pages_or_one();
         (
            cards(posts.list, usize::MAX),
            posts.meta.total_elements,
            total_pages,
            cards(news.list, RELATED_NEWS_SHOWN),
         )
      }
      Err(e) => {
         log_news_api_error("キーワード別投稿の取得", &e);
         (Vec::new(), 0, 1, Vec::new())
      }
   };

   let view = KeywordPageView {
      pagination: (!posts.is_empty()).then(|| PaginationView::for_page(page, total_pages)),
      empty: posts.is_empty(),
      keyword,
      posts,
      total_count,
      related_news,
   };

   Json(ApiResponse::new(view)).into_response()
}

#[cfg(test)]
mod tests {
   use axum::{
      Router,
      body::Body,
      http::{Request, StatusCode},
      routing::get,
   };
   use pretty_assertions::assert_eq;
   use tower::ServiceExt;

   use super::*;
   use crate::{
      client::NewsApiError,
      handler::test_utils::{StubNewsApiClient, page_of, post, response_json},
   };

   fn create_test_app(stub: Arc<StubNewsApiClient>) -> Router {
      let state = Arc::new(PageState {
         news_api_client: stub,
      });
      Router::new()
         .route("/api/v1/pages/keywords/{keyword}", get(keyword_page))
         .with_state(state)
   }

   async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
      let response = app
         .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
         .await
         .unwrap();
      response_json(response).await
   }

   #[tokio::test]
   async fn test_1ページ目は10件表示で次へのみ有効() {
      // 42 件 5 ページ中の 0 ページ目（ニュース API 基準）
      let stub = Arc::new(StubNewsApiClient::success());
      let app = create_test_app(stub.clone());

      let (status, json) = get_json(app, "/api/v1/pages/keywords/AI").await;

      assert_eq!(status, StatusCode::OK);
      let data = &json["data"];
      assert_eq!(data["posts"].as_array().unwrap().len(), 10);
      assert_eq!(data["total_count"], 42);
      assert_eq!(data["pagination"]["has_next"], true);
      assert_eq!(data["pagination"]["has_previous"], false);
      assert_eq!(data["related_news"].as_array().unwrap().len(), 5);
      assert!(
         stub.calls()
            .contains(&"search_posts keyword=AI page=0 size=10 sort=createdAt".to_string())
      );
   }

   #[tokio::test]
   async fn test_ページ番号は0始まりに変換してニュースapiに渡す() {
      let stub = Arc::new(StubNewsApiClient::success());
      let app = create_test_app(stub.clone());

      let (_, json) = get_json(app, "/api/v1/pages/keywords/AI?page=3").await;

      assert_eq!(json["data"]["pagination"]["current"], 3);
      assert!(
         stub.calls()
            .contains(&"search_posts keyword=AI page=2 size=10 sort=createdAt".to_string())
      );
      // 関連ニュースはページに関係なく先頭ページ
      assert!(
         stub.calls()
            .contains(&"news_by_keyword keyword=AI page=0 size=10".to_string())
      );
   }

   #[tokio::test]
   async fn test_最終ページでは次へが無効() {
      let mut stub = StubNewsApiClient::success();
      stub.search_posts = Ok(page_of(vec![post(41), post(42)], 4, 42, 5));
      let app = create_test_app(Arc::new(stub));

      let (_, json) = get_json(app, "/api/v1/pages/keywords/AI?page=5").await;

      assert_eq!(json["data"]["pagination"]["has_next"], false);
      assert_eq!(json["data"]["pagination"]["has_previous"], true);
   }

   #[tokio::test]
   async fn test_投稿がない場合はページ送りを表示しない() {
      let mut stub = StubNewsApiClient::success();
      stub.search_posts = Ok(page_of(vec![], 0, 0, 0));
      let app = create_test_app(Arc::new(stub));

      let (_, json) = get_json(app, "/api/v1/pages/keywords/AI").await;

      assert_eq!(json["data"]["pagination"], serde_json::Value::Null);
      assert_eq!(json["data"]["empty"], true);
   }

   #[tokio::test]
   async fn test_関連ニュースの失敗で投稿も空になる() {
      let mut stub = StubNewsApiClient::success();
      stub.news_by_keyword = Err(NewsApiError::Network("timeout".to_string()));
      let app = create_test_app(Arc::new(stub));

      let (status, json) = get_json(app, "/api/v1/pages/keywords/AI").await;

      assert_eq!(status, StatusCode::OK);
      assert_eq!(json["data"]["posts"], serde_json::json!([]));
      assert_eq!(json["data"]["related_news"], serde_json::json!([]));
      assert_eq!(json["data"]["empty"], true);
   }

   #[tokio::test]
   async fn test_エンコードされたキーワードを復元する() {
      let stub = Arc::new(StubNewsApiClient::success());
      let app = create_test_app(stub.clone());

      let (_, json) = get_json(app, "/api/v1/pages/keywords/%EC%9D%B8%EA%B3%B5%20%EC%A7%80%EB%8A%A5").await;

      assert_eq!(json["data"]["keyword"], "인공 지능");
   }

   #[tokio::test]
   async fn test_ページ0は400() {
      let stub = Arc::new(StubNewsApiClient::success());
      let app = create_test_app(stub.clone());

      let (status, _) = get_json(app, "/api/v1/pages/keywords/AI?page=0").await;

      assert_eq!(status, StatusCode::BAD_REQUEST);
      assert!(stub.calls().is_empty());
   }
}
