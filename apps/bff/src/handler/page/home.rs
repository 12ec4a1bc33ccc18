//! ホーム画面とサイドバー

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use trending_shared::ApiResponse;
use utoipa::ToSchema;

use super::{
   PageState,
   cards::{KeywordRank, NewsCard, PostCard, VideoCard, cards},
};
use crate::error::log_news_api_error;

/// ホームに並べる件数
const HOME_POSTS: usize = 5;
const HOME_NEWS: usize = 6;
const HOME_VIDEOS: usize = 4;
/// 急上昇キーワードの表示件数
const TOP_KEYWORDS: usize = 10;

/// ホーム画面のビューモデル
#[derive(Debug, Serialize, ToSchema)]
pub struct HomePageView {
   pub posts:    Vec<PostCard>,
   pub news:     Vec<NewsCard>,
   pub videos:   Vec<VideoCard>,
   pub keywords: Vec<KeywordRank>,
   /// 全セクションが空（取得失敗を含む）
   pub empty:    bool,
}

impl HomePageView {
   fn empty() -> Self {
      Self {
         posts:    Vec::new(),
         news:     Vec::new(),
         videos:   Vec::new(),
         keywords: Vec::new(),
         empty:    true,
      }
   }
}

/// GET /api/v1/pages/home
///
/// トップニュース・トップ動画・急上昇キーワード・トップ投稿を並行に取得する。
/// 1 つでも失敗した場合は全セクションを空にする。
#[utoipa::path(
   get,
   path = "/api/v1/pages/home",
   tag = "pages",
   responses(
      (status = 200, description = "ホーム画面", body = ApiResponse<HomePageView>)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn home_page(State(state): State<Arc<PageState>>) -> impl IntoResponse {
   let client = &state.news_api_client;

   let view = match tokio::try_join!(
      client.top_news(),
      client.top_videos(),
      client.top_keywords(),
      client.top_posts(),
   ) {
      Ok((news, videos, keywords, posts)) => {
         let view = HomePageView {
            posts:    cards(posts, HOME_POSTS),
            news:     cards(news, HOME_NEWS),
            videos:   cards(videos, HOME_VIDEOS),
            keywords: KeywordRank::ranked(keywords, TOP_KEYWORDS),
            empty:    false,
         };
         HomePageView {
            empty: view.posts.is_empty()
               && view.news.is_empty()
               && view.videos.is_empty()
               && view.keywords.is_empty(),
            ..view
         }
      }
      Err(e) => {
         log_news_api_error("ホーム画面の取得", &e);
         HomePageView::empty()
      }
   };

   Json(ApiResponse::new(view))
}

/// GET /api/v1/keywords/top
///
/// サイドバーの急上昇キーワード（最大 10 件、順位付き）。
/// 取得に失敗した場合は空の一覧を返す。
#[utoipa::path(
   get,
   path = "/api/v1/keywords/top",
   tag = "pages",
   responses(
      (status = 200, description = "急上昇キーワード", body = ApiResponse<Vec<KeywordRank>>)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn top_keywords(State(state): State<Arc<PageState>>) -> impl IntoResponse {
   let keywords = match state.news_api_client.top_keywords().await {
      Ok(keywords) => KeywordRank::ranked(keywords, TOP_KEYWORDS),
      Err(e) => {
         log_news_api_error("急上昇キーワードの取得", &e);
         Vec::new()
      }
   };

   Json(ApiResponse::new(keywords))
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
      handler::test_utils::{StubNewsApiClient, response_json},
   };

   fn create_test_app(stub: StubNewsApiClient) -> Router {
      let state = Arc::new(PageState {
         news_api_client: Arc::new(stub),
      });
      Router::new()
         .route("/api/v1/pages/home", get(home_page))
         .route("/api/v1/keywords/top", get(top_keywords))
         .with_state(state)
   }

   fn get_request(uri: &str) -> Request<Body> {
      Request::builder().uri(uri).body(Body::empty()).unwrap()
   }

   #[tokio::test]
   async fn test_ホーム画面は各セクションを表示件数に切り詰める() {
      let app = create_test_app(StubNewsApiClient::success());

      let (status, json) = response_json(app.oneshot(get_request("/api/v1/pages/home")).await.unwrap()).await;

      assert_eq!(status, StatusCode::OK);
      let data = &json["data"];
      assert_eq!(data["posts"].as_array().unwrap().len(), 5);
      assert_eq!(data["news"].as_array().unwrap().len(), 6);
      assert_eq!(data["videos"].as_array().unwrap().len(), 4);
      assert_eq!(data["keywords"].as_array().unwrap().len(), 10);
      assert_eq!(data["empty"], false);
   }

   #[tokio::test]
   async fn test_ホーム画面は1つでも失敗すると全セクションが空になる() {
      let mut stub = StubNewsApiClient::success();
      stub.top_videos = Err(NewsApiError::Network("timeout".to_string()));
      let app = create_test_app(stub);

      let (status, json) = response_json(app.oneshot(get_request("/api/v1/pages/home")).await.unwrap()).await;

      assert_eq!(status, StatusCode::OK);
      let data = &json["data"];
      assert_eq!(data["posts"], serde_json::json!([]));
      assert_eq!(data["news"], serde_json::json!([]));
      assert_eq!(data["keywords"], serde_json::json!([]));
      assert_eq!(data["empty"], true);
   }

   #[tokio::test]
   async fn test_ホーム画面は全件0ならemptyになる() {
      let mut stub = StubNewsApiClient::success();
      stub.top_news = Ok(vec![]);
      stub.top_videos = Ok(vec![]);
      stub.top_keywords = Ok(vec![]);
      stub.top_posts = Ok(vec![]);
      let app = create_test_app(stub);

      let (_, json) = response_json(app.oneshot(get_request("/api/v1/pages/home")).await.unwrap()).await;

      assert_eq!(json["data"]["empty"], true);
   }

   #[tokio::test]
   async fn test_サイドバーは順位付きで最大10件() {
      let app = create_test_app(StubNewsApiClient::success());

      let (status, json) = response_json(app.oneshot(get_request("/api/v1/keywords/top")).await.unwrap()).await;

      assert_eq!(status, StatusCode::OK);
      let keywords = json["data"].as_array().unwrap();
      assert_eq!(keywords.len(), 10);
      assert_eq!(keywords[0]["rank"], 1);
      assert_eq!(keywords[0]["text"], "키워드1");
      assert_eq!(keywords[0]["hot"], true);
   }

   #[tokio::test]
   async fn test_サイドバーは失敗しても空の一覧を返す() {
      let mut stub = StubNewsApiClient::success();
      stub.top_keywords = Err(NewsApiError::Unexpected("500: error".to_string()));
      let app = create_test_app(stub);

      let (status, json) = response_json(app.oneshot(get_request("/api/v1/keywords/top")).await.unwrap()).await;

      assert_eq!(status, StatusCode::OK);
      assert_eq!(json["data"], serde_json::json!([]));
   }
}
