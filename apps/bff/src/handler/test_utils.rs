//! ハンドラテスト用のスタブとフィクスチャ

use std::sync::Mutex;

use async_trait::async_trait;
use axum::{body::to_bytes, http::StatusCode, response::Response};
use chrono::{TimeZone, Utc};
use trending_domain::member::{Member, MemberId};
use trending_infra::{CredentialCookie, SessionData};
use trending_shared::{OffsetPage, PageMeta};

use crate::client::{
   Authenticated,
   Comment,
   CommentLike,
   CommentListQuery,
   KeywordSummary,
   LoginRequest,
   NewsApiAuthClient,
   NewsApiCommentClient,
   NewsApiError,
   NewsApiKeywordClient,
   NewsApiMemberClient,
   NewsApiNewsClient,
   NewsApiPostClient,
   NewsApiVideoClient,
   NewsSummary,
   PostSearchQuery,
   PostSummary,
   SignupRequest,
   SignupResult,
   SourceSummary,
   VideoSummary,
};

/// 保護された呼び出しで有効なアクセストークン
pub const VALID_TOKEN: &str = "access-valid";

// --- フィクスチャ ---

pub fn news(n: i64) -> NewsSummary {
   NewsSummary {
      news_id:       Some(n),
      url:           format!("https://news.example.com/articles/{n}"),
      title:         format!("뉴스 {n}"),
      thumbnail_url: Some(format!("https://img.example.com/news/{n}.jpg")),
      published_at:  Some("2026-03-01T09:00:00".to_string()),
      platform:      Some("NAVER".to_string()),
      summary:       Some(format!("뉴스 {n} 요약")),
   }
}

pub fn video(n: i64) -> VideoSummary {
   VideoSummary {
      video_id:      Some(n),
      url:           format!("https://www.youtube.com/watch?v={n}"),
      title:         format!("영상 {n}"),
      thumbnail_url: None,
      published_at:  None,
      platform:      Some("YOUTUBE".to_string()),
   }
}

pub fn post(n: i64) -> PostSummary {
   PostSummary {
      post_id:       n,
      keyword:       "AI".to_string(),
      title:         format!("게시글 {n}"),
      summary:       format!("게시글 {n} 요약"),
      thumbnail_url: None,
      source:        Some("NEWS".to_string()),
      created_at:    Some("2026-03-01T09:00:00".to_string()),
   }
}

pub fn keyword(n: i64) -> KeywordSummary {
   KeywordSummary {
      keyword_id: n,
      text:       format!("키워드{n}"),
      platform:   Some("GOOGLE".to_string()),
      bucket_at:  None,
      volume:     1200.0,
      score:      if n == 1 { 15000.0 } else { 500.0 },
   }
}

pub fn source(n: i64) -> SourceSummary {
   SourceSummary {
      id:            n,
      url:           format!("https://source.example.com/{n}"),
      thumbnail_url: None,
      title:         format!("관련 {n}"),
   }
}

pub fn comment(n: i64) -> Comment {
   Comment {
      comment_id:  n,
      member_id:   "42".to_string(),
      nickname:    "트렌드헌터".to_string(),
      body:        format!("댓글 {n}"),
      like_count:  0,
      created_at:  Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
      profile_url: None,
   }
}

pub fn member() -> Member {
   Member {
      id:          MemberId::new("42"),
      nickname:    "트렌드헌터".to_string(),
      email:       "reader@example.com".to_string(),
      role:        "USER".to_string(),
      profile_url: None,
      delete_at:   None,
   }
}

/// `total_pages` ページ中 0 始まりの `page` ページ目
pub fn page_of<T>(list: Vec<T>, page: u32, total_elements: u64, total_pages: u32) -> OffsetPage<T> {
   let size = u32::try_from(list.len()).unwrap();
   OffsetPage {
      list,
      meta: PageMeta {
         page,
         size,
         total_elements,
         total_pages,
         has_next: page + 1 < total_pages,
         has_previous: page > 0,
      },
   }
}

pub fn session_with_token(token: &str) -> SessionData {
   SessionData::new(
      member(),
      vec![CredentialCookie::new("accessToken", token)],
      Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
   )
}

// --- レスポンスヘルパー ---

pub async fn response_json(response: Response) -> (StatusCode, serde_json::Value) {
   let status = response.status();
   let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
   let json = if body.is_empty() {
      serde_json::Value::Null
   } else {
      serde_json::from_slice(&body).unwrap()
   };
   (status, json)
}

// --- スタブ ---

/// ニュース API の全トレイトを実装するスタブ
///
/// 各メソッドは対応するフィールドの値を返し、呼び出しを `calls` に記録する。
/// `create_comment` などの保護された呼び出しは、認証情報に [`VALID_TOKEN`] が
/// 含まれない場合に 401 を返す。
pub struct StubNewsApiClient {
   pub top_news:        Result<Vec<NewsSummary>, NewsApiError>,
   pub top_videos:      Result<Vec<VideoSummary>, NewsApiError>,
   pub top_posts:       Result<Vec<PostSummary>, NewsApiError>,
   pub top_keywords:    Result<Vec<KeywordSummary>, NewsApiError>,
   pub popular_news:    Result<OffsetPage<NewsSummary>, NewsApiError>,
   pub popular_videos:  Result<OffsetPage<VideoSummary>, NewsApiError>,
   pub news_by_keyword: Result<OffsetPage<NewsSummary>, NewsApiError>,
   pub search_posts:    Result<OffsetPage<PostSummary>, NewsApiError>,
   pub post:            Result<PostSummary, NewsApiError>,
   pub post_news:       Result<Vec<SourceSummary>, NewsApiError>,
   pub post_videos:     Result<Vec<SourceSummary>, NewsApiError>,
   pub comments:        Result<OffsetPage<Comment>, NewsApiError>,
   pub saved_comment:   Result<Comment, NewsApiError>,
   pub deleted:         Result<(), NewsApiError>,
   pub liked:           Result<CommentLike, NewsApiError>,
   pub me:              Result<Member, NewsApiError>,
   pub signup:          Result<SignupResult, NewsApiError>,
   pub login:           Result<Authenticated<Member>, NewsApiError>,
   pub logout:          Result<(), NewsApiError>,
   pub refresh:         Result<Vec<CredentialCookie>, NewsApiError>,
   pub verification:    Result<(), NewsApiError>,
   pub check_email:     Result<(), NewsApiError>,
   calls:               Mutex<Vec<String>>,
}

impl StubNewsApiClient {
   /// 全メソッドが成功するスタブ
   pub fn success() -> Self {
      Self {
         top_news:        Ok((1..=8).map(news).collect()),
         top_videos:      Ok((1..=8).map(video).collect()),
         top_posts:       Ok((1..=8).map(post).collect()),
         top_keywords:    Ok((1..=12).map(keyword).collect()),
         popular_news:    Ok(page_of((1..=5).map(news).collect(), 0, 23, 5)),
         popular_videos:  Ok(page_of((1..=5).map(video).collect(), 0, 23, 5)),
         news_by_keyword: Ok(page_of((1..=10).map(news).collect(), 0, 30, 3)),
         search_posts:    Ok(page_of((1..=10).map(post).collect(), 0, 42, 5)),
         post:            Ok(post(1)),
         post_news:       Ok(vec![source(1), source(2)]),
         post_videos:     Ok(vec![source(3)]),
         comments:        Ok(page_of(vec![comment(1), comment(2)], 0, 2, 1)),
         saved_comment:   Ok(comment(3)),
         deleted:         Ok(()),
         liked:           Ok(CommentLike {
            id:         1,
            member_id:  "42".to_string(),
            body:       "댓글 1".to_string(),
            like_count: 1,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
         }),
         me:              Ok(member()),
         signup:          Ok(SignupResult {
            email:      "reader@example.com".to_string(),
            nickname:   "트렌드헌터".to_string(),
            birth_date: "1995-03-07".to_string(),
            role:       "USER".to_string(),
         }),
         login:           Ok(Authenticated {
            data:        member(),
            credentials: vec![
               CredentialCookie::new("accessToken", VALID_TOKEN),
               CredentialCookie::new("refreshToken", "refresh-1"),
            ],
         }),
         logout:          Ok(()),
         refresh:         Ok(vec![CredentialCookie::new("accessToken", VALID_TOKEN)]),
         verification:    Ok(()),
         check_email:     Ok(()),
         calls:           Mutex::new(Vec::new()),
      }
   }

   /// 記録された呼び出し（`"メソッド名 引数"` 形式）
   pub fn calls(&self) -> Vec<String> {
      self.calls.lock().unwrap().clone()
   }

   /// 指定メソッドの呼び出し回数
   pub fn count(&self, method: &str) -> usize {
      self
         .calls()
         .iter()
         .filter(|c| c.split(' ').next() == Some(method))
         .count()
   }

   fn record(&self, call: String) {
      self.calls.lock().unwrap().push(call);
   }

   fn authorize(credentials: &[CredentialCookie]) -> Result<(), NewsApiError> {
      if credentials.iter().any(|c| c.value == VALID_TOKEN) {
         Ok(())
      } else {
         Err(NewsApiError::Unauthorized)
      }
   }
}

#[async_trait]
impl NewsApiNewsClient for StubNewsApiClient {
   async fn top_news(&self) -> Result<Vec<NewsSummary>, NewsApiError> {
      self.record("top_news".to_string());
      self.top_news.clone()
   }

   async fn popular_news(
      &self,
      page: u32,
      size: u32,
   ) -> Result<OffsetPage<NewsSummary>, NewsApiError> {
      self.record(format!("popular_news page={page} size={size}"));
      self.popular_news.clone()
   }

   async fn news_by_keyword(
      &self,
      keyword: &str,
      page: u32,
      size: u32,
   ) -> Result<OffsetPage<NewsSummary>, NewsApiError> {
      self.record(format!("news_by_keyword keyword={keyword} page={page} size={size}"));
      self.news_by_keyword.clone()
   }

   async fn post_news(&self, post_id: i64) -> Result<Vec<SourceSummary>, NewsApiError> {
      self.record(format!("post_news id={post_id}"));
      self.post_news.clone()
   }
}

#[async_trait]
impl NewsApiVideoClient for StubNewsApiClient {
   async fn top_videos(&self) -> Result<Vec<VideoSummary>, NewsApiError> {
      self.record("top_videos".to_string());
      self.top_videos.clone()
   }

   async fn popular_videos(
      &self,
      page: u32,
      size: u32,
   ) -> Result<OffsetPage<VideoSummary>, NewsApiError> {
      self.record(format!("popular_videos page={page} size={size}"));
      self.popular_videos.clone()
   }

   async fn post_videos(&self, post_id: i64) -> Result<Vec<SourceSummary>, NewsApiError> {
      self.record(format!("post_videos id={post_id}"));
      self.post_videos.clone()
   }
}

#[async_trait]
impl NewsApiPostClient for StubNewsApiClient {
   async fn top_posts(&self) -> Result<Vec<PostSummary>, NewsApiError> {
      self.record("top_posts".to_string());
      self.top_posts.clone()
   }

   async fn search_posts(
      &self,
      query: &PostSearchQuery,
   ) -> Result<OffsetPage<PostSummary>, NewsApiError> {
      self.record(format!(
         "search_posts keyword={} page={} size={} sort={}",
         query.keyword, query.page, query.size, query.sort
      ));
      self.search_posts.clone()
   }

   async fn get_post(&self, post_id: i64) -> Result<PostSummary, NewsApiError> {
      self.record(format!("get_post id={post_id}"));
      self.post.clone()
   }
}

#[async_trait]
impl NewsApiKeywordClient for StubNewsApiClient {
   async fn top_keywords(&self) -> Result<Vec<KeywordSummary>, NewsApiError> {
      self.record("top_keywords".to_string());
      self.top_keywords.clone()
   }
}

#[async_trait]
impl NewsApiCommentClient for StubNewsApiClient {
   async fn list_comments(
      &self,
      post_id: i64,
      query: CommentListQuery,
   ) -> Result<OffsetPage<Comment>, NewsApiError> {
      self.record(format!(
         "list_comments id={} page={} size={} sort={}",
         post_id,
         query.page,
         query.size,
         query.sort.as_query()
      ));
      self.comments.clone()
   }

   async fn create_comment(
      &self,
      credentials: &[CredentialCookie],
      post_id: i64,
      body: &str,
   ) -> Result<Comment, NewsApiError> {
      self.record(format!("create_comment id={post_id} body={body}"));
      Self::authorize(credentials)?;
      self.saved_comment.clone()
   }

   async fn update_comment(
      &self,
      credentials: &[CredentialCookie],
      comment_id: i64,
      body: &str,
   ) -> Result<Comment, NewsApiError> {
      self.record(format!("update_comment id={comment_id} body={body}"));
      Self::authorize(credentials)?;
      self.saved_comment.clone()
   }

   async fn delete_comment(
      &self,
      credentials: &[CredentialCookie],
      comment_id: i64,
   ) -> Result<(), NewsApiError> {
      self.record(format!("delete_comment id={comment_id}"));
      Self::authorize(credentials)?;
      self.deleted.clone()
   }

   async fn like_comment(
      &self,
      credentials: &[CredentialCookie],
      comment_id: i64,
   ) -> Result<CommentLike, NewsApiError> {
      self.record(format!("like_comment id={comment_id}"));
      Self::authorize(credentials)?;
      self.liked.clone()
   }
}

#[async_trait]
impl NewsApiMemberClient for StubNewsApiClient {
   async fn me(&self, _credentials: &[CredentialCookie]) -> Result<Member, NewsApiError> {
      self.record("me".to_string());
      self.me.clone()
   }
}

#[async_trait]
impl NewsApiAuthClient for StubNewsApiClient {
   async fn signup(&self, req: &SignupRequest) -> Result<SignupResult, NewsApiError> {
      self.record(format!(
         "signup email={} nickname={} birth_date={}",
         req.email, req.nickname, req.birth_date
      ));
      self.signup.clone()
   }

   async fn login(&self, req: &LoginRequest) -> Result<Authenticated<Member>, NewsApiError> {
      self.record(format!("login email={}", req.email));
      self.login.clone()
   }

   async fn logout(&self, _credentials: &[CredentialCookie]) -> Result<(), NewsApiError> {
      self.record("logout".to_string());
      self.logout.clone()
   }

   async fn refresh(
      &self,
      _credentials: &[CredentialCookie],
   ) -> Result<Vec<CredentialCookie>, NewsApiError> {
      self.record("refresh".to_string());
      self.refresh.clone()
   }

   async fn send_verification_email(&self, email: &str) -> Result<(), NewsApiError> {
      self.record(format!("send_verification_email email={email}"));
      self.verification.clone()
   }

   async fn check_email(&self, email: &str, auth_code: &str) -> Result<(), NewsApiError> {
      self.record(format!("check_email email={email} code={auth_code}"));
      self.check_email.clone()
   }
}
