//! コメント関連のニュース API クライアント
//!
//! 一覧取得以外はログイン中の会員として呼び出すため、認証情報を受け取る。

use async_trait::async_trait;
use reqwest::Method;
use trending_infra::CredentialCookie;
use trending_shared::OffsetPage;

use super::{
   client_impl::NewsApiClientImpl,
   error::NewsApiError,
   response::{handle_empty, handle_envelope},
   types::{Comment, CommentBodyRequest, CommentLike, CommentListQuery},
};

/// コメント関連のニュース API クライアントトレイト
#[async_trait]
pub trait NewsApiCommentClient: Send + Sync {
   /// 投稿のコメント一覧を取得する
   ///
   /// ニュース API の `GET /api/v1/posts/{id}/comments` を呼び出す。
   async fn list_comments(
      &self,
      post_id: i64,
      query: CommentListQuery,
   ) -> Result<OffsetPage<Comment>, NewsApiError>;

   /// コメントを作成する
   ///
   /// ニュース API の `POST /api/v1/posts/{id}/comments` を呼び出す。
   async fn create_comment(
      &self,
      credentials: &[CredentialCookie],
      post_id: i64,
      body: &str,
   ) -> Result<Comment, NewsApiError>;

   /// コメントを更新する
   ///
   /// ニュース API の `PATCH /api/v1/comments/{id}` を呼び出す。
   async fn update_comment(
      &self,
      credentials: &[CredentialCookie],
      comment_id: i64,
      body: &str,
   ) -> Result<Comment, NewsApiError>;

   /// コメントを削除する
   ///
   /// ニュース API の `DELETE /api/v1/comments/{id}` を呼び出す。
   async fn delete_comment(
      &self,
      credentials: &[CredentialCookie],
      comment_id: i64,
   ) -> Result<(), NewsApiError>;

   /// コメントにいいねする
   ///
   /// ニュース API の `POST /api/v1/comments/{id}/like` を呼び出す。
   async fn like_comment(
      &self,
      credentials: &[CredentialCookie],
      comment_id: i64,
   ) -> Result<CommentLike, NewsApiError>;
}

#[async_trait]
impl NewsApiCommentClient for NewsApiClientImpl {
   async fn list_comments(
      &self,
      post_id: i64,
      query: CommentListQuery,
   ) -> Result<OffsetPage<Comment>, NewsApiError> {
      let path = format!(
         "/api/v1/posts/{}/comments?page={}&size={}&sort={}",
         post_id,
         query.page,
         query.size,
         urlencoding::encode(query.sort.as_query())
      );
      let response = self.request(Method::GET, &path).send().await?;
      handle_envelope(
         response,
         Some(NewsApiError::PostNotFound),
         &self.success_codes,
      )
      .await
   }

   async fn create_comment(
      &self,
      credentials: &[CredentialCookie],
      post_id: i64,
      body: &str,
   ) -> Result<Comment, NewsApiError> {
      let path = format!("/api/v1/posts/{}/comments", post_id);
      let response = self
         .authed_request(Method::POST, &path, credentials)
         .json(&CommentBodyRequest { body })
         .send()
         .await?;
      handle_envelope(
         response,
         Some(NewsApiError::PostNotFound),
         &self.success_codes,
      )
      .await
   }

   async fn update_comment(
      &self,
      credentials: &[CredentialCookie],
      comment_id: i64,
      body: &str,
   ) -> Result<Comment, NewsApiError> {
      let path = format!("/api/v1/comments/{}", comment_id);
      let response = self
         .authed_request(Method::PATCH, &path, credentials)
         .json(&CommentBodyRequest { body })
         .send()
         .await?;
      handle_envelope(
         response,
         Some(NewsApiError::CommentNotFound),
         &self.success_codes,
      )
      .await
   }

   async fn delete_comment(
      &self,
      credentials: &[CredentialCookie],
      comment_id: i64,
   ) -> Result<(), NewsApiError> {
      let path = format!("/api/v1/comments/{}", comment_id);
      let response = self
         .authed_request(Method::DELETE, &path, credentials)
         .send()
         .await?;
      handle_empty(
         response,
         Some(NewsApiError::CommentNotFound),
         &self.success_codes,
      )
      .await
   }

   async fn like_comment(
      &self,
      credentials: &[CredentialCookie],
      comment_id: i64,
   ) -> Result<CommentLike, NewsApiError> {
      let path = format!("/api/v1/comments/{}/like", comment_id);
      let response = self
         .authed_request(Method::POST, &path, credentials)
         .send()
         .await?;
      handle_envelope(
         response,
         Some(NewsApiError::CommentNotFound),
         &self.success_codes,
      )
      .await
   }
}
