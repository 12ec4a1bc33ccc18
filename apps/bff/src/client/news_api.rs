//! # ニュース API クライアント
//!
//! BFF からリモートのニュース API への通信を担当する。
//!
//! リソースごとにサブトレイトを分け、[`NewsApiClient`] スーパートレイトで束ねる。
//! ハンドラは必要なサブトレイトだけを State に持つ。
//!
//! ## エンドポイント
//!
//! | サブトレイト | パス |
//! |---|---|
//! | [`NewsApiNewsClient`] | `/api/v1/news/*`, `/api/v1/posts/{id}/news` |
//! | [`NewsApiVideoClient`] | `/api/v1/videos/*`, `/api/v1/posts/{id}/videos` |
//! | [`NewsApiPostClient`] | `/api/v1/posts/*` |
//! | [`NewsApiKeywordClient`] | `/api/v1/keywords/top` |
//! | [`NewsApiCommentClient`] | `/api/v1/posts/{id}/comments`, `/api/v1/comments/*` |
//! | [`NewsApiMemberClient`] | `/api/v1/members/me` |
//! | [`NewsApiAuthClient`] | `/api/v1/auth/*`, `/api/v1/members/signup` |

mod auth_client;
mod client_impl;
mod comment_client;
mod error;
mod keyword_client;
mod member_client;
mod news_client;
mod post_client;
mod response;
mod types;
mod video_client;

pub use auth_client::NewsApiAuthClient;
pub use client_impl::{NewsApiClient, NewsApiClientImpl};
pub use comment_client::NewsApiCommentClient;
pub use error::NewsApiError;
pub use keyword_client::NewsApiKeywordClient;
pub use member_client::NewsApiMemberClient;
pub use news_client::NewsApiNewsClient;
pub use post_client::NewsApiPostClient;
pub use types::{
   Authenticated,
   Comment,
   CommentLike,
   CommentListQuery,
   KeywordSummary,
   LoginRequest,
   NewsSummary,
   PostSearchQuery,
   PostSummary,
   SignupRequest,
   SignupResult,
   SourceSummary,
   TopList,
   VideoSummary,
};
pub use video_client::NewsApiVideoClient;
