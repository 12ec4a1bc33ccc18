//! # 外部 API クライアント
//!
//! リモートのニュース API との通信を担当する。

pub mod news_api;

pub use news_api::{
   Authenticated,
   Comment,
   CommentLike,
   CommentListQuery,
   KeywordSummary,
   LoginRequest,
   NewsApiAuthClient,
   NewsApiClient,
   NewsApiClientImpl,
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
   TopList,
   VideoSummary,
};
