//! # カード DTO
//!
//! 一覧の 1 件分を表示するための形。ニュース API の要約型から変換するだけで、
//! 取得処理は持たない。

use serde::Serialize;
use utoipa::ToSchema;

use crate::client::{KeywordSummary, NewsSummary, PostSummary, SourceSummary, VideoSummary};

/// サムネイルがない場合の代替画像
pub const PLACEHOLDER_THUMBNAIL: &str = "/placeholder.jpg";

/// 🔥 を付ける急上昇スコアの閾値
const HOT_KEYWORD_SCORE: f64 = 10_000.0;

/// ニュースカード
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NewsCard {
   pub news_id:       Option<i64>,
   pub title:         String,
   /// 元記事の URL（新しいタブで開く）
   pub url:           String,
   pub thumbnail_url: String,
   pub platform:      Option<String>,
   pub published_at:  Option<String>,
   pub summary:       Option<String>,
}

impl From<NewsSummary> for NewsCard {
   fn from(news: NewsSummary) -> Self {
      Self {
         news_id:       news.news_id,
         title:         news.title,
         url:           news.url,
         thumbnail_url: news
            .thumbnail_url
            .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string()),
         platform:      news.platform,
         published_at:  news.published_at,
         summary:       news.summary,
      }
   }
}

/// 動画カード
///
/// サムネイルがない動画は代替画像ではなくアイコンを表示するため、`None` のまま返す。
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VideoCard {
   pub video_id:      Option<i64>,
   pub title:         String,
   pub url:           String,
   pub thumbnail_url: Option<String>,
   pub platform:      Option<String>,
   pub published_at:  Option<String>,
}

impl From<VideoSummary> for VideoCard {
   fn from(video: VideoSummary) -> Self {
      Self {
         video_id:      video.video_id,
         title:         video.title,
         url:           video.url,
         thumbnail_url: video.thumbnail_url,
         platform:      video.platform,
         published_at:  video.published_at,
      }
   }
}

/// 投稿カード
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PostCard {
   pub post_id:       i64,
   pub keyword:       String,
   pub title:         String,
   pub summary:       String,
   pub thumbnail_url: String,
   pub source:        Option<String>,
   pub created_at:    Option<String>,
   /// 投稿詳細画面へのリンク
   pub href:          String,
}

impl From<PostSummary> for PostCard {
   fn from(post: PostSummary) -> Self {
      Self {
         href:          format!("/main/posts/{}", post.post_id),
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

/// 急上昇キーワードの順位
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct KeywordRank {
   /// 1 始まりの順位
   pub rank:       u32,
   pub keyword_id: i64,
   pub text:       String,
   pub hot:        bool,
   /// キーワード別画面へのリンク
   pub href:       String,
}

impl KeywordRank {
   /// 一覧の並び順どおりに順位を振る
   pub fn ranked(keywords: Vec<KeywordSummary>, limit: usize) -> Vec<Self> {
      keywords
         .into_iter()
         .take(limit)
         .zip(1..)
         .map(|(keyword, rank)| Self {
            rank,
            keyword_id: keyword.keyword_id,
            hot: keyword.score > HOT_KEYWORD_SCORE,
            href: format!("/main/keywords/{}", urlencoding::encode(&keyword.text)),
            text: keyword.text,
         })
         .collect()
   }
}

/// 投稿の関連ニュース・関連動画
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RelatedSource {
   pub id:            i64,
   pub title:         String,
   pub url:           String,
   pub thumbnail_url: String,
}

impl From<SourceSummary> for RelatedSource {
   fn from(source: SourceSummary) -> Self {
      Self {
         id:            source.id,
         title:         source.title,
         url:           source.url,
         thumbnail_url: source
            .thumbnail_url
            .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL.to_string()),
      }
   }
}

/// 要約の一覧をカードに変換する（先頭 `limit` 件）
pub fn cards<S, C: From<S>>(items: Vec<S>, limit: usize) -> Vec<C> {
   items.into_iter().take(limit).map(C::from).collect()
}
