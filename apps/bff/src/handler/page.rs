//! # 画面ビューモデル API ハンドラ
//!
//! 各画面が必要とするニュース API 呼び出しをまとめて行い、
//! 画面が描画する状態（一覧・ページ送り・件数・フラグ）だけを JSON で返す。
//!
//! ## エンドポイント
//!
//! - `GET /api/v1/pages/home` - ホーム
//! - `GET /api/v1/keywords/top` - サイドバーの急上昇キーワード
//! - `GET /api/v1/pages/keywords/{keyword}` - キーワード別投稿
//! - `GET /api/v1/pages/popular-news` - 人気ニュース
//! - `GET /api/v1/pages/popular-videos` - 人気動画
//! - `GET /api/v1/pages/posts/{id}` - 投稿詳細
//!
//! ## 失敗時の扱い
//!
//! 一覧の取得に失敗した場合はエラーを返さず、ログに残して空の一覧にする。
//! 画面は `empty: true` を見て「結果なし」を表示する。
//! 投稿詳細の本体だけは取得できないと画面が成り立たないため、エラーを返す。

pub mod cards;
mod home;
mod keyword;
mod popular;
mod post;

use std::sync::Arc;

pub use cards::{KeywordRank, NewsCard, PostCard, RelatedSource, VideoCard};
pub use home::*;
pub use keyword::*;
pub use popular::*;
pub use post::*;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::client::NewsApiClient;

/// 画面ビューモデル API の共有状態
pub struct PageState {
   pub news_api_client: Arc<dyn NewsApiClient>,
}

/// 一覧画面のページ指定
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
   /// 1 始まりのページ番号（省略時は 1）
   pub page: Option<u32>,
}
