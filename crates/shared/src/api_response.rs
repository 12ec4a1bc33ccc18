//! # BFF レスポンスエンベロープ
//!
//! ブラウザ向け API の統一レスポンス形式 `{ "data": T }` を提供する。
//!
//! ニュース API の `{ code, message, data }` 形式（[`crate::ApiEnvelope`]）とは
//! 別物であり、BFF がブラウザへ返すときはこちらを使う。
//! ステータスの判定は HTTP ステータスコードに一本化し、ブラウザ側で
//! `code` 文字列を比較させない。

use serde::{Deserialize, Serialize};

/// ブラウザ向け API の統一レスポンス型
///
/// ## 使用例
///
/// ```
/// use trending_shared::ApiResponse;
///
/// let response = ApiResponse::new(vec!["AI", "半導体"]);
/// assert_eq!(response.data.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// 新しい `ApiResponse` を作成する
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
