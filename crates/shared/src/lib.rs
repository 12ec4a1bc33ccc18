//! # Trending Now 共有ユーティリティ
//!
//! BFF・ドメイン・インフラの各クレートから使用される共通型を提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, bff）から依存される
//! - ビジネスロジックを含まない純粋なデータ構造とユーティリティのみを配置
//! - 外部クレートへの依存は最小限に抑え、重い依存は feature で切り替える
//!
//! ## モジュール構成
//!
//! - [`api_response`]: BFF → ブラウザのレスポンス形式 `{ "data": T }`
//! - [`envelope`]: ニュース API → BFF のレスポンス形式 `{ code, message, data }`
//! - [`paginated_response`]: オフセットページネーションのレスポンス形式
//! - [`error_response`]: RFC 9457 Problem Details
//! - [`observability`]: トレーシング初期化と Request ID

pub mod api_response;
pub mod envelope;
pub mod error_response;
pub mod event_log;
pub mod health;
pub mod observability;
pub mod paginated_response;

pub use api_response::ApiResponse;
pub use envelope::{ApiEnvelope, SuccessCodes};
pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
pub use paginated_response::{OffsetPage, PageMeta};
