//! # Trending Now インフラ層
//!
//! BFF が自前で持つ状態（セッション、CSRF トークン、メール認証カウントダウン）を
//! Redis に保存する。
//!
//! ## 依存関係
//!
//! ```text
//! bff → infra → domain
//! ```
//!
//! ニュース API の呼び出しは BFF の `client` モジュールが担当し、ここには含めない。
//!
//! ## モジュール構成
//!
//! - [`redis`] - Redis 接続管理
//! - [`session`] - セッションと CSRF トークン
//! - [`verification`] - メール認証カウントダウンの発行時刻
//! - [`error`] - インフラ層エラー定義
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use trending_infra::{redis, session::RedisSessionManager, verification::RedisVerificationStore};
//!
//! async fn setup() -> Result<(), trending_infra::InfraError> {
//!     let conn = redis::create_connection_manager("redis://localhost").await?;
//!     let sessions = RedisSessionManager::from_connection(conn.clone());
//!     let verifications = RedisVerificationStore::new(conn);
//!     Ok(())
//! }
//! ```

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod redis;
pub mod session;
pub mod verification;

pub use error::{InfraError, InfraErrorKind, Store};
pub use session::{CredentialCookie, RedisSessionManager, SessionData, SessionManager};
pub use verification::{RedisVerificationStore, VerificationStore};
