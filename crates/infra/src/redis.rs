//! # Redis 接続管理
//!
//! セッション・CSRF トークン・メール認証カウントダウンが共有する
//! Redis 接続マネージャを作成する。
//!
//! `ConnectionManager` は内部で再接続を行い、`clone()` で同じ多重化接続を共有できる。

use redis::aio::ConnectionManager;

use crate::InfraError;

/// Redis 接続マネージャを作成する
///
/// # 引数
///
/// - `redis_url`: Redis 接続 URL（例: `redis://localhost:6379`）
pub async fn create_connection_manager(redis_url: &str) -> Result<ConnectionManager, InfraError> {
    let client = redis::Client::open(redis_url)?;
    let conn = ConnectionManager::new(client).await?;
    Ok(conn)
}

/// `PING` を送り、Redis が応答するか確認する（Readiness Check 用）
pub async fn ping(conn: &ConnectionManager) -> Result<(), InfraError> {
    let mut conn = conn.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    Ok(())
}
