//! # メール認証カウントダウンの保存
//!
//! 認証メールの発行時刻をメールアドレスごとに Redis に保存する。
//! 残り秒数は [`VerificationCountdown`] が発行時刻と現在時刻から計算するため、
//! ここでは発行時刻の読み書きだけを行う。
//!
//! ## Redis キー設計
//!
//! | キー | 値 | TTL |
//! |-----|-----|-----|
//! | `email_verification:{email}` | VerificationCountdown (JSON) | 300秒 |
//!
//! メールアドレスは小文字に正規化してキーにする。
//! 期限切れのカウントダウンは TTL で自動的に消えるため、後片付けは不要。

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use trending_domain::verification::{VERIFICATION_WINDOW_SECS, VerificationCountdown};

use crate::{InfraError, error::Store};

/// カウントダウン保存トレイト
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// カウントダウンを保存する（既存のものは置き換える）
    async fn start(&self, email: &str, countdown: &VerificationCountdown)
    -> Result<(), InfraError>;

    /// カウントダウンを取得する（未開始または TTL 経過なら `None`）
    async fn get(&self, email: &str) -> Result<Option<VerificationCountdown>, InfraError>;

    /// カウントダウンを削除する（認証成功時）
    async fn clear(&self, email: &str) -> Result<(), InfraError>;
}

/// Redis を使用したカウントダウン保存
#[derive(Clone)]
pub struct RedisVerificationStore {
    conn: ConnectionManager,
}

impl RedisVerificationStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn key(email: &str) -> String {
        format!("email_verification:{}", email.trim().to_lowercase())
    }
}

#[async_trait]
impl VerificationStore for RedisVerificationStore {
    async fn start(
        &self,
        email: &str,
        countdown: &VerificationCountdown,
    ) -> Result<(), InfraError> {
        let json =
            serde_json::to_string(countdown).map_err(InfraError::corrupted(Store::Verification))?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(Self::key(email), json, u64::from(VERIFICATION_WINDOW_SECS))
            .await
            .map_err(InfraError::command(Store::Verification, "SETEX"))?;
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<VerificationCountdown>, InfraError> {
        let mut conn = self.conn.clone();
        let result: Option<String> = conn
            .get(Self::key(email))
            .await
            .map_err(InfraError::command(Store::Verification, "GET"))?;

        result
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(InfraError::corrupted(Store::Verification))
    }

    async fn clear(&self, email: &str) -> Result<(), InfraError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(Self::key(email))
            .await
            .map_err(InfraError::command(Store::Verification, "DEL"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_キーはメールアドレスを小文字に正規化する() {
        assert_eq!(
            RedisVerificationStore::key(" Reader@Example.COM "),
            "email_verification:reader@example.com"
        );
    }
}
