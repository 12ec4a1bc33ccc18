//! # セッション管理
//!
//! Redis を使用したセッション管理を提供する。
//!
//! セッションはログイン時に一度だけ作成され、ログイン中の会員と
//! ニュース API の認証 Cookie（アクセストークン等）を保持する。
//! 保護されたハンドラーは毎回ニュース API に会員を問い合わせず、ここから読む。
//!
//! ## Redis キー設計
//!
//! | キー | 値 | TTL |
//! |-----|-----|-----|
//! | `session:{session_id}` | SessionData (JSON) | 28800秒（8時間） |
//! | `csrf:{session_id}` | CSRF トークン（64 文字の 16 進数） | 28800秒（8時間） |
//!
//! ## 認証情報の世代
//!
//! `credential_version` はニュース API の認証 Cookie を更新するたびに 1 増える。
//! 401 を受けた呼び出し元は自分が使った世代を覚えておき、リフレッシュ前に
//! セッションを読み直して世代が進んでいれば、別のリクエストが既にリフレッシュ
//! 済みと判断して新しい認証情報を再利用する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use trending_domain::member::Member;
use uuid::Uuid;

use crate::{InfraError, error::Store};

/// セッションの有効期限（秒）
/// 8時間 = 28800秒
pub const SESSION_TTL_SECONDS: u64 = 28800;

/// ニュース API の認証 Cookie 1 件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialCookie {
   pub name:  String,
   pub value: String,
}

impl CredentialCookie {
   pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
      Self {
         name:  name.into(),
         value: value.into(),
      }
   }
}

/// セッションデータ
///
/// Redis に JSON 形式で保存されるセッション情報。
/// ログイン成功時に作成され、ログアウト・回復不能な 401・TTL 経過で削除される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
   member: Member,
   credentials: Vec<CredentialCookie>,
   credential_version: u64,
   created_at: DateTime<Utc>,
   last_accessed_at: DateTime<Utc>,
}

impl SessionData {
   /// 新しいセッションデータを作成する
   ///
   /// `credential_version` は 1 から始まる。
   pub fn new(member: Member, credentials: Vec<CredentialCookie>, now: DateTime<Utc>) -> Self {
      Self {
         member,
         credentials,
         credential_version: 1,
         created_at: now,
         last_accessed_at: now,
      }
   }

   pub fn member(&self) -> &Member {
      &self.member
   }

   pub fn credentials(&self) -> &[CredentialCookie] {
      &self.credentials
   }

   pub fn credential_version(&self) -> u64 {
      self.credential_version
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn last_accessed_at(&self) -> DateTime<Utc> {
      self.last_accessed_at
   }

   /// リフレッシュで得た認証 Cookie をマージし、世代を進める
   ///
   /// 同名の Cookie は上書きし、新しい名前の Cookie は追加する。
   /// レスポンスに含まれなかった Cookie は元の値を保持する。
   pub fn with_refreshed_credentials(
      mut self,
      refreshed: Vec<CredentialCookie>,
      now: DateTime<Utc>,
   ) -> Self {
      for cookie in refreshed {
         match self.credentials.iter_mut().find(|c| c.name == cookie.name) {
            Some(existing) => existing.value = cookie.value,
            None => self.credentials.push(cookie),
         }
      }
      self.credential_version += 1;
      self.last_accessed_at = now;
      self
   }
}

/// セッション管理トレイト
///
/// セッションと CSRF トークンの作成・取得・更新・削除を行う。
/// 実装は Redis を使用する [`RedisSessionManager`] を参照。
#[async_trait]
pub trait SessionManager: Send + Sync {
   /// セッションを作成し、セッション ID（UUID v4）を返す
   async fn create(&self, data: &SessionData) -> Result<String, InfraError>;

   /// セッションを取得する
   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError>;

   /// 既存セッションの内容を置き換える（TTL は維持する）
   ///
   /// セッションが既に存在しない場合は何もせず `false` を返す。
   async fn update(&self, session_id: &str, data: &SessionData) -> Result<bool, InfraError>;

   /// セッションを削除する
   ///
   /// 存在しないセッションを削除しても成功とする。
   async fn delete(&self, session_id: &str) -> Result<(), InfraError>;

   /// セッションの TTL（残り秒数）を取得する
   async fn get_ttl(&self, session_id: &str) -> Result<Option<i64>, InfraError>;

   /// CSRF トークンを生成して保存し、返す
   async fn create_csrf_token(&self, session_id: &str) -> Result<String, InfraError>;

   /// CSRF トークンを取得する
   async fn get_csrf_token(&self, session_id: &str) -> Result<Option<String>, InfraError>;

   /// CSRF トークンを削除する
   async fn delete_csrf_token(&self, session_id: &str) -> Result<(), InfraError>;
}

/// CSRF トークンを生成する（32 バイトの乱数を 16 進数 64 文字で表現）
pub fn generate_csrf_token() -> String {
   let mut rng = rand::rng();
   (0..32)
      .map(|_| format!("{:02x}", rng.random::<u8>()))
      .collect()
}

/// Redis を使用したセッションマネージャ
#[derive(Clone)]
pub struct RedisSessionManager {
   conn: ConnectionManager,
}

impl RedisSessionManager {
   /// 新しい RedisSessionManager を作成する
   ///
   /// # 引数
   ///
   /// - `redis_url`: Redis 接続 URL（例: `redis://localhost:6379`）
   pub async fn new(redis_url: &str) -> Result<Self, InfraError> {
      let conn = crate::redis::create_connection_manager(redis_url).await?;
      Ok(Self { conn })
   }

   /// 既存の接続マネージャから作成する
   pub fn from_connection(conn: ConnectionManager) -> Self {
      Self { conn }
   }

   fn session_key(session_id: &str) -> String {
      format!("session:{session_id}")
   }

   fn csrf_key(session_id: &str) -> String {
      format!("csrf:{session_id}")
   }
}

#[async_trait]
impl SessionManager for RedisSessionManager {
   async fn create(&self, data: &SessionData) -> Result<String, InfraError> {
      let session_id = Uuid::new_v4().to_string();
      let key = Self::session_key(&session_id);
      let json = serde_json::to_string(data).map_err(InfraError::corrupted(Store::Session))?;

      let mut conn = self.conn.clone();
      let _: () = conn
         .set_ex(&key, json, SESSION_TTL_SECONDS)
         .await
         .map_err(InfraError::command(Store::Session, "SETEX"))?;

      Ok(session_id)
   }

   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError> {
      let key = Self::session_key(session_id);
      let mut conn = self.conn.clone();

      let result: Option<String> = conn
         .get(&key)
         .await
         .map_err(InfraError::command(Store::Session, "GET"))?;

      result
         .map(|json| serde_json::from_str(&json))
         .transpose()
         .map_err(InfraError::corrupted(Store::Session))
   }

   async fn update(&self, session_id: &str, data: &SessionData) -> Result<bool, InfraError> {
      let key = Self::session_key(session_id);
      let json = serde_json::to_string(data).map_err(InfraError::corrupted(Store::Session))?;
      let mut conn = self.conn.clone();

      // XX: 既存キーのみ更新、KEEPTTL: ログイン時の有効期限を引き継ぐ
      let reply: Option<String> = redis::cmd("SET")
         .arg(&key)
         .arg(json)
         .arg("XX")
         .arg("KEEPTTL")
         .query_async(&mut conn)
         .await
         .map_err(InfraError::command(Store::Session, "SET XX"))?;

      Ok(reply.is_some())
   }

   async fn delete(&self, session_id: &str) -> Result<(), InfraError> {
      let key = Self::session_key(session_id);
      let mut conn = self.conn.clone();
      let _: () = conn
         .del(&key)
         .await
         .map_err(InfraError::command(Store::Session, "DEL"))?;
      Ok(())
   }

   async fn get_ttl(&self, session_id: &str) -> Result<Option<i64>, InfraError> {
      let key = Self::session_key(session_id);
      let mut conn = self.conn.clone();

      let ttl: i64 = conn
         .ttl(&key)
         .await
         .map_err(InfraError::command(Store::Session, "TTL"))?;

      // TTL が -2 の場合はキーが存在しない、-1 の場合は TTL が設定されていない
      if ttl < 0 { Ok(None) } else { Ok(Some(ttl)) }
   }

   async fn create_csrf_token(&self, session_id: &str) -> Result<String, InfraError> {
      let token = generate_csrf_token();
      let key = Self::csrf_key(session_id);
      let mut conn = self.conn.clone();

      let _: () = conn
         .set_ex(&key, &token, SESSION_TTL_SECONDS)
         .await
         .map_err(InfraError::command(Store::CsrfToken, "SETEX"))?;

      Ok(token)
   }

   async fn get_csrf_token(&self, session_id: &str) -> Result<Option<String>, InfraError> {
      let key = Self::csrf_key(session_id);
      let mut conn = self.conn.clone();
      conn
         .get(&key)
         .await
         .map_err(InfraError::command(Store::CsrfToken, "GET"))
   }

   async fn delete_csrf_token(&self, session_id: &str) -> Result<(), InfraError> {
      let key = Self::csrf_key(session_id);
      let mut conn = self.conn.clone();
      let _: () = conn
         .del(&key)
         .await
         .map_err(InfraError::command(Store::CsrfToken, "DEL"))?;
      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use chrono::TimeZone;
   use pretty_assertions::assert_eq;
   use trending_domain::member::MemberId;

   use super::*;

   fn member() -> Member {
      Member {
         id:          MemberId::new("42"),
         nickname:    "트렌드헌터".to_string(),
         email:       "reader@example.com".to_string(),
         role:        "USER".to_string(),
         profile_url: None,
         delete_at:   None,
      }
   }

   fn now() -> DateTime<Utc> {
      Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap()
   }

   #[test]
   fn test_newで世代1から始まる() {
      let data = SessionData::new(member(), vec![], now());

      assert_eq!(data.credential_version(), 1);
      assert_eq!(data.created_at(), now());
      assert_eq!(data.last_accessed_at(), now());
   }

   #[test]
   fn test_with_refreshed_credentialsで同名cookieを上書きし世代を進める() {
      let data = SessionData::new(
         member(),
         vec![
            CredentialCookie::new("accessToken", "old-access"),
            CredentialCookie::new("refreshToken", "refresh"),
         ],
         now(),
      );
      let later = now() + chrono::Duration::minutes(30);

      let refreshed = data.with_refreshed_credentials(
         vec![CredentialCookie::new("accessToken", "new-access")],
         later,
      );

      assert_eq!(refreshed.credential_version(), 2);
      assert_eq!(
         refreshed.credentials(),
         &[
            CredentialCookie::new("accessToken", "new-access"),
            CredentialCookie::new("refreshToken", "refresh"),
         ]
      );
      assert_eq!(refreshed.last_accessed_at(), later);
      assert_eq!(refreshed.created_at(), now());
   }

   #[test]
   fn test_with_refreshed_credentialsで新しいcookieは追加する() {
      let data = SessionData::new(member(), vec![], now());

      let refreshed =
         data.with_refreshed_credentials(vec![CredentialCookie::new("accessToken", "a")], now());

      assert_eq!(refreshed.credentials().len(), 1);
   }

   #[test]
   fn test_jsonラウンドトリップで内容が保たれる() {
      let data = SessionData::new(
         member(),
         vec![CredentialCookie::new("accessToken", "a")],
         now(),
      );

      let json = serde_json::to_string(&data).unwrap();
      let restored: SessionData = serde_json::from_str(&json).unwrap();

      assert_eq!(restored, data);
   }

   #[test]
   fn test_generate_csrf_tokenは64文字の16進数() {
      let token = generate_csrf_token();

      assert_eq!(token.len(), 64);
      assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
      assert_ne!(token, generate_csrf_token());
   }
}
