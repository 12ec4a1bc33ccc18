//! # テスト用インメモリ実装
//!
//! BFF のハンドラーテストで Redis の代わりに使う。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! trending-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
   collections::HashMap,
   sync::{Arc, Mutex},
};

use async_trait::async_trait;
use trending_domain::verification::VerificationCountdown;

use crate::{
   error::InfraError,
   session::{SESSION_TTL_SECONDS, SessionData, SessionManager, generate_csrf_token},
   verification::VerificationStore,
};

// ===== InMemorySessionManager =====

#[derive(Clone, Default)]
pub struct InMemorySessionManager {
   sessions: Arc<Mutex<HashMap<String, SessionData>>>,
   csrf_tokens: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemorySessionManager {
   pub fn new() -> Self {
      Self::default()
   }

   /// 指定した ID でセッションを登録する
   pub fn insert(&self, session_id: &str, data: SessionData) {
      self
         .sessions
         .lock()
         .unwrap()
         .insert(session_id.to_string(), data);
   }

   /// 指定した ID で CSRF トークンを登録する
   pub fn insert_csrf_token(&self, session_id: &str, token: &str) {
      self
         .csrf_tokens
         .lock()
         .unwrap()
         .insert(session_id.to_string(), token.to_string());
   }

   pub fn session(&self, session_id: &str) -> Option<SessionData> {
      self.sessions.lock().unwrap().get(session_id).cloned()
   }

   pub fn csrf_token(&self, session_id: &str) -> Option<String> {
      self.csrf_tokens.lock().unwrap().get(session_id).cloned()
   }
}

#[async_trait]
impl SessionManager for InMemorySessionManager {
   async fn create(&self, data: &SessionData) -> Result<String, InfraError> {
      let session_id = uuid::Uuid::new_v4().to_string();
      self.insert(&session_id, data.clone());
      Ok(session_id)
   }

   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError> {
      Ok(self.session(session_id))
   }

   async fn update(&self, session_id: &str, data: &SessionData) -> Result<bool, InfraError> {
      let mut sessions = self.sessions.lock().unwrap();
      match sessions.get_mut(session_id) {
         Some(existing) => {
            *existing = data.clone();
            Ok(true)
         }
         None => Ok(false),
      }
   }

   async fn delete(&self, session_id: &str) -> Result<(), InfraError> {
      self.sessions.lock().unwrap().remove(session_id);
      Ok(())
   }

   async fn get_ttl(&self, session_id: &str) -> Result<Option<i64>, InfraError> {
      Ok(self
         .session(session_id)
         .map(|_| i64::try_from(SESSION_TTL_SECONDS).unwrap_or(i64::MAX)))
   }

   async fn create_csrf_token(&self, session_id: &str) -> Result<String, InfraError> {
      let token = generate_csrf_token();
      self.insert_csrf_token(session_id, &token);
      Ok(token)
   }

   async fn get_csrf_token(&self, session_id: &str) -> Result<Option<String>, InfraError> {
      Ok(self.csrf_token(session_id))
   }

   async fn delete_csrf_token(&self, session_id: &str) -> Result<(), InfraError> {
      self.csrf_tokens.lock().unwrap().remove(session_id);
      Ok(())
   }
}

// ===== InMemoryVerificationStore =====

/// カウントダウンのインメモリ保存
///
/// TTL は持たない。期限切れの判定は [`VerificationCountdown`] 側で行われるため、
/// テストでは時刻を進めるだけで期限切れを再現できる。
#[derive(Clone, Default)]
pub struct InMemoryVerificationStore {
   countdowns: Arc<Mutex<HashMap<String, VerificationCountdown>>>,
}

impl InMemoryVerificationStore {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn countdown(&self, email: &str) -> Option<VerificationCountdown> {
      self
         .countdowns
         .lock()
         .unwrap()
         .get(&email.trim().to_lowercase())
         .copied()
   }
}

#[async_trait]
impl VerificationStore for InMemoryVerificationStore {
   async fn start(
      &self,
      email: &str,
      countdown: &VerificationCountdown,
   ) -> Result<(), InfraError> {
      self
         .countdowns
         .lock()
         .unwrap()
         .insert(email.trim().to_lowercase(), *countdown);
      Ok(())
   }

   async fn get(&self, email: &str) -> Result<Option<VerificationCountdown>, InfraError> {
      Ok(self.countdown(email))
   }

   async fn clear(&self, email: &str) -> Result<(), InfraError> {
      self
         .countdowns
         .lock()
         .unwrap()
         .remove(&email.trim().to_lowercase());
      Ok(())
   }
}
