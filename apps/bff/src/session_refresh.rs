//! # セッションのシングルフライトリフレッシュ
//!
//! 保護されたニュース API 呼び出しが 401 を返したとき、認証情報を 1 度だけ
//! リフレッシュして元の呼び出しを再試行する。
//!
//! ## シングルフライト
//!
//! 同じセッションで複数のリクエストが同時に 401 を受けても、
//! `POST /api/v1/auth/refresh` はセッションごとに 1 本しか飛ばない。
//!
//! 1. 401 を受けた呼び出し元は、自分が使った `credential_version` を覚えておく
//! 2. セッション単位の非同期ロックを取得する
//! 3. ロック取得後にセッションを読み直し、世代が進んでいれば
//!    先行リクエストのリフレッシュ結果をそのまま使う
//! 4. 世代が同じなら自分がリフレッシュし、セッションを更新する
//!
//! 再試行は 1 度だけ。再試行でも 401 ならセッションを破棄し、
//! ブラウザにはサインインへの遷移を 1 度だけ指示する。

use std::{
   collections::HashMap,
   future::Future,
   sync::{Arc, Mutex, PoisonError},
};

use trending_domain::clock::Clock;
use trending_infra::{CredentialCookie, SessionData, SessionManager};
use trending_shared::{
   event_log::{error, event},
   log_business_event,
};

use crate::client::{NewsApiAuthClient, NewsApiError};

/// セッションごとの非同期ロック
type SessionLock = Arc<tokio::sync::Mutex<()>>;

/// シングルフライトリフレッシュを行うコンポーネント
pub struct SessionRefresher {
   auth_client:     Arc<dyn NewsApiAuthClient>,
   session_manager: Arc<dyn SessionManager>,
   clock:           Arc<dyn Clock>,
   locks:           Mutex<HashMap<String, SessionLock>>,
}

impl SessionRefresher {
   pub fn new(
      auth_client: Arc<dyn NewsApiAuthClient>,
      session_manager: Arc<dyn SessionManager>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         auth_client,
         session_manager,
         clock,
         locks: Mutex::new(HashMap::new()),
      }
   }

   /// セッションの認証情報で `call` を実行し、401 なら 1 度だけリフレッシュして再試行する
   ///
   /// `call` には呼び出しごとに使う認証情報が渡される。
   /// 401 以外のエラーはそのまま返す。
   pub async fn call_with_refresh<T, F, Fut>(
      &self,
      session_id: &str,
      session: &SessionData,
      call: F,
   ) -> Result<T, NewsApiError>
   where
      F: Fn(Vec<CredentialCookie>) -> Fut,
      Fut: Future<Output = Result<T, NewsApiError>>,
   {
      match call(session.credentials().to_vec()).await {
         Err(NewsApiError::Unauthorized) => {}
         other => return other,
      }

      let credentials = self
         .refresh(session_id, session.credential_version())
         .await?;

      match call(credentials).await {
         Err(NewsApiError::Unauthorized) => {
            self.invalidate(session_id, "unauthorized_after_refresh").await;
            Err(NewsApiError::Unauthorized)
         }
         other => other,
      }
   }

   /// 認証情報をリフレッシュし、次の呼び出しで使う認証情報を返す
   ///
   /// `used_version` は 401 を受けた呼び出しで使った認証情報の世代。
   pub async fn refresh(
      &self,
      session_id: &str,
      used_version: u64,
   ) -> Result<Vec<CredentialCookie>, NewsApiError> {
      let lock = self.lock_for(session_id);
      let _guard = lock.lock().await;

      let current = match self.session_manager.get(session_id).await {
         Ok(Some(data)) => data,
         Ok(None) => return Err(NewsApiError::Unauthorized),
         Err(e) => {
            tracing::error!(
               error.category = error::category::INFRASTRUCTURE,
               error.kind = error::kind::SESSION,
               "リフレッシュ前のセッション取得で内部エラー: {}",
               e
            );
            return Err(NewsApiError::Unexpected(e.to_string()));
         }
      };

      // 先行リクエストがリフレッシュ済み
      if current.credential_version() > used_version {
         tracing::debug!(
            credential_version = current.credential_version(),
            "リフレッシュ済みの認証情報を再利用"
         );
         return Ok(current.credentials().to_vec());
      }

      let refreshed = match self.auth_client.refresh(current.credentials()).await {
         Ok(cookies) => cookies,
         Err(NewsApiError::Unauthorized | NewsApiError::Forbidden(_)) => {
            self.invalidate(session_id, "refresh_rejected").await;
            return Err(NewsApiError::Unauthorized);
         }
         Err(e) => return Err(e),
      };

      let updated = current.with_refreshed_credentials(refreshed, self.clock.now());
      match self.session_manager.update(session_id, &updated).await {
         Ok(true) => {}
         Ok(false) => return Err(NewsApiError::Unauthorized),
         Err(e) => {
            tracing::error!(
               error.category = error::category::INFRASTRUCTURE,
               error.kind = error::kind::SESSION,
               "リフレッシュ後のセッション更新で内部エラー: {}",
               e
            );
            return Err(NewsApiError::Unexpected(e.to_string()));
         }
      }

      log_business_event!(
         event.category = event::category::AUTH,
         event.action = event::action::SESSION_REFRESHED,
         event.entity_type = event::entity_type::SESSION,
         event.actor_id = %updated.member().id,
         event.result = event::result::SUCCESS,
         credential_version = updated.credential_version(),
         "認証情報をリフレッシュ"
      );

      Ok(updated.credentials().to_vec())
   }

   /// セッションと CSRF トークンを破棄する
   ///
   /// 破棄に失敗してもログに残すだけで、呼び出し元には 401 を返させる。
   pub async fn invalidate(&self, session_id: &str, reason: &str) {
      if let Err(e) = self.session_manager.delete(session_id).await {
         tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::SESSION,
            "セッション破棄に失敗: {}",
            e
         );
      }
      if let Err(e) = self.session_manager.delete_csrf_token(session_id).await {
         tracing::error!(
            error.category = error::category::INFRASTRUCTURE,
            error.kind = error::kind::CSRF_TOKEN,
            "CSRF トークン破棄に失敗: {}",
            e
         );
      }

      log_business_event!(
         event.category = event::category::AUTH,
         event.action = event::action::SESSION_EXPIRED,
         event.entity_type = event::entity_type::SESSION,
         event.result = event::result::FAILURE,
         event.reason = reason,
         "セッションを破棄"
      );
   }

   /// セッションのロックを取得する（なければ作成する）
   ///
   /// どのリクエストも保持していないロックはここで掃除する。
   fn lock_for(&self, session_id: &str) -> SessionLock {
      let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
      locks.retain(|id, lock| id == session_id || Arc::strong_count(lock) > 1);
      locks
         .entry(session_id.to_string())
         .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
         .clone()
   }

   #[cfg(test)]
   fn lock_count(&self) -> usize {
      self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
   }
}

#[cfg(test)]
mod tests {
   use std::{
      sync::atomic::{AtomicUsize, Ordering},
      time::Duration,
   };

   use async_trait::async_trait;
   use chrono::{TimeZone, Utc};
   use pretty_assertions::assert_eq;
   use trending_domain::{
      clock::FixedClock,
      member::{Member, MemberId},
   };
   use trending_infra::mock::InMemorySessionManager;

   use super::*;
   use crate::client::{Authenticated, LoginRequest, SignupRequest, SignupResult};

   const OLD_TOKEN: &str = "access-old";
   const NEW_TOKEN: &str = "access-new";

   // --- スタブ ---

   struct StubAuthClient {
      refresh_result: Result<Vec<CredentialCookie>, NewsApiError>,
      refresh_calls:  AtomicUsize,
   }

   impl StubAuthClient {
      fn issuing(token: &str) -> Self {
         Self {
            refresh_result: Ok(vec![CredentialCookie::new("accessToken", token)]),
            refresh_calls:  AtomicUsize::new(0),
         }
      }

      fn failing(err: NewsApiError) -> Self {
         Self {
            refresh_result: Err(err),
            refresh_calls:  AtomicUsize::new(0),
         }
      }
   }

   #[async_trait]
   impl NewsApiAuthClient for StubAuthClient {
      async fn signup(&self, _req: &SignupRequest) -> Result<SignupResult, NewsApiError> {
         unimplemented!()
      }

      async fn login(
         &self,
         _req: &LoginRequest,
      ) -> Result<Authenticated<Member>, NewsApiError> {
         unimplemented!()
      }

      async fn logout(&self, _credentials: &[CredentialCookie]) -> Result<(), NewsApiError> {
         unimplemented!()
      }

      async fn refresh(
         &self,
         _credentials: &[CredentialCookie],
      ) -> Result<Vec<CredentialCookie>, NewsApiError> {
         self.refresh_calls.fetch_add(1, Ordering::SeqCst);
         // 同時に 401 を受けたリクエストがロック待ちになるよう少し待つ
         tokio::time::sleep(Duration::from_millis(20)).await;
         self.refresh_result.clone()
      }

      async fn send_verification_email(&self, _email: &str) -> Result<(), NewsApiError> {
         unimplemented!()
      }

      async fn check_email(&self, _email: &str, _auth_code: &str) -> Result<(), NewsApiError> {
         unimplemented!()
      }
   }

   // --- ヘルパー ---

   fn now() -> chrono::DateTime<Utc> {
      Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
   }

   fn session_with_token(token: &str) -> SessionData {
      SessionData::new(
         Member {
            id:          MemberId::new("42"),
            nickname:    "트렌드헌터".to_string(),
            email:       "reader@example.com".to_string(),
            role:        "USER".to_string(),
            profile_url: None,
            delete_at:   None,
         },
         vec![CredentialCookie::new("accessToken", token)],
         now(),
      )
   }

   fn setup(auth: StubAuthClient) -> (Arc<StubAuthClient>, Arc<InMemorySessionManager>, SessionRefresher) {
      let auth = Arc::new(auth);
      let sessions = Arc::new(InMemorySessionManager::new());
      sessions.insert("sess-1", session_with_token(OLD_TOKEN));
      sessions.insert_csrf_token("sess-1", "csrf-token");
      let refresher = SessionRefresher::new(
         auth.clone(),
         sessions.clone(),
         Arc::new(FixedClock::new(now())),
      );
      (auth, sessions, refresher)
   }

   /// 新しいトークンでのみ成功するニュース API 呼び出し
   async fn protected_call(
      credentials: Vec<CredentialCookie>,
      calls: &AtomicUsize,
   ) -> Result<&'static str, NewsApiError> {
      calls.fetch_add(1, Ordering::SeqCst);
      if credentials.iter().any(|c| c.value == NEW_TOKEN) {
         Ok("ok")
      } else {
         Err(NewsApiError::Unauthorized)
      }
   }

   // --- テスト ---

   #[tokio::test]
   async fn test_成功した呼び出しはリフレッシュしない() {
      let (auth, sessions, refresher) = setup(StubAuthClient::issuing(NEW_TOKEN));
      sessions.insert("sess-1", session_with_token(NEW_TOKEN));
      let session = sessions.session("sess-1").unwrap();
      let calls = AtomicUsize::new(0);

      let result = refresher
         .call_with_refresh("sess-1", &session, |creds| protected_call(creds, &calls))
         .await;

      assert_eq!(result, Ok("ok"));
      assert_eq!(calls.load(Ordering::SeqCst), 1);
      assert_eq!(auth.refresh_calls.load(Ordering::SeqCst), 0);
   }

   #[tokio::test]
   async fn test_401ならリフレッシュして1度だけ再試行する() {
      let (auth, sessions, refresher) = setup(StubAuthClient::issuing(NEW_TOKEN));
      let session = sessions.session("sess-1").unwrap();
      let calls = AtomicUsize::new(0);

      let result = refresher
         .call_with_refresh("sess-1", &session, |creds| protected_call(creds, &calls))
         .await;

      assert_eq!(result, Ok("ok"));
      assert_eq!(calls.load(Ordering::SeqCst), 2);
      assert_eq!(auth.refresh_calls.load(Ordering::SeqCst), 1);

      let stored = sessions.session("sess-1").unwrap();
      assert_eq!(stored.credential_version(), 2);
      assert_eq!(stored.credentials()[0].value, NEW_TOKEN);
   }

   #[tokio::test]
   async fn test_再試行でも401ならセッションを破棄して401を返す() {
      // リフレッシュ後も古いトークンしか得られない
      let (auth, sessions, refresher) = setup(StubAuthClient::issuing("still-old"));
      let session = sessions.session("sess-1").unwrap();
      let calls = AtomicUsize::new(0);

      let result = refresher
         .call_with_refresh("sess-1", &session, |creds| protected_call(creds, &calls))
         .await;

      assert_eq!(result, Err(NewsApiError::Unauthorized));
      assert_eq!(calls.load(Ordering::SeqCst), 2);
      assert_eq!(auth.refresh_calls.load(Ordering::SeqCst), 1);
      assert!(sessions.session("sess-1").is_none());
      assert!(sessions.csrf_token("sess-1").is_none());
   }

   #[tokio::test]
   async fn test_リフレッシュが拒否されたらセッションを破棄する() {
      let (_, sessions, refresher) = setup(StubAuthClient::failing(NewsApiError::Unauthorized));
      let session = sessions.session("sess-1").unwrap();
      let calls = AtomicUsize::new(0);

      let result = refresher
         .call_with_refresh("sess-1", &session, |creds| protected_call(creds, &calls))
         .await;

      assert_eq!(result, Err(NewsApiError::Unauthorized));
      assert_eq!(calls.load(Ordering::SeqCst), 1);
      assert!(sessions.session("sess-1").is_none());
   }

   #[tokio::test]
   async fn test_リフレッシュの通信エラーはセッションを残して伝播する() {
      let (_, sessions, refresher) = setup(StubAuthClient::failing(NewsApiError::Network(
         "connection refused".to_string(),
      )));
      let session = sessions.session("sess-1").unwrap();
      let calls = AtomicUsize::new(0);

      let result = refresher
         .call_with_refresh("sess-1", &session, |creds| protected_call(creds, &calls))
         .await;

      assert!(matches!(result, Err(NewsApiError::Network(_))));
      assert!(sessions.session("sess-1").is_some());
   }

   #[tokio::test]
   async fn test_401以外のエラーはリフレッシュせずに返す() {
      let (auth, sessions, refresher) = setup(StubAuthClient::issuing(NEW_TOKEN));
      let session = sessions.session("sess-1").unwrap();

      let result: Result<(), _> = refresher
         .call_with_refresh("sess-1", &session, |_| async {
            Err(NewsApiError::CommentNotFound)
         })
         .await;

      assert_eq!(result, Err(NewsApiError::CommentNotFound));
      assert_eq!(auth.refresh_calls.load(Ordering::SeqCst), 0);
   }

   #[tokio::test]
   async fn test_同時に401を受けてもリフレッシュは1回だけ() {
      let (auth, sessions, refresher) = setup(StubAuthClient::issuing(NEW_TOKEN));
      let session = sessions.session("sess-1").unwrap();
      let calls = AtomicUsize::new(0);

      let (a, b, c) = tokio::join!(
         refresher.call_with_refresh("sess-1", &session, |creds| protected_call(creds, &calls)),
         refresher.call_with_refresh("sess-1", &session, |creds| protected_call(creds, &calls)),
         refresher.call_with_refresh("sess-1", &session, |creds| protected_call(creds, &calls)),
      );

      assert_eq!((a, b, c), (Ok("ok"), Ok("ok"), Ok("ok")));
      assert_eq!(auth.refresh_calls.load(Ordering::SeqCst), 1);
      assert_eq!(sessions.session("sess-1").unwrap().credential_version(), 2);
   }

   #[tokio::test]
   async fn test_使い終わったロックは掃除される() {
      let (_, sessions, refresher) = setup(StubAuthClient::issuing(NEW_TOKEN));
      sessions.insert("sess-2", session_with_token(OLD_TOKEN));

      refresher.refresh("sess-1", 1).await.unwrap();
      refresher.refresh("sess-2", 1).await.unwrap();

      // sess-2 の取得時に、誰も保持していない sess-1 のロックが掃除される
      assert_eq!(refresher.lock_count(), 1);
   }
}
