//! # Clock（時刻プロバイダ）
//!
//! `Utc::now()` の直接呼び出しを置き換え、テストで時刻を注入・進行可能にするための抽象化。
//! メール認証のカウントダウンは発行時刻と現在時刻の差から残り秒数を求めるため、
//! テストでは [`ManualClock`] で時刻を進めて検証する。

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 固定時刻を返すテスト用実装
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
   now: DateTime<Utc>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self { now }
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      self.now
   }
}

/// 手動で進められるテスト用実装
///
/// 共有参照のまま [`advance`](ManualClock::advance) できるため、
/// `Arc<dyn Clock>` として BFF の State に渡した後も時刻を操作できる。
#[derive(Debug)]
pub struct ManualClock {
   now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
   pub fn new(start: DateTime<Utc>) -> Self {
      Self {
         now: Mutex::new(start),
      }
   }

   /// 時刻を `duration` だけ進める
   pub fn advance(&self, duration: Duration) {
      let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
      *now += duration;
   }

   /// 時刻を `seconds` 秒だけ進める
   pub fn advance_secs(&self, seconds: i64) {
      self.advance(Duration::seconds(seconds));
   }
}

impl Clock for ManualClock {
   fn now(&self) -> DateTime<Utc> {
      *self.now.lock().unwrap_or_else(PoisonError::into_inner)
   }
}
