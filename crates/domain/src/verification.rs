//! # メール認証カウントダウン
//!
//! 認証メールの送信から 300 秒間だけ認証コードを受け付ける。
//!
//! カウントダウンは期限ベースで計算する。発行時刻だけを保存し、
//! 残り秒数は `300 - 経過秒数`（0 未満は 0）として都度求めるため、
//! タイマーを動かし続ける必要がない。残り 0 秒になったら再送信で
//! 発行時刻を更新するまで認証コードを受け付けない。
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use trending_domain::verification::VerificationCountdown;
//!
//! let issued = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
//! let countdown = VerificationCountdown::start(issued);
//!
//! assert_eq!(countdown.remaining_secs(issued + Duration::seconds(1)), 299);
//! assert_eq!(countdown.label(issued + Duration::seconds(61)), "3:59");
//! assert!(countdown.is_expired(issued + Duration::seconds(300)));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// 認証コードの有効秒数
pub const VERIFICATION_WINDOW_SECS: u32 = 300;

/// 認証コードの最大長
const VERIFICATION_CODE_MAX_LENGTH: usize = 6;

/// メール認証のカウントダウン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCountdown {
    issued_at: DateTime<Utc>,
}

impl VerificationCountdown {
    /// `now` を発行時刻としてカウントダウンを開始する（再送信時も同じ）
    pub fn start(now: DateTime<Utc>) -> Self {
        Self { issued_at: now }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// 残り秒数（1 秒ごとに 1 減り、0 で止まる）
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u32 {
        let elapsed = (now - self.issued_at).num_seconds().max(0);
        let remaining = i64::from(VERIFICATION_WINDOW_SECS) - elapsed;
        u32::try_from(remaining.max(0)).unwrap_or(0)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining_secs(now) == 0
    }

    /// `m:ss` 形式の残り時間
    pub fn label(&self, now: DateTime<Utc>) -> String {
        format_remaining(self.remaining_secs(now))
    }

    /// 認証コードを送信できる状態か検証する
    pub fn ensure_submittable(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_expired(now) {
            return Err(DomainError::VerificationExpired);
        }
        Ok(())
    }

    pub fn status(&self, now: DateTime<Utc>) -> CountdownStatus {
        let remaining_secs = self.remaining_secs(now);
        CountdownStatus {
            remaining_secs,
            label: format_remaining(remaining_secs),
            expired: remaining_secs == 0,
        }
    }
}

/// ある時点でのカウントダウンの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownStatus {
    pub remaining_secs: u32,
    pub label:          String,
    pub expired:        bool,
}

impl CountdownStatus {
    /// カウントダウンが開始されていない（または TTL で消えた）状態
    pub fn not_started() -> Self {
        Self {
            remaining_secs: 0,
            label:          format_remaining(0),
            expired:        true,
        }
    }
}

/// 秒数を `m:ss` 形式にする
pub fn format_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// カウントダウンの有無も含めて認証コードを送信できるか検証する
///
/// カウントダウンがない場合は期限切れとして扱う。
pub fn ensure_submittable(
    countdown: Option<&VerificationCountdown>,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    match countdown {
        Some(countdown) => countdown.ensure_submittable(now),
        None => Err(DomainError::VerificationExpired),
    }
}

/// 認証コード（値オブジェクト）
///
/// # バリデーション
///
/// - 前後の空白を除去した結果が空でない
/// - 最大 6 文字
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "인증 코드를 입력해주세요.".to_string(),
            ));
        }

        if value.chars().count() > VERIFICATION_CODE_MAX_LENGTH {
            return Err(DomainError::Validation(
                "인증 코드는 6자리입니다.".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
