//! # 会員
//!
//! ログイン中の会員を表す。ニュース API の `GET /api/v1/members/me` の `data` と同じ形。
//!
//! BFF はログイン時に一度だけこの値を取得してセッションに保存し、
//! 以降は画面ごとに問い合わせずセッションの値を使う。

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 会員 ID
///
/// ニュース API は文字列で返すため、形式は解釈せずにそのまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct MemberId(String);

impl MemberId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ログイン中の会員
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id:          MemberId,
    pub nickname:    String,
    pub email:       String,
    pub role:        String,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub delete_at:   Option<DateTime<Utc>>,
}

impl Member {
    /// 退会済みか
    pub fn is_withdrawn(&self) -> bool {
        self.delete_at.is_some()
    }
}
