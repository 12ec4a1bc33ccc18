//! # ニュース API レスポンスエンベロープ
//!
//! ニュース API は全レスポンスを `{ "code", "message", "data" }` で包んで返す。
//! HTTP ステータスが 2xx でも `code` が成功値でなければ業務エラーとして扱う。
//!
//! 成功値はバックエンドのリビジョンによって `"200"` と `"SUCCESS"` が混在しているため、
//! [`SuccessCodes`] で許容する値の集合を設定可能にしている。

use serde::{Deserialize, Serialize};

/// ニュース API のレスポンスエンベロープ
///
/// 業務エラーでは `data` が `null` または欠落するため、`data` は常に `Option` で受ける。
/// `code` を確認する前に `T` の形を要求しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub code:    String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data:    Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// 成功コードの場合は `data` を、そうでなければ `(code, message)` を返す
    ///
    /// 成功コードでも `data` がなければ `Ok(None)`。
    pub fn into_result(self, codes: &SuccessCodes) -> Result<Option<T>, (String, String)> {
        if codes.is_success(&self.code) {
            Ok(self.data)
        } else {
            Err((self.code, self.message))
        }
    }
}

/// エラーレスポンス用のエンベロープ
///
/// 非 2xx レスポンスのボディから `message` だけを取り出すために使う。
/// `data` の形は問わない。
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub code:    Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 成功とみなす `code` 値の集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessCodes(Vec<String>);

impl SuccessCodes {
    /// カンマ区切り文字列からパースする
    ///
    /// 空要素は無視する。結果が空になる場合はデフォルト値を使う。
    pub fn parse(s: &str) -> Self {
        let codes: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToString::to_string)
            .collect();

        if codes.is_empty() {
            Self::default()
        } else {
            Self(codes)
        }
    }

    pub fn is_success(&self, code: &str) -> bool {
        self.0.iter().any(|c| c == code)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for SuccessCodes {
    fn default() -> Self {
        Self(vec!["200".to_string(), "SUCCESS".to_string()])
    }
}
