//! # インフラ層エラー定義
//!
//! BFF が Redis に持つ状態（セッション、CSRF トークン、メール認証カウントダウン）の
//! 読み書きで発生するエラーを表現する。
//!
//! [`InfraError`] は失敗した [`Store`] と操作名、生成時点の [`SpanTrace`] を保持する。
//! キーにはセッション ID やメールアドレスが含まれるため、エラーメッセージには載せない。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// 状態の保存先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Store {
    #[display("セッション")]
    Session,
    #[display("CSRF トークン")]
    CsrfToken,
    #[display("メール認証カウントダウン")]
    Verification,
}

/// インフラ層で発生するエラー
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する。
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// 接続の確立や `PING` の失敗
    #[error("Redis に接続できません: {0}")]
    Connection(#[source] redis::RedisError),

    /// ストアに対するコマンドの失敗
    #[error("{store}の {op} に失敗: {source}")]
    Command {
        store:  Store,
        op:     &'static str,
        #[source]
        source: redis::RedisError,
    },

    /// 保存値の JSON 変換失敗（書き込み時のシリアライズも含む）
    #[error("{store}の保存値を変換できません: {source}")]
    Corrupted {
        store:  Store,
        #[source]
        source: serde_json::Error,
    },
}

impl InfraError {
    fn new(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 失敗したストアを返す（接続エラーは特定のストアに属さない）
    pub fn store(&self) -> Option<Store> {
        match &self.kind {
            InfraErrorKind::Connection(_) => None,
            InfraErrorKind::Command { store, .. } | InfraErrorKind::Corrupted { store, .. } => {
                Some(*store)
            }
        }
    }

    /// `map_err` に渡すコマンド失敗の変換
    ///
    /// ```ignore
    /// conn.get(&key).await.map_err(InfraError::command(Store::Session, "GET"))?;
    /// ```
    pub fn command(store: Store, op: &'static str) -> impl FnOnce(redis::RedisError) -> Self {
        move |source| Self::new(InfraErrorKind::Command { store, op, source })
    }

    /// `map_err` に渡す JSON 変換失敗の変換
    pub fn corrupted(store: Store) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::new(InfraErrorKind::Corrupted { store, source })
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

/// ストアを特定できない Redis エラーは接続エラーとして扱う
impl From<redis::RedisError> for InfraError {
    fn from(source: redis::RedisError) -> Self {
        Self::new(InfraErrorKind::Connection(source))
    }
}
