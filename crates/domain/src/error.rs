//! # ドメイン層エラー定義
//!
//! 入力値の検証失敗やメール認証の期限切れなど、BFF が自前で判定する
//! ルール違反を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `VerificationExpired` | 400 Bad Request | 認証コードの入力期限切れ |
//!
//! ## 使用例
//!
//! ```rust
//! use trending_domain::DomainError;
//!
//! fn validate_keyword(keyword: &str) -> Result<(), DomainError> {
//!     if keyword.trim().is_empty() {
//!         return Err(DomainError::Validation("키워드를 입력해주세요.".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_keyword(" ").is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// `Display` の文言はそのままブラウザに表示されるため、利用者向けの文言にする。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値がルールに違反している場合に使用する。
    ///
    /// # 例
    ///
    /// - 必須フィールドが未入力
    /// - 文字数制限の超過
    /// - 存在しない日付
    #[error("{0}")]
    Validation(String),

    /// 認証コードの入力期限切れ
    ///
    /// カウントダウンが 0 に達した、または開始されていない状態で
    /// 認証コードが送信された場合に使用する。再送信で解消する。
    #[error("인증 시간이 만료되었습니다. 다시 시도해주세요.")]
    VerificationExpired,
}
