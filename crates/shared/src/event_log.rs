//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! `jq` で調査しやすいよう、ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` に `error.category` + `error.kind` フィールドを直接追加する。
//! 定数は [`error`] モジュールで提供。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用。JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.entity_id`: エンティティ ID
/// - `event.actor_id`: 操作者（会員）ID
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const AUTH: &str = "auth";
        pub const SIGNUP: &str = "signup";
        pub const COMMENT: &str = "comment";
    }

    /// イベントアクション
    pub mod action {
        // 認証
        pub const LOGIN_SUCCESS: &str = "auth.login_success";
        pub const LOGIN_FAILURE: &str = "auth.login_failure";
        pub const LOGOUT: &str = "auth.logout";
        pub const SESSION_REFRESHED: &str = "auth.session_refreshed";
        pub const SESSION_EXPIRED: &str = "auth.session_expired";

        // 会員登録・メール認証
        pub const SIGNUP_COMPLETED: &str = "signup.completed";
        pub const VERIFICATION_SENT: &str = "signup.verification_sent";
        pub const VERIFICATION_CHECKED: &str = "signup.verification_checked";

        // コメント
        pub const COMMENT_CREATED: &str = "comment.created";
        pub const COMMENT_UPDATED: &str = "comment.updated";
        pub const COMMENT_DELETED: &str = "comment.deleted";
        pub const COMMENT_LIKED: &str = "comment.liked";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const MEMBER: &str = "member";
        pub const SESSION: &str = "session";
        pub const COMMENT: &str = "comment";
        pub const EMAIL_VERIFICATION: &str = "email_verification";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// インフラストラクチャ（Redis セッションストア、認証カウントダウン）
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// 外部サービス呼び出し（ニュース API）
        pub const EXTERNAL_SERVICE: &str = "external_service";
    }

    /// エラー種別
    pub mod kind {
        pub const SESSION: &str = "session";
        pub const CSRF_TOKEN: &str = "csrf_token";
        pub const VERIFICATION: &str = "verification";
        pub const INTERNAL: &str = "internal";
        pub const SERVICE_COMMUNICATION: &str = "service_communication";
        pub const BUSINESS_CODE: &str = "business_code";
    }
}
