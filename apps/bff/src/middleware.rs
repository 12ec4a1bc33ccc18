//! # ミドルウェア
//!
//! BFF 用のミドルウェアを提供する。
//!
//! - [`csrf`]: 状態変更リクエストの CSRF トークン検証
//! - [`cache_control`]: `Cache-Control: no-store` の付与
//! - [`request_id`]: ニュース API への Request ID 伝播

pub mod cache_control;
pub mod csrf;
pub mod request_id;

pub use cache_control::no_cache;
pub use csrf::{CsrfState, csrf_middleware};
