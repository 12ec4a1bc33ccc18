//! # Trending Now BFF ライブラリ
//!
//! フロントエンド専用の API サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `client`: ニュース API クライアント
//! - `cookie`: `session_id` Cookie の組み立て
//! - `error`: エラーレスポンスとセッション取得の共通処理
//! - `handler`: HTTP ハンドラ
//! - `middleware`: ミドルウェア（CSRF 検証等）
//! - `openapi`: OpenAPI 仕様の定義
//! - `session_refresh`: 認証 Cookie のリフレッシュ（セッション単位で 1 回に束ねる）

pub mod client;
pub mod cookie;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod openapi;
pub mod session_refresh;
