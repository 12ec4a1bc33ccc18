//! # Request ID 伝播ミドルウェア
//!
//! ブラウザから受けたリクエストの Request ID をニュース API 呼び出しに引き継ぐ。
//!
//! ## 仕組み
//!
//! 1. [`store_request_id`] ミドルウェアが `SetRequestIdLayer` の設定した
//!    [`RequestId`](tower_http::request_id::RequestId) を task-local に保存する
//! 2. [`inject_request_id`] が task-local から Request ID を取得し、
//!    reqwest の `RequestBuilder` に `X-Request-Id` ヘッダーとして付与する
//!
//! ニュース API クライアントの全メソッドが対象になるため、引数で渡さず
//! task-local で暗黙的に伝播する。
//!
//! 1 つのページで複数の API を `tokio::try_join!` で並行に呼ぶ場合も、
//! 同一タスク内で poll されるため同じ Request ID が付与される。

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tower_http::request_id::RequestId;
use trending_shared::observability::REQUEST_ID_HEADER;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// 現在のリクエストの Request ID を取得する
///
/// task-local スコープ外（テスト等）では `None` を返す。
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// Request ID を task-local に保存するミドルウェア
pub async fn store_request_id(request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-")
        .to_string();

    REQUEST_ID.scope(request_id, next.run(request)).await
}

/// reqwest リクエストビルダーに `X-Request-Id` ヘッダーを付与する
///
/// task-local スコープ外の場合はビルダーをそのまま返す。
pub fn inject_request_id(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match current_request_id() {
        Some(id) => builder.header(REQUEST_ID_HEADER, id),
        None => builder,
    }
}
