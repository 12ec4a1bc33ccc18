//! # キャッシュ制御ミドルウェア
//!
//! ページのビューモデルはセッションや時刻によって変わるため、
//! ブラウザや中間プロキシにキャッシュさせない。

use axum::{
    extract::Request,
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// レスポンスに `Cache-Control: no-store` を付与する
pub async fn no_cache(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::StatusCode, middleware::from_fn, routing::get};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_レスポンスにno_storeが付与される() {
        let app = Router::new()
            .route("/api/v1/pages/home", get(|| async { StatusCode::OK }))
            .layer(from_fn(no_cache));

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/v1/pages/home")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
    }
}
