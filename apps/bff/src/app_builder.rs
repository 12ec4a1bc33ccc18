//! # BFF アプリケーション構築
//!
//! DI（クライアント・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
};
use trending_bff::{
    client::NewsApiClientImpl,
    handler::{
        AuthState,
        CommentState,
        PageState,
        ReadinessState,
        check_email,
        create_comment,
        csrf,
        delete_comment,
        health_check,
        home_page,
        keyword_page,
        like_comment,
        list_comments,
        login,
        logout,
        me,
        popular_news_page,
        popular_videos_page,
        post_page,
        readiness_check,
        resend_verification_email,
        send_verification_email,
        signup,
        top_keywords,
        update_comment,
        verification_status,
    },
    middleware::{CsrfState, csrf_middleware, no_cache, request_id::store_request_id},
    session_refresh::SessionRefresher,
};
use trending_domain::clock::Clock;
use trending_infra::{SessionManager, VerificationStore};
use trending_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// DI コンテナの構築とルーター定義を行う
///
/// インフラ初期化済みの依存を受け取り、State → Router の順に組み立てる。
pub(crate) fn build_app(
    news_api_client: Arc<NewsApiClientImpl>,
    session_manager: Arc<dyn SessionManager>,
    verification_store: Arc<dyn VerificationStore>,
    clock: Arc<dyn Clock>,
    readiness_state: Arc<ReadinessState>,
) -> Router {
    // クライアントは具象型で保持し、各 State 注入時に必要なトレイトオブジェクトへ coerce する

    // 401 の再試行はプロセス内で 1 つの SessionRefresher に集約する
    let refresher = Arc::new(SessionRefresher::new(
        news_api_client.clone(),
        session_manager.clone(),
        clock.clone(),
    ));

    let csrf_state = CsrfState {
        session_manager: session_manager.clone(),
    };

    let page_state = Arc::new(PageState {
        news_api_client: news_api_client.clone(),
    });

    let auth_state = Arc::new(AuthState {
        auth_client: news_api_client.clone(),
        member_client: news_api_client.clone(),
        session_manager: session_manager.clone(),
        verification_store,
        clock,
    });

    let comment_state = Arc::new(CommentState {
        comment_client: news_api_client,
        session_manager,
        refresher,
    });

    // ルーター構築
    // CSRF ミドルウェアは POST/PUT/PATCH/DELETE リクエストを検証する
    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        // 認証 API
        .merge(
            Router::new()
                .route("/api/v1/auth/login", post(login))
                .route("/api/v1/auth/logout", post(logout))
                .route("/api/v1/auth/me", get(me))
                .route("/api/v1/auth/csrf", get(csrf))
                .route("/api/v1/auth/signup", post(signup))
                .route("/api/v1/auth/verify-email", post(send_verification_email))
                .route(
                    "/api/v1/auth/verify-email/resend",
                    post(resend_verification_email),
                )
                .route("/api/v1/auth/verify-email/status", get(verification_status))
                .route("/api/v1/auth/check-email", post(check_email))
                .with_state(auth_state),
        )
        // 画面 API
        .merge(
            Router::new()
                .route("/api/v1/pages/home", get(home_page))
                .route("/api/v1/keywords/top", get(top_keywords))
                .route("/api/v1/pages/popular-news", get(popular_news_page))
                .route("/api/v1/pages/popular-videos", get(popular_videos_page))
                .route("/api/v1/pages/keywords/{keyword}", get(keyword_page))
                .route("/api/v1/pages/posts/{id}", get(post_page))
                .with_state(page_state),
        )
        // コメント API
        .merge(
            Router::new()
                .route(
                    "/api/v1/posts/{id}/comments",
                    get(list_comments).post(create_comment),
                )
                .route(
                    "/api/v1/comments/{id}",
                    patch(update_comment).delete(delete_comment),
                )
                .route("/api/v1/comments/{id}/like", post(like_comment))
                .with_state(comment_state),
        )
        .layer(from_fn_with_state(csrf_state, csrf_middleware))
        // キャッシュ制御: 動的 API レスポンスがブラウザにキャッシュされないようにする
        .layer(from_fn(no_cache))
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: リクエスト受信時に UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: カスタムスパンに request_id を含め、全ログに自動注入
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        // 4. store_request_id: task-local に保存し、BFF → ニュース API のヘッダー伝播に使用
        .layer(from_fn(store_request_id))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
