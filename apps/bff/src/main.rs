//! # Trending Now BFF (Backend for Frontend) サーバー
//!
//! Trending Now フロントエンド専用の API サーバー。
//!
//! ## 役割
//!
//! BFF はブラウザとリモートのニュース API の間に位置し、
//! 以下の責務を担う:
//!
//! - **認証・セッション管理**: ニュース API の認証 Cookie をサーバー側セッションに保持
//! - **CSRF 防御**: 状態変更リクエストの保護
//! - **アグリゲーション**: 画面ごとに複数のニュース API 呼び出しを 1 つにまとめる
//! - **メール認証カウントダウン**: 認証コードの有効期限をサーバー時刻で管理
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Browser    │────▶│     BFF      │────▶│   News API   │
//! │              │     │  port: 13000 │     │   (remote)   │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │    Redis     │
//!                      │  (Session)   │
//!                      └──────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `BFF_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `BFF_PORT` | **Yes** | ポート番号 |
//! | `REDIS_URL` | **Yes** | Redis 接続 URL |
//! | `NEWS_API_URL` | **Yes** | ニュース API のベース URL |
//! | `NEWS_API_SUCCESS_CODES` | No | 成功とみなす `code`（カンマ区切り、デフォルト: `200,SUCCESS`） |
//! | `LOG_FORMAT` | No | `json` で JSON ログ出力 |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p trending-bff
//!
//! # 本番環境（環境変数を直接指定）
//! BFF_PORT=3000 REDIS_URL=redis://... NEWS_API_URL=https://... cargo run -p trending-bff --release
//! ```

mod app_builder;
mod config;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use config::BffConfig;
use tokio::net::TcpListener;
use trending_bff::{client::NewsApiClientImpl, handler::ReadinessState};
use trending_domain::clock::SystemClock;
use trending_infra::{RedisSessionManager, RedisVerificationStore};
use trending_shared::observability::TracingConfig;

/// BFF サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. Redis 接続とルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("bff");
    trending_shared::observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "bff").entered();

    let config = BffConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!("BFF サーバーを起動します: {}:{}", config.host, config.port);

    // セッション・CSRF トークン・カウントダウンは同じ接続を共有する
    let redis_conn = trending_infra::redis::create_connection_manager(&config.redis_url)
        .await
        .context("Redis への接続に失敗しました")?;
    let session_manager = Arc::new(RedisSessionManager::from_connection(redis_conn.clone()));
    let verification_store = Arc::new(RedisVerificationStore::new(redis_conn.clone()));

    let news_api_client = Arc::new(NewsApiClientImpl::new(
        &config.news_api_url,
        config.success_codes.clone(),
    ));

    let readiness_state = Arc::new(ReadinessState {
        redis_conn,
        news_api_url: config.news_api_url.clone(),
        http_client: reqwest::Client::new(),
    });

    let app = app_builder::build_app(
        news_api_client,
        session_manager,
        verification_store,
        Arc::new(SystemClock),
        readiness_state,
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("BFF サーバーが起動しました: {}", addr);

    // Graceful shutdown は axum::serve が自動的に処理する
    axum::serve(listener, app).await?;

    Ok(())
}
