//! # ヘルスチェックハンドラ
//!
//! BFF の稼働状態を確認するためのエンドポイント。
//!
//! - `/health` — Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready` — Readiness Check（Redis / ニュース API の接続状態を確認）
//!
//! レスポンス型は [`trending_shared::HealthResponse`] / [`trending_shared::ReadinessResponse`] を参照。

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use redis::aio::ConnectionManager;
use trending_shared::{CheckStatus, HealthResponse, ReadinessResponse};

/// 依存先チェックのタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// BFF のヘルスチェックエンドポイント
#[utoipa::path(
   get,
   path = "/health",
   tag = "health",
   responses(
      (status = 200, description = "サーバー稼働中", body = HealthResponse)
   )
)]
pub async fn health_check() -> Json<HealthResponse> {
   Json(HealthResponse {
      status:  "healthy".to_string(),
      version: env!("CARGO_PKG_VERSION").to_string(),
   })
}

/// Readiness Check 用の State
pub struct ReadinessState {
   pub redis_conn:   ConnectionManager,
   pub news_api_url: String,
   pub http_client:  reqwest::Client,
}

/// BFF の Readiness Check エンドポイント
///
/// Redis とニュース API の接続状態を並行チェックする。
/// 全チェック OK → 200、1 つでも失敗 → 503。
#[utoipa::path(
   get,
   path = "/health/ready",
   tag = "health",
   responses(
      (status = 200, description = "全依存サービス稼働中", body = ReadinessResponse),
      (status = 503, description = "一部の依存サービスが利用不可", body = ReadinessResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
   let (redis_result, news_api_result) = tokio::join!(
      check_redis(&state.redis_conn),
      check_news_api(&state.http_client, &state.news_api_url),
   );

   let mut checks = HashMap::new();
   checks.insert("redis".to_string(), redis_result);
   checks.insert("news_api".to_string(), news_api_result);

   let response = ReadinessResponse::from_checks(checks);
   let http_status = if response.is_ready() {
      StatusCode::OK
   } else {
      StatusCode::SERVICE_UNAVAILABLE
   };

   (http_status, Json(response))
}

/// Redis への接続を PING で確認する（タイムアウト: 5 秒）
async fn check_redis(conn: &ConnectionManager) -> CheckStatus {
   match tokio::time::timeout(CHECK_TIMEOUT, trending_infra::redis::ping(conn)).await {
      Ok(Ok(_)) => CheckStatus::Ok,
      Ok(Err(e)) => {
         tracing::warn!(error = %e, "readiness check: redis ping failed");
         CheckStatus::Error
      }
      Err(_) => {
         tracing::warn!("readiness check: redis check timed out");
         CheckStatus::Error
      }
   }
}

/// ニュース API に到達できるか確認する（タイムアウト: 5 秒）
///
/// ニュース API はヘルスチェック用のパスを持たないため、
/// ステータスコードに関係なく HTTP レスポンスが返れば到達できたとみなす。
async fn check_news_api(client: &reqwest::Client, base_url: &str) -> CheckStatus {
   let url = format!("{}/", base_url.trim_end_matches('/'));
   match tokio::time::timeout(CHECK_TIMEOUT, client.get(&url).send()).await {
      Ok(Ok(_)) => CheckStatus::Ok,
      Ok(Err(e)) => {
         tracing::warn!(error = %e, "readiness check: news api request failed");
         CheckStatus::Error
      }
      Err(_) => {
         tracing::warn!("readiness check: news api check timed out");
         CheckStatus::Error
      }
   }
}
