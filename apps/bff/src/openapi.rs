//! # OpenAPI 仕様定義
//!
//! utoipa を使用して BFF の OpenAPI 仕様を Rust の型から自動生成する。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得できる。

use utoipa::{
    Modify,
    OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

use crate::handler::{auth, comment, health, page};

#[derive(OpenApi)]
#[openapi(
   info(
      title = "Trending Now API",
      version = "0.1.0",
      description = "トレンドニュースサイト Trending Now の BFF API"
   ),
   paths(
      // health
      health::health_check,
      health::readiness_check,
      // auth
      auth::login,
      auth::logout,
      auth::me,
      auth::csrf,
      auth::signup,
      auth::send_verification_email,
      auth::resend_verification_email,
      auth::verification_status,
      auth::check_email,
      // pages
      page::home_page,
      page::top_keywords,
      page::popular_news_page,
      page::popular_videos_page,
      page::keyword_page,
      page::post_page,
      // comments
      comment::list_comments,
      comment::create_comment,
      comment::update_comment,
      comment::delete_comment,
      comment::like_comment,
   ),
   components(schemas(
      trending_shared::ErrorResponse,
   )),
   tags(
      (name = "health", description = "ヘルスチェック"),
      (name = "auth", description = "認証・会員登録"),
      (name = "pages", description = "画面ごとのビューモデル"),
      (name = "comments", description = "コメント"),
   ),
   modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// セキュリティスキーム定義
///
/// Cookie ベースのセッション認証を追加する。
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "session_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session_id"))),
        );
    }
}
