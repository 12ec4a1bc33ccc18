//! # セッション Cookie
//!
//! ブラウザとの間でやり取りする `session_id` Cookie の組み立てを行う。
//! ニュース API の認証 Cookie はブラウザには渡さず、セッションに保存する。

use axum_extra::extract::cookie::{Cookie, SameSite};
use trending_infra::session::SESSION_TTL_SECONDS;

/// Cookie 名
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// セッション Cookie を構築する
pub fn build_session_cookie(session_id: &str) -> Cookie<'static> {
   // ENV=production の場合に HTTPS 必須となる
   let is_production = std::env::var("ENV").unwrap_or_default() == "production";

   let max_age = i64::try_from(SESSION_TTL_SECONDS).unwrap_or(i64::MAX);
   let mut builder = Cookie::build((SESSION_COOKIE_NAME, session_id.to_string()))
      .path("/")
      .max_age(time::Duration::seconds(max_age))
      .http_only(true)
      .same_site(SameSite::Lax);

   if is_production {
      builder = builder.secure(true);
   }

   builder.build()
}

/// Cookie をクリアするための Cookie を構築する
pub fn build_clear_cookie() -> Cookie<'static> {
   Cookie::build((SESSION_COOKIE_NAME, ""))
      .path("/")
      .max_age(time::Duration::seconds(0))
      .http_only(true)
      .same_site(SameSite::Lax)
      .build()
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_セッションcookieはhttp_onlyで8時間有効() {
      let cookie = build_session_cookie("sess-1");

      assert_eq!(cookie.name(), "session_id");
      assert_eq!(cookie.value(), "sess-1");
      assert_eq!(cookie.http_only(), Some(true));
      assert_eq!(cookie.same_site(), Some(SameSite::Lax));
      assert_eq!(cookie.max_age(), Some(time::Duration::seconds(28800)));
   }

   #[test]
   fn test_クリア用cookieはmax_age0() {
      let cookie = build_clear_cookie();

      assert_eq!(cookie.value(), "");
      assert_eq!(cookie.max_age(), Some(time::Duration::seconds(0)));
   }
}
