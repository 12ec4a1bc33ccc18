//! # BFF 設定
//!
//! 環境変数から BFF サーバーの設定を読み込む。

use std::env;

use thiserror::Error;
use trending_shared::SuccessCodes;

/// BFF サーバーの設定
#[derive(Debug, Clone)]
pub struct BffConfig {
   /// バインドアドレス
   pub host: String,
   /// ポート番号
   pub port: u16,
   /// Redis 接続 URL
   pub redis_url: String,
   /// ニュース API のベース URL
   pub news_api_url: String,
   /// エンベロープの `code` として成功とみなす値
   pub success_codes: SuccessCodes,
}

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   #[error("{0} が設定されていません（.env を確認してください）")]
   Missing(&'static str),

   #[error("{name} の値が不正です: {value}")]
   Invalid { name: &'static str, value: String },
}

impl BffConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|key| env::var(key).ok())
   }

   /// 任意の参照関数から設定を読み込む
   ///
   /// テストでプロセスの環境変数を書き換えずに済むよう分離している。
   fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let required = |name: &'static str| {
         lookup(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(name))
      };

      let port_raw = required("BFF_PORT")?;
      let port = port_raw.parse().map_err(|_| ConfigError::Invalid {
         name:  "BFF_PORT",
         value: port_raw.clone(),
      })?;

      let news_api_url = required("NEWS_API_URL")?;
      validate_http_url("NEWS_API_URL", &news_api_url)?;

      let success_codes = lookup("NEWS_API_SUCCESS_CODES")
         .map(|v| SuccessCodes::parse(&v))
         .unwrap_or_default();

      Ok(Self {
         host: lookup("BFF_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
         port,
         redis_url: required("REDIS_URL")?,
         news_api_url: news_api_url.trim_end_matches('/').to_string(),
         success_codes,
      })
   }
}

/// http / https の絶対 URL であることを確認する
fn validate_http_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
   let invalid = || ConfigError::Invalid {
      name,
      value: value.to_string(),
   };
   let url = url::Url::parse(value).map_err(|_| invalid())?;
   match url.scheme() {
      "http" | "https" if url.has_host() => Ok(()),
      _ => Err(invalid()),
   }
}
