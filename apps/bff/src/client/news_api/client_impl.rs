//! NewsApiClient スーパートレイトとクライアント実装の構造体

use std::time::Duration;

use reqwest::{Method, RequestBuilder, header};
use trending_infra::CredentialCookie;
use trending_shared::SuccessCodes;

use super::{
   auth_client::NewsApiAuthClient,
   comment_client::NewsApiCommentClient,
   keyword_client::NewsApiKeywordClient,
   member_client::NewsApiMemberClient,
   news_client::NewsApiNewsClient,
   post_client::NewsApiPostClient,
   video_client::NewsApiVideoClient,
};
use crate::middleware::request_id::inject_request_id;

/// 接続タイムアウト
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// ニュース API クライアントトレイト（スーパートレイト）
///
/// リソースごとのサブトレイトを束ねる。
/// テスト時にはサブトレイト単位でスタブを使用できる。
pub trait NewsApiClient:
   NewsApiNewsClient
   + NewsApiVideoClient
   + NewsApiPostClient
   + NewsApiKeywordClient
   + NewsApiCommentClient
   + NewsApiMemberClient
   + NewsApiAuthClient
{
}

/// ブランケット impl: 全サブトレイトを実装する型は
/// 自動的に `NewsApiClient` を実装する。
impl<T> NewsApiClient for T where
   T: NewsApiNewsClient
      + NewsApiVideoClient
      + NewsApiPostClient
      + NewsApiKeywordClient
      + NewsApiCommentClient
      + NewsApiMemberClient
      + NewsApiAuthClient
{
}

/// ニュース API クライアント実装
#[derive(Clone)]
pub struct NewsApiClientImpl {
   pub(super) base_url:      String,
   pub(super) client:        reqwest::Client,
   pub(super) success_codes: SuccessCodes,
}

impl NewsApiClientImpl {
   /// 新しい NewsApiClient を作成する
   ///
   /// # 引数
   ///
   /// - `base_url`: ニュース API のベース URL（例: `https://api.trending-now.example.com`）
   /// - `success_codes`: エンベロープの `code` として成功とみなす値
   pub fn new(base_url: &str, success_codes: SuccessCodes) -> Self {
      let client = reqwest::Client::builder()
         .connect_timeout(CONNECT_TIMEOUT)
         .build()
         .unwrap_or_else(|e| {
            tracing::warn!("HTTP クライアントの構築に失敗したため既定値を使用します: {}", e);
            reqwest::Client::new()
         });

      Self {
         base_url: base_url.trim_end_matches('/').to_string(),
         client,
         success_codes,
      }
   }

   /// リクエストビルダーを作成する（Request ID を付与）
   pub(super) fn request(&self, method: Method, path: &str) -> RequestBuilder {
      let url = format!("{}{}", self.base_url, path);
      inject_request_id(self.client.request(method, url))
   }

   /// 認証情報付きのリクエストビルダーを作成する
   ///
   /// セッションに保存されたニュース API の Cookie を `Cookie` ヘッダーで送る。
   pub(super) fn authed_request(
      &self,
      method: Method,
      path: &str,
      credentials: &[CredentialCookie],
   ) -> RequestBuilder {
      let builder = self.request(method, path);
      match cookie_header(credentials) {
         Some(value) => builder.header(header::COOKIE, value),
         None => builder,
      }
   }
}

/// 認証情報を `Cookie` ヘッダー値に変換する
pub(super) fn cookie_header(credentials: &[CredentialCookie]) -> Option<String> {
   if credentials.is_empty() {
      return None;
   }

   Some(
      credentials
         .iter()
         .map(|c| format!("{}={}", c.name, c.value))
         .collect::<Vec<_>>()
         .join("; "),
   )
}

/// レスポンスの `Set-Cookie` から認証情報を取り出す
///
/// 値が空の Cookie（削除指示）は含めない。
pub(super) fn capture_credentials(response: &reqwest::Response) -> Vec<CredentialCookie> {
   response
      .cookies()
      .filter(|c| !c.value().is_empty())
      .map(|c| CredentialCookie::new(c.name(), c.value()))
      .collect()
}
