//! ニュース API レスポンスの共通ハンドリング

use serde::de::DeserializeOwned;
use trending_shared::{
   ApiEnvelope,
   SuccessCodes,
   envelope::ErrorEnvelope,
};

use super::error::NewsApiError;

/// エンベロープ付きレスポンスの共通ハンドリング
///
/// 2xx ではまず `code` を確認し、成功値でなければ `data` の形に関係なく業務エラーを返す。
/// 成功値なのに `data` がない場合は `Unexpected`。
/// 非 2xx はステータスコードに応じた `NewsApiError` を返す。
///
/// # 引数
///
/// - `response`: ニュース API からの HTTP レスポンス
/// - `not_found_error`: 404 レスポンス時に返すエラー。`None` の場合は
///   `Unexpected` にフォールスルー
/// - `success_codes`: 成功とみなす `code` 値
pub(super) async fn handle_envelope<T: DeserializeOwned>(
   response: reqwest::Response,
   not_found_error: Option<NewsApiError>,
   success_codes: &SuccessCodes,
) -> Result<T, NewsApiError> {
   let status = response.status();

   if status.is_success() {
      let envelope = response.json::<ApiEnvelope<T>>().await?;
      return match envelope.into_result(success_codes) {
         Ok(Some(data)) => Ok(data),
         Ok(None) => Err(NewsApiError::Unexpected(
            "成功コードのレスポンスに data がありません".to_string(),
         )),
         Err((code, message)) => Err(NewsApiError::Business { code, message }),
      };
   }

   Err(error_from_status(response, not_found_error).await)
}

/// `data` を持たないレスポンスの共通ハンドリング
///
/// 2xx で空ボディ（204 など）の場合はそのまま成功とする。
/// ボディがあればエンベロープとして `code` を検証する。
pub(super) async fn handle_empty(
   response: reqwest::Response,
   not_found_error: Option<NewsApiError>,
   success_codes: &SuccessCodes,
) -> Result<(), NewsApiError> {
   let status = response.status();

   if status.is_success() {
      let body = response.text().await?;
      if body.trim().is_empty() {
         return Ok(());
      }
      let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(&body)
         .map_err(|e| NewsApiError::Network(format!("レスポンスのデコードに失敗: {e}")))?;
      return envelope
         .into_result(success_codes)
         .map(|_| ())
         .map_err(|(code, message)| NewsApiError::Business { code, message });
   }

   Err(error_from_status(response, not_found_error).await)
}

/// 非 2xx レスポンスをエラーに変換する
async fn error_from_status(
   response: reqwest::Response,
   not_found_error: Option<NewsApiError>,
) -> NewsApiError {
   let status = response.status();

   if status == reqwest::StatusCode::NOT_FOUND
      && let Some(err) = not_found_error
   {
      return err;
   }

   let body = response.text().await.unwrap_or_default();

   match status {
      reqwest::StatusCode::UNAUTHORIZED => NewsApiError::Unauthorized,
      reqwest::StatusCode::BAD_REQUEST => NewsApiError::Validation(error_message(&body)),
      reqwest::StatusCode::FORBIDDEN => NewsApiError::Forbidden(error_message(&body)),
      reqwest::StatusCode::CONFLICT => NewsApiError::Conflict(error_message(&body)),
      _ => NewsApiError::Unexpected(format!("予期しないステータス {}: {}", status, body)),
   }
}

/// エラーボディから表示用メッセージを取り出す
///
/// エンベロープの `message` があればそれを、なければボディ全体を返す。
fn error_message(body: &str) -> String {
   serde_json::from_str::<ErrorEnvelope>(body)
      .ok()
      .and_then(|envelope| envelope.message)
      .filter(|message| !message.trim().is_empty())
      .unwrap_or_else(|| body.to_string())
}
