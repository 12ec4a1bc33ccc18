//! # オフセットページネーション
//!
//! ニュース API のページ付きリスト `{ list, meta }` を表す型。
//! ページ番号はニュース API 側の 0 始まりの値をそのまま保持する。

use serde::{Deserialize, Serialize};

/// ページメタ情報
///
/// ニュース API がフィールドを省略しても読めるよう、全フィールドにデフォルトを持つ。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PageMeta {
   pub page:           u32,
   pub size:           u32,
   pub total_elements: u64,
   pub total_pages:    u32,
   pub has_next:       bool,
   pub has_previous:   bool,
}

/// ページ付きリスト
///
/// ```json
/// {
///   "list": [...],
///   "meta": { "page": 0, "size": 10, "totalElements": 42, "totalPages": 5,
///             "hasNext": true, "hasPrevious": false }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OffsetPage<T> {
   #[serde(default = "Vec::new")]
   pub list: Vec<T>,
   #[serde(default)]
   pub meta: PageMeta,
}

impl<T> OffsetPage<T> {
   pub fn empty() -> Self {
      Self {
         list: Vec::new(),
         meta: PageMeta::default(),
      }
   }

   /// 総ページ数（メタ情報が欠落または 0 の場合は 1）
   pub fn total_pages_or_one(&self) -> u32 {
      self.meta.total_pages.max(1)
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_camel_caseのメタ情報をデシリアライズする() {
      let json = r#"{
         "list": ["a", "b"],
         "meta": {"page": 0, "size": 10, "totalElements": 42, "totalPages": 5,
                  "hasNext": true, "hasPrevious": false}
      }"#;

      let page: OffsetPage<String> = serde_json::from_str(json).unwrap();

      assert_eq!(page.list, vec!["a".to_string(), "b".to_string()]);
      assert_eq!(
         page.meta,
         PageMeta {
            page:           0,
            size:           10,
            total_elements: 42,
            total_pages:    5,
            has_next:       true,
            has_previous:   false,
         }
      );
   }

   #[test]
   fn test_metaが欠落していてもデフォルトで読める() {
      let page: OffsetPage<u32> = serde_json::from_str(r#"{"list": [1]}"#).unwrap();

      assert_eq!(page.meta, PageMeta::default());
      assert_eq!(page.total_pages_or_one(), 1);
   }

   #[test]
   fn test_total_pages_or_oneはメタ情報の総ページ数を返す() {
      let mut page: OffsetPage<u32> = OffsetPage::empty();
      page.meta.total_pages = 9;

      assert_eq!(page.total_pages_or_one(), 9);
   }
}
