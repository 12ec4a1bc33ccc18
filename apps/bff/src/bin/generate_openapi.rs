//! # OpenAPI YAML 生成ツール
//!
//! BFF の Rust 型から OpenAPI 仕様を YAML 形式で標準出力に出力する。
//! 生成後、utoipa が自動登録する未使用コンポーネントスキーマを除去する。
//!
//! ## 使い方
//!
//! ```bash
//! cargo run --bin generate-openapi -p trending-bff > openapi/openapi.yaml
//! ```

use std::collections::HashSet;

use anyhow::Context;
use trending_bff::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
   let mut openapi = ApiDoc::openapi();
   remove_unused_schemas(&mut openapi)?;
   let yaml = openapi.to_yaml().context("OpenAPI YAML 生成に失敗しました")?;
   print!("{yaml}");
   Ok(())
}

/// utoipa が自動登録する未使用コンポーネントスキーマを除去する
///
/// `body = ApiResponse<T>` のジェネリック型パラメータ `T` は inline 展開されるため、
/// standalone スキーマはどこからも `$ref` されない。
fn remove_unused_schemas(openapi: &mut utoipa::openapi::OpenApi) -> anyhow::Result<()> {
   let json = serde_json::to_string(openapi).context("JSON シリアライズに失敗しました")?;

   // JSON 形式: "$ref":"#/components/schemas/SchemaName"
   let prefix = "#/components/schemas/";
   let used_schemas: HashSet<&str> = json
      .match_indices(prefix)
      .filter_map(|(start, _)| {
         let rest = &json[start + prefix.len()..];
         rest.find('"').map(|end| &rest[..end])
      })
      .collect();

   if let Some(components) = &mut openapi.components {
      components
         .schemas
         .retain(|name, _| used_schemas.contains(name.as_str()));
   }
   Ok(())
}
