//! # コメント
//!
//! 投稿詳細画面のコメント入力と並び順のルールを定義する。
//!
//! コメント本文が空白だけの場合はニュース API を呼ばずに弾く。

use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

define_validated_string! {
    /// コメント本文（値オブジェクト）
    ///
    /// # バリデーション
    ///
    /// - 前後の空白を除去した結果が空でない
    /// - 最大 1000 文字
    pub struct CommentBody {
        label: "댓글 내용",
        max_length: 1000,
    }
}

/// コメントの並び順
///
/// ブラウザからは `latest` / `popular` で受け取り、
/// ニュース API には `createdAt,DESC` / `likeCount,DESC` で渡す。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CommentSort {
    /// 新しい順
    #[default]
    Latest,
    /// いいねが多い順
    Popular,
}

impl CommentSort {
    /// ニュース API の `sort` パラメータ値
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Latest => "createdAt,DESC",
            Self::Popular => "likeCount,DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t ")]
    fn test_空白だけの本文は拒否する(#[case] input: &str) {
        assert!(CommentBody::new(input).is_err());
    }

    #[test]
    fn test_本文は前後の空白を除去して保持する() {
        let body = CommentBody::new("  좋은 기사네요  ").unwrap();

        assert_eq!(body.as_str(), "좋은 기사네요");
    }

    #[test]
    fn test_最大長を超える本文は拒否する() {
        let long = "가".repeat(1001);

        assert!(CommentBody::new(long).is_err());
        assert!(CommentBody::new("가".repeat(1000)).is_ok());
    }

    #[rstest]
    #[case(CommentSort::Latest, "createdAt,DESC")]
    #[case(CommentSort::Popular, "likeCount,DESC")]
    fn test_並び順のクエリ値(#[case] sort: CommentSort, #[case] expected: &str) {
        assert_eq!(sort.as_query(), expected);
    }

    #[test]
    fn test_並び順の文字列表現() {
        assert_eq!(CommentSort::from_str("popular").unwrap(), CommentSort::Popular);
        assert!(CommentSort::from_str("oldest").is_err());
        assert_eq!(CommentSort::default(), CommentSort::Latest);
    }
}
