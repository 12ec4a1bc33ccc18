//! # Trending Now ドメイン層
//!
//! BFF が自前で判定するルールを定義する。
//!
//! ランキング・検索・永続化・認証といった業務ロジックはすべてニュース API 側にあり、
//! このクレートが持つのは画面の状態に関わる小さなルールだけ。
//!
//! ## 依存関係の方向
//!
//! ```text
//! bff → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（Redis、ニュース API）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`pagination`] - ページ番号とページ送りコントロール
//! - [`comment`] - コメント本文の検証と並び順
//! - [`signup`] - 会員登録フォームの検証
//! - [`verification`] - メール認証カウントダウン
//! - [`member`] - ログイン中の会員
//! - [`clock`] - 時刻の抽象化
//! - [`error`] - ドメイン層で発生するエラーの定義

#[macro_use]
mod macros;

pub mod clock;
pub mod comment;
pub mod error;
pub mod member;
pub mod pagination;
pub mod signup;
pub mod verification;

pub use error::DomainError;
