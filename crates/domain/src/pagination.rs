//! # ページネーション
//!
//! 一覧画面のページ番号と、ページ送りコントロールの表示内容を計算する。
//!
//! ## ページ番号の基準
//!
//! ブラウザ向けのページ番号は 1 始まり、ニュース API のページ番号は 0 始まり。
//! [`PageNumber`] は 1 始まりの値を保持し、[`PageNumber::zero_based`] で
//! ニュース API 向けの値に変換する。
//!
//! ## ページボタンの窓
//!
//! 表示するページボタンは最大 5 個。総ページ数が 5 を超える場合は省略記号を挟む。
//!
//! | 条件 | 表示 |
//! |------|------|
//! | 総ページ数 ≤ 5 | 全ページ |
//! | 現在 ≤ 3 | `1 2 3 4 … N` |
//! | 現在 ≥ N-2 | `1 … N-3 N-2 N-1 N` |
//! | それ以外 | `1 … P-1 P P+1 … N` |
//!
//! ```rust
//! use trending_domain::pagination::{PageItem, PaginationView};
//!
//! let view = PaginationView::new(5, 9);
//! assert!(view.has_previous);
//! assert!(view.has_next);
//! assert_eq!(view.items[1], PageItem::Ellipsis);
//! ```

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// キーワード別投稿一覧の 1 ページあたり件数
pub const POST_SEARCH_PAGE_SIZE: u32 = 10;
/// 人気ニュース・人気動画の 1 ページあたり件数
pub const POPULAR_PAGE_SIZE: u32 = 5;
/// コメント一覧の 1 ページあたり件数
pub const COMMENT_PAGE_SIZE: u32 = 10;

/// 窓に並べるページボタンの上限
const MAX_VISIBLE_BUTTONS: u32 = 5;

/// 1 始まりのページ番号（値オブジェクト）
///
/// # 不変条件
///
/// - 1 以上
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("{_0}")]
pub struct PageNumber(u32);

impl PageNumber {
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::Validation(
                "페이지 번호는 1 이상이어야 합니다.".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// 最初のページ
    pub fn first() -> Self {
        Self(1)
    }

    /// クエリパラメータから作成する（未指定なら 1 ページ目）
    pub fn from_query(value: Option<u32>) -> Result<Self, DomainError> {
        value.map_or(Ok(Self::first()), Self::new)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// ニュース API 向けの 0 始まりのページ番号
    pub fn zero_based(self) -> u32 {
        self.0 - 1
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::first()
    }
}

/// ページ送りコントロールの 1 要素
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageItem {
    /// ページボタン
    Page { number: u32, current: bool },
    /// 省略記号（`…`）
    Ellipsis,
}

/// ページ送りコントロールの表示内容
///
/// `has_previous` は現在ページが 1 のときだけ `false`、
/// `has_next` は現在ページが総ページ数以上のときだけ `false` になる。
/// `previous_page` / `next_page` は押下可能なときだけ値を持つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationView {
    pub current:       u32,
    pub total_pages:   u32,
    pub has_previous:  bool,
    pub has_next:      bool,
    pub previous_page: Option<u32>,
    pub next_page:     Option<u32>,
    pub items:         Vec<PageItem>,
}

impl PaginationView {
    /// 現在ページ（1 始まり）と総ページ数から表示内容を計算する
    ///
    /// 総ページ数 0 はデータなしとして 1 ページ扱いにする。
    pub fn new(current: u32, total_pages: u32) -> Self {
        let current = current.max(1);
        let total_pages = total_pages.max(1);

        let has_previous = current > 1;
        let has_next = current < total_pages;

        Self {
            current,
            total_pages,
            has_previous,
            has_next,
            previous_page: has_previous.then(|| (current - 1).max(1)),
            next_page: has_next.then(|| (current + 1).min(total_pages)),
            items: page_window(current, total_pages),
        }
    }

    pub fn for_page(page: PageNumber, total_pages: u32) -> Self {
        Self::new(page.get(), total_pages)
    }
}

/// 表示するページボタンの並びを計算する
pub fn page_window(current: u32, total_pages: u32) -> Vec<PageItem> {
    let total = total_pages.max(1);
    let page = |number: u32| PageItem::Page {
        number,
        current: number == current,
    };

    if total <= MAX_VISIBLE_BUTTONS {
        return (1..=total).map(page).collect();
    }

    if current <= 3 {
        let mut items: Vec<PageItem> = (1..=4).map(page).collect();
        items.push(PageItem::Ellipsis);
        items.push(page(total));
        return items;
    }

    if current >= total - 2 {
        let mut items = vec![page(1), PageItem::Ellipsis];
        items.extend((total - 3..=total).map(page));
        return items;
    }

    vec![
        page(1),
        PageItem::Ellipsis,
        page(current - 1),
        page(current),
        page(current + 1),
        PageItem::Ellipsis,
        page(total),
    ]
}
