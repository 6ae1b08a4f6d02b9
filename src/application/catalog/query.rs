use serde::Serialize;

use crate::domain::Book;

/// 既定のページ番号
pub const DEFAULT_PAGE: usize = 1;

/// 既定の1ページあたり件数
pub const DEFAULT_LIMIT: usize = 10;

/// 書籍一覧の検索条件
///
/// 各フィルタは指定された場合のみ適用され、AND条件で合成される。
/// 適用順は available → genre → search。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuery {
    /// 貸出可能状態が一致する書籍のみ
    pub available: Option<bool>,
    /// ジャンルが一致する書籍のみ（大文字小文字を区別しない完全一致）
    pub genre: Option<String>,
    /// タイトルまたは著者に含まれる書籍のみ（大文字小文字を区別しない部分一致）
    pub search: Option<String>,
    /// 1始まりのページ番号
    pub page: usize,
    /// 1ページあたり件数（1以上）
    pub limit: usize,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            available: None,
            genre: None,
            search: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// 書籍一覧の1ページ
///
/// `total` と `total_pages` は絞り込み後の件数から計算される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub data: Vec<Book>,
}

/// 純粋関数：検索条件で絞り込む
pub(super) fn filter_books(books: Vec<Book>, query: &BookQuery) -> Vec<Book> {
    let genre = query.genre.as_deref().map(str::to_lowercase);
    let search = query.search.as_deref().map(str::to_lowercase);

    books
        .into_iter()
        .filter(|book| query.available.is_none_or(|available| book.available == available))
        .filter(|book| {
            genre
                .as_deref()
                .is_none_or(|genre| book.genre.to_lowercase() == genre)
        })
        .filter(|book| {
            search.as_deref().is_none_or(|term| {
                book.title.to_lowercase().contains(term) || book.author.to_lowercase().contains(term)
            })
        })
        .collect()
}

/// 純粋関数：絞り込み結果からページを切り出す
pub(super) fn paginate(books: Vec<Book>, page: usize, limit: usize) -> BookPage {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = books.len();
    let start = (page - 1).saturating_mul(limit);

    let data = books.into_iter().skip(start).take(limit).collect();

    BookPage {
        total,
        page,
        limit,
        total_pages: total.div_ceil(limit),
        data,
    }
}
