use crate::domain::{Book, BookId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// カタログストアポート
///
/// 書籍コレクションの保持と取得を抽象化する。
/// 各メソッドは単独でアトミックだが、複数の呼び出しにまたがる
/// 「確認してから更新」の直列化はアプリケーション層の責務。
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// すべての書籍を登録順に返す
    async fn list(&self) -> Result<Vec<Book>>;

    /// IDで書籍を取得する
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>>;

    /// 指定したISBNの書籍が存在するか確認する
    ///
    /// 登録時の重複チェックに使用される。
    async fn isbn_exists(&self, isbn: &str) -> Result<bool>;

    /// 次に採番するIDを返す
    ///
    /// 既存IDの最大値 + 1（空なら1）。削除済みのIDは再利用しない。
    async fn next_id(&self) -> Result<BookId>;

    /// 書籍を末尾に追加する
    async fn insert(&self, book: Book) -> Result<()>;

    /// 既存の書籍を置き換える
    ///
    /// 登録順の位置は変わらない。存在しないIDの場合はエラー。
    async fn save(&self, book: Book) -> Result<()>;

    /// IDで書籍を削除し、削除した書籍を返す
    async fn remove_by_id(&self, id: BookId) -> Result<Option<Book>>;
}
