mod memo_list;
pub use memo_list::MemoListPage;

mod not_found;
pub use not_found::NotFoundPage;
