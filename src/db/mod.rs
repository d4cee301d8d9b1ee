mod init;
pub mod lists;
mod schemas;


pub use init::{init_db, migrate, open_db};
pub use lists::ListRepository;
pub use schemas::{Keyword, KeywordId, KeywordList, ListId};
