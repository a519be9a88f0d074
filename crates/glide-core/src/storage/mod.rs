pub mod cache;
pub mod models;
mod queries;
mod sqlite;

pub use cache::SizeCache;
pub use sqlite::Database;
