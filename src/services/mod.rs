// Service exports
pub mod postgres;

pub use postgres::{page_count, ProfileStore, StoreError, SEARCH_PAGE_SIZE};
