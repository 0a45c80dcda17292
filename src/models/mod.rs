//! Data models

pub mod restaurant;
pub mod search;
pub mod user;

// Re-export commonly used types
pub use restaurant::{MenuItem, Restaurant};
pub use search::{Pagination, Predicate, SearchFilter, SearchPage, SearchParams, SortOption};
pub use user::{AuthContext, User};
