//! Repository layer for database operations
//!
//! Services talk to storage through the [`RestaurantStore`] and [`UserStore`]
//! ports; the PostgreSQL adapters live in the submodules.

pub mod restaurants;
pub mod users;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Pagination, Restaurant, SearchFilter, SortOption, User},
};

pub use restaurants::RestaurantsRepository;
pub use users::UsersRepository;

/// Read access to restaurants
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantStore: Send + Sync {
    /// Fetch a restaurant with its menu
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Restaurant>>;

    /// Number of restaurants matching the filter
    async fn count(&self, filter: &SearchFilter) -> AppResult<i64>;

    /// One page of matching restaurants, sorted ascending on `sort`
    async fn find(
        &self,
        filter: &SearchFilter,
        sort: &SortOption,
        pagination: Pagination,
    ) -> AppResult<Vec<Restaurant>>;
}

/// Read access to local user records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look a user up by the identity provider subject claim
    async fn find_by_auth0_id(&self, auth0_id: &str) -> AppResult<Option<User>>;
}

/// PostgreSQL repositories sharing one connection pool
#[derive(Clone)]
pub struct Repository {
    pub restaurants: RestaurantsRepository,
    pub users: UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            restaurants: RestaurantsRepository::new(pool.clone()),
            users: UsersRepository::new(pool),
        }
    }
}
