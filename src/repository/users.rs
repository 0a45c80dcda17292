//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::UserStore;
use crate::{error::AppResult, models::User};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UsersRepository {
    async fn find_by_auth0_id(&self, auth0_id: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, auth0_id, email, name, address_line1, city, country
            FROM users
            WHERE auth0_id = $1
            "#,
        )
        .bind(auth0_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
