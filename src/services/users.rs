//! Current user service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{AuthContext, User},
    repository::UserStore,
};

#[derive(Clone)]
pub struct UsersService {
    store: Arc<dyn UserStore>,
}

impl UsersService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Record of the authenticated caller
    pub async fn get_current_user(&self, ctx: &AuthContext) -> AppResult<User> {
        self.store
            .find_by_auth0_id(&ctx.auth0_id)
            .await?
            .filter(|user| user.id == ctx.user_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
