//! Business logic services

pub mod identity;
pub mod jwks;
pub mod restaurants;
pub mod users;

use std::sync::Arc;

use crate::repository::{RestaurantStore, UserStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub restaurants: restaurants::RestaurantService,
    pub identity: identity::IdentityResolver,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services on top of the given stores and token verifier
    pub fn new(
        restaurants: Arc<dyn RestaurantStore>,
        users: Arc<dyn UserStore>,
        verifier: Arc<dyn identity::TokenVerifier>,
    ) -> Self {
        Self {
            restaurants: restaurants::RestaurantService::new(restaurants),
            identity: identity::IdentityResolver::new(verifier, users.clone()),
            users: users::UsersService::new(users),
        }
    }
}
