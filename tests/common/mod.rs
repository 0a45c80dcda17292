//! Shared fixtures for router tests: in-memory stores and token helpers

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use eats_server::{
    api,
    error::{AppError, AppResult},
    models::{Pagination, Restaurant, SearchFilter, SortOption, User},
    repository::{RestaurantStore, UserStore},
    services::{
        identity::{AuthError, TokenVerifier},
        Services,
    },
    AppState,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

/// Restaurant store evaluating filters in process
#[derive(Default)]
pub struct MemoryRestaurants {
    pub restaurants: Vec<Restaurant>,
}

fn sort_key(sort: &SortOption, r: &Restaurant) -> String {
    match sort {
        SortOption::LastUpdated => r.last_updated.to_rfc3339(),
        SortOption::DeliveryPrice => format!("{:010}", r.delivery_price),
        SortOption::EstimatedDeliveryTime => format!("{:010}", r.estimated_delivery_time),
        SortOption::RestaurantName => r.restaurant_name.clone(),
        SortOption::City => r.city.clone(),
        SortOption::Country => r.country.clone(),
        SortOption::Unrecognized(_) => String::new(),
    }
}

#[async_trait]
impl RestaurantStore for MemoryRestaurants {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Restaurant>> {
        Ok(self.restaurants.iter().find(|r| r.id == id).cloned())
    }

    async fn count(&self, filter: &SearchFilter) -> AppResult<i64> {
        Ok(self.restaurants.iter().filter(|r| filter.matches(r)).count() as i64)
    }

    async fn find(
        &self,
        filter: &SearchFilter,
        sort: &SortOption,
        pagination: Pagination,
    ) -> AppResult<Vec<Restaurant>> {
        let mut matching: Vec<Restaurant> = self
            .restaurants
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            sort_key(sort, a)
                .cmp(&sort_key(sort, b))
                .then(a.id.cmp(&b.id))
        });

        Ok(matching
            .into_iter()
            .skip(pagination.skip() as usize)
            .take(pagination.limit() as usize)
            .collect())
    }
}

/// Store whose every call fails like a lost database connection
pub struct BrokenRestaurants;

#[async_trait]
impl RestaurantStore for BrokenRestaurants {
    async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<Restaurant>> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn count(&self, _filter: &SearchFilter) -> AppResult<i64> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find(
        &self,
        _filter: &SearchFilter,
        _sort: &SortOption,
        _pagination: Pagination,
    ) -> AppResult<Vec<Restaurant>> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    pub users: Vec<User>,
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn find_by_auth0_id(&self, auth0_id: &str) -> AppResult<Option<User>> {
        Ok(self.users.iter().find(|u| u.auth0_id == auth0_id).cloned())
    }
}

/// Verifier standing in for a provider that accepts every token
pub struct AcceptingVerifier;

#[async_trait]
impl TokenVerifier for AcceptingVerifier {
    async fn verify(&self, _token: &str) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Verifier standing in for a provider that rejects every token
pub struct RejectingVerifier;

#[async_trait]
impl TokenVerifier for RejectingVerifier {
    async fn verify(&self, _token: &str) -> Result<(), AuthError> {
        Err(AuthError::InvalidToken("signature mismatch".to_string()))
    }
}

pub fn app(
    restaurants: impl RestaurantStore + 'static,
    users: impl UserStore + 'static,
    verifier: impl TokenVerifier + 'static,
) -> Router {
    let services = Services::new(Arc::new(restaurants), Arc::new(users), Arc::new(verifier));
    api::router(AppState {
        services: Arc::new(services),
    })
}

pub fn restaurant(name: &str, city: &str, cuisines: &[&str]) -> Restaurant {
    Restaurant {
        id: Uuid::new_v4(),
        user_id: None,
        restaurant_name: name.to_string(),
        city: city.to_string(),
        country: "Spain".to_string(),
        delivery_price: 300,
        estimated_delivery_time: 30,
        cuisines: cuisines.iter().map(|c| c.to_string()).collect(),
        menu_items: Vec::new(),
        image_url: None,
        last_updated: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
    }
}

/// `count` restaurants in `city`, each updated one minute after the previous
pub fn many_restaurants(city: &str, count: usize) -> Vec<Restaurant> {
    (0..count)
        .map(|i| {
            let mut r = restaurant(&format!("Bar {i:02}"), city, &["tapas"]);
            r.last_updated += Duration::minutes(i as i64);
            r.delivery_price = (count - i) as i32 * 10;
            r
        })
        .collect()
}

pub fn user(auth0_id: &str) -> User {
    User {
        id: Uuid::new_v4(),
        auth0_id: auth0_id.to_string(),
        email: "ana@example.com".to_string(),
        name: Some("Ana".to_string()),
        address_line1: Some("Calle Mayor 1".to_string()),
        city: Some("Madrid".to_string()),
        country: Some("Spain".to_string()),
    }
}

/// Unsigned-looking HS256 token carrying `claims`
pub fn token(claims: Value) -> String {
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"irrelevant")).unwrap()
}

pub fn token_for(sub: &str) -> String {
    token(json!({ "sub": sub }))
}

pub async fn get(app: Router, uri: &str, authorization: Option<&str>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().uri(uri);
    if let Some(value) = authorization {
        request = request.header("Authorization", value);
    }

    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
    (status, body)
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri, None).await;
    (status, serde_json::from_slice(&body).unwrap())
}
