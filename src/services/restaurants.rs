//! Restaurant lookup and search service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Restaurant, SearchFilter, SearchPage, SearchParams},
    repository::RestaurantStore,
};

/// Result of a restaurant search
#[derive(Debug)]
pub enum SearchOutcome {
    /// The city alone matches no restaurant; the other criteria were never applied
    NoRestaurantsInCity,
    Page(SearchPage),
}

pub fn restaurant_not_found() -> AppError {
    AppError::NotFound("Restaurant not found".to_string())
}

#[derive(Clone)]
pub struct RestaurantService {
    store: Arc<dyn RestaurantStore>,
}

impl RestaurantService {
    pub fn new(store: Arc<dyn RestaurantStore>) -> Self {
        Self { store }
    }

    /// Get a restaurant by its identifier.
    ///
    /// Identifiers that are not valid UUIDs cannot exist in the store and are
    /// reported as not found.
    pub async fn get_restaurant(&self, restaurant_id: &str) -> AppResult<Restaurant> {
        let id = Uuid::parse_str(restaurant_id).map_err(|_| restaurant_not_found())?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(restaurant_not_found)
    }

    /// Search the restaurants of a city
    pub async fn search(&self, city: &str, params: &SearchParams) -> AppResult<SearchOutcome> {
        let in_city = self.store.count(&SearchFilter::for_city(city)).await?;
        if in_city == 0 {
            tracing::debug!(city, "No restaurants in city");
            return Ok(SearchOutcome::NoRestaurantsInCity);
        }

        let filter = SearchFilter::from_params(city, params);
        let sort = params.sort();
        let pagination = params.pagination();

        let (restaurants, total) = tokio::try_join!(
            self.store.find(&filter, &sort, pagination),
            self.store.count(&filter),
        )?;

        tracing::debug!(
            city,
            total,
            page = pagination.page,
            returned = restaurants.len(),
            "Restaurant search"
        );

        Ok(SearchOutcome::Page(SearchPage::new(restaurants, total, pagination)))
    }
}
