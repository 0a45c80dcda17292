//! Restaurants repository for database operations.
//!
//! Search filters are rendered with [`QueryBuilder`]; every user supplied
//! value is sent as a bound parameter.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::RestaurantStore;
use crate::{
    error::AppResult,
    models::{MenuItem, Pagination, Predicate, Restaurant, SearchFilter, SortOption},
};

const RESTAURANT_COLUMNS: &str = "id, user_id, restaurant_name, city, country, delivery_price, \
     estimated_delivery_time, cuisines, image_url, last_updated";

/// Append the `WHERE` clause for `filter` (nothing when it has no predicates)
pub fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &SearchFilter) {
    for (i, predicate) in filter.predicates().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });

        match predicate {
            Predicate::CityMatch(city) => {
                builder.push("strpos(lower(city), lower(");
                builder.push_bind(city.clone());
                builder.push(")) > 0");
            }
            Predicate::CuisineAllOf(cuisines) => {
                builder.push(
                    "(SELECT coalesce(array_agg(lower(c)), '{}') FROM unnest(cuisines) AS c) @> ",
                );
                builder.push_bind(cuisines.clone());
                builder.push("::text[]");
            }
            Predicate::TextOrCuisine(text) => {
                builder.push("(strpos(lower(restaurant_name), lower(");
                builder.push_bind(text.clone());
                builder.push(
                    ")) > 0 OR EXISTS (SELECT 1 FROM unnest(cuisines) AS c WHERE strpos(lower(c), lower(",
                );
                builder.push_bind(text.clone());
                builder.push(")) > 0))");
            }
        }
    }
}

/// Append `ORDER BY`; `id` always breaks ties so pages are stable
pub fn push_order(builder: &mut QueryBuilder<'_, Postgres>, sort: &SortOption) {
    match sort.column() {
        Some(column) => builder.push(format!(" ORDER BY {} ASC, id ASC", column)),
        None => builder.push(" ORDER BY id ASC"),
    };
}

#[derive(Clone)]
pub struct RestaurantsRepository {
    pool: Pool<Postgres>,
}

impl RestaurantsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Load menu items for the given restaurants in one query
    async fn attach_menu_items(&self, restaurants: &mut [Restaurant]) -> AppResult<()> {
        if restaurants.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = restaurants.iter().map(|r| r.id).collect();
        let items = sqlx::query_as::<_, MenuItem>(
            r#"
            SELECT id, restaurant_id, name, price
            FROM menu_items
            WHERE restaurant_id = ANY($1)
            ORDER BY name
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_restaurant: HashMap<Uuid, Vec<MenuItem>> = HashMap::new();
        for item in items {
            by_restaurant.entry(item.restaurant_id).or_default().push(item);
        }

        for restaurant in restaurants.iter_mut() {
            restaurant.menu_items = by_restaurant.remove(&restaurant.id).unwrap_or_default();
        }

        Ok(())
    }
}

#[async_trait]
impl RestaurantStore for RestaurantsRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {} FROM restaurants WHERE id = $1",
            RESTAURANT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(restaurant) = restaurant else {
            return Ok(None);
        };

        let mut found = [restaurant];
        self.attach_menu_items(&mut found).await?;
        let [restaurant] = found;
        Ok(Some(restaurant))
    }

    async fn count(&self, filter: &SearchFilter) -> AppResult<i64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM restaurants");
        push_filter(&mut builder, filter);

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn find(
        &self,
        filter: &SearchFilter,
        sort: &SortOption,
        pagination: Pagination,
    ) -> AppResult<Vec<Restaurant>> {
        let mut builder = QueryBuilder::new(format!("SELECT {} FROM restaurants", RESTAURANT_COLUMNS));
        push_filter(&mut builder, filter);
        push_order(&mut builder, sort);
        builder.push(" LIMIT ");
        builder.push_bind(pagination.limit());
        builder.push(" OFFSET ");
        builder.push_bind(pagination.skip());

        let mut restaurants = builder
            .build_query_as::<Restaurant>()
            .fetch_all(&self.pool)
            .await?;

        self.attach_menu_items(&mut restaurants).await?;
        Ok(restaurants)
    }
}
