//! Restaurant endpoints

use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::AppResult,
    models::{Restaurant, SearchPage, SearchParams},
    services::restaurants::{restaurant_not_found, SearchOutcome},
    AppState,
};

/// Get restaurant details by ID
#[utoipa::path(
    get,
    path = "/api/restaurant/{restaurant_id}",
    tag = "restaurants",
    params(
        ("restaurant_id" = String, Path, description = "Restaurant ID")
    ),
    responses(
        (status = 200, description = "Restaurant details", body = Restaurant),
        (status = 404, description = "Restaurant not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Unexpected failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_restaurant(
    State(state): State<AppState>,
    restaurant_id: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Restaurant>> {
    // An id that does not even decode cannot name a restaurant
    let Ok(Path(restaurant_id)) = restaurant_id else {
        return Err(restaurant_not_found());
    };

    let restaurant = state.services.restaurants.get_restaurant(&restaurant_id).await?;
    Ok(Json(restaurant))
}

/// Search the restaurants of a city with pagination
#[utoipa::path(
    get,
    path = "/api/restaurant/search/{city}",
    tag = "restaurants",
    params(
        ("city" = String, Path, description = "City to search in (case-insensitive, partial match)"),
        SearchParams
    ),
    responses(
        (status = 200, description = "Page of matching restaurants", body = SearchPage),
        (status = 404, description = "City has no restaurants; empty page", body = SearchPage),
        (status = 500, description = "Unexpected failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_restaurants(
    State(state): State<AppState>,
    city: Result<Path<String>, PathRejection>,
    Query(query): Query<Vec<(String, String)>>,
) -> AppResult<Response> {
    let Ok(Path(city)) = city else {
        return Ok(empty_city());
    };
    let params = SearchParams::from_pairs(query);

    let response = match state.services.restaurants.search(&city, &params).await? {
        SearchOutcome::NoRestaurantsInCity => empty_city(),
        SearchOutcome::Page(page) => Json(page).into_response(),
    };

    Ok(response)
}

fn empty_city() -> Response {
    (StatusCode::NOT_FOUND, Json(SearchPage::empty_city())).into_response()
}
