//! Restaurant search filter and pagination values.
//!
//! A search request is turned into an AND-of-predicates [`SearchFilter`]
//! plus a [`Pagination`] window. Both are pure functions of the request
//! parameters; the repository layer renders them into SQL.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::restaurant::Restaurant;

/// Fixed number of restaurants per result page
pub const PAGE_SIZE: i64 = 10;

/// Sort field used when the request does not name one
pub const DEFAULT_SORT_OPTION: &str = "lastUpdated";

/// Query string of `GET /restaurant/search/{city}`
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free text matched against the restaurant name and its cuisines
    pub search_query: Option<String>,
    /// Comma separated cuisines, all of which must be offered
    pub selected_cuisines: Option<String>,
    /// Field to sort on (default: lastUpdated)
    pub sort_option: Option<String>,
    /// Page number, 1-based. Anything that is not a positive integer means 1.
    pub page: Option<String>,
}

impl SearchParams {
    /// Build from raw query pairs.
    ///
    /// Repeated `selectedCuisines` values are merged; for the other keys the
    /// first occurrence wins. Unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "searchQuery" => &mut params.search_query,
                "sortOption" => &mut params.sort_option,
                "page" => &mut params.page,
                "selectedCuisines" => {
                    match params.selected_cuisines.as_mut() {
                        Some(cuisines) => {
                            cuisines.push(',');
                            cuisines.push_str(&value);
                        }
                        None => params.selected_cuisines = Some(value),
                    }
                    continue;
                }
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        params
    }

    /// Free text query, if a non-blank one was given
    pub fn text(&self) -> Option<&str> {
        non_blank(self.search_query.as_deref())
    }

    /// Selected cuisine tokens, lowercased, empty tokens dropped
    pub fn cuisines(&self) -> Vec<String> {
        non_blank(self.selected_cuisines.as_deref())
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .map(str::to_lowercase)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn sort(&self) -> SortOption {
        SortOption::from_param(self.sort_option.as_deref())
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from_param(self.page.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A single search condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// City contains the value, ignoring case
    CityMatch(String),
    /// Every listed cuisine (lowercase) equals one of the restaurant's cuisines, ignoring case
    CuisineAllOf(Vec<String>),
    /// Name contains the text OR one of the cuisines contains the text, ignoring case
    TextOrCuisine(String),
}

impl Predicate {
    /// Evaluate the predicate against a restaurant.
    ///
    /// The PostgreSQL rendering in `repository::restaurants` applies the same rules.
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        match self {
            Predicate::CityMatch(city) => contains_ignore_case(&restaurant.city, city),
            Predicate::CuisineAllOf(wanted) => wanted.iter().all(|w| {
                restaurant
                    .cuisines
                    .iter()
                    .any(|c| c.to_lowercase() == w.to_lowercase())
            }),
            Predicate::TextOrCuisine(text) => {
                contains_ignore_case(&restaurant.restaurant_name, text)
                    || restaurant
                        .cuisines
                        .iter()
                        .any(|c| contains_ignore_case(c, text))
            }
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Conjunction of predicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    predicates: Vec<Predicate>,
}

impl SearchFilter {
    /// Filter selecting every restaurant of a city
    pub fn for_city(city: &str) -> Self {
        Self {
            predicates: vec![Predicate::CityMatch(city.to_string())],
        }
    }

    /// City filter narrowed by the optional cuisine and free-text criteria
    pub fn from_params(city: &str, params: &SearchParams) -> Self {
        let mut filter = Self::for_city(city);

        let cuisines = params.cuisines();
        if !cuisines.is_empty() {
            filter.predicates.push(Predicate::CuisineAllOf(cuisines));
        }

        if let Some(text) = params.text() {
            filter
                .predicates
                .push(Predicate::TextOrCuisine(text.to_string()));
        }

        filter
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        self.predicates.iter().all(|p| p.matches(restaurant))
    }
}

/// Sort field of a search; ordering is always ascending
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SortOption {
    #[default]
    LastUpdated,
    DeliveryPrice,
    EstimatedDeliveryTime,
    RestaurantName,
    City,
    Country,
    /// Name that maps to no column; results keep only the id ordering
    Unrecognized(String),
}

impl SortOption {
    pub fn from_param(value: Option<&str>) -> Self {
        match non_blank(value).unwrap_or(DEFAULT_SORT_OPTION) {
            "lastUpdated" => SortOption::LastUpdated,
            "deliveryPrice" => SortOption::DeliveryPrice,
            "estimatedDeliveryTime" => SortOption::EstimatedDeliveryTime,
            "restaurantName" => SortOption::RestaurantName,
            "city" => SortOption::City,
            "country" => SortOption::Country,
            other => SortOption::Unrecognized(other.to_string()),
        }
    }

    /// Column to order by, if any
    pub fn column(&self) -> Option<&'static str> {
        match self {
            SortOption::LastUpdated => Some("last_updated"),
            SortOption::DeliveryPrice => Some("delivery_price"),
            SortOption::EstimatedDeliveryTime => Some("estimated_delivery_time"),
            SortOption::RestaurantName => Some("restaurant_name"),
            SortOption::City => Some("city"),
            SortOption::Country => Some("country"),
            SortOption::Unrecognized(_) => None,
        }
    }
}

/// Requested page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
}

impl Pagination {
    pub fn new(page: i64) -> Self {
        Self { page: page.max(1) }
    }

    pub fn from_param(value: Option<&str>) -> Self {
        let page = value
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        Self::new(page)
    }

    /// Number of rows skipped before this page
    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(PAGE_SIZE)
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    /// Number of pages needed to hold `total` rows
    pub fn pages_for(total: i64) -> i64 {
        if total <= 0 {
            return 0;
        }
        (total + PAGE_SIZE - 1) / PAGE_SIZE
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Pagination metadata of a search response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageInfo {
    /// Total number of matching restaurants
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Total number of pages
    pub pages: i64,
}

/// One page of search results
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchPage {
    pub data: Vec<Restaurant>,
    pub pagination: PageInfo,
}

impl SearchPage {
    pub fn new(data: Vec<Restaurant>, total: i64, pagination: Pagination) -> Self {
        Self {
            data,
            pagination: PageInfo {
                total,
                page: pagination.page,
                pages: Pagination::pages_for(total),
            },
        }
    }

    /// Response body used when the city has no restaurants at all
    pub fn empty_city() -> Self {
        Self {
            data: Vec::new(),
            pagination: PageInfo {
                total: 0,
                page: 1,
                pages: 1,
            },
        }
    }
}
