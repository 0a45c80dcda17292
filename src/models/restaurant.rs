//! Restaurant model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Restaurant record as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Owning user, if any
    #[serde(rename = "user")]
    pub user_id: Option<Uuid>,
    pub restaurant_name: String,
    pub city: String,
    pub country: String,
    /// Delivery price in minor currency units
    pub delivery_price: i32,
    /// Estimated delivery time in minutes
    pub estimated_delivery_time: i32,
    pub cuisines: Vec<String>,
    #[sqlx(skip)]
    pub menu_items: Vec<MenuItem>,
    pub image_url: Option<String>,
    pub last_updated: DateTime<Utc>,
}

/// Menu entry of a restaurant
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip)]
    pub restaurant_id: Uuid,
    pub name: String,
    /// Price in minor currency units
    pub price: i32,
}
