//! User model
//!
//! Users are created by the identity provider sign-up flow; this server only
//! reads them to resolve the subject claim of a bearer token.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Local user record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Subject claim issued by the identity provider
    pub auth0_id: String,
    pub email: String,
    pub name: Option<String>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Identity of the caller, attached to the request once the bearer token
/// has been verified and mapped to a local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub auth0_id: String,
    pub user_id: Uuid,
}
