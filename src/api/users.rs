//! Current user endpoint

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::{AuthContext, User},
    AppState,
};

/// Get the authenticated caller's user record
#[utoipa::path(
    get,
    path = "/api/my/user",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_current_user(&ctx).await?;
    Ok(Json(user))
}
