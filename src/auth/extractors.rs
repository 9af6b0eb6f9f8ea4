use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::{
    auth::jwt::JwtKeys,
    error::ApiError,
    state::AppState,
    users::repo::User,
};

/// Per-request identity resolution for protected routes.
///
/// Extracts the bearer token, verifies it, loads the user and checks the
/// account is still active; any failure short-circuits before the handler
/// runs. Because the active flag is re-checked on every request, a
/// deactivated account's still-valid tokens stop working immediately.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::MissingToken)?;

        let claims = JwtKeys::from_ref(state).verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            ApiError::from(e)
        })?;

        let user = User::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or(ApiError::NotFound("User not found"))?;

        if !user.is_active() {
            warn!(user_id = %user.id, "request from deactivated account");
            return Err(ApiError::AccountDeactivated);
        }

        Ok(CurrentUser(user))
    }
}
