use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{MessageResponse, UserResponse},
        password::{hash_password, verify_password},
        CurrentUser,
    },
    error::{ApiError, ApiResult},
    state::AppState,
    users::{
        dto::{
            ChangePasswordRequest, DeleteProfileRequest, PublicUser, SearchQuery, SearchResponse,
            UpdateProfileRequest,
        },
        repo::{ProfileUpdate, User},
        validate,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/profile",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route("/users/password", put(change_password))
        .route("/users/search", get(search))
        .route("/users/:username", get(get_by_username))
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicUser,
}

#[instrument(skip_all)]
pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        user: user.into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let mut errors = Vec::new();
    if let Some(first) = payload.first_name.as_deref() {
        if first.chars().count() > 50 {
            errors.push("First name cannot exceed 50 characters".into());
        }
    }
    if let Some(last) = payload.last_name.as_deref() {
        if last.chars().count() > 50 {
            errors.push("Last name cannot exceed 50 characters".into());
        }
    }
    if let Some(location) = payload.location.as_deref() {
        if location.chars().count() > 100 {
            errors.push("Location cannot exceed 100 characters".into());
        }
    }
    if let Some(bio) = payload.bio.as_deref() {
        errors.extend(validate::bio_errors(bio));
    }
    if let Some(interests) = payload.food_interests.as_deref() {
        errors.extend(validate::food_interest_errors(interests));
    }
    if let Some(dietary) = payload.dietary_restrictions.as_deref() {
        errors.extend(validate::dietary_restriction_errors(dietary));
    }
    if !errors.is_empty() {
        warn!(?errors, "profile update rejected");
        return Err(ApiError::Invalid(errors));
    }

    let updated = User::update_profile(
        &state.db,
        user.id,
        ProfileUpdate {
            first_name: payload.first_name,
            last_name: payload.last_name,
            location: payload.location,
            bio: payload.bio,
            food_interests: payload.food_interests,
            dietary_restrictions: payload.dietary_restrictions,
            newsletter: payload.newsletter,
        },
    )
    .await?;

    Ok(Json(ProfileResponse {
        success: true,
        message: "Profile updated successfully!".into(),
        user: updated.into(),
    }))
}

#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let (current, new) = match (
        payload.current_password.as_deref().filter(|p| !p.is_empty()),
        payload.new_password.as_deref().filter(|p| !p.is_empty()),
    ) {
        (Some(c), Some(n)) => (c, n),
        _ => {
            return Err(ApiError::Validation(
                "Please provide both current and new password".into(),
            ))
        }
    };

    if new.chars().count() < 8 {
        return Err(ApiError::Validation(
            "New password must be at least 8 characters long".into(),
        ));
    }

    if !verify_password(current, &user.password_hash)? {
        return Err(ApiError::Validation("Current password is incorrect".into()));
    }

    // The hash is recomputed only here, where the plaintext actually changed.
    let hash = hash_password(new)?;
    User::set_password_hash(&state.db, user.id, &hash).await?;

    info!(user_id = %user.id, "password changed");
    Ok(Json(MessageResponse {
        success: true,
        message: "Password changed successfully!".into(),
    }))
}

#[instrument(skip_all)]
pub async fn delete_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<DeleteProfileRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let password = payload
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            ApiError::Validation("Please provide your password to confirm account deletion".into())
        })?;

    if !verify_password(password, &user.password_hash)? {
        return Err(ApiError::Validation("Password is incorrect".into()));
    }

    User::deactivate(&state.db, user.id).await?;

    info!(user_id = %user.id, "account deactivated");
    Ok(Json(MessageResponse {
        success: true,
        message: "Account deactivated successfully. You can reactivate by logging in again.".into(),
    }))
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let q = params.q.trim();
    if q.chars().count() < 2 {
        return Err(ApiError::Validation(
            "Search query must be at least 2 characters long".into(),
        ));
    }

    let users = User::search(&state.db, q, user.id).await?;
    Ok(Json(SearchResponse {
        success: true,
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn get_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::find_active_by_username(&state.db, &username)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(UserResponse {
        success: true,
        user: PublicUser::from(user).without_email(),
    }))
}
