use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    auth::{dto::MessageResponse, CurrentUser},
    error::{ApiError, ApiResult},
    foods::{
        dto::{CreateFoodResponse, FoodListResponse},
        repo::Food,
        services,
    },
    images,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/:id", delete(delete_food))
        // 5 files x 5 MiB plus multipart overhead.
        .layer(DefaultBodyLimit::max(30 * 1024 * 1024))
}

/// POST /api/foods — multipart create with image upload.
///
/// Order of enforcement: upload constraints while draining the body, then
/// required fields, then persistence. Files are staged until the insert
/// succeeds, so a rejected request leaves nothing on disk.
#[instrument(skip_all)]
pub async fn create_food(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mp: Multipart,
) -> ApiResult<(StatusCode, Json<CreateFoodResponse>)> {
    let (fields, pending) = images::collect_multipart(mp, &state.config.upload).await?;
    let validated = services::validate_submission(&fields, pending.len())?;

    let filenames: Vec<String> = pending.iter().map(|p| p.filename.clone()).collect();
    for image in pending {
        if let Err(e) = state.storage.stage(&image.filename, image.body).await {
            error!(error = %e, "staging upload failed");
            state.storage.discard(&filenames).await;
            return Err(e.into());
        }
    }

    let image_paths: Vec<String> = filenames.iter().map(|n| format!("/uploads/{}", n)).collect();
    let food = match Food::create(&state.db, user.id, validated, image_paths).await {
        Ok(food) => food,
        Err(e) => {
            state.storage.discard(&filenames).await;
            return Err(e.into());
        }
    };

    if let Err(e) = state.storage.commit(&filenames).await {
        error!(error = %e, food_id = %food.id, "commit failed, rolling back listing");
        let _ = Food::delete(&state.db, food.id).await;
        state.storage.discard(&filenames).await;
        return Err(e.into());
    }

    info!(food_id = %food.id, user_id = %user.id, "food created");
    Ok((
        StatusCode::CREATED,
        Json(CreateFoodResponse {
            success: true,
            message: "Food created successfully".into(),
            food,
        }),
    ))
}

/// GET /api/foods — latest 50 listings, public.
#[instrument(skip(state))]
pub async fn list_foods(State(state): State<AppState>) -> ApiResult<Json<FoodListResponse>> {
    let foods = Food::list_latest(&state.db, 50).await?;
    Ok(Json(FoodListResponse {
        success: true,
        foods,
    }))
}

/// DELETE /api/foods/:id — owner only.
#[instrument(skip(state))]
pub async fn delete_food(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let food = Food::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Food item not found"))?;

    if food.created_by != user.id {
        return Err(ApiError::Forbidden("Not authorized to delete this food item"));
    }

    Food::delete(&state.db, id).await?;

    info!(food_id = %id, user_id = %user.id, "food deleted");
    Ok(Json(MessageResponse {
        success: true,
        message: "Food item deleted successfully".into(),
    }))
}
