use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::{ApiError, StoreError},
    posts::{
        dto::{CreatePostRequest, CreatedPostResponse, MessageResponse, UpdatePostRequest},
        repo::Post,
    },
    state::AppState,
    validation::ValidJson,
};

pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/blog", post(create_post).put(update_post))
        .route("/blog/bulk", get(list_posts))
        .route("/blog/:id", get(get_post))
}

#[instrument(skip(state, body))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidJson(body): ValidJson<CreatePostRequest>,
) -> Result<Json<CreatedPostResponse>, ApiError> {
    let id = state
        .posts
        .create(user_id, &body.title, &body.content)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "create post failed");
            e
        })?;

    info!(post_id = %id, %user_id, "post created");
    Ok(Json(CreatedPostResponse { id }))
}

#[instrument(skip(state, body))]
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidJson(body): ValidJson<UpdatePostRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state
        .posts
        .update(
            user_id,
            body.id,
            body.title.as_deref(),
            body.content.as_deref(),
        )
        .await
    {
        Ok(()) => {
            info!(post_id = %body.id, %user_id, "post updated");
            Ok(Json(MessageResponse {
                message: "updated blog",
            }))
        }
        Err(StoreError::NotFound) => {
            // Missing and not-owned are reported identically.
            warn!(post_id = %body.id, %user_id, "no owned post to update");
            Err(StoreError::NotFound.into())
        }
        Err(e) => {
            error!(error = %e, post_id = %body.id, %user_id, "update post failed");
            Err(e.into())
        }
    }
}

#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.posts.find_all().await.map_err(|e| {
        error!(error = %e, "list posts failed");
        e
    })?;
    Ok(Json(posts))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Post>>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| StoreError::InvalidId(id))?;
    let post = state.posts.find_by_id(id).await.map_err(|e| {
        error!(error = %e, post_id = %id, "get post failed");
        e
    })?;
    Ok(Json(post))
}
