use axum::{debug_handler, extract::{Path, State}, routing::{get, post}, Json, Router};

use crate::{
    config::Config,
    context::RequestContext,
    db::DatabaseAccess,
    dto::{ApiInsertResponse, ApiItemResponse, ApiUpdateResponse},
    models::User,
    AppResult, AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(upsert_user))
        .route("/users/{id}", get(get_user).put(update_user))
}

/// Creates the user, or updates the one already holding this email.
#[debug_handler(state = AppState)]
pub(crate) async fn upsert_user(
    State(config): State<Config>,
    ctx: RequestContext,
    Json(user): Json<User>,
) -> AppResult<Json<ApiInsertResponse>> {
    let id = DatabaseAccess::new(&config, &ctx).upsert_user(&user).await?;
    Ok(Json(ApiInsertResponse::success(id, &ctx)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn get_user(
    State(config): State<Config>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<ApiItemResponse<User>>> {
    let user = DatabaseAccess::new(&config, &ctx).get_user(&id).await?;
    Ok(Json(ApiItemResponse::success(user, &ctx)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_user(
    State(config): State<Config>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(user): Json<User>,
) -> AppResult<Json<ApiUpdateResponse>> {
    let id = DatabaseAccess::new(&config, &ctx).update_user(&id, &user).await?;
    Ok(Json(ApiUpdateResponse::success(id, &ctx)))
}
