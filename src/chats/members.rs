use axum::{debug_handler, extract::{Path, State}, Json};
use serde::Deserialize;

use crate::{
    appresult::Rejection,
    config::Config,
    context::RequestContext,
    db::DatabaseAccess,
    dto::{ApiArrayResponse, ApiDeleteResponse, ApiInsertResponse, ApiUpdateResponse},
    models::ChatUser,
    AppResult, AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnreadCount {
    unread_message_count: i64,
}

#[debug_handler(state = AppState)]
pub(crate) async fn list_members(
    State(config): State<Config>,
    ctx: RequestContext,
    Path(chat_id): Path<String>,
) -> AppResult<Json<ApiArrayResponse<ChatUser>>> {
    let members = DatabaseAccess::new(&config, &ctx).chat_members(&chat_id).await?;
    Ok(Json(ApiArrayResponse::success(members, &ctx)))
}

/// Body names the member by `userId` or `email`.
#[debug_handler(state = AppState)]
pub(crate) async fn add_member(
    State(config): State<Config>,
    ctx: RequestContext,
    Path(chat_id): Path<String>,
    Json(member): Json<ChatUser>,
) -> AppResult<Json<ApiInsertResponse>> {
    let Some(user) = member.reference() else {
        return Err(Rejection::BadRequest("member needs a userId or an email"))?;
    };

    let id = DatabaseAccess::new(&config, &ctx)
        .upsert_chat_membership(&chat_id, user, member.unread_message_count.unwrap_or(0))
        .await?;
    Ok(Json(ApiInsertResponse::success(id, &ctx)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_member(
    State(config): State<Config>,
    ctx: RequestContext,
    Path((chat_id, user)): Path<(String, String)>,
    Json(UnreadCount { unread_message_count }): Json<UnreadCount>,
) -> AppResult<Json<ApiUpdateResponse>> {
    let id = DatabaseAccess::new(&config, &ctx)
        .upsert_chat_membership(&chat_id, &user, unread_message_count)
        .await?;
    Ok(Json(ApiUpdateResponse::success(id, &ctx)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn remove_member(
    State(config): State<Config>,
    ctx: RequestContext,
    Path((chat_id, user)): Path<(String, String)>,
) -> AppResult<Json<ApiDeleteResponse>> {
    let id = DatabaseAccess::new(&config, &ctx)
        .remove_chat_membership(&chat_id, &user)
        .await?;
    Ok(Json(ApiDeleteResponse::success(id, &ctx)))
}
