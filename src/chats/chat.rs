use axum::{debug_handler, extract::{Path, Query, State}, Json};

use crate::{
    config::Config,
    context::RequestContext,
    db::DatabaseAccess,
    dto::{ApiArrayResponse, ApiInsertResponse, ApiItemResponse, ApiUpdateResponse, PageQuery},
    models::{ChatDetail, ChatListItem, ListItem},
    AppResult, AppState,
};

/// Chats the caller is a member of.
#[debug_handler(state = AppState)]
pub(crate) async fn list_chats(
    State(config): State<Config>,
    ctx: RequestContext,
    Query(PageQuery { top, skip }): Query<PageQuery>,
) -> AppResult<Json<ApiArrayResponse<ListItem<ChatListItem>>>> {
    let db = DatabaseAccess::new(&config, &ctx);
    let chats = db.chats_for_user(&ctx.user_id, top, skip).await?;

    Ok(Json(ApiArrayResponse::ranged(chats, db.page(top, skip), &ctx)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn insert_chat(
    State(config): State<Config>,
    ctx: RequestContext,
    Json(chat): Json<ChatDetail>,
) -> AppResult<Json<ApiInsertResponse>> {
    let chat_id = DatabaseAccess::new(&config, &ctx).insert_chat(&chat).await?;
    Ok(Json(ApiInsertResponse::success(chat_id, &ctx)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn get_chat(
    State(config): State<Config>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Json<ApiItemResponse<ChatDetail>>> {
    let chat = DatabaseAccess::new(&config, &ctx).get_chat(&id).await?;
    Ok(Json(ApiItemResponse::success(chat, &ctx)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_chat(
    State(config): State<Config>,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(chat): Json<ChatDetail>,
) -> AppResult<Json<ApiUpdateResponse>> {
    let id = DatabaseAccess::new(&config, &ctx).update_chat(&id, &chat).await?;
    Ok(Json(ApiUpdateResponse::success(id, &ctx)))
}
