//! Debug surface over a tenant store. Admin callers only.

use axum::{debug_handler, extract::{Path, Query, State}, routing::{get, post}, Json, Router};
use serde_json::{Map, Value};

use crate::{
    config::Config,
    context::RequestContext,
    db::DatabaseAccess,
    dto::{ApiArrayResponse, ApiLookupResponse, LookupItem, PageQuery},
    models::ListItem,
    AppResult, AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/initsystem", post(init_system))
        .route("/admin/tables", get(tables))
        .route("/admin/tables/{table}", get(table))
}

#[debug_handler(state = AppState)]
pub(crate) async fn init_system(
    State(config): State<Config>,
    ctx: RequestContext,
) -> AppResult<Json<Value>> {
    ctx.require_admin()?;
    DatabaseAccess::new(&config, &ctx).init_system().await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

#[debug_handler(state = AppState)]
pub(crate) async fn tables(
    State(config): State<Config>,
    ctx: RequestContext,
) -> AppResult<Json<ApiLookupResponse>> {
    ctx.require_admin()?;
    let items = DatabaseAccess::new(&config, &ctx)
        .list_tables()
        .await?
        .into_iter()
        .map(|name| LookupItem { id: name.clone(), text: name })
        .collect();
    Ok(Json(ApiLookupResponse::success(items, &ctx)))
}

/// Raw rows, audit columns included.
#[debug_handler(state = AppState)]
pub(crate) async fn table(
    State(config): State<Config>,
    ctx: RequestContext,
    Path(table): Path<String>,
    Query(PageQuery { top, skip }): Query<PageQuery>,
) -> AppResult<Json<ApiArrayResponse<ListItem<Map<String, Value>>>>> {
    ctx.require_admin()?;
    let db = DatabaseAccess::new(&config, &ctx);
    let records = db.records(&table, top, skip).await?;

    Ok(Json(ApiArrayResponse::ranged(records, db.page(top, skip), &ctx)))
}
