//! Content Item HTTP Routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::errors::RestResult;
use super::lifecycle_routes::{lifecycle_routes, ContentItemKind};
use super::SharedService;
use crate::entity::{ContentItem, ContentItemUpdate, NewContentItem};
use crate::state::{StateRecord, Status};

/// A content item resolved through its states
#[derive(Debug, Serialize)]
pub struct ContentItemWithStates {
    pub item: ContentItem,
    pub states: StateRecord,
    pub status: Status,
}

pub fn content_item_routes() -> Router<SharedService> {
    Router::new()
        .route(
            "/:biz/content-items",
            get(list_content_items_handler).post(create_content_item_handler),
        )
        .route(
            "/:biz/content-items/:key",
            get(get_content_item_handler)
                .put(update_content_item_handler)
                .delete(delete_content_item_handler),
        )
        .merge(lifecycle_routes::<ContentItemKind>("/:biz/content-items"))
}

pub async fn list_content_items_handler(
    State(service): State<SharedService>,
    Path(biz): Path<String>,
) -> RestResult<Json<Vec<ContentItem>>> {
    Ok(Json(service.list_content_items(&biz)?))
}

pub async fn create_content_item_handler(
    State(service): State<SharedService>,
    Path(biz): Path<String>,
    Json(request): Json<NewContentItem>,
) -> RestResult<(StatusCode, Json<ContentItem>)> {
    let item = service.create_content_item(&biz, request)?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_content_item_handler(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
) -> RestResult<Json<ContentItemWithStates>> {
    let resolved = service.get_content_item_with_states(&biz, &key)?;
    let status = resolved.status();
    Ok(Json(ContentItemWithStates {
        item: resolved.entity,
        states: resolved.states,
        status,
    }))
}

pub async fn update_content_item_handler(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
    Json(request): Json<ContentItemUpdate>,
) -> RestResult<Json<ContentItem>> {
    Ok(Json(service.update_content_item(&biz, &key, request)?))
}

pub async fn delete_content_item_handler(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
) -> RestResult<StatusCode> {
    service.delete_content_item(&biz, &key)?;
    Ok(StatusCode::NO_CONTENT)
}
