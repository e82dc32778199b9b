//! Page HTTP Routes
//!
//! CRUD plus row, cell and component sub-routes. Each handler is a direct call
//! into `CompositionService`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use super::errors::RestResult;
use super::lifecycle_routes::{lifecycle_routes, PageKind};
use super::SharedService;
use crate::composition::{PlacedComponent, ResolvedPage};
use crate::entity::{ContentItem, ContentItemUpdate, NewPage, Page, PageUpdate};
use crate::grid::ResizeOptions;

// ==================
// Request Types
// ==================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRowRequest {
    #[serde(default)]
    pub at_index: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeCellRequest {
    pub col_span: u32,

    #[serde(flatten)]
    pub options: ResizeOptions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddComponentRequest {
    pub component_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveComponentRequest {
    pub row_id: String,
    pub cell_id: String,
}

// ==================
// Page Routes
// ==================

pub fn page_routes() -> Router<SharedService> {
    Router::new()
        .route("/:biz/pages", get(list_pages_handler).post(create_page_handler))
        .route(
            "/:biz/pages/:key",
            get(get_page_handler)
                .put(update_page_handler)
                .delete(delete_page_handler),
        )
        .route("/:biz/pages/:key/rows", post(add_row_handler))
        .route("/:biz/pages/:key/rows/:row_id", delete(remove_row_handler))
        .route(
            "/:biz/pages/:key/rows/:row_id/cells/:cell_id/span",
            put(resize_cell_handler),
        )
        .route(
            "/:biz/pages/:key/rows/:row_id/cells/:cell_id/component",
            post(add_component_handler),
        )
        .route(
            "/:biz/pages/:key/components/:component_key",
            put(update_component_handler).delete(remove_component_handler),
        )
        .route(
            "/:biz/pages/:key/components/:component_key/move",
            post(move_component_handler),
        )
        .merge(lifecycle_routes::<PageKind>("/:biz/pages"))
}

// ==================
// Handlers
// ==================

pub async fn list_pages_handler(
    State(service): State<SharedService>,
    Path(biz): Path<String>,
) -> RestResult<Json<Vec<Page>>> {
    Ok(Json(service.list_pages(&biz)?))
}

pub async fn create_page_handler(
    State(service): State<SharedService>,
    Path(biz): Path<String>,
    Json(request): Json<NewPage>,
) -> RestResult<(StatusCode, Json<Page>)> {
    let page = service.create_page(&biz, request)?;
    Ok((StatusCode::CREATED, Json(page)))
}

pub async fn get_page_handler(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
) -> RestResult<Json<ResolvedPage>> {
    Ok(Json(service.get_page_with_states(&biz, &key)?))
}

pub async fn update_page_handler(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
    Json(request): Json<PageUpdate>,
) -> RestResult<Json<Page>> {
    Ok(Json(service.update_page(&biz, &key, request)?))
}

pub async fn delete_page_handler(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
) -> RestResult<StatusCode> {
    service.delete_page(&biz, &key)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_row_handler(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
    Json(request): Json<AddRowRequest>,
) -> RestResult<Json<Page>> {
    Ok(Json(service.add_row_to_page(&biz, &key, request.at_index)?))
}

pub async fn remove_row_handler(
    State(service): State<SharedService>,
    Path((biz, key, row_id)): Path<(String, String, String)>,
) -> RestResult<Json<Page>> {
    Ok(Json(service.remove_row_from_page(&biz, &key, &row_id)?))
}

pub async fn resize_cell_handler(
    State(service): State<SharedService>,
    Path((biz, key, row_id, cell_id)): Path<(String, String, String, String)>,
    Json(request): Json<ResizeCellRequest>,
) -> RestResult<Json<Page>> {
    let page = service.update_cell_span_in_page(
        &biz,
        &key,
        &row_id,
        &cell_id,
        request.col_span,
        request.options,
    )?;
    Ok(Json(page))
}

pub async fn add_component_handler(
    State(service): State<SharedService>,
    Path((biz, key, row_id, cell_id)): Path<(String, String, String, String)>,
    Json(request): Json<AddComponentRequest>,
) -> RestResult<(StatusCode, Json<PlacedComponent>)> {
    let placed =
        service.add_component_to_cell(&biz, &key, &request.component_type, &row_id, &cell_id)?;
    Ok((StatusCode::CREATED, Json(placed)))
}

pub async fn update_component_handler(
    State(service): State<SharedService>,
    Path((biz, key, component_key)): Path<(String, String, String)>,
    Json(request): Json<ContentItemUpdate>,
) -> RestResult<Json<ContentItem>> {
    Ok(Json(service.update_component_in_page(&biz, &key, &component_key, request)?))
}

pub async fn remove_component_handler(
    State(service): State<SharedService>,
    Path((biz, key, component_key)): Path<(String, String, String)>,
) -> RestResult<Json<Page>> {
    Ok(Json(service.remove_component_from_page(&biz, &key, &component_key)?))
}

pub async fn move_component_handler(
    State(service): State<SharedService>,
    Path((biz, key, component_key)): Path<(String, String, String)>,
    Json(request): Json<MoveComponentRequest>,
) -> RestResult<Json<Page>> {
    let page = service.move_component_in_page(
        &biz,
        &key,
        &component_key,
        &request.row_id,
        &request.cell_id,
    )?;
    Ok(Json(page))
}
