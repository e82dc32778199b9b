//! Draft/publish/version routes, shared by every entity kind.
//!
//! Mounted under the kind's collection path, e.g. `/:biz/pages`:
//!
//! - `GET    {base}/:key/states`
//! - `PUT    {base}/:key/states/draft`
//! - `POST   {base}/:key/states/publish`
//! - `POST   {base}/:key/states/revert`
//! - `GET    {base}/:key/versions`
//! - `POST   {base}/:key/versions`
//! - `GET    {base}/:key/versions/:version_id`
//! - `POST   {base}/:key/versions/:version_id/restore`

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::errors::{RestError, RestResult};
use super::SharedService;
use crate::composition::CompositionService;
use crate::entity::{ContentItem, EntityLifecycle, Page, Publishable};
use crate::errors::ContentResult;
use crate::state::{StateRecord, Status};
use crate::version::{VersionEntry, VersionRecord};

/// Selects which entity kind a set of lifecycle routes serves
pub trait LifecycleKind: Send + Sync + 'static {
    type Entity: Publishable + std::fmt::Debug + 'static;

    fn lifecycle(service: &CompositionService) -> &EntityLifecycle<Self::Entity>;

    fn revert(service: &CompositionService, business_unit_key: &str, key: &str) -> ContentResult<Self::Entity> {
        Self::lifecycle(service).revert_to_published(business_unit_key, key)
    }

    fn restore(
        service: &CompositionService,
        business_unit_key: &str,
        key: &str,
        version_id: &Uuid,
    ) -> ContentResult<Self::Entity> {
        Self::lifecycle(service).restore_version(business_unit_key, key, version_id)
    }
}

/// Pages revert and restore through the service so dropped components are deleted
pub struct PageKind;

impl LifecycleKind for PageKind {
    type Entity = Page;

    fn lifecycle(service: &CompositionService) -> &EntityLifecycle<Page> {
        service.pages()
    }

    fn revert(service: &CompositionService, business_unit_key: &str, key: &str) -> ContentResult<Page> {
        service.revert_page_to_published(business_unit_key, key)
    }

    fn restore(
        service: &CompositionService,
        business_unit_key: &str,
        key: &str,
        version_id: &Uuid,
    ) -> ContentResult<Page> {
        service.restore_page_version(business_unit_key, key, version_id)
    }
}

pub struct ContentItemKind;

impl LifecycleKind for ContentItemKind {
    type Entity = ContentItem;

    fn lifecycle(service: &CompositionService) -> &EntityLifecycle<ContentItem> {
        service.content_items()
    }
}

#[derive(Debug, Serialize)]
pub struct StatesResponse {
    #[serde(flatten)]
    pub states: StateRecord,
    pub status: Status,
}

impl From<StateRecord> for StatesResponse {
    fn from(states: StateRecord) -> Self {
        let status = states.status();
        Self { states, status }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    /// Snapshot to publish; the current effective entity when omitted
    #[serde(default)]
    pub snapshot: Option<Value>,

    #[serde(default)]
    pub clear_draft: bool,
}

/// Mount the lifecycle routes for `L` under `base`
pub fn lifecycle_routes<L: LifecycleKind>(base: &str) -> Router<SharedService> {
    Router::new()
        .route(&format!("{}/:key/states", base), get(fetch_states_handler::<L>))
        .route(&format!("{}/:key/states/draft", base), put(save_draft_handler::<L>))
        .route(&format!("{}/:key/states/publish", base), post(publish_handler::<L>))
        .route(&format!("{}/:key/states/revert", base), post(revert_handler::<L>))
        .route(
            &format!("{}/:key/versions", base),
            get(fetch_versions_handler::<L>).post(append_version_handler::<L>),
        )
        .route(
            &format!("{}/:key/versions/:version_id", base),
            get(get_version_handler::<L>),
        )
        .route(
            &format!("{}/:key/versions/:version_id/restore", base),
            post(restore_version_handler::<L>),
        )
}

fn parse_version_id(raw: &str) -> RestResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| RestError::InvalidParam(format!("version id {}", raw)))
}

pub async fn fetch_states_handler<L: LifecycleKind>(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
) -> RestResult<Json<StatesResponse>> {
    let states = L::lifecycle(&service).fetch_states(&biz, &key)?;
    Ok(Json(states.into()))
}

pub async fn save_draft_handler<L: LifecycleKind>(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
    Json(snapshot): Json<Value>,
) -> RestResult<Json<StatesResponse>> {
    let states = L::lifecycle(&service).save_draft(&biz, &key, snapshot)?;
    Ok(Json(states.into()))
}

pub async fn publish_handler<L: LifecycleKind>(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
    Json(request): Json<PublishRequest>,
) -> RestResult<Json<StatesResponse>> {
    let lifecycle = L::lifecycle(&service);
    let states = match request.snapshot {
        Some(snapshot) => lifecycle.publish(&biz, &key, snapshot, request.clear_draft)?,
        None => lifecycle.publish_current(&biz, &key, request.clear_draft)?,
    };
    Ok(Json(states.into()))
}

pub async fn revert_handler<L: LifecycleKind>(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
) -> RestResult<Json<L::Entity>> {
    Ok(Json(L::revert(&service, &biz, &key)?))
}

pub async fn fetch_versions_handler<L: LifecycleKind>(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
) -> RestResult<Json<VersionRecord>> {
    Ok(Json(L::lifecycle(&service).fetch_versions(&biz, &key)?))
}

pub async fn append_version_handler<L: LifecycleKind>(
    State(service): State<SharedService>,
    Path((biz, key)): Path<(String, String)>,
    Json(snapshot): Json<Value>,
) -> RestResult<Json<VersionRecord>> {
    Ok(Json(L::lifecycle(&service).append_version(&biz, &key, snapshot)?))
}

pub async fn get_version_handler<L: LifecycleKind>(
    State(service): State<SharedService>,
    Path((biz, key, version_id)): Path<(String, String, String)>,
) -> RestResult<Json<VersionEntry>> {
    let version_id = parse_version_id(&version_id)?;
    Ok(Json(L::lifecycle(&service).get_version(&biz, &key, &version_id)?))
}

pub async fn restore_version_handler<L: LifecycleKind>(
    State(service): State<SharedService>,
    Path((biz, key, version_id)): Path<(String, String, String)>,
) -> RestResult<Json<L::Entity>> {
    let version_id = parse_version_id(&version_id)?;
    Ok(Json(L::restore(&service, &biz, &key, &version_id)?))
}
