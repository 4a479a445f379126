//! Item handlers.
//!
//! One handler per CRUD verb. Each opens its span through the injected
//! `HandlerTracer`, performs at most one store operation, and renders JSON.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use axum::Json;
use serde::Deserialize;
use tracing::Instrument;

use crate::http::response::{
    ApiError, CreatedBody, ItemsBody, MessageBody, ITEM_ADDED, ITEM_DELETED, ITEM_UPDATED,
    WELCOME_MESSAGE,
};
use crate::http::server::AppState;
use crate::store::{Item, ItemId};

/// Request body for create and update.
#[derive(Debug, Deserialize)]
pub struct ItemPayload {
    item: Option<String>,
}

/// Extract a non-empty item name, treating any malformed body as missing.
fn required_name(payload: Result<Json<ItemPayload>, JsonRejection>) -> Result<String, ApiError> {
    match payload {
        Ok(Json(ItemPayload { item: Some(name) })) if !name.is_empty() => Ok(name),
        Ok(_) => Err(ApiError::InvalidItem),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected item payload");
            Err(ApiError::InvalidItem)
        }
    }
}

/// `GET /`
pub async fn hello(State(state): State<AppState>, method: Method) -> Json<MessageBody> {
    let span = state.tracer.span("hello", &method, None);
    async { Json(MessageBody::new(WELCOME_MESSAGE)) }
        .instrument(span)
        .await
}

/// `GET /api/items`
pub async fn list_items(
    State(state): State<AppState>,
    method: Method,
) -> Result<Json<ItemsBody>, ApiError> {
    let span = state.tracer.span("get_items", &method, None);
    async move {
        let items = state.store.find_all().await?;
        tracing::debug!(count = items.len(), "Listed items");
        Ok(Json(ItemsBody { items }))
    }
    .instrument(span)
    .await
}

/// `POST /api/items`
pub async fn add_item(
    State(state): State<AppState>,
    method: Method,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedBody>), ApiError> {
    let span = state.tracer.span("add_item", &method, None);
    async move {
        let name = required_name(payload)?;
        let id = state.store.insert(&name).await?;
        tracing::info!(item_id = %id, "Item added");
        Ok((
            StatusCode::CREATED,
            Json(CreatedBody {
                message: ITEM_ADDED,
                id,
            }),
        ))
    }
    .instrument(span)
    .await
}

/// `GET /api/items/{id}`
pub async fn get_item(
    State(state): State<AppState>,
    method: Method,
    Path(raw_id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let span = state.tracer.span("get_item", &method, Some(&raw_id));
    async move {
        let id: ItemId = raw_id.parse()?;
        state
            .store
            .find_by_id(id)
            .await?
            .map(Json)
            .ok_or(ApiError::NotFound)
    }
    .instrument(span)
    .await
}

/// `PUT /api/items/{id}`
///
/// The body is validated before the id, so an empty payload is a 400 even
/// for an id that does not exist. An update that matches a record counts as
/// success even when the name is unchanged.
pub async fn update_item(
    State(state): State<AppState>,
    method: Method,
    Path(raw_id): Path<String>,
    payload: Result<Json<ItemPayload>, JsonRejection>,
) -> Result<Json<MessageBody>, ApiError> {
    let span = state.tracer.span("update_item", &method, Some(&raw_id));
    async move {
        let name = required_name(payload)?;
        let id: ItemId = raw_id.parse()?;
        let outcome = state.store.update_name(id, &name).await?;
        if !outcome.matched {
            return Err(ApiError::NotFound);
        }
        tracing::info!(item_id = %id, modified = outcome.modified, "Item updated");
        Ok(Json(MessageBody::new(ITEM_UPDATED)))
    }
    .instrument(span)
    .await
}

/// `DELETE /api/items/{id}`
pub async fn delete_item(
    State(state): State<AppState>,
    method: Method,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let span = state.tracer.span("delete_item", &method, Some(&raw_id));
    async move {
        let id: ItemId = raw_id.parse()?;
        if !state.store.delete_by_id(id).await? {
            return Err(ApiError::NotFound);
        }
        tracing::info!(item_id = %id, "Item deleted");
        Ok(Json(MessageBody::new(ITEM_DELETED)))
    }
    .instrument(span)
    .await
}
