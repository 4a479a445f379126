//! Response rendering and error mapping.
//!
//! # Responsibilities
//! - Define the JSON bodies returned by item handlers
//! - Map domain and infrastructure errors to HTTP status codes
//!
//! # Design Decisions
//! - Client errors carry fixed messages (`Invalid item`, `Item not found`)
//! - Store failures are logged here and rendered as an opaque 500

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::{Item, ItemId, ItemIdError, StoreError};

pub const WELCOME_MESSAGE: &str = "Welcome to the Items API with MongoDB!";
pub const ITEM_ADDED: &str = "Item added successfully";
pub const ITEM_UPDATED: &str = "Item updated successfully";
pub const ITEM_DELETED: &str = "Item deleted successfully";

/// `{"message": ...}`
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

impl MessageBody {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Body returned after a successful insert.
#[derive(Debug, Serialize)]
pub struct CreatedBody {
    pub message: &'static str,
    pub id: ItemId,
}

/// `{"items": [...]}`
#[derive(Debug, Serialize)]
pub struct ItemsBody {
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Errors surfaced by item handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body missing, not JSON, or `item` absent/empty/not a string.
    #[error("Invalid item")]
    InvalidItem,

    /// Path segment is not a well-formed item id.
    #[error("Invalid item id")]
    InvalidId(#[from] ItemIdError),

    #[error("Item not found")]
    NotFound,

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidItem | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            ApiError::InvalidItem => "Invalid item",
            ApiError::InvalidId(_) => "Invalid item id",
            ApiError::NotFound => "Item not found",
            ApiError::Store(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(e) => tracing::error!(error = %e, "Store operation failed"),
            ApiError::InvalidId(e) => tracing::debug!(error = %e, "Rejected item id"),
            _ => {}
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_bodies() {
        let response = ApiError::InvalidItem.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, serde_json::json!({"error": "Invalid item"}));

        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, serde_json::json!({"error": "Item not found"}));

        let bad_id = "nope".parse::<ItemId>().unwrap_err();
        let response = ApiError::from(bad_id).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, serde_json::json!({"error": "Invalid item id"}));
    }

    #[test]
    fn test_store_failure_is_internal_error() {
        let err = ApiError::from(StoreError::UnexpectedId("42".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }
}
