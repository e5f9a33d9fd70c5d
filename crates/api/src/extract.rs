//! Request body extraction.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use domain::DomainError;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body that rejects with [`ApiError`].
///
/// Decoding failures become a 400 with the usual `{ "error": ... }` body.
/// The content type is not checked.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::from(DomainError::from(e)))
    }
}
