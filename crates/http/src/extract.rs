//! Typed extractors that keep parse failures inside the response envelope.
//!
//! Axum's stock `Json`/`Query` rejections answer with plain-text bodies;
//! these wrappers convert them into `AppError::Validation` so malformed
//! payloads and query strings produce the same `{ success: false }` shape
//! as every other client error.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body extractor with envelope-shaped rejections.
#[derive(Debug, Clone, Copy)]
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(reject_json(rejection)),
        }
    }
}

/// Query string extractor with envelope-shaped rejections.
#[derive(Debug, Clone, Copy)]
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(reject_query(rejection)),
        }
    }
}

fn reject_json(rejection: JsonRejection) -> AppError {
    AppError::validation(rejection.body_text())
}

fn reject_query(rejection: QueryRejection) -> AppError {
    AppError::validation(rejection.body_text())
}
