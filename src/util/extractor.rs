use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use tracing::debug;

/// an extractor that internally uses `axum::extract::Json` but never rejects
///
/// A missing or non-JSON content type, an unreadable body or a body that
/// fails to deserialize all produce `OptionalJson(None)`.
#[derive(Debug, Clone, Default)]
pub struct OptionalJson<T>(pub Option<T>);

impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Json::<T>::from_request(req, state).await {
            Ok(axum::extract::Json(value)) => Ok(OptionalJson(Some(value))),
            Err(rejection) => {
                debug!("ignoring request body: {}", rejection.body_text());
                Ok(OptionalJson(None))
            }
        }
    }
}

/// an extractor that internally uses `axum::extract::Query` but never rejects
#[derive(Debug, Clone, Default)]
pub struct OptionalQuery<T>(pub Option<T>);

impl<T, S> FromRequestParts<S> for OptionalQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(OptionalQuery(Some(value))),
            Err(rejection) => {
                debug!("ignoring query string: {}", rejection.body_text());
                Ok(OptionalQuery(None))
            }
        }
    }
}
