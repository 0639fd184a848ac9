use axum::{
    extract::{FromRequest, Request},
    Json,
};

use crate::error::AppError;

/// Json extractor that rejects through [`AppError`], so malformed
/// bodies share the error envelope every handler already returns.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}
