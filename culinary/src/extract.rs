use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::{error::ApiError, validation::Validate};

/// JSON body extractor that deserializes and then validates the payload.
///
/// Both a malformed body and a failed [`Validate`] check reject the request with
/// [`ApiError::Validation`], so handlers only ever see valid payloads.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await?;
        payload.validate()?;

        Ok(ValidJson(payload))
    }
}
