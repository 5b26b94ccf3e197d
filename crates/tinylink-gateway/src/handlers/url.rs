use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

pub async fn create_url_handler(
    State(state): State<AppState>,
    request: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let Json(request) = request?;
    let code = state.shortener().create(&request.original_url).await?;

    let response = CreateUrlResponse {
        short_url: code.to_url(state.base_url()),
        short_code: code.to_string(),
        original_url: request.original_url,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let target = state.shortener().resolve(&short_code).await?;
    let location =
        HeaderValue::try_from(target).map_err(|_| AppError::InvalidLocation { code: short_code })?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}
