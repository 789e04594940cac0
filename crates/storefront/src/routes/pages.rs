//! Page route handler.
//!
//! Every page request goes through the filename router. Recognised pages are
//! rendered from the catalog and a snapshot of the cart; anything else is
//! served from the static directory.

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::router::{self, Page, RouteParams};
use crate::state::AppState;

/// Render a page, or fall through to a static file.
///
/// # Errors
///
/// Returns an error if rendering fails or no static file matches.
#[instrument(skip(state, request), fields(path = %request.uri().path()))]
pub async fn page(
    State(state): State<AppState>,
    Query(params): Query<RouteParams>,
    request: Request,
) -> Result<Response> {
    let page = Page::from_path(request.uri().path());
    let cart = state.cart().await.snapshot();

    let Some(rendered) = router::dispatch(page, &params, state.catalog(), &cart) else {
        return serve_static(&state, request).await;
    };

    let fragment = rendered?;
    let status = if fragment.is_not_found() {
        tracing::debug!(?page, title = %fragment.title, "Page record not found");
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    Ok((status, Html(fragment.html)).into_response())
}

/// Serve a file from the static directory.
async fn serve_static(state: &AppState, request: Request) -> Result<Response> {
    let path = request.uri().path().to_string();
    let response = match ServeDir::new(&state.config().static_dir)
        .oneshot(request)
        .await
    {
        Ok(response) => response,
        Err(never) => match never {},
    };

    if response.status() == StatusCode::NOT_FOUND {
        return Err(AppError::NotFound(path));
    }
    Ok(response.into_response())
}
