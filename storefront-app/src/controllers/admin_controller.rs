//! Admin dashboard actions. Each mutation answers with a confirmation and
//! the refreshed product table.

use axum::extract::{Multipart, Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::Serialize;
use storefront_catalog::{AdminOutcome, Product, ProductInput, Upload};
use storefront_core::HttpError;
use storefront_data::Page;
use storefront_security::AdminUser;

use super::{json_body, PageParam};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/products", get(list))
        .route("/api/admin/products/form", post(submit))
        .route("/api/admin/products/{id}/toggle", post(toggle))
        .route("/api/admin/products/{id}", delete(remove))
        .route("/api/admin/uploads", post(upload))
}

async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(params): Query<PageParam>,
) -> Result<Json<Page<Product>>, HttpError> {
    Ok(Json(state.admin.list(params.page()).await?))
}

async fn submit(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Query(params): Query<PageParam>,
    body: Bytes,
) -> Result<Json<AdminOutcome>, HttpError> {
    let form: ProductInput = json_body(&body)?;
    let outcome = state.admin.submit(form, params.page()).await?;
    tracing::info!(by = %user.sub, message = %outcome.message, "admin form submitted");
    Ok(Json(outcome))
}

async fn toggle(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
    Query(params): Query<PageParam>,
) -> Result<Json<AdminOutcome>, HttpError> {
    let outcome = state.admin.toggle_status(&id, params.page()).await?;
    tracing::info!(%id, by = %user.sub, message = %outcome.message, "product status toggled");
    Ok(Json(outcome))
}

async fn remove(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
    Query(params): Query<PageParam>,
) -> Result<Json<AdminOutcome>, HttpError> {
    let outcome = state.admin.remove(&id, params.page()).await?;
    tracing::info!(%id, by = %user.sub, "product removed");
    Ok(Json(outcome))
}

#[derive(Serialize)]
struct Uploaded {
    urls: Vec<String>,
}

/// Multipart upload; every part carrying a file name is stored.
async fn upload(
    State(state): State<AppState>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<Uploaded>, HttpError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(bad_multipart)?;
        files.push(Upload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    if files.is_empty() {
        return Err(HttpError::BadRequest("No files uploaded".into()));
    }
    let urls = state.admin.store_images(files).await?;
    Ok(Json(Uploaded { urls }))
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> HttpError {
    tracing::debug!(error = %err, "rejected multipart body");
    HttpError::BadRequest(format!("Invalid upload: {}", err.body_text()))
}
