use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use storefront_security::{AuthenticatedUser, Viewer};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/me", get(me))
}

#[derive(Serialize)]
struct Me {
    view: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<AuthenticatedUser>,
}

/// Which experience to show: the admin dashboard, the shop for a signed-in
/// customer, or the shop for a guest.
async fn me(viewer: Viewer) -> Json<Me> {
    Json(Me {
        view: viewer.view(),
        user: viewer.user().cloned(),
    })
}
