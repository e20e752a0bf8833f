use std::sync::Arc;

use axum::extract::{Query, RawQuery};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use storefront_security::{AdminUser, JwtClaimsValidator, Viewer};
use storefront_test::{TestApp, TestJwt};

fn app(jwt: &TestJwt) -> TestApp {
    let validator: Arc<JwtClaimsValidator> = Arc::new(jwt.validator());
    let router = Router::new()
        .route(
            "/whoami",
            get(|viewer: Viewer| async move { Json(json!({ "view": viewer.view() })) }),
        )
        .route(
            "/admin",
            get(|admin: AdminUser| async move { Json(json!({ "sub": admin.sub })) }),
        )
        .route(
            "/echo",
            post(|Json(body): Json<Value>| async move { Json(body) }),
        )
        .route(
            "/query",
            get(|RawQuery(raw): RawQuery, Query(pairs): Query<Vec<(String, String)>>| async move {
                Json(json!({ "raw": raw, "count": pairs.len() }))
            }),
        )
        .with_state(validator);
    TestApp::new(router)
}

#[tokio::test]
async fn anonymous_requests_are_guests() {
    let jwt = TestJwt::new();
    app(&jwt)
        .get("/whoami")
        .send()
        .await
        .assert_ok()
        .assert_json_path("view", "guest");
}

#[tokio::test]
async fn role_decides_the_view() {
    let jwt = TestJwt::new();
    let app = app(&jwt);
    app.get("/whoami")
        .bearer(&jwt.admin_token())
        .send()
        .await
        .assert_json_path("view", "admin");
    app.get("/whoami")
        .bearer(&jwt.shopper_token())
        .send()
        .await
        .assert_json_path("view", "shopper");
    let metadata = jwt.builder("meta-admin").metadata_role("admin").build();
    app.get("/whoami")
        .bearer(&metadata)
        .send()
        .await
        .assert_json_path("view", "admin");
}

#[tokio::test]
async fn admin_routes_reject_shoppers_and_anonymous() {
    let jwt = TestJwt::new();
    let app = app(&jwt);
    app.get("/admin").send().await.assert_unauthorized();
    app.get("/admin")
        .bearer(&jwt.shopper_token())
        .send()
        .await
        .assert_forbidden()
        .assert_error("Insufficient roles");
    app.get("/admin")
        .bearer(&jwt.admin_token())
        .send()
        .await
        .assert_ok()
        .assert_json_path("sub", "admin-1");
}

#[tokio::test]
async fn tokens_from_another_issuer_are_rejected() {
    let jwt = TestJwt::new();
    let forged = jwt.builder("x").roles(&["admin"]).claim("iss", "elsewhere").build();
    app(&jwt)
        .get("/admin")
        .bearer(&forged)
        .send()
        .await
        .assert_unauthorized();
}

#[tokio::test]
async fn json_bodies_round_trip() {
    let jwt = TestJwt::new();
    let resp = app(&jwt)
        .post("/echo")
        .json(&json!({ "items": [{ "name": "Mug" }, { "name": "Tee" }] }))
        .send()
        .await
        .assert_ok()
        .assert_json_path("items.len()", 2)
        .assert_json_path("items[1].name", "Tee");
    assert_eq!(resp.header("content-type"), Some("application/json"));
    let first: String = resp.json_path("items[0].name");
    assert_eq!(first, "Mug");
}

#[tokio::test]
async fn query_pairs_are_encoded() {
    let jwt = TestJwt::new();
    app(&jwt)
        .get("/query")
        .query(&[("search", "coffee mug"), ("sort", "price-asc")])
        .send()
        .await
        .assert_ok()
        .assert_json_path("raw", "search=coffee+mug&sort=price-asc")
        .assert_json_path("count", 2);
}
