mod common;

use common::Harness;
use serde_json::{json, Value};

#[tokio::test]
async fn public_listing_hides_inactive_products() {
    let h = Harness::new().await;
    h.seed().await;

    let resp = h
        .app
        .get("/api/products")
        .send()
        .await
        .assert_ok()
        .assert_json_path("data.len()", 2)
        .assert_json_path("pagination.total", 2)
        .assert_json_path("pagination.page", 1)
        .assert_json_path("pagination.limit", 12)
        .assert_json_path("pagination.totalPages", 1)
        .assert_json_path("pagination.hasNext", false)
        .assert_json_path("pagination.hasPrev", false);
    let names: Vec<String> = resp
        .json_path::<Vec<Value>>("data")
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert!(!names.contains(&"Poster".to_string()));
}

#[tokio::test]
async fn price_sort_puts_sale_prices_first() {
    let h = Harness::new().await;
    h.seed().await;
    h.create(json!({ "name": "Sticker", "price": 10 })).await;

    let resp = h
        .app
        .get("/api/products")
        .query(&[("sort", "price-asc")])
        .send()
        .await
        .assert_ok();
    let names: Vec<String> = resp
        .json_path::<Vec<Value>>("data")
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Coffee Mug", "Sticker", "Logo Tee"]);
}

#[tokio::test]
async fn filters_combine() {
    let h = Harness::new().await;
    h.seed().await;

    h.app
        .get("/api/products")
        .query(&[("category", "apparel")])
        .send()
        .await
        .assert_json_path("data.len()", 1)
        .assert_json_path("data[0].slug", "logo-tee");

    h.app
        .get("/api/products")
        .query(&[("featured", "true")])
        .send()
        .await
        .assert_json_path("data.len()", 1)
        .assert_json_path("data[0].name", "Coffee Mug");

    h.app
        .get("/api/products")
        .query(&[("minPrice", "8"), ("maxPrice", "10")])
        .send()
        .await
        .assert_json_path("data.len()", 1)
        .assert_json_path("data[0].name", "Coffee Mug");

    h.app
        .get("/api/products")
        .query(&[("search", "COTTON")])
        .send()
        .await
        .assert_json_path("data.len()", 1)
        .assert_json_path("data[0].name", "Logo Tee");
}

#[tokio::test]
async fn pagination_reports_neighbours() {
    let h = Harness::new().await;
    for i in 0..5 {
        h.create(json!({ "name": format!("Item {i}"), "price": 1 + i }))
            .await;
    }
    h.app
        .get("/api/products?page=2&limit=2")
        .send()
        .await
        .assert_ok()
        .assert_json_path("data.len()", 2)
        .assert_json_path("pagination.total", 5)
        .assert_json_path("pagination.totalPages", 3)
        .assert_json_path("pagination.hasNext", true)
        .assert_json_path("pagination.hasPrev", true);

    h.app
        .get("/api/products?limit=500")
        .send()
        .await
        .assert_json_path("pagination.limit", 50);
}

#[tokio::test]
async fn malformed_filters_are_rejected() {
    let h = Harness::new().await;
    h.app
        .get("/api/products?page=0")
        .send()
        .await
        .assert_bad_request();
    h.app
        .get("/api/products?minPrice=-3")
        .send()
        .await
        .assert_bad_request();
    h.app
        .get("/api/products?featured=maybe")
        .send()
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn hidden_products_need_the_admin_role() {
    let h = Harness::new().await;
    h.seed().await;

    h.app
        .get("/api/products?active=false")
        .send()
        .await
        .assert_unauthorized();
    h.app
        .get("/api/products?active=all")
        .bearer(&h.shopper())
        .send()
        .await
        .assert_forbidden();
    h.app
        .get("/api/products?active=false")
        .bearer(&h.admin())
        .send()
        .await
        .assert_ok()
        .assert_json_path("data.len()", 1)
        .assert_json_path("data[0].name", "Poster");
    h.app
        .get("/api/products?active=all")
        .bearer(&h.admin())
        .send()
        .await
        .assert_json_path("pagination.total", 3);
}

#[tokio::test]
async fn create_applies_defaults_and_coercion() {
    let h = Harness::new().await;
    let product = h
        .create(json!({ "name": "Canvas  Tote Bag", "price": "14.50", "stock": "7" }))
        .await;
    assert_eq!(product["slug"], "canvas-tote-bag");
    assert_eq!(product["price"].as_f64(), Some(14.5));
    assert_eq!(product["stock"], 7);
    assert_eq!(product["isActive"], true);
    assert_eq!(product["isFeatured"], false);
    assert_eq!(product["salePrice"], Value::Null);
    assert_eq!(product["imageUrls"], json!([]));
}

#[tokio::test]
async fn create_requires_admin_and_valid_fields() {
    let h = Harness::new().await;
    let body = json!({ "name": "Mug", "price": 3 });
    h.app
        .post("/api/products")
        .json(&body)
        .send()
        .await
        .assert_unauthorized();
    h.app
        .post("/api/products")
        .bearer(&h.shopper())
        .json(&body)
        .send()
        .await
        .assert_forbidden();
    h.app
        .post("/api/products")
        .bearer(&h.admin())
        .json(&json!({ "name": "Mug" }))
        .send()
        .await
        .assert_bad_request()
        .assert_error("Name and price are required");
    h.app
        .post("/api/products")
        .bearer(&h.admin())
        .json(&json!({ "name": "Mug", "price": 5, "salePrice": 5 }))
        .send()
        .await
        .assert_bad_request()
        .assert_error("Sale price must be less than regular price");
    h.app
        .post("/api/products")
        .bearer(&h.admin())
        .body("{not json")
        .send()
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn duplicate_slugs_are_rejected() {
    let h = Harness::new().await;
    h.create(json!({ "name": "Coffee Mug", "price": 3 })).await;
    h.app
        .post("/api/products")
        .bearer(&h.admin())
        .json(&json!({ "name": "coffee mug", "price": 4 }))
        .send()
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn update_merges_fields() {
    let h = Harness::new().await;
    let (mug, _, _) = h.seed().await;
    let id = mug["id"].as_str().unwrap();

    let updated: Value = h
        .app
        .put("/api/products")
        .bearer(&h.admin())
        .json(&json!({ "id": id, "stock": 40, "salePrice": "" }))
        .send()
        .await
        .assert_ok()
        .json();
    assert_eq!(updated["stock"], 40);
    assert_eq!(updated["salePrice"], Value::Null);
    assert_eq!(updated["name"], "Coffee Mug");

    h.app
        .put("/api/products")
        .bearer(&h.admin())
        .json(&json!({ "id": id, "salePrice": 50 }))
        .send()
        .await
        .assert_bad_request()
        .assert_error("Sale price must be less than regular price");
}

#[tokio::test]
async fn update_needs_a_known_id() {
    let h = Harness::new().await;
    h.app
        .put("/api/products")
        .bearer(&h.admin())
        .json(&json!({ "name": "Nothing" }))
        .send()
        .await
        .assert_bad_request()
        .assert_error("Product ID is required");
    h.app
        .put("/api/products")
        .bearer(&h.admin())
        .json(&json!({ "id": "missing", "name": "Nothing" }))
        .send()
        .await
        .assert_not_found()
        .assert_error("Product not found");
}

#[tokio::test]
async fn delete_by_query_id() {
    let h = Harness::new().await;
    let (_, tee, _) = h.seed().await;

    h.app
        .delete("/api/products")
        .bearer(&h.admin())
        .send()
        .await
        .assert_bad_request()
        .assert_error("Product ID is required");
    h.app
        .delete("/api/products")
        .query(&[("id", tee["id"].as_str().unwrap())])
        .bearer(&h.admin())
        .send()
        .await
        .assert_ok()
        .assert_json_path("message", "Product deleted successfully");
    h.app
        .get("/api/shop/products/logo-tee")
        .send()
        .await
        .assert_not_found();
}

#[tokio::test]
async fn categories_come_from_active_products() {
    let h = Harness::new().await;
    h.seed().await;
    h.app
        .get("/api/categories")
        .send()
        .await
        .assert_ok()
        .assert_json_path("", json!(["apparel", "kitchen"]));
}

#[tokio::test]
async fn product_page_includes_related_products() {
    let h = Harness::new().await;
    h.seed().await;
    h.create(json!({ "name": "Tea Cup", "price": 6, "category": "kitchen" }))
        .await;

    h.app
        .get("/api/shop/products/coffee-mug")
        .send()
        .await
        .assert_ok()
        .assert_json_path("product.name", "Coffee Mug")
        .assert_json_path("related.len()", 1)
        .assert_json_path("related[0].slug", "tea-cup");
    h.app
        .get("/api/shop/products/poster")
        .send()
        .await
        .assert_not_found();
}

#[tokio::test]
async fn me_reports_the_view() {
    let h = Harness::new().await;
    h.app
        .get("/api/me")
        .send()
        .await
        .assert_json_path("view", "guest");
    h.app
        .get("/api/me")
        .bearer(&h.admin())
        .send()
        .await
        .assert_json_path("view", "admin")
        .assert_json_path("user.sub", "admin-1");
    h.app
        .get("/api/me")
        .bearer("not-a-token")
        .send()
        .await
        .assert_unauthorized();
}

#[tokio::test]
async fn health_endpoints_answer() {
    let h = Harness::new().await;
    h.app
        .get("/health")
        .send()
        .await
        .assert_ok()
        .assert_json_path("status", "UP")
        .assert_json_path("checks[0].name", "db");
    h.app.get("/health/live").send().await.assert_ok();
}
