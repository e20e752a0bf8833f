#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use storefront_app::{build_router, AppState};
use storefront_catalog::MIGRATOR;
use storefront_core::{AppConfig, StorefrontConfig};
use storefront_data_sqlx::connect_sqlite;
use storefront_test::{TestApp, TestJwt};
use tempfile::TempDir;

pub struct Harness {
    pub app: TestApp,
    pub jwt: TestJwt,
    pub state: AppState,
    pub uploads: TempDir,
}

impl Harness {
    pub async fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let mut config = AppConfig::from_yaml_str(
            "catalog:\n  default_page_size: 12\n  max_page_size: 50\n",
            "test",
        )
        .unwrap();
        config.set("media.upload_dir", uploads.path().to_str().unwrap());
        let config = config.with_typed::<StorefrontConfig>().unwrap();

        let pool = connect_sqlite("sqlite::memory:", 1).await.unwrap();
        MIGRATOR.run(&pool).await.unwrap();

        let jwt = TestJwt::new();
        let state = AppState::new(pool, &config, Arc::new(jwt.validator()));
        let app = TestApp::new(build_router(state.clone()));
        Self {
            app,
            jwt,
            state,
            uploads,
        }
    }

    pub fn admin(&self) -> String {
        self.jwt.admin_token()
    }

    pub fn shopper(&self) -> String {
        self.jwt.shopper_token()
    }

    /// Create a product through the API and return its JSON.
    pub async fn create(&self, body: Value) -> Value {
        self.app
            .post("/api/products")
            .bearer(&self.admin())
            .json(&body)
            .send()
            .await
            .assert_created()
            .json()
    }

    /// Mug ($12, sale $9, kitchen), Tee ($20, apparel), Poster ($5, hidden).
    pub async fn seed(&self) -> (Value, Value, Value) {
        let mug = self
            .create(json!({
                "name": "Coffee Mug",
                "price": 12,
                "salePrice": "9",
                "stock": 5,
                "category": "kitchen",
                "tags": ["ceramic"],
            }))
            .await;
        let tee = self
            .create(json!({
                "name": "Logo Tee",
                "price": "20.00",
                "stock": 3,
                "category": "apparel",
                "description": "Soft cotton tee",
            }))
            .await;
        let poster = self
            .create(json!({
                "name": "Poster",
                "price": 5,
                "isActive": false,
                "category": "decor",
            }))
            .await;
        (mug, tee, poster)
    }
}

pub fn checkout_body(lines: Value) -> Value {
    json!({
        "customerName": "Ada Lovelace",
        "customerEmail": "ada@example.com",
        "shippingAddress": {
            "street": "1 Analytical Way",
            "city": "London",
            "state": "LDN",
            "zipCode": "N1 9GU",
            "country": "UK",
        },
        "items": lines,
    })
}
