mod common;

use common::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

use storefront_catalog::{
    AdminConsole, BlobStore, CatalogError, ProductInput, Upload, ADMIN_PAGE_SIZE,
};
use storefront_data::{DataError, Repository};

fn form(body: serde_json::Value) -> ProductInput {
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn submit_creates_then_updates_and_refreshes() {
    let shop = Shop::new();
    let media = tempfile::tempdir().unwrap();
    let admin = shop.admin(media.path());

    let created = admin
        .submit(form(json!({ "name": "Desk Lamp", "price": "40", "isActive": false })), 1)
        .await
        .unwrap();
    assert_eq!(created.message, "Product created successfully");
    assert_eq!(created.products.data.len(), 1);
    assert_eq!(created.products.pagination.limit, ADMIN_PAGE_SIZE);
    let lamp = created.products.data[0].clone();
    assert!(!lamp.is_active, "admin list shows inactive products");

    let updated = admin
        .submit(
            form(json!({ "id": lamp.id, "name": "Desk Lamp", "price": 35, "salePrice": 30 })),
            1,
        )
        .await
        .unwrap();
    assert_eq!(updated.message, "Product updated successfully");
    assert_eq!(updated.products.data[0].price, rust_decimal::Decimal::from(35));
    assert_eq!(updated.products.pagination.total, 1);
}

#[tokio::test]
async fn submit_requires_name_and_price_even_for_edits() {
    let shop = Shop::new();
    let media = tempfile::tempdir().unwrap();
    let admin = shop.admin(media.path());
    let lamp = shop.seed(product("Lamp", 10, 0)).await;

    let err = admin
        .submit(form(json!({ "id": lamp.id, "name": "Lamp" })), 1)
        .await
        .unwrap_err();
    assert_eq!(err.public_message(), "Name and price are required");
}

#[tokio::test]
async fn toggle_flips_visibility() {
    let shop = Shop::new();
    let media = tempfile::tempdir().unwrap();
    let admin = shop.admin(media.path());
    let lamp = shop.seed(product("Lamp", 10, 0)).await;

    let off = admin.toggle_status(&lamp.id, 1).await.unwrap();
    assert_eq!(off.message, "Product deactivated successfully");
    assert!(!off.products.data[0].is_active);

    let on = admin.toggle_status(&lamp.id, 1).await.unwrap();
    assert_eq!(on.message, "Product activated successfully");
    assert!(on.products.data[0].is_active);
}

#[tokio::test]
async fn remove_refuses_ordered_products() {
    let shop = Shop::new();
    let media = tempfile::tempdir().unwrap();
    let admin = shop.admin(media.path());
    let ordered = shop.seed(product("Ordered", 10, 0)).await;
    let spare = shop.seed(product("Spare", 10, 1)).await;
    shop.items.insert(&order_item(&ordered.id)).await.unwrap();

    let err = admin.remove(&ordered.id, 1).await.unwrap_err();
    assert_eq!(err.public_message(), "Product cannot be deleted as it exists in orders");

    let outcome = admin.remove(&spare.id, 1).await.unwrap();
    assert_eq!(outcome.message, "Product deleted successfully");
    assert_eq!(outcome.products.pagination.total, 1);
}

#[tokio::test]
async fn upload_appends_urls_to_form() {
    let shop = Shop::new();
    let media = tempfile::tempdir().unwrap();
    let admin = shop.admin(media.path());
    let mut draft = form(json!({ "name": "Lamp", "price": 10, "imageUrls": ["/existing.png"] }));

    let urls = admin
        .upload_images(
            &mut draft,
            vec![Upload {
                file_name: "lamp.jpg".into(),
                content_type: "image/jpeg".into(),
                bytes: vec![1, 2, 3],
            }],
        )
        .await
        .unwrap();
    assert_eq!(urls.len(), 1);
    let images = draft.image_urls.clone().unwrap();
    assert_eq!(images[0], "/existing.png");
    assert_eq!(images[1], urls[0]);

    let bad = admin
        .upload_images(
            &mut draft,
            vec![Upload {
                file_name: "notes.txt".into(),
                content_type: "text/plain".into(),
                bytes: vec![1],
            }],
        )
        .await;
    assert!(matches!(bad, Err(CatalogError::Validation(_))));
    assert_eq!(draft.image_urls.unwrap().len(), 2);
}

fn image(name: &str) -> Upload {
    Upload {
        file_name: name.into(),
        content_type: "image/png".into(),
        bytes: vec![1, 2, 3],
    }
}

#[tokio::test]
async fn rejected_batch_leaves_no_files_behind() {
    let shop = Shop::new();
    let media = tempfile::tempdir().unwrap();
    let admin = shop.admin(media.path());
    let mut notes = image("notes.txt");
    notes.content_type = "text/plain".into();

    let err = admin
        .store_images(vec![image("a.png"), image("b.png"), notes])
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    let left = std::fs::read_dir(media.path()).map(|d| d.count()).unwrap_or(0);
    assert_eq!(left, 0);
}

/// Keeps uploads in memory and fails once it already holds `capacity` files.
#[derive(Clone, Default)]
struct SmallDisk {
    capacity: usize,
    stored: Arc<Mutex<Vec<String>>>,
}

impl BlobStore for SmallDisk {
    async fn upload(&self, file: Upload) -> Result<String, CatalogError> {
        let mut stored = self.stored.lock().unwrap();
        if stored.len() == self.capacity {
            return Err(CatalogError::from_data(
                "upload images",
                DataError::Other("disk full".into()),
            ));
        }
        let url = format!("/mem/{}", file.file_name);
        stored.push(url.clone());
        Ok(url)
    }

    async fn discard(&self, url: &str) -> Result<(), CatalogError> {
        self.stored.lock().unwrap().retain(|u| u != url);
        Ok(())
    }
}

#[tokio::test]
async fn failed_upload_discards_earlier_files() {
    let shop = Shop::new();
    let disk = SmallDisk {
        capacity: 2,
        ..SmallDisk::default()
    };
    let admin = AdminConsole::new(shop.catalog.clone(), disk.clone());
    let mut draft = form(json!({ "name": "Lamp", "price": 10 }));

    let err = admin
        .upload_images(&mut draft, vec![image("a.png"), image("b.png"), image("c.png")])
        .await
        .unwrap_err();
    assert_eq!(err.public_message(), "Failed to upload images");
    assert!(disk.stored.lock().unwrap().is_empty());
    assert!(draft.image_urls.is_none());

    let urls = admin.store_images(vec![image("a.png"), image("b.png")]).await.unwrap();
    assert_eq!(urls, vec!["/mem/a.png", "/mem/b.png"]);
    assert_eq!(*disk.stored.lock().unwrap(), urls);
}
