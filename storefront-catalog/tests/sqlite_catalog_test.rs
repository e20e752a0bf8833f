mod common;

use common::{in_category, on_sale, product};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::Sqlite;
use storefront_catalog::{
    CatalogError, CatalogService, CheckoutRequest, FilterRequest, Order, OrderItem, OrderService,
    Product, ProductQueryBuilder, Scope, MIGRATOR,
};
use storefront_data::Repository;
use storefront_data_sqlx::{connect_sqlite, SqlxRepository};

type Repo<T> = SqlxRepository<T, Sqlite>;

async fn setup() -> (
    CatalogService<Repo<Product>, Repo<OrderItem>>,
    OrderService<Repo<Order>, Repo<OrderItem>, Repo<Product>>,
) {
    let pool = connect_sqlite("sqlite::memory:", 1).await.unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    let products = Repo::<Product>::new(pool.clone());
    let items = Repo::<OrderItem>::new(pool.clone());
    let orders = Repo::<Order>::new(pool);
    (
        CatalogService::new(products.clone(), items.clone(), ProductQueryBuilder::default()),
        OrderService::new(orders, items, products),
    )
}

#[tokio::test]
async fn listing_round_trips_through_sqlite() {
    let (catalog, _) = setup().await;
    let products = catalog.products();
    let mut mug = in_category(product("Red Mug", 25, 0), "kitchen");
    mug.tags = vec!["ceramic".into(), "gift".into()];
    mug.image_urls = vec!["/uploads/mug.png".into()];
    products.insert(&mug).await.unwrap();
    products
        .insert(&on_sale(in_category(product("Tea Pot", 30, 1), "kitchen"), 20))
        .await
        .unwrap();
    products.insert(&product("Scarf", 15, 2)).await.unwrap();

    let req = FilterRequest::from_query("sort=price-asc").unwrap();
    let page = catalog.list_products(&req, Scope::Public).await.unwrap();
    let names: Vec<_> = page.data.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Tea Pot", "Scarf", "Red Mug"]);
    assert_eq!(page.data[2], mug);

    let req = FilterRequest::from_query("minPrice=18&maxPrice=22").unwrap();
    let page = catalog.list_products(&req, Scope::Public).await.unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.data[0].name, "Tea Pot");

    let req = FilterRequest::from_query("search=gift").unwrap();
    let page = catalog.list_products(&req, Scope::Public).await.unwrap();
    assert_eq!(page.data[0].name, "Red Mug");

    assert_eq!(catalog.list_categories().await.unwrap(), vec!["kitchen".to_string()]);
}

#[tokio::test]
async fn create_update_and_guarded_delete_in_sqlite() {
    let (catalog, orders) = setup().await;
    let created = catalog
        .create_product(serde_json::from_value(json!({ "name": "Desk Lamp", "price": 49.99, "stock": 3 })).unwrap())
        .await
        .unwrap();
    assert_eq!(created.price, Decimal::new(4999, 2));

    let updated = catalog
        .update_product(
            &created.id,
            serde_json::from_value(json!({ "salePrice": "39.99" })).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(catalog.get_product(&created.id).await.unwrap(), updated);

    let checkout: CheckoutRequest = serde_json::from_value(json!({
        "customerName": "Grace",
        "customerEmail": "grace@example.com",
        "shippingAddress": {
            "street": "2 Compiler Rd", "city": "Arlington", "state": "VA",
            "zipCode": "22201", "country": "US"
        },
        "items": [{ "productId": created.id, "quantity": 2 }]
    }))
    .unwrap();
    let order = orders.place_order(checkout).await.unwrap();
    assert_eq!(order.total, Decimal::new(7998, 2));
    assert_eq!(orders.get_order(&order.id).await.unwrap().items.len(), 1);
    assert_eq!(catalog.get_product(&created.id).await.unwrap().stock, 1);

    assert!(matches!(
        catalog.delete_product(&created.id).await,
        Err(CatalogError::Conflict(_))
    ));
}

#[tokio::test]
async fn non_ascii_search_matches_in_sqlite() {
    let (catalog, _) = setup().await;
    let mut tin = product("Éclair Tin", 8, 0);
    tin.description = Some("Crème brûlée flavour".into());
    catalog.products().insert(&tin).await.unwrap();
    catalog.products().insert(&product("Plain Tin", 8, 1)).await.unwrap();

    for term in ["Éclair", "éclair", "ÉCLAIR", "clair", "BRÛLÉE"] {
        let mut req = FilterRequest::new();
        req.search = Some(term.into());
        let page = catalog.list_products(&req, Scope::Public).await.unwrap();
        assert_eq!(page.pagination.total, 1, "{term}");
        assert_eq!(page.data[0].name, "Éclair Tin");
    }

    // Renames refresh the folded copy.
    let renamed = catalog
        .update_product(&tin.id, serde_json::from_value(json!({ "name": "Ölkanne" })).unwrap())
        .await
        .unwrap();
    let req = FilterRequest::from_query("search=ÖLKANNE").unwrap();
    let page = catalog.list_products(&req, Scope::Public).await.unwrap();
    assert_eq!(page.data, vec![renamed]);
}

#[tokio::test]
async fn page_far_past_the_end_is_empty_in_sqlite() {
    let (catalog, _) = setup().await;
    catalog.products().insert(&product("Only", 10, 0)).await.unwrap();

    for page in ["1000000000000000000", "10000000000000000000"] {
        let req = FilterRequest::from_query(&format!("page={page}")).unwrap();
        let listed = catalog.list_products(&req, Scope::Public).await.unwrap();
        assert!(listed.data.is_empty(), "page {page}");
        assert_eq!(listed.pagination.total, 1);
    }
}

#[tokio::test]
async fn prices_round_trip_exactly_in_sqlite() {
    let (catalog, _) = setup().await;
    let created = catalog
        .create_product(
            serde_json::from_value(json!({
                "name": "50% Off Mug",
                "price": "99999999.99",
                "salePrice": "99999999.98"
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    let stored = catalog.product_by_slug("50-off-mug").await.unwrap();
    assert_eq!(stored.price, Decimal::new(9_999_999_999, 2));
    assert_eq!(stored.sale_price, Some(Decimal::new(9_999_999_998, 2)));
    assert_eq!(stored, created);

    let err = catalog
        .create_product(
            serde_json::from_value(json!({
                "name": "Fine Mug",
                "price": "10.0000004",
                "salePrice": "10.0000003"
            }))
            .unwrap(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
}
