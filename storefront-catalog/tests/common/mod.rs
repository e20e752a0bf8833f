#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use storefront_catalog::model::slugify;
use storefront_catalog::{
    AdminConsole, CatalogService, LocalBlobStore, Order, OrderItem, OrderService, Product,
    ProductQueryBuilder,
};
use storefront_data::{MemoryRepository, Repository};

pub type Products = MemoryRepository<Product>;
pub type Items = MemoryRepository<OrderItem>;
pub type Orders = MemoryRepository<Order>;

pub struct Shop {
    pub products: Products,
    pub items: Items,
    pub orders: Orders,
    pub catalog: CatalogService<Products, Items>,
}

impl Shop {
    pub fn new() -> Self {
        let products = Products::new().with_unique(&["slug"]);
        let items = Items::new();
        let orders = Orders::new().with_unique(&["order_number"]);
        let catalog =
            CatalogService::new(products.clone(), items.clone(), ProductQueryBuilder::default());
        Self {
            products,
            items,
            orders,
            catalog,
        }
    }

    pub fn orders(&self) -> OrderService<Orders, Items, Products> {
        OrderService::new(self.orders.clone(), self.items.clone(), self.products.clone())
    }

    pub fn admin(&self, media: &std::path::Path) -> AdminConsole<Products, Items, LocalBlobStore> {
        AdminConsole::new(self.catalog.clone(), LocalBlobStore::new(media, "/uploads"))
    }

    pub async fn seed(&self, product: Product) -> Product {
        self.products.insert(&product).await.unwrap()
    }
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// An active product created `day` days after the epoch.
pub fn product(name: &str, price: i64, day: i64) -> Product {
    let at = epoch() + Duration::days(day);
    Product {
        id: format!("p-{}", slugify(name)),
        name: name.to_string(),
        slug: slugify(name),
        description: None,
        price: Decimal::from(price),
        sale_price: None,
        stock: 10,
        image_urls: Vec::new(),
        is_active: true,
        is_featured: false,
        category: None,
        tags: Vec::new(),
        created_at: at,
        updated_at: at,
    }
}

pub fn on_sale(mut p: Product, sale: i64) -> Product {
    p.sale_price = Some(Decimal::from(sale));
    p
}

pub fn in_category(mut p: Product, category: &str) -> Product {
    p.category = Some(category.to_string());
    p
}

pub fn inactive(mut p: Product) -> Product {
    p.is_active = false;
    p
}

pub fn order_item(product_id: &str) -> OrderItem {
    OrderItem {
        id: format!("oi-{product_id}"),
        order_id: "o-1".into(),
        product_id: product_id.into(),
        product_name: "Old name".into(),
        product_slug: "old-slug".into(),
        product_image: None,
        price: Decimal::from(1),
        quantity: 1,
    }
}
