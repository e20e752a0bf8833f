//! Admin dashboard flows: validate, call the catalog, refresh the list.

use serde::Serialize;
use storefront_data::{Page, Repository};

use crate::error::CatalogError;
use crate::filter::{FilterRequest, Visibility};
use crate::media::{check_upload, BlobStore, Upload};
use crate::model::{OrderItem, Product};
use crate::payload::{ProductInput, NAME_AND_PRICE_REQUIRED};
use crate::query::Scope;
use crate::service::CatalogService;

/// Page size of the admin product table.
pub const ADMIN_PAGE_SIZE: u64 = 10;

/// Result of an admin action: a confirmation and the refreshed product table.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOutcome {
    pub message: String,
    pub products: Page<Product>,
}

#[derive(Clone)]
pub struct AdminConsole<P, I, B> {
    catalog: CatalogService<P, I>,
    blobs: B,
}

impl<P, I, B> AdminConsole<P, I, B>
where
    P: Repository<Product>,
    I: Repository<OrderItem>,
    B: BlobStore,
{
    pub fn new(catalog: CatalogService<P, I>, blobs: B) -> Self {
        Self { catalog, blobs }
    }

    /// Every product regardless of visibility, newest first.
    pub async fn list(&self, page: u64) -> Result<Page<Product>, CatalogError> {
        let request = FilterRequest {
            page: page.max(1),
            limit: Some(ADMIN_PAGE_SIZE),
            active: Visibility::All,
            ..FilterRequest::new()
        };
        self.catalog.list_products(&request, Scope::Admin).await
    }

    /// Create the product, or update it when the form carries an id.
    pub async fn submit(&self, form: ProductInput, page: u64) -> Result<AdminOutcome, CatalogError> {
        let has_name = form.name.as_deref().is_some_and(|n| !n.trim().is_empty());
        let has_price = form.price.is_some();
        if !has_name || !has_price {
            let field = if has_name { "price" } else { "name" };
            return Err(CatalogError::validation(field, NAME_AND_PRICE_REQUIRED));
        }

        let message = match form.id.clone().filter(|id| !id.is_empty()) {
            Some(id) => {
                self.catalog.update_product(&id, form).await?;
                "Product updated successfully"
            }
            None => {
                self.catalog.create_product(form).await?;
                "Product created successfully"
            }
        };
        self.outcome(message, page).await
    }

    pub async fn toggle_status(&self, id: &str, page: u64) -> Result<AdminOutcome, CatalogError> {
        let product = self.catalog.get_product(id).await?;
        let activate = !product.is_active;
        let patch = ProductInput {
            is_active: Some(activate),
            ..ProductInput::default()
        };
        self.catalog.update_product(id, patch).await?;
        let message = if activate {
            "Product activated successfully"
        } else {
            "Product deactivated successfully"
        };
        self.outcome(message, page).await
    }

    pub async fn remove(&self, id: &str, page: u64) -> Result<AdminOutcome, CatalogError> {
        self.catalog.delete_product(id).await?;
        self.outcome("Product deleted successfully", page).await
    }

    /// Store each file and append its URL to the form's images. Nothing is
    /// appended unless every upload succeeds.
    pub async fn upload_images(
        &self,
        form: &mut ProductInput,
        files: Vec<Upload>,
    ) -> Result<Vec<String>, CatalogError> {
        let urls = self.store_images(files).await?;
        form.image_urls
            .get_or_insert_with(Vec::new)
            .extend(urls.iter().cloned());
        Ok(urls)
    }

    /// Store files without a form, for the upload endpoint.
    ///
    /// All or nothing: when one file fails, the ones already stored are
    /// discarded before the error is returned.
    pub async fn store_images(&self, files: Vec<Upload>) -> Result<Vec<String>, CatalogError> {
        for file in &files {
            check_upload(file)?;
        }
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            match self.blobs.upload(file).await {
                Ok(url) => urls.push(url),
                Err(err) => {
                    self.discard_all(&urls).await;
                    return Err(err);
                }
            }
        }
        Ok(urls)
    }

    async fn discard_all(&self, urls: &[String]) {
        for url in urls {
            if let Err(err) = self.blobs.discard(url).await {
                tracing::warn!(%url, error = %err, "could not discard stored image");
            }
        }
    }

    async fn outcome(&self, message: &str, page: u64) -> Result<AdminOutcome, CatalogError> {
        Ok(AdminOutcome {
            message: message.to_string(),
            products: self.list(page).await?,
        })
    }
}
