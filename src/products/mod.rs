//! Owner-scoped product listings.
//!
//! Every operation takes the caller's [`AuthContext`] and passes its owner id
//! down to the store. A product owned by someone else behaves exactly like a
//! product that does not exist.

use crate::db::ProductStore;
use crate::types::{
    AppError, AuthContext, Category, CreateProductRequest, NewProduct, Product, ProductPatch,
    Result, UpdateProductRequest, DEFAULT_STOCK,
};
use std::sync::Arc;

pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, ctx: &AuthContext, req: CreateProductRequest) -> Result<Product> {
        let product = validate_new(req)?;
        let stored = self.store.insert_product(&ctx.owner_id, &product).await?;

        tracing::info!(owner_id = %ctx.owner_id, product_id = %stored.id, "product created");
        Ok(stored)
    }

    pub async fn list_owned(&self, ctx: &AuthContext) -> Result<Vec<Product>> {
        self.store.list_by_owner(&ctx.owner_id).await
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: &str,
        req: UpdateProductRequest,
    ) -> Result<Product> {
        let patch = validate_patch(req)?;

        self.store
            .update_by_id_and_owner(id, &ctx.owner_id, &patch)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: &str) -> Result<()> {
        if self.store.delete_by_id_and_owner(id, &ctx.owner_id).await? {
            tracing::info!(owner_id = %ctx.owner_id, product_id = %id, "product deleted");
            Ok(())
        } else {
            Err(not_found())
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}

fn required_text(field: &str, value: String) -> Result<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("'{}' is required", field)));
    }
    Ok(value)
}

fn non_blank(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.trim().is_empty())
}

fn check_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::InvalidInput(
            "'price' must be a non-negative number".to_string(),
        ));
    }
    Ok(price)
}

fn check_stock(stock: i64) -> Result<i64> {
    if stock < 0 {
        return Err(AppError::InvalidInput(
            "'stock' must be a non-negative integer".to_string(),
        ));
    }
    Ok(stock)
}

fn validate_new(req: CreateProductRequest) -> Result<NewProduct> {
    let name = required_text("name", req.name)?;
    let category: Category = req.category.trim().parse()?;
    let description = required_text("description", req.description)?;
    let price = req
        .price
        .ok_or_else(|| AppError::InvalidInput("'price' is required".to_string()))
        .and_then(check_price)?;
    let stock = check_stock(req.stock.unwrap_or(DEFAULT_STOCK))?;

    Ok(NewProduct {
        name,
        category,
        description,
        price,
        image_url: non_blank(req.image_url),
        stock,
    })
}

fn validate_patch(req: UpdateProductRequest) -> Result<ProductPatch> {
    Ok(ProductPatch {
        name: req.name.map(|n| required_text("name", n)).transpose()?,
        category: req
            .category
            .map(|c| c.trim().parse::<Category>())
            .transpose()?,
        description: req
            .description
            .map(|d| required_text("description", d))
            .transpose()?,
        price: req.price.map(check_price).transpose()?,
        image_url: non_blank(req.image_url),
        stock: req.stock.map(check_stock).transpose()?,
    })
}
