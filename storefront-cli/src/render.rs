//! Plain-text views. Colour is applied by `colored`, which turns itself off
//! when stdout is not a terminal.

use std::fmt::Write;

use colored::Colorize;
use rust_decimal::Decimal;
use storefront_cart::{Cart, CartError};
use storefront_catalog::{Order, Product};
use storefront_data::Page;

use crate::client::ProductPage;

pub fn money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

fn price_tag(product: &Product) -> String {
    match product.sale_price {
        Some(sale) => format!(
            "{} {}",
            money(sale).green().bold(),
            money(product.price).dimmed().strikethrough()
        ),
        None => money(product.price).bold().to_string(),
    }
}

pub fn product_list(page: &Page<Product>) -> String {
    let mut out = String::new();
    if page.data.is_empty() {
        let _ = writeln!(out, "{}", "No products match these filters.".yellow());
    }
    for product in &page.data {
        let stock = if product.stock > 0 {
            format!("{} in stock", product.stock).normal()
        } else {
            "out of stock".red()
        };
        let _ = writeln!(
            out,
            "{:<32} {:<28} {}  ({stock})",
            product.name.bold(),
            product.slug.dimmed(),
            price_tag(product),
        );
    }
    let p = &page.pagination;
    let _ = writeln!(
        out,
        "Page {} of {} ({} products)",
        p.page,
        p.total_pages.max(1),
        p.total
    );
    out
}

pub fn product_page(page: &ProductPage) -> String {
    let product = &page.product;
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.name.bold().underline());
    let _ = writeln!(out, "{}", price_tag(product));
    if let Some(description) = &product.description {
        let _ = writeln!(out, "\n{description}\n");
    }
    if let Some(category) = &product.category {
        let _ = writeln!(out, "Category: {category}");
    }
    if product.stock > 0 {
        let _ = writeln!(out, "In stock ({} available)", product.stock);
    } else {
        let _ = writeln!(out, "{}", "Out of stock".red());
    }
    if !product.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", product.tags.join(", "));
    }
    let _ = writeln!(out, "Id: {}", product.id.dimmed());
    if !page.related.is_empty() {
        let _ = writeln!(out, "\n{}", "You may also like".bold());
        for related in &page.related {
            let _ = writeln!(out, "  {} ({})", related.name, related.slug.dimmed());
        }
    }
    out
}

pub fn cart(cart: &Cart) -> Result<String, CartError> {
    let mut out = String::new();
    if cart.is_empty() {
        let _ = writeln!(out, "Your cart is empty.");
        return Ok(out);
    }
    for item in cart.items() {
        let _ = writeln!(
            out,
            "{:<32} {:>3} x {:>9} = {:>10}  {}",
            item.name.bold(),
            item.quantity,
            money(item.price),
            money(item.line_total()?),
            item.product_id.dimmed(),
        );
    }
    let summary = cart.summary()?;
    let _ = writeln!(out, "Items:    {}", summary.item_count);
    let _ = writeln!(out, "Subtotal: {}", money(summary.subtotal));
    let _ = writeln!(out, "Shipping: {}", money(summary.shipping));
    let _ = writeln!(out, "Tax:      {}", money(summary.tax));
    let _ = writeln!(out, "Total:    {}", money(summary.total).bold());
    Ok(out)
}

pub fn order(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        "Order placed:".green().bold(),
        order.order_number.bold()
    );
    for item in &order.items {
        let _ = writeln!(
            out,
            "  {:<30} {:>3} x {}",
            item.product_name,
            item.quantity,
            money(item.price)
        );
    }
    let _ = writeln!(out, "Total: {}  Status: {}", money(order.total).bold(), order.status);
    out
}
