use storefront_cart::{Cart, CartStore, KeyValueStore};
use storefront_catalog::{CheckoutLine, CheckoutRequest, Order, ShippingAddress};

use crate::client::ShopClient;
use crate::error::CliError;

/// Customer details collected by the checkout command.
#[derive(Debug, Clone)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: ShippingAddress,
    pub payment_method: Option<String>,
}

/// Only ids and quantities are sent; the server prices the order.
pub fn checkout_request(cart: &Cart, customer: CustomerDetails) -> CheckoutRequest {
    CheckoutRequest {
        customer_name: customer.name,
        customer_email: customer.email,
        customer_phone: customer.phone,
        shipping_address: customer.address,
        payment_method: customer.payment_method,
        items: cart
            .items()
            .iter()
            .map(|item| CheckoutLine {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
            })
            .collect(),
    }
}

/// Place the order for the current cart and empty the cart once the server
/// accepts it. A refused order leaves the cart as it was.
pub async fn place_order<S: KeyValueStore>(
    client: &ShopClient,
    store: &mut CartStore<S>,
    customer: CustomerDetails,
) -> Result<Order, CliError> {
    let cart = store.load()?;
    if cart.is_empty() {
        return Err(CliError::Input("your cart is empty".into()));
    }
    let order = client.checkout(&checkout_request(&cart, customer)).await?;
    store.clear()?;
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use storefront_cart::Purchasable;

    struct Item(&'static str);

    impl Purchasable for Item {
        fn product_id(&self) -> &str {
            self.0
        }
        fn display_name(&self) -> &str {
            self.0
        }
        fn effective_price(&self) -> Decimal {
            Decimal::from(3)
        }
        fn primary_image(&self) -> Option<&str> {
            None
        }
    }

    #[test]
    fn request_carries_ids_and_quantities_only() {
        let mut cart = Cart::new();
        cart.add_item(&Item("p-1"), 2);
        cart.add_item(&Item("p-2"), 1);
        let request = checkout_request(
            &cart,
            CustomerDetails {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: None,
                address: ShippingAddress {
                    street: "1 Way".into(),
                    city: "London".into(),
                    state: "LDN".into(),
                    zip_code: "N1".into(),
                    country: "UK".into(),
                },
                payment_method: Some("card".into()),
            },
        );
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[0].product_id, "p-1");
        assert_eq!(request.items[0].quantity, 2);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json["items"][0].get("price").is_none());
        assert_eq!(json["shippingAddress"]["zipCode"], "N1");
    }
}
