//! Order data extracted from a print request

use rust_decimal::Decimal;

/// Placeholder for scalar fields absent from the request
pub const SENTINEL: &str = "N/A";

/// Product name of the item synthesized when a request carries no items
pub const PLACEHOLDER_PRODUCT: &str = "Producto por defecto";

/// One order line
///
/// `total_price` is trusted as sent; it is not recomputed from
/// `unit_price * quantity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub quantity: u32,
    pub product_name: String,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

impl OrderItem {
    pub fn new(
        quantity: u32,
        product_name: impl Into<String>,
        unit_price: Decimal,
        total_price: Decimal,
    ) -> Self {
        Self {
            quantity,
            product_name: product_name.into(),
            unit_price,
            total_price,
        }
    }

    /// Single item used when the request lists none
    pub fn placeholder() -> Self {
        Self::new(1, PLACEHOLDER_PRODUCT, Decimal::ZERO, Decimal::ZERO)
    }
}

/// Order to print, created per request and immutable once extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    table_number: Option<String>,
    customer_name: Option<String>,
    restaurant_name: Option<String>,
    items: Vec<OrderItem>,
}

impl Order {
    /// Create an order; an empty item list is replaced by the placeholder item
    pub fn new(items: Vec<OrderItem>) -> Self {
        let items = if items.is_empty() {
            vec![OrderItem::placeholder()]
        } else {
            items
        };
        Self {
            table_number: None,
            customer_name: None,
            restaurant_name: None,
            items,
        }
    }

    pub fn with_table_number(mut self, table_number: impl Into<String>) -> Self {
        self.table_number = Some(table_number.into());
        self
    }

    pub fn with_customer_name(mut self, customer_name: impl Into<String>) -> Self {
        self.customer_name = Some(customer_name.into());
        self
    }

    pub fn with_restaurant_name(mut self, restaurant_name: impl Into<String>) -> Self {
        self.restaurant_name = Some(restaurant_name.into());
        self
    }

    /// Table number, or the sentinel when absent
    pub fn table_number(&self) -> &str {
        self.table_number.as_deref().unwrap_or(SENTINEL)
    }

    /// Customer name, or the sentinel when absent
    pub fn customer_name(&self) -> &str {
        self.customer_name.as_deref().unwrap_or(SENTINEL)
    }

    /// Restaurant name, or the sentinel when absent
    pub fn restaurant_name(&self) -> &str {
        self.restaurant_name.as_deref().unwrap_or(SENTINEL)
    }

    /// Customer name only when the request carried a non-empty one
    pub fn provided_customer(&self) -> Option<&str> {
        self.customer_name.as_deref().filter(|c| !c.is_empty())
    }

    /// Restaurant name only when the request carried a non-empty one
    pub fn provided_restaurant(&self) -> Option<&str> {
        self.restaurant_name.as_deref().filter(|r| !r.is_empty())
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Sum of the items' total prices
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|i| i.total_price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_items_get_placeholder() {
        let order = Order::new(vec![]);
        assert_eq!(order.items(), &[OrderItem::placeholder()]);
        assert_eq!(order.items()[0].product_name, PLACEHOLDER_PRODUCT);
        assert_eq!(order.items()[0].quantity, 1);
    }

    #[test]
    fn test_sentinels() {
        let order = Order::new(vec![]);
        assert_eq!(order.table_number(), SENTINEL);
        assert_eq!(order.customer_name(), SENTINEL);
        assert_eq!(order.restaurant_name(), SENTINEL);
        assert_eq!(order.provided_customer(), None);
    }

    #[test]
    fn test_empty_customer_not_provided() {
        let order = Order::new(vec![]).with_customer_name("");
        assert_eq!(order.customer_name(), "");
        assert_eq!(order.provided_customer(), None);
    }

    #[test]
    fn test_total_trusts_item_totals() {
        let order = Order::new(vec![
            OrderItem::new(2, "Cola", d("2.50"), d("5.00")),
            // Mismatched on purpose: 3 x 1.00 != 2.00
            OrderItem::new(3, "Agua", d("1.00"), d("2.00")),
        ]);
        assert_eq!(order.total(), d("7.00"));
    }
}
