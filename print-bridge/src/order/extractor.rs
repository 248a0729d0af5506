//! Lenient order extraction
//!
//! Not a JSON parser. Point-of-sale front-ends send loosely formed
//! payloads, so the grammar is a tagged-field scan over byte offsets:
//!
//! - A field is found by its key literal, e.g. `"tableNumber":` (first
//!   occurrence, no whitespace between the key and the colon).
//! - A string value is the text between the first `"` after the key and the
//!   next `"`. Escapes are not understood: an embedded quote ends the value.
//! - A numeric value skips whitespace and quotes after the key, then takes
//!   the run of digits, `.` and `-`.
//! - Items follow the `"items":[` marker as a sequence of flat `{...}` spans
//!   separated by commas/whitespace. Nested objects are not supported.
//!
//! Missing fields never fail: scalars fall back to the sentinel and a missing
//! or empty item list becomes one placeholder item. A number that is present
//! but malformed does fail, and the request is rejected.

use std::borrow::Cow;
use std::ops::Range;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{Order, OrderItem};

const ITEMS_MARKER: &[u8] = b"\"items\":[";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("invalid number for \"{field}\": {raw:?}")]
    InvalidNumber { field: &'static str, raw: String },
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Extract an order from a raw request body
pub fn extract_order(body: &[u8]) -> ExtractResult<Order> {
    let whole = Scanner::new(body);

    let mut items = Vec::new();
    for span in whole.item_spans() {
        items.push(extract_item(&Scanner::window(body, span))?);
    }

    let mut order = Order::new(items);
    if let Some(table) = whole.string_field("tableNumber") {
        order = order.with_table_number(table);
    }
    if let Some(customer) = whole.string_field("customerName") {
        order = order.with_customer_name(customer);
    }
    if let Some(restaurant) = whole.string_field("restaurantName") {
        order = order.with_restaurant_name(restaurant);
    }
    Ok(order)
}

fn extract_item(span: &Scanner<'_>) -> ExtractResult<OrderItem> {
    let quantity = span.number_field::<u32>("quantity")?.unwrap_or(0);
    let product_name = span
        .string_field("productName")
        .map(Cow::into_owned)
        .unwrap_or_else(|| super::types::SENTINEL.to_string());
    let unit_price = span
        .number_field::<Decimal>("unitPrice")?
        .unwrap_or(Decimal::ZERO);
    let total_price = span
        .number_field::<Decimal>("totalPrice")?
        .unwrap_or(Decimal::ZERO);

    Ok(OrderItem::new(quantity, product_name, unit_price, total_price))
}

/// Read-only cursor over a byte window of the body
struct Scanner<'a> {
    buf: &'a [u8],
    range: Range<usize>,
}

impl<'a> Scanner<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            range: 0..buf.len(),
        }
    }

    fn window(buf: &'a [u8], range: Range<usize>) -> Self {
        Self { buf, range }
    }

    /// Absolute offset of `needle` at or after `from`, inside the window
    fn find(&self, needle: &[u8], from: usize) -> Option<usize> {
        let end = self.range.end;
        if from >= end || needle.is_empty() || end - from < needle.len() {
            return None;
        }
        self.buf[from..end]
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|p| from + p)
    }

    fn find_byte(&self, byte: u8, from: usize) -> Option<usize> {
        let end = self.range.end;
        if from >= end {
            return None;
        }
        self.buf[from..end]
            .iter()
            .position(|&b| b == byte)
            .map(|p| from + p)
    }

    /// Offset just past `"key":`
    fn value_start(&self, key: &str) -> Option<usize> {
        let literal = format!("\"{}\":", key);
        self.find(literal.as_bytes(), self.range.start)
            .map(|p| p + literal.len())
    }

    fn string_field(&self, key: &str) -> Option<Cow<'a, str>> {
        let start = self.value_start(key)?;
        let open = self.find_byte(b'"', start)?;
        let close = self.find_byte(b'"', open + 1)?;
        Some(String::from_utf8_lossy(&self.buf[open + 1..close]))
    }

    /// `Ok(None)` when the key is absent, `Err` when present but malformed
    fn number_field<T: FromStr>(&self, key: &'static str) -> ExtractResult<Option<T>> {
        let Some(mut pos) = self.value_start(key) else {
            return Ok(None);
        };
        let end = self.range.end;

        while pos < end && matches!(self.buf[pos], b' ' | b'\t' | b'\r' | b'\n' | b'"') {
            pos += 1;
        }
        let token_start = pos;
        while pos < end && matches!(self.buf[pos], b'0'..=b'9' | b'.' | b'-') {
            pos += 1;
        }

        let raw = &self.buf[token_start..pos];
        // The token holds only ASCII digits, '.' and '-'
        let text = std::str::from_utf8(raw).unwrap_or_default();
        text.parse::<T>()
            .map(Some)
            .map_err(|_| ExtractError::InvalidNumber {
                field: key,
                raw: text.to_string(),
            })
    }

    /// Ranges of the flat `{...}` spans listed after the items marker
    fn item_spans(&self) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let Some(marker) = self.find(ITEMS_MARKER, self.range.start) else {
            return spans;
        };

        let end = self.range.end;
        let mut pos = marker + ITEMS_MARKER.len();
        loop {
            while pos < end && matches!(self.buf[pos], b' ' | b'\t' | b'\r' | b'\n' | b',') {
                pos += 1;
            }
            if pos >= end || self.buf[pos] != b'{' {
                break;
            }
            let Some(close) = self.find_byte(b'}', pos + 1) else {
                break;
            };
            spans.push(pos..close + 1);
            pos = close + 1;
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::types::{PLACEHOLDER_PRODUCT, SENTINEL};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_object_defaults() {
        let order = extract_order(b"{}").unwrap();

        assert_eq!(order.table_number(), SENTINEL);
        assert_eq!(order.customer_name(), SENTINEL);
        assert_eq!(order.restaurant_name(), SENTINEL);
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].product_name, PLACEHOLDER_PRODUCT);
        assert_eq!(order.items()[0].quantity, 1);
        assert_eq!(order.items()[0].total_price, Decimal::ZERO);
    }

    #[test]
    fn test_single_item() {
        let body =
            br#"{"items":[{"quantity":2,"productName":"Cola","unitPrice":2.5,"totalPrice":5.0}]}"#;
        let order = extract_order(body).unwrap();

        assert_eq!(order.items().len(), 1);
        let item = &order.items()[0];
        assert_eq!(item.quantity, 2);
        assert_eq!(item.product_name, "Cola");
        assert_eq!(item.unit_price, d("2.5"));
        assert_eq!(item.total_price, d("5.0"));
    }

    #[test]
    fn test_full_order() {
        let body = br#"{"tableNumber":"12","customerName":"Ana","restaurantName":"El Bueno","items":[{"quantity":1,"productName":"Sprite","unitPrice":2.5,"totalPrice":2.5}, {"quantity":2,"productName":"Hamburguesa","unitPrice":8,"totalPrice":16}]}"#;
        let order = extract_order(body).unwrap();

        assert_eq!(order.table_number(), "12");
        assert_eq!(order.customer_name(), "Ana");
        assert_eq!(order.restaurant_name(), "El Bueno");
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.items()[1].product_name, "Hamburguesa");
        assert_eq!(order.total(), d("18.5"));
    }

    #[test]
    fn test_items_marker_missing_gives_placeholder() {
        let body = br#"{"tableNumber":"3","lines":[{"quantity":2}]}"#;
        let order = extract_order(body).unwrap();

        assert_eq!(order.items(), &[OrderItem::placeholder()]);
    }

    #[test]
    fn test_empty_items_array_gives_placeholder() {
        let order = extract_order(br#"{"items":[]}"#).unwrap();
        assert_eq!(order.items(), &[OrderItem::placeholder()]);
    }

    #[test]
    fn test_embedded_quote_truncates_value() {
        let body = br#"{"customerName":"Bar \"Pepe\"","items":[]}"#;
        let order = extract_order(body).unwrap();

        assert_eq!(order.customer_name(), "Bar \\");
    }

    #[test]
    fn test_quoted_numbers_accepted() {
        let body = br#"{"items":[{"quantity":"3","productName":"Agua","unitPrice":"1.20","totalPrice":"3.60"}]}"#;
        let order = extract_order(body).unwrap();

        assert_eq!(order.items()[0].quantity, 3);
        assert_eq!(order.items()[0].total_price, d("3.60"));
    }

    #[test]
    fn test_missing_item_fields_default() {
        let body = br#"{"items":[{"productName":"Pan"}]}"#;
        let order = extract_order(body).unwrap();

        let item = &order.items()[0];
        assert_eq!(item.quantity, 0);
        assert_eq!(item.unit_price, Decimal::ZERO);
        assert_eq!(item.total_price, Decimal::ZERO);

        let body = br#"{"items":[{"quantity":1}]}"#;
        let order = extract_order(body).unwrap();
        assert_eq!(order.items()[0].product_name, SENTINEL);
    }

    #[test]
    fn test_malformed_number_rejected() {
        let body = br#"{"items":[{"quantity":"two","productName":"Cola"}]}"#;
        let err = extract_order(body).unwrap_err();

        assert_eq!(
            err,
            ExtractError::InvalidNumber {
                field: "quantity",
                raw: String::new(),
            }
        );
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let body = br#"{"items":[{"quantity":-1,"productName":"Cola"}]}"#;
        assert!(matches!(
            extract_order(body),
            Err(ExtractError::InvalidNumber { field: "quantity", .. })
        ));
    }

    #[test]
    fn test_malformed_price_rejected() {
        let body = br#"{"items":[{"quantity":1,"unitPrice":1.2.3,"totalPrice":1}]}"#;
        assert!(matches!(
            extract_order(body),
            Err(ExtractError::InvalidNumber { field: "unitPrice", .. })
        ));
    }

    #[test]
    fn test_item_fields_do_not_leak_between_spans() {
        // Second item has no totalPrice; it must not pick up a later value
        let body = br#"{"items":[{"quantity":1,"totalPrice":4},{"quantity":2},{"quantity":3,"totalPrice":9}]}"#;
        let order = extract_order(body).unwrap();

        let totals: Vec<Decimal> = order.items().iter().map(|i| i.total_price).collect();
        assert_eq!(totals, vec![d("4"), Decimal::ZERO, d("9")]);
    }

    #[test]
    fn test_unterminated_span_stops_scan() {
        let body = br#"{"items":[{"quantity":1,"totalPrice":4},{"quantity":2"#;
        let order = extract_order(body).unwrap();

        assert_eq!(order.items().len(), 1);
    }

    #[test]
    fn test_non_utf8_body_is_tolerated() {
        let mut body = br#"{"tableNumber":""#.to_vec();
        body.extend_from_slice(&[0xFF, b'7']);
        body.extend_from_slice(br#"","items":[]}"#);
        let order = extract_order(&body).unwrap();

        assert!(order.table_number().ends_with('7'));
    }

    #[test]
    fn test_garbage_body() {
        let order = extract_order(b"not json at all").unwrap();
        assert_eq!(order.table_number(), SENTINEL);
        assert_eq!(order.items().len(), 1);
    }
}
