//! Receipt renderer
//!
//! Renders an [`Order`] into fixed-width receipt text for 80mm thermal paper.

use chrono::{Local, NaiveDateTime};
use pos_printer::{pad_to_width, text_width};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::order::Order;

/// Characters per line on 80mm paper
pub const RECEIPT_WIDTH: usize = 48;

/// Header used when the order carries no restaurant name
pub const DEFAULT_RESTAURANT: &str = "RESTAURANTE";

const CURRENCY: &str = "EUR";
const TRAILING_BLANK_LINES: usize = 5;

/// Rendered receipt, one entry per printed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    lines: Vec<String>,
}

impl Receipt {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Receipt text with a newline after every line
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.lines.len() * (RECEIPT_WIDTH + 1));
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

/// Customer receipt renderer
pub struct ReceiptRenderer {
    width: usize,
}

impl Default for ReceiptRenderer {
    fn default() -> Self {
        Self::new(RECEIPT_WIDTH)
    }
}

impl ReceiptRenderer {
    /// Create a renderer with a custom line width
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Render with the current local time
    pub fn render_now(&self, order: &Order) -> Receipt {
        self.render(order, Local::now().naive_local())
    }

    /// Render an order printed at `printed_at`
    pub fn render(&self, order: &Order, printed_at: NaiveDateTime) -> Receipt {
        let mut lines = Vec::new();

        // Header
        let restaurant = order.provided_restaurant().unwrap_or(DEFAULT_RESTAURANT);
        lines.push(self.center(restaurant));
        lines.push("=".repeat(self.width));
        lines.push(format!("MESA: {}", order.table_number()));
        if let Some(customer) = order.provided_customer() {
            lines.push(format!("CLIENTE: {}", customer));
        }
        lines.push(format!("FECHA: {}", printed_at.format("%d/%m/%Y %H:%M")));
        lines.push("-".repeat(self.width));

        // Items
        for item in order.items() {
            lines.push(format!("{}x {}", item.quantity, item.product_name));
            lines.push(format!(
                "   {} {} x {} = {} {}",
                money(item.unit_price),
                CURRENCY,
                item.quantity,
                money(item.total_price),
                CURRENCY
            ));
        }
        lines.push("-".repeat(self.width));

        // Footer
        lines.push(self.center(&format!("TOTAL: {} {}", money(order.total()), CURRENCY)));
        lines.push(String::new());
        lines.push(self.center("!GRACIAS!"));
        lines.extend(std::iter::repeat_n(String::new(), TRAILING_BLANK_LINES));

        Receipt { lines }
    }

    /// Center within the width, padding both sides; longer text is kept whole
    fn center(&self, text: &str) -> String {
        let left = self.width.saturating_sub(text_width(text)) / 2;
        let padded = format!("{}{}", " ".repeat(left), text);
        pad_to_width(&padded, self.width, false)
    }
}

/// Two decimal places, halves rounded away from zero
fn money(value: Decimal) -> String {
    let mut v = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    v.rescale(2);
    v.to_string()
}
