//! Order model and lenient request extraction

pub mod extractor;
pub mod types;

pub use extractor::{ExtractError, ExtractResult, extract_order};
pub use types::{Order, OrderItem, PLACEHOLDER_PRODUCT, SENTINEL};
