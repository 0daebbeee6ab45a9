//! Rule-based receipt extraction: shop identification, templates, scoring.

pub mod amounts;
pub mod confidence;
pub mod patterns;
pub mod shop;
pub mod template;

pub use amounts::{parse_amount, parse_quantity};
pub use confidence::confidence_score;
pub use shop::{ShopIdentifier, ShopIdentity};
pub use template::TemplateExtractor;
