pub mod catalog;
pub mod color;
pub mod image_relay;
pub mod query_builder;
pub mod recommendations;
pub mod subcategories;

pub use image_relay::{ImageRelay, RelayProfile};
pub use recommendations::RecommendationResolver;
