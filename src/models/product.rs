use serde::{Deserialize, Serialize};

/// Price shown when the catalog has none for a product
pub const PLACEHOLDER_PRICE: &str = "$29.99";

const PLACEHOLDER_IMAGE_BASE: &str = "https://placehold.co/400x500/gray/white";

/// A catalog document. Category labels are free text, never enumerated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
    pub clothing_class: String,
    #[serde(default)]
    pub product_type: Option<String>,
    /// men, women, unisex or absent
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub average_rating: f64,
}

/// Product as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image_url: String,
    pub url: String,
    pub brand: String,
    pub color: String,
    #[serde(rename = "type")]
    pub product_type: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let product_type = product.product_type.clone().unwrap_or_default();
        let name = if product.title.trim().is_empty() {
            "Product".to_string()
        } else {
            product.title.clone()
        };

        Self {
            id: product.id.clone(),
            name,
            price: format_price(product.price),
            image_url: resolve_image_url(product.image_url.as_deref(), &product_type),
            url: product
                .product_url
                .clone()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| "#".to_string()),
            brand: product.brand.clone().unwrap_or_default(),
            color: product.color.clone().unwrap_or_default(),
            product_type,
        }
    }
}

/// Formats a price as a dollar amount with two decimal places
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(value) if value.is_finite() => format!("${:.2}", value),
        _ => PLACEHOLDER_PRICE.to_string(),
    }
}

/// Normalizes a catalog image URL for the browser.
///
/// Site-relative paths are kept, scheme-less hosts get `https://`, and a
/// missing URL becomes a placeholder labelled with the product type.
pub fn resolve_image_url(image_url: Option<&str>, product_type: &str) -> String {
    match image_url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) if url.starts_with('/') => url.to_string(),
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => url.to_string(),
        Some(url) => format!("https://{}", url),
        None => placeholder_image_url(product_type),
    }
}

/// Placeholder image URL carrying a text label
pub fn placeholder_image_url(label: &str) -> String {
    let label = if label.trim().is_empty() {
        "Product"
    } else {
        label.trim()
    };
    let encoded: String = url::form_urlencoded::byte_serialize(label.as_bytes()).collect();
    format!("{}?text={}", PLACEHOLDER_IMAGE_BASE, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: "p-1".to_string(),
            title: "Oxford Shirt".to_string(),
            price: Some(34.5),
            clothing_class: "men's shirts".to_string(),
            product_type: Some("Dress Shirt".to_string()),
            gender: Some("men".to_string()),
            color: Some("blue".to_string()),
            image_url: Some("https://cdn.example.com/oxford.jpg".to_string()),
            product_url: Some("https://shop.example.com/oxford".to_string()),
            brand: Some("Acme".to_string()),
            average_rating: 4.2,
        }
    }

    #[test]
    fn test_scheme_less_url_gets_https() {
        assert_eq!(
            resolve_image_url(Some("example.com/a.jpg"), "Shirt"),
            "https://example.com/a.jpg"
        );
    }

    #[test]
    fn test_site_relative_url_is_unchanged() {
        assert_eq!(resolve_image_url(Some("/local/a.jpg"), "Shirt"), "/local/a.jpg");
    }

    #[test]
    fn test_http_url_is_unchanged() {
        assert_eq!(
            resolve_image_url(Some("http://example.com/a.jpg"), "Shirt"),
            "http://example.com/a.jpg"
        );
    }

    #[test]
    fn test_absent_url_uses_placeholder_with_type() {
        let url = resolve_image_url(None, "Sneakers");
        assert!(url.starts_with("https://placehold.co/"));
        assert!(url.contains("Sneakers"));

        let blank = resolve_image_url(Some("   "), "Boots");
        assert!(blank.contains("Boots"));
    }

    #[test]
    fn test_placeholder_encodes_label() {
        assert_eq!(
            placeholder_image_url("Polo Shirt"),
            "https://placehold.co/400x500/gray/white?text=Polo+Shirt"
        );
        assert!(placeholder_image_url("").ends_with("text=Product"));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(34.5)), "$34.50");
        assert_eq!(format_price(Some(0.0)), "$0.00");
        assert_eq!(format_price(None), PLACEHOLDER_PRICE);
    }

    #[test]
    fn test_projection() {
        let view = ProductView::from(&product());
        assert_eq!(view.id, "p-1");
        assert_eq!(view.name, "Oxford Shirt");
        assert_eq!(view.price, "$34.50");
        assert_eq!(view.url, "https://shop.example.com/oxford");
        assert_eq!(view.product_type, "Dress Shirt");
    }

    #[test]
    fn test_projection_defaults() {
        let mut sparse = product();
        sparse.title = String::new();
        sparse.price = None;
        sparse.product_url = None;
        sparse.brand = None;
        sparse.color = None;
        sparse.image_url = None;

        let view = ProductView::from(&sparse);
        assert_eq!(view.name, "Product");
        assert_eq!(view.price, "$29.99");
        assert_eq!(view.url, "#");
        assert_eq!(view.brand, "");
        assert_eq!(view.color, "");
        assert!(view.image_url.contains("Dress+Shirt"));
    }

    #[test]
    fn test_view_serializes_type_field() {
        let json = serde_json::to_value(ProductView::from(&product())).unwrap();
        assert_eq!(json["type"], "Dress Shirt");
        assert!(json.get("product_type").is_none());
    }
}
