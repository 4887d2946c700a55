use serde::{Deserialize, Serialize};

/// Number of products returned when no usable limit is given
pub const DEFAULT_LIMIT: usize = 8;

/// An RGB triple. Components are conceptually 0-255 but not validated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb {
    pub r: i64,
    pub g: i64,
    pub b: i64,
}

impl Rgb {
    pub const fn new(r: i64, g: i64, b: i64) -> Self {
        Self { r, g, b }
    }

    /// Extracts the first three runs of digits, e.g. from `rgb(12, 34, 56)`.
    pub fn parse_loose(input: &str) -> Option<Self> {
        let mut parts = input
            .split(|c: char| !c.is_ascii_digit())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<i64>().ok());

        let r = parts.next()??;
        let g = parts.next()??;
        let b = parts.next()??;
        Some(Self { r, g, b })
    }

    pub fn distance(&self, other: &Rgb) -> f64 {
        let dr = (self.r - other.r) as f64;
        let dg = (self.g - other.g) as f64;
        let db = (self.b - other.b) as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

/// Gender as requested by the client, mapped onto catalog labels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenderPreference {
    /// No gender constraint (absent, blank or "all")
    #[default]
    Any,
    Men,
    Women,
    /// Any other label, passed through unchanged
    Other(String),
}

impl GenderPreference {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
            return GenderPreference::Any;
        };

        // The mapping table is case-insensitive; other labels keep their case
        match value.to_lowercase().as_str() {
            "all" => GenderPreference::Any,
            "male" | "men" => GenderPreference::Men,
            "female" | "women" => GenderPreference::Women,
            _ => GenderPreference::Other(value.to_string()),
        }
    }

    /// Catalog label for this preference, if any
    pub fn catalog_label(&self) -> Option<&str> {
        match self {
            GenderPreference::Any => None,
            GenderPreference::Men => Some("men"),
            GenderPreference::Women => Some("women"),
            GenderPreference::Other(label) => Some(label.as_str()),
        }
    }
}

/// A recommendation request, built fresh for every call
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub clothing_class: String,
    pub product_type: Option<String>,
    pub gender: GenderPreference,
    /// Raw color samples; each is normalized by the color classifier
    pub colors: Vec<String>,
    pub limit: usize,
}

impl RecommendationRequest {
    pub fn new(clothing_class: impl Into<String>) -> Self {
        Self {
            clothing_class: clothing_class.into(),
            product_type: None,
            gender: GenderPreference::Any,
            colors: Vec::new(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_product_type(mut self, product_type: Option<&str>) -> Self {
        self.product_type = product_type
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_gender(mut self, gender: Option<&str>) -> Self {
        self.gender = GenderPreference::parse(gender);
        self
    }

    pub fn with_colors(mut self, colors: Vec<String>) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = if limit == 0 { DEFAULT_LIMIT } else { limit };
        self
    }

    /// Whitespace-delimited tokens of the clothing class
    pub fn class_tokens(&self) -> Vec<String> {
        self.clothing_class
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    }
}

/// Parses a `limit` query value, falling back to the default for anything
/// that is not a positive integer.
pub fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .map(|v| v as usize)
        .unwrap_or(DEFAULT_LIMIT)
}

/// Parses the `colors` query value, a JSON array of color samples.
///
/// String elements are kept as-is and other elements (e.g. `[255,0,0]`)
/// are kept in their JSON text form. A payload that is not a JSON array
/// carries no color signal.
pub fn parse_colors(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(values) => values
            .into_iter()
            .map(|value| match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, colors = %raw, "Ignoring unparseable colors payload");
            Vec::new()
        }
    }
}
