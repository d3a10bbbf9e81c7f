//! Product model, query filter and categories

use serde::{Deserialize, Serialize};

/// Catalog product as served by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub product_type: String,
    /// Comma-separated skin types, e.g. "Oily, Combination"
    #[serde(default)]
    pub skintype: String,
    #[serde(default)]
    pub notable_effects: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub picture_src: String,
    #[serde(default)]
    pub description: String,
}

impl Product {
    /// Brand used for grouping; blank brands group together
    pub fn brand_key(&self) -> &str {
        if self.brand.trim().is_empty() {
            "Unknown"
        } else {
            &self.brand
        }
    }

    /// Case-insensitive substring match on the skin type list
    pub fn suits(&self, skin_type: &str) -> bool {
        self.skintype
            .to_lowercase()
            .contains(&skin_type.to_lowercase())
    }
}

/// Product list query. `None` and `"all"` mean no filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub skin_type: Option<String>,
    pub effect: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
}

impl ProductFilter {
    /// Backend query parameters, in a stable order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        fn selected(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty() && *v != "all")
                .map(str::to_string)
        }

        let mut pairs = Vec::new();
        if let Some(v) = selected(&self.category) {
            pairs.push(("product_type", v));
        }
        if let Some(v) = selected(&self.skin_type) {
            pairs.push(("skintype", v));
        }
        if let Some(v) = selected(&self.effect) {
            pairs.push(("notable_effects", v));
        }
        if let Some(v) = self.brand.as_deref().filter(|v| !v.is_empty()) {
            pairs.push(("brand", v.to_string()));
        }
        if let Some(v) = self.min_price.filter(|v| *v > 0) {
            pairs.push(("min_price", v.to_string()));
        }
        if let Some(v) = self.max_price.filter(|v| *v > 0) {
            pairs.push(("max_price", v.to_string()));
        }
        pairs
    }
}

/// Product category shown in the catalog filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
}

/// Static category list; the backend has no categories endpoint
pub fn categories() -> Vec<Category> {
    const TYPES: [&str; 9] = [
        "Face Wash",
        "Toner",
        "Serum",
        "Moisturizer",
        "Sunscreen",
        "Exfoliator",
        "Face Mask",
        "Facial Oil",
        "Eye Cream",
    ];

    let mut list = vec![Category {
        id: "all",
        name: "All Products",
    }];
    list.extend(TYPES.into_iter().map(|t| Category { id: t, name: t }));
    list
}

/// Format a price as Indonesian Rupiah, e.g. `Rp 150.000`
pub fn format_price(price: f64) -> String {
    let rounded = price.round();
    let negative = rounded < 0.0;
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if negative {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}
