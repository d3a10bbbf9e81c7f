//! Skin types and care tips

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CatalogError;

/// Skin type reported by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SkinType {
    #[default]
    Normal,
    Oily,
    Dry,
    Combination,
    Sensitive,
}

impl SkinType {
    pub const ALL: [SkinType; 5] = [
        SkinType::Normal,
        SkinType::Oily,
        SkinType::Dry,
        SkinType::Combination,
        SkinType::Sensitive,
    ];

    /// Map a backend label; unknown labels fall back to Normal
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|_| {
            debug!("Unmapped skin type label {:?}, using Normal", label);
            SkinType::Normal
        })
    }

    /// Display label
    pub fn as_str(&self) -> &'static str {
        match self {
            SkinType::Normal => "Normal",
            SkinType::Oily => "Oily",
            SkinType::Dry => "Dry",
            SkinType::Combination => "Combination",
            SkinType::Sensitive => "Sensitive",
        }
    }

    /// Lowercase form used in the product `skintype` field
    pub fn query_key(&self) -> &'static str {
        match self {
            SkinType::Normal => "normal",
            SkinType::Oily => "oily",
            SkinType::Dry => "dry",
            SkinType::Combination => "combination",
            SkinType::Sensitive => "sensitive",
        }
    }

    /// Daily care routine for this skin type
    pub fn care_tips(&self) -> &'static [&'static str] {
        match self {
            SkinType::Normal => &[
                "Gunakan pembersih wajah yang lembut 2x sehari",
                "Aplikasikan pelembab ringan setiap pagi dan malam",
                "Gunakan sunscreen SPF 30+ setiap hari",
                "Lakukan eksfoliasi ringan 1-2x seminggu",
                "Gunakan serum vitamin C di pagi hari",
            ],
            SkinType::Oily => &[
                "Gunakan pembersih wajah berbahan salicylic acid 2x sehari",
                "Aplikasikan toner bebas alkohol untuk mengontrol minyak",
                "Gunakan pelembab oil-free atau gel-based",
                "Gunakan sunscreen non-comedogenic SPF 30+",
                "Lakukan clay mask 1-2x seminggu",
                "Hindari over-cleansing yang dapat memicu produksi minyak berlebih",
            ],
            SkinType::Dry => &[
                "Gunakan pembersih wajah yang sangat lembut dan hydrating",
                "Aplikasikan pelembab kaya dan nourishing 2x sehari",
                "Gunakan serum hyaluronic acid untuk hidrasi ekstra",
                "Gunakan sunscreen dengan moisturizer SPF 30+",
                "Hindari produk berbahan alkohol",
                "Gunakan face oil di malam hari untuk nutrisi ekstra",
            ],
            SkinType::Combination => &[
                "Gunakan pembersih wajah yang seimbang",
                "Aplikasikan produk berbeda untuk area T-zone dan pipi",
                "Gunakan toner untuk area berminyak",
                "Aplikasikan pelembab ringan di T-zone, lebih kaya di pipi",
                "Gunakan sunscreen SPF 30+ setiap hari",
            ],
            SkinType::Sensitive => &[
                "Gunakan produk hypoallergenic dan fragrance-free",
                "Lakukan patch test sebelum menggunakan produk baru",
                "Gunakan pembersih yang sangat lembut",
                "Aplikasikan pelembab yang menenangkan",
                "Gunakan sunscreen mineral SPF 30+",
                "Hindari eksfoliasi berlebihan",
            ],
        }
    }
}

impl FromStr for SkinType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        SkinType::ALL
            .into_iter()
            .find(|t| t.query_key() == key)
            .ok_or_else(|| CatalogError::UnknownSkinType(s.to_string()))
    }
}

impl fmt::Display for SkinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
