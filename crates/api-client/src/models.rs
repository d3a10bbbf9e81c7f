//! Wire models

use catalog::{Product, SkinType};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::image_url::ImageUrls;

/// Confidence assumed when the classifier omits it
pub const DEFAULT_CONFIDENCE: f64 = 0.85;

/// Stored prediction, with the backend's field names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: String,
    /// Classifier label
    #[serde(rename = "hasil", default)]
    pub label: String,
    /// Confidence in [0, 1]
    #[serde(rename = "akurasi", default)]
    pub confidence: Option<f64>,
    /// Stored photo path
    #[serde(rename = "wajah", default)]
    pub image_path: Option<String>,
    #[serde(rename = "userid", default)]
    pub user_id: Option<String>,
    #[serde(rename = "collectionId", default)]
    pub collection_id: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

/// Analysis ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: String,
    pub skin_type: SkinType,
    /// Percent, `round(confidence * 100)`
    pub confidence: u8,
    pub care_tips: Vec<String>,
    pub timestamp: String,
    pub image_url: Option<String>,
    pub user_id: Option<String>,
    pub collection_id: Option<String>,
    /// Label as returned by the classifier
    pub raw_label: String,
}

impl AnalysisResult {
    pub fn from_record(record: &PredictionRecord, images: &ImageUrls) -> Self {
        let skin_type = SkinType::from_label(&record.label);
        let confidence = record
            .confidence
            .filter(|c| c.is_finite())
            .unwrap_or(DEFAULT_CONFIDENCE)
            .clamp(0.0, 1.0);

        Self {
            id: record.id.clone(),
            skin_type,
            confidence: (confidence * 100.0).round() as u8,
            care_tips: skin_type.care_tips().iter().map(|t| t.to_string()).collect(),
            timestamp: record
                .created
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
            image_url: record
                .image_path
                .as_deref()
                .and_then(|path| images.resolve(path, Some(&record.id))),
            user_id: record.user_id.clone(),
            collection_id: record.collection_id.clone(),
            raw_label: record.label.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
}

/// One page of analysis history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    #[serde(default)]
    pub history: Vec<PredictionRecord>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Account as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "nama", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Profile fields to change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(rename = "nama", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Login/register outcome. Registration may come back without a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    #[serde(default)]
    pub token: Option<String>,
    pub user: User,
}

// Envelopes

#[derive(Debug, Deserialize)]
pub(crate) struct PredictionEnvelope {
    pub data: PredictionRecord,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RecordEnvelope {
    Wrapped { data: PredictionRecord },
    Bare(PredictionRecord),
}

impl RecordEnvelope {
    pub fn into_record(self) -> PredictionRecord {
        match self {
            RecordEnvelope::Wrapped { data } | RecordEnvelope::Bare(data) => data,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsEnvelope {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
}
