//! Dermalyze API Client
//!
//! Async REST client for the Dermalyze backend:
//! - Skin-type prediction upload
//! - Analysis history
//! - Product catalog queries
//! - Login, registration and profile
//! - Image URL resolution for stored analysis photos

pub mod client;
pub mod config;
pub mod error;
pub mod image_url;
pub mod models;
pub mod validation;

pub use client::ApiClient;
pub use config::{ApiConfig, Environment};
pub use error::ApiError;
pub use image_url::ImageUrls;
pub use models::{
    AnalysisResult, AuthSession, HistoryPage, Pagination, PredictionRecord, ProfileUpdate, User,
};
pub use validation::{is_valid_email, LoginRequest, RegisterRequest, ValidationError};
