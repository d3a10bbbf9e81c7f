//! Dermalyze client core
//!
//! Ties the guided capture loop to the backend:
//! - Layered configuration and logging setup
//! - Skin analysis upload with cached history
//! - Product catalog and recommendations
//! - Account session

pub mod app;
pub mod error;
pub mod logging;
pub mod services;
pub mod settings;

pub use app::Dermalyze;
pub use error::AppError;
pub use logging::init_logging;
pub use services::{AnalysisService, AuthService, ProductService};
pub use settings::{AppConfig, CacheConfig, LogFormat, LoggingConfig, StorageConfig};
