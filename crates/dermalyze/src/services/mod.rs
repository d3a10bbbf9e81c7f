//! Services combining the backend client with persisted state

pub mod analysis;
pub mod auth;
pub mod products;

pub use analysis::AnalysisService;
pub use auth::AuthService;
pub use products::ProductService;
