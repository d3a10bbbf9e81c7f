//! Logging initialisation

use tracing_subscriber::FmtSubscriber;

use crate::settings::{LogFormat, LoggingConfig};
use crate::AppError;

/// Install the global tracing subscriber
pub fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    let level = config.level()?;

    let result = match config.format {
        LogFormat::Plain => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_target(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Json => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_target(true)
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    result.map_err(|e| AppError::Logging(e.to_string()))
}
