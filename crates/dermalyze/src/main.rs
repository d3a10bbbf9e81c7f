//! Dermalyze - Main Entry Point
//!
//! Runs one guided capture against a simulated camera, then uploads the
//! still when a session is stored.

use std::path::PathBuf;

use camera_capture::{SimulatedCamera, VideoFrame};
use capture_guidance::{FrameDims, LandmarkSet, Point2, ScriptedDetector};
use dermalyze::{init_logging, AppConfig, Dermalyze};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::var_os("DERMALYZE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dermalyze.toml"));
    let config = AppConfig::load(Some(&path))?;
    init_logging(&config.logging)?;

    info!("=== Dermalyze v{} ===", env!("CARGO_PKG_VERSION"));

    let app = Dermalyze::new(config)?;
    let width = app.config().camera.width;
    let height = app.config().camera.height;
    let dims = FrameDims::new(width, height);

    // User drifts in from the corner, tilts, then settles
    let mut detector = ScriptedDetector::new();
    detector
        .push_faces(Vec::new())
        .push_faces(vec![LandmarkSet::posed(dims, Point2::new(80.0, 60.0), 25.0, 0.0)])
        .push_faces(vec![LandmarkSet::posed(dims, dims.center(), 25.0, 0.0)])
        .push_faces(vec![LandmarkSet::posed(dims, dims.center(), 0.0, 30.0)])
        .push_faces(vec![LandmarkSet::posed(dims, dims.center(), 2.0, 3.0)]);

    let mut session = app.capture_session(SimulatedCamera::new(), detector)?;
    session.start()?;
    info!("{}", session.status());

    let frame = VideoFrame::solid(width, height, [196, 160, 140]);
    for _ in 0..5 {
        let guidance = session.process_frame(&frame)?;
        info!("{}", guidance.status);
        if guidance.capture_enabled {
            break;
        }
    }

    if !session.capture_enabled() {
        warn!("Face never reached a capturable position");
        session.stop();
        return Ok(());
    }

    session.capture(&frame)?;
    let Some(still) = session.take_capture() else {
        return Ok(());
    };
    info!("Captured {} ({} bytes)", still.file_name, still.jpeg.len());

    if !app.auth.is_authenticated() {
        warn!("No stored session, skipping analysis");
        return Ok(());
    }

    match app.analysis.analyze(&still).await {
        Ok(result) => {
            info!("Analysis: {}", serde_json::to_string(&result)?);
            for product in app.products.recommended(result.skin_type).await {
                info!(
                    "Recommended: {} - {} ({})",
                    product.brand_key(),
                    product.product_name,
                    catalog::format_price(product.price)
                );
            }
        }
        Err(e) => warn!("{}", e.user_message()),
    }

    Ok(())
}
