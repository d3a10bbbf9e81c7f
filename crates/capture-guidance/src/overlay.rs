//! Overlay rendering
//!
//! `render_overlay` turns a pose estimate into a display list in video pixel
//! coordinates. `rasterize` paints a display list onto an RGBA image. Text is
//! kept in the display list for the host surface; the raster backend skips it.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::GuidanceConfig;
use crate::landmarks::{FrameDims, LandmarkSet, Point2, KEY_LANDMARKS};
use crate::pose::{PoseEstimate, PositionQuality};

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const GUIDE: Color = Color([255, 255, 255, 204]);
    pub const WHITE: Color = Color([255, 255, 255, 255]);
    pub const GREEN: Color = Color([0, 255, 0, 255]);
    pub const YELLOW: Color = Color([255, 235, 59, 255]);
    pub const RED: Color = Color([255, 68, 68, 255]);
    pub const ROLL_HINT: Color = Color([255, 107, 107, 255]);
    pub const PITCH_HINT: Color = Color([255, 167, 38, 255]);

    pub fn for_quality(quality: PositionQuality) -> Self {
        match quality {
            PositionQuality::Perfect => Color::GREEN,
            PositionQuality::Centered => Color::YELLOW,
            PositionQuality::OffCenter => Color::RED,
        }
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba(c.0)
    }
}

/// One drawing primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Polyline {
        points: Vec<Point2>,
        color: Color,
        width: f32,
    },
    Line {
        from: Point2,
        to: Point2,
        color: Color,
        width: f32,
        /// (dash, gap) lengths; `None` draws a solid line
        dash: Option<(f32, f32)>,
    },
    Circle {
        center: Point2,
        radius: f32,
        color: Color,
        filled: bool,
    },
    Text {
        anchor: Point2,
        text: String,
        color: Color,
        size: f32,
    },
}

impl DrawCommand {
    fn mirrored(self, width: f32) -> Self {
        let flip = |p: Point2| Point2::new(width - p.x, p.y);
        match self {
            DrawCommand::Polyline { points, color, width: w } => DrawCommand::Polyline {
                points: points.into_iter().map(flip).collect(),
                color,
                width: w,
            },
            DrawCommand::Line { from, to, color, width: w, dash } => DrawCommand::Line {
                from: flip(from),
                to: flip(to),
                color,
                width: w,
                dash,
            },
            DrawCommand::Circle { center, radius, color, filled } => DrawCommand::Circle {
                center: flip(center),
                radius,
                color,
                filled,
            },
            DrawCommand::Text { anchor, text, color, size } => DrawCommand::Text {
                anchor: flip(anchor),
                text,
                color,
                size,
            },
        }
    }
}

/// Display list for one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Overlay {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

impl Overlay {
    fn new(dims: FrameDims) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
            commands: Vec::new(),
        }
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Flip horizontally (x' = width - x)
    pub fn mirrored(self) -> Self {
        let width = self.width as f32;
        Self {
            width: self.width,
            height: self.height,
            commands: self
                .commands
                .into_iter()
                .map(|c| c.mirrored(width))
                .collect(),
        }
    }

    /// Texts in the display list, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn draw_corner_frame(overlay: &mut Overlay, center: Point2, config: &GuidanceConfig) {
    let (w, h, len) = (config.frame_width, config.frame_height, config.corner_length);
    let left = center.x - w / 2.0;
    let top = center.y - h / 2.0;
    let right = left + w;
    let bottom = top + h;

    let corners = [
        [(left, top + len), (left, top), (left + len, top)],
        [(right - len, top), (right, top), (right, top + len)],
        [(left, bottom - len), (left, bottom), (left + len, bottom)],
        [(right - len, bottom), (right, bottom), (right, bottom - len)],
    ];

    for corner in corners {
        overlay.push(DrawCommand::Polyline {
            points: corner.iter().map(|&(x, y)| Point2::new(x, y)).collect(),
            color: Color::GUIDE,
            width: 3.0,
        });
    }
}

fn draw_landmarks(overlay: &mut Overlay, landmarks: &LandmarkSet, dims: FrameDims, color: Color) {
    let size = (dims.width.min(dims.height) as f32 / 400.0).max(1.5);

    for (index, point) in landmarks.points().iter().enumerate() {
        let center = dims.to_pixels(*point);
        overlay.push(DrawCommand::Circle {
            center,
            radius: size,
            color,
            filled: true,
        });

        if KEY_LANDMARKS.contains(&index) {
            overlay.push(DrawCommand::Circle {
                center,
                radius: size * 1.5,
                color,
                filled: false,
            });
        }
    }
}

fn draw_orientation_guides(overlay: &mut Overlay, pose: &PoseEstimate, center: Point2) {
    if !pose.is_upright {
        overlay.push(DrawCommand::Line {
            from: Point2::new(center.x - 60.0, center.y - 80.0),
            to: Point2::new(center.x + 60.0, center.y - 80.0),
            color: Color::ROLL_HINT,
            width: 3.0,
            dash: Some((5.0, 5.0)),
        });
        overlay.push(DrawCommand::Text {
            anchor: Point2::new(center.x, center.y - 100.0),
            text: "Luruskan kepala".to_string(),
            color: Color::ROLL_HINT,
            size: 14.0,
        });
    }

    if !pose.is_straight {
        overlay.push(DrawCommand::Line {
            from: Point2::new(center.x, center.y - 60.0),
            to: Point2::new(center.x, center.y + 60.0),
            color: Color::PITCH_HINT,
            width: 3.0,
            dash: Some((5.0, 5.0)),
        });
        overlay.push(DrawCommand::Text {
            anchor: Point2::new(center.x, center.y + 80.0),
            text: "Tegakkan wajah".to_string(),
            color: Color::PITCH_HINT,
            size: 14.0,
        });
    }
}

fn draw_center_target(overlay: &mut Overlay, center: Point2, active: bool) {
    let color = if active { Color::GREEN } else { Color::WHITE };

    overlay.push(DrawCommand::Circle {
        center,
        radius: 8.0,
        color,
        filled: false,
    });
    overlay.push(DrawCommand::Line {
        from: Point2::new(center.x - 12.0, center.y),
        to: Point2::new(center.x + 12.0, center.y),
        color,
        width: 2.0,
        dash: None,
    });
    overlay.push(DrawCommand::Line {
        from: Point2::new(center.x, center.y - 12.0),
        to: Point2::new(center.x, center.y + 12.0),
        color,
        width: 2.0,
        dash: None,
    });
}

/// Build the overlay for one frame. `face` is `None` when no face was found.
pub fn render_overlay(
    face: Option<(&LandmarkSet, &PoseEstimate)>,
    dims: FrameDims,
    config: &GuidanceConfig,
) -> Overlay {
    let mut overlay = Overlay::new(dims);
    let center = dims.center();

    draw_corner_frame(&mut overlay, center, config);

    match face {
        Some((landmarks, pose)) => {
            let color = Color::for_quality(pose.quality());
            draw_landmarks(&mut overlay, landmarks, dims, color);
            if !pose.is_aligned() {
                draw_orientation_guides(&mut overlay, pose, center);
            }
            draw_center_target(&mut overlay, center, pose.is_perfect_position());
        }
        None => draw_center_target(&mut overlay, center, false),
    }

    if config.mirror {
        overlay.mirrored()
    } else {
        overlay
    }
}

fn stroke(image: &mut RgbaImage, from: Point2, to: Point2, color: Rgba<u8>, width: f32) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    let strands = width.round().max(1.0) as i32;

    let (nx, ny) = if len > 0.0 { (-dy / len, dx / len) } else { (0.0, 0.0) };

    for i in 0..strands {
        let offset = i as f32 - (strands - 1) as f32 / 2.0;
        draw_line_segment_mut(
            image,
            (from.x + nx * offset, from.y + ny * offset),
            (to.x + nx * offset, to.y + ny * offset),
            color,
        );
    }
}

fn dashed(image: &mut RgbaImage, from: Point2, to: Point2, color: Rgba<u8>, width: f32, dash: f32, gap: f32) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 || dash <= 0.0 {
        return;
    }

    let (ux, uy) = (dx / len, dy / len);
    let mut t = 0.0;
    while t < len {
        let end = (t + dash).min(len);
        stroke(
            image,
            Point2::new(from.x + ux * t, from.y + uy * t),
            Point2::new(from.x + ux * end, from.y + uy * end),
            color,
            width,
        );
        t += dash + gap.max(0.0);
    }
}

/// Paint a display list onto an RGBA image of the same size
pub fn rasterize(overlay: &Overlay, image: &mut RgbaImage) {
    for command in &overlay.commands {
        match command {
            DrawCommand::Polyline { points, color, width } => {
                for pair in points.windows(2) {
                    stroke(image, pair[0], pair[1], (*color).into(), *width);
                }
            }
            DrawCommand::Line { from, to, color, width, dash } => match dash {
                Some((d, g)) => dashed(image, *from, *to, (*color).into(), *width, *d, *g),
                None => stroke(image, *from, *to, (*color).into(), *width),
            },
            DrawCommand::Circle { center, radius, color, filled } => {
                let c = (center.x.round() as i32, center.y.round() as i32);
                let r = radius.round().max(1.0) as i32;
                if *filled {
                    draw_filled_circle_mut(image, c, r, Rgba::from(*color));
                } else {
                    draw_hollow_circle_mut(image, c, r, Rgba::from(*color));
                }
            }
            DrawCommand::Text { text, .. } => {
                trace!("Raster backend skips text '{}'", text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::compute_pose_estimate;

    const DIMS: FrameDims = FrameDims::new(640, 480);

    fn unmirrored() -> GuidanceConfig {
        GuidanceConfig {
            mirror: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_face_draws_frame_and_inactive_target() {
        let overlay = render_overlay(None, DIMS, &GuidanceConfig::default());

        let polylines = overlay
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polyline { .. }))
            .count();
        assert_eq!(polylines, 4);
        assert!(overlay.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Circle { radius, color, filled: false, .. } if *radius == 8.0 && *color == Color::WHITE
        )));
        assert!(overlay.texts().is_empty());
    }

    #[test]
    fn test_tilted_face_gets_roll_hint() {
        let config = unmirrored();
        let face = LandmarkSet::posed(DIMS, DIMS.center(), 20.0, 0.0);
        let pose = compute_pose_estimate(&face, DIMS, &config);
        let overlay = render_overlay(Some((&face, &pose)), DIMS, &config);

        assert_eq!(overlay.texts(), vec!["Luruskan kepala"]);
        assert!(overlay.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Circle { color, filled: true, .. } if *color == Color::YELLOW
        )));
    }

    #[test]
    fn test_perfect_face_is_green_without_hints() {
        let config = unmirrored();
        let face = LandmarkSet::posed(DIMS, DIMS.center(), 0.0, 0.0);
        let pose = compute_pose_estimate(&face, DIMS, &config);
        let overlay = render_overlay(Some((&face, &pose)), DIMS, &config);

        assert!(overlay.texts().is_empty());
        assert!(overlay.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Circle { radius, color, filled: false, .. } if *radius == 8.0 && *color == Color::GREEN
        )));
    }

    #[test]
    fn test_mirror_flips_x() {
        let config = unmirrored();
        let mut points = vec![Point2::new(0.5, 0.5); 468];
        points[0] = Point2::new(0.25, 0.5);
        let face = LandmarkSet::new(points).unwrap();
        let pose = compute_pose_estimate(&face, DIMS, &config);

        let plain = render_overlay(Some((&face, &pose)), DIMS, &config);
        let mirrored = plain.clone().mirrored();

        let first_landmark = |o: &Overlay| {
            o.commands.iter().find_map(|c| match c {
                DrawCommand::Circle { center, filled: true, .. } => Some(*center),
                _ => None,
            })
        };

        assert_eq!(first_landmark(&plain).unwrap().x, 160.0);
        assert_eq!(first_landmark(&mirrored).unwrap().x, 480.0);
    }

    #[test]
    fn test_rasterize_paints_pixels() {
        let overlay = render_overlay(None, DIMS, &GuidanceConfig::default());
        let mut image = RgbaImage::new(DIMS.width, DIMS.height);
        rasterize(&overlay, &mut image);

        let center = DIMS.center();
        let x = center.x as u32 + 10;
        let crosshair_hit = (center.y as u32 - 2..=center.y as u32 + 2)
            .any(|y| image.get_pixel(x, y).0 == Color::WHITE.0);
        assert!(crosshair_hit);

        let untouched = image.get_pixel(5, 5);
        assert_eq!(untouched.0, [0, 0, 0, 0]);
    }
}
