//! Helmet overlay core: turns facial landmarks into an animated helmet.
//!
//! This library provides the geometry and state behind a face-tracking
//! helmet overlay:
//! - A 2D rigid pose (center, scale, rotation) estimated from a few landmarks
//! - Exponential smoothing of the pose stream with wraparound-safe rotation
//! - A retargetable faceplate animation with cubic easing
//! - A pure geometry builder producing ordered, styled shapes in frame pixels
//!
//! Per frame the flow is: landmarks → pose → smoothed pose → shapes, with the
//! faceplate progress read from the animator. Landmark detection and
//! rasterization live outside the crate behind the [`provider::LandmarkProvider`]
//! and [`sink::GraphicsSink`] traits.
//!
//! # Examples
//!
//! ## Single frame
//!
//! ```no_run
//! use helmet_overlay::{config::Config, landmarks::LandmarkFrame, pipeline::OverlayPipeline};
//!
//! # fn main() -> helmet_overlay::Result<()> {
//! let mut pipeline = OverlayPipeline::new(&Config::default())?;
//!
//! let frame: LandmarkFrame = serde_json::from_str(
//!     r#"{"timestamp_ms": 0, "width": 1280, "height": 720, "landmarks": null}"#,
//! )?;
//!
//! // Start opening the faceplate, then draw whatever the frame yields
//! pipeline.toggle(frame.timestamp_ms);
//! if let Some(shapes) = pipeline.process_frame(&frame) {
//!     for shape in &shapes.shapes {
//!         println!("{} ({} segments)", shape.name, shape.path.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Geometry only
//!
//! ```
//! use helmet_overlay::{config::StyleConfig, geometry::build, pose_estimation::Pose};
//!
//! let pose = Pose::new(640.0, 360.0, 180.0, 0.0);
//! let closed = build(&pose, 0.0, &StyleConfig::default());
//! let open = build(&pose, 1.0, &StyleConfig::default());
//!
//! assert_eq!(closed.shape("shell"), open.shape("shell"));
//! assert!(open.hinge.lift > closed.hinge.lift);
//! ```

/// Landmark data and role-to-index mapping
pub mod landmarks;

/// 2D head pose estimation from landmarks
pub mod pose_estimation;

/// Temporal smoothing of the pose stream
pub mod filters;

/// Faceplate open/close animation
pub mod animation;

/// Helmet shapes and styling
pub mod geometry;

/// Landmark sources
pub mod provider;

/// Output sinks for helmet geometry
pub mod sink;

/// Per-frame overlay context
pub mod pipeline;

/// Scalar and angle helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
