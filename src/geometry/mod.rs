//! Helmet geometry: the drawable output of the overlay core.
//!
//! Everything here is plain data. [`builder::build`] turns a pose and the
//! faceplate progress into a [`HelmetShapeSet`] whose coordinates are already
//! in frame pixels, so a graphics sink can paint it without knowing anything
//! about poses or animation.

/// RGBA colors
pub mod color;

/// Path construction in a transformed local frame
pub mod path;

/// Helmet shape assembly
pub mod builder;

pub use builder::{build, HelmetGeometryBuilder};
pub use color::Color;

use crate::pose_estimation::Pose;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// One segment of a shape outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { to: Point2<f64> },
    LineTo { to: Point2<f64> },
    QuadTo { ctrl: Point2<f64>, to: Point2<f64> },
    Close,
}

/// Color at a position along a gradient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position in [0, 1]
    pub offset: f64,
    pub color: Color,
}

impl GradientStop {
    #[must_use]
    pub const fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Fill style; gradient geometry is in frame pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Paint {
    Solid {
        color: Color,
    },
    LinearGradient {
        start: Point2<f64>,
        end: Point2<f64>,
        stops: Vec<GradientStop>,
    },
    RadialGradient {
        center: Point2<f64>,
        radius: f64,
        stops: Vec<GradientStop>,
    },
}

/// Outline style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    /// Line width in pixels
    pub width: f64,
}

/// Soft glow around a shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    pub color: Color,
    /// Blur radius in pixels
    pub blur: f64,
}

/// How a shape is composited onto what is beneath it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    /// Additive
    Lighter,
}

/// Which rigid part of the helmet a shape belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeGroup {
    /// Fixed to the head
    Shell,
    /// Moves with the hinged faceplate
    Faceplate,
}

/// A drawable shape in frame pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Stable identifier, e.g. `"left_eye"`
    pub name: String,
    pub group: ShapeGroup,
    pub path: Vec<PathCommand>,
    pub fill: Option<Paint>,
    pub stroke: Option<Stroke>,
    pub glow: Option<Glow>,
    /// Whole-shape opacity in [0, 1]
    pub opacity: f64,
    pub blend: BlendMode,
}

impl Shape {
    /// All points referenced by the path, control points included
    pub fn points(&self) -> impl Iterator<Item = Point2<f64>> + '_ {
        self.path.iter().flat_map(|command| match *command {
            PathCommand::MoveTo { to } | PathCommand::LineTo { to } => vec![to],
            PathCommand::QuadTo { ctrl, to } => vec![ctrl, to],
            PathCommand::Close => Vec::new(),
        })
    }
}

/// Faceplate hinge motion for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HingeTransform {
    /// Hinge point in frame pixels (closed position)
    pub pivot: Point2<f64>,
    /// Rotation about the pivot in radians, relative to the shell
    pub angle: f64,
    /// Upward displacement in pixels, along the helmet's own vertical axis
    pub lift: f64,
}

/// Ordered drawable output of one frame, back to front
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelmetShapeSet {
    /// Pose the geometry was built for
    pub pose: Pose,
    /// Faceplate progress the geometry was built for
    pub progress: f64,
    pub hinge: HingeTransform,
    pub shapes: Vec<Shape>,
}

impl HelmetShapeSet {
    /// Look up a shape by name
    #[must_use]
    pub fn shape(&self, name: &str) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.name == name)
    }

    /// Shapes belonging to one group, in drawing order
    pub fn group(&self, group: ShapeGroup) -> impl Iterator<Item = &Shape> + '_ {
        self.shapes.iter().filter(move |shape| shape.group == group)
    }
}
