use crate::{
    config::PoseConfig,
    constants::FACE_MIDPOINT_RAISE,
    landmarks::{Landmark, LandmarkIndexMap, LandmarkRole},
    utils::wrap_angle,
    Error, Result,
};
use nalgebra::{center, distance, Point2};
use serde::{Deserialize, Serialize};

/// Rigid 2D placement of the face in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Horizontal center in pixels
    pub center_x: f64,
    /// Vertical center in pixels
    pub center_y: f64,
    /// Characteristic helmet size in pixels, always positive
    pub scale: f64,
    /// In-plane rotation in radians, in (-π, π]
    pub rotation: f64,
}

impl Pose {
    #[must_use]
    pub const fn new(center_x: f64, center_y: f64, scale: f64, rotation: f64) -> Self {
        Self {
            center_x,
            center_y,
            scale,
            rotation,
        }
    }

    /// Center as a point
    #[must_use]
    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.center_x, self.center_y)
    }
}

/// How the pose center is derived from the landmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterStrategy {
    /// Centroid of both outer eye corners and the nose tip
    #[default]
    Centroid,
    /// Midpoint of the outer eye corners
    EyeMidpoint,
    /// Cheek midpoint horizontally, raised forehead/chin midpoint vertically
    FaceMidpoint,
}

impl CenterStrategy {
    /// Parse a strategy name
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "centroid" => Ok(Self::Centroid),
            "eye_midpoint" | "eyes" => Ok(Self::EyeMidpoint),
            "face_midpoint" | "face" => Ok(Self::FaceMidpoint),
            _ => Err(Error::InvalidInput(format!("Unknown center strategy: {name}"))),
        }
    }
}

/// Derives a [`Pose`] from a handful of facial landmarks
#[derive(Debug, Clone)]
pub struct PoseEstimator {
    indices: LandmarkIndexMap,
    center_strategy: CenterStrategy,
    eye_weight: f64,
    height_weight: f64,
    min_scale: f64,
    max_scale: Option<f64>,
    min_eye_distance: f64,
}

impl Default for PoseEstimator {
    fn default() -> Self {
        Self::new(&PoseConfig::default())
    }
}

impl PoseEstimator {
    /// Create an estimator from pose settings
    #[must_use]
    pub fn new(config: &PoseConfig) -> Self {
        log::debug!(
            "Initializing PoseEstimator (center: {:?}, weights: {}/{}, scale: [{}, {:?}])",
            config.center_strategy,
            config.eye_weight,
            config.height_weight,
            config.min_scale,
            config.max_scale
        );
        Self {
            indices: config.landmark_indices,
            center_strategy: config.center_strategy,
            eye_weight: config.eye_weight,
            height_weight: config.height_weight,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            min_eye_distance: config.min_eye_distance,
        }
    }

    /// Scale bounds applied for a frame of the given size
    ///
    /// Without a configured maximum the frame's larger dimension is used.
    #[must_use]
    pub fn scale_bounds(&self, width: u32, height: u32) -> (f64, f64) {
        let max = self
            .max_scale
            .unwrap_or_else(|| f64::from(width.max(height)))
            .max(self.min_scale);
        (self.min_scale, max)
    }

    /// Estimate the face pose from normalized landmarks
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoseUnavailable`] if:
    /// - The frame has zero width or height
    /// - A required landmark is missing or not finite
    /// - The outer eye corners (nearly) coincide
    pub fn estimate(&self, landmarks: &[Landmark], width: u32, height: u32) -> Result<Pose> {
        if width == 0 || height == 0 {
            return Err(Error::PoseUnavailable(format!("frame has zero size {width}x{height}")));
        }
        let (w, h) = (f64::from(width), f64::from(height));
        let pixel = |role: LandmarkRole| -> Result<Point2<f64>> {
            Ok(self.indices.get(landmarks, role)?.to_pixels(w, h))
        };

        let left_eye = pixel(LandmarkRole::LeftEyeOuter)?;
        let right_eye = pixel(LandmarkRole::RightEyeOuter)?;
        let nose = pixel(LandmarkRole::NoseTip)?;
        let chin = pixel(LandmarkRole::Chin)?;

        let eye_vector = right_eye - left_eye;
        let eye_distance = eye_vector.norm();
        if !(eye_distance >= self.min_eye_distance) {
            return Err(Error::PoseUnavailable(format!(
                "eye distance {eye_distance:.6}px below {}",
                self.min_eye_distance
            )));
        }

        let rotation = wrap_angle(eye_vector.y.atan2(eye_vector.x));
        let face_height = distance(&nose, &chin);
        let raw_scale = self.eye_weight.mul_add(eye_distance, self.height_weight * face_height);
        if !raw_scale.is_finite() {
            return Err(Error::PoseUnavailable("scale is not finite".to_string()));
        }
        let (min_scale, max_scale) = self.scale_bounds(width, height);
        let scale = raw_scale.clamp(min_scale, max_scale);

        let center = match self.center_strategy {
            CenterStrategy::Centroid => Point2::from((left_eye.coords + right_eye.coords + nose.coords) / 3.0),
            CenterStrategy::EyeMidpoint => center(&left_eye, &right_eye),
            CenterStrategy::FaceMidpoint => {
                let forehead = pixel(LandmarkRole::Forehead)?;
                let left_cheek = pixel(LandmarkRole::LeftCheek)?;
                let right_cheek = pixel(LandmarkRole::RightCheek)?;
                let span = distance(&forehead, &chin);
                let x = (left_cheek.x + right_cheek.x) / 2.0;
                let y = span.mul_add(-FACE_MIDPOINT_RAISE, (forehead.y + chin.y) / 2.0);
                Point2::new(x, y)
            }
        };

        Ok(Pose::new(center.x, center.y, scale, rotation))
    }
}
