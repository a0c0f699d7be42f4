//! Landmark data supplied by the external detector.
//!
//! The detector reports points in normalized frame coordinates under its own
//! numbering scheme. [`LandmarkIndexMap`] is the one place that ties the
//! semantic roles used by the estimator to that numbering, so a different
//! landmark model only needs a different map.

use crate::constants::{
    FACE_MESH_CHIN, FACE_MESH_FOREHEAD, FACE_MESH_LEFT_CHEEK, FACE_MESH_LEFT_EYE_OUTER, FACE_MESH_NOSE_TIP,
    FACE_MESH_RIGHT_CHEEK, FACE_MESH_RIGHT_EYE_OUTER,
};
use crate::{Error, Result};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A single tracked point in normalized frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0 = left edge, 1 = right edge
    pub x: f64,
    /// Vertical position, 0 = top edge, 1 = bottom edge
    pub y: f64,
    /// Relative depth (unused by the overlay)
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Pixel position in a frame of the given size
    #[must_use]
    pub fn to_pixels(&self, width: f64, height: f64) -> Point2<f64> {
        Point2::new(self.x * width, self.y * height)
    }
}

/// Semantic landmark roles the overlay understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkRole {
    LeftEyeOuter,
    RightEyeOuter,
    NoseTip,
    Chin,
    Forehead,
    LeftCheek,
    RightCheek,
}

impl LandmarkRole {
    pub const ALL: [Self; 7] = [
        Self::LeftEyeOuter,
        Self::RightEyeOuter,
        Self::NoseTip,
        Self::Chin,
        Self::Forehead,
        Self::LeftCheek,
        Self::RightCheek,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeOuter => "right_eye_outer",
            Self::NoseTip => "nose_tip",
            Self::Chin => "chin",
            Self::Forehead => "forehead",
            Self::LeftCheek => "left_cheek",
            Self::RightCheek => "right_cheek",
        }
    }
}

/// Maps semantic roles to provider-specific landmark indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkIndexMap {
    pub left_eye_outer: usize,
    pub right_eye_outer: usize,
    pub nose_tip: usize,
    pub chin: usize,
    pub forehead: usize,
    pub left_cheek: usize,
    pub right_cheek: usize,
}

impl Default for LandmarkIndexMap {
    fn default() -> Self {
        Self::face_mesh()
    }
}

impl LandmarkIndexMap {
    /// Indices for the 468-point face-mesh model
    #[must_use]
    pub const fn face_mesh() -> Self {
        Self {
            left_eye_outer: FACE_MESH_LEFT_EYE_OUTER,
            right_eye_outer: FACE_MESH_RIGHT_EYE_OUTER,
            nose_tip: FACE_MESH_NOSE_TIP,
            chin: FACE_MESH_CHIN,
            forehead: FACE_MESH_FOREHEAD,
            left_cheek: FACE_MESH_LEFT_CHEEK,
            right_cheek: FACE_MESH_RIGHT_CHEEK,
        }
    }

    /// Provider index for a role
    #[must_use]
    pub const fn index(&self, role: LandmarkRole) -> usize {
        match role {
            LandmarkRole::LeftEyeOuter => self.left_eye_outer,
            LandmarkRole::RightEyeOuter => self.right_eye_outer,
            LandmarkRole::NoseTip => self.nose_tip,
            LandmarkRole::Chin => self.chin,
            LandmarkRole::Forehead => self.forehead,
            LandmarkRole::LeftCheek => self.left_cheek,
            LandmarkRole::RightCheek => self.right_cheek,
        }
    }

    /// Look up the landmark playing `role`
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoseUnavailable`] if the sequence is too short for the
    /// role's index or the point is not finite.
    pub fn get(&self, landmarks: &[Landmark], role: LandmarkRole) -> Result<Landmark> {
        let index = self.index(role);
        let landmark = landmarks.get(index).copied().ok_or_else(|| {
            Error::PoseUnavailable(format!(
                "landmark {} (index {index}) missing from {} points",
                role.as_str(),
                landmarks.len()
            ))
        })?;

        if !landmark.x.is_finite() || !landmark.y.is_finite() {
            return Err(Error::PoseUnavailable(format!(
                "landmark {} (index {index}) is not finite",
                role.as_str()
            )));
        }

        Ok(landmark)
    }

    /// Highest index referenced by the map
    #[must_use]
    pub fn max_index(&self) -> usize {
        LandmarkRole::ALL
            .iter()
            .map(|&role| self.index(role))
            .max()
            .unwrap_or_default()
    }
}

/// One detector result: the frame size and, if a face was found, its landmarks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Capture time in milliseconds
    pub timestamp_ms: f64,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Landmarks of the first detected face, if any
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

impl LandmarkFrame {
    /// Landmarks if present and non-empty; an empty list counts as no face
    #[must_use]
    pub fn face(&self) -> Option<&[Landmark]> {
        self.landmarks.as_deref().filter(|points| !points.is_empty())
    }
}
