//! Helper functions and utilities for tests

#![allow(dead_code)]

use helmet_overlay::{
    landmarks::{Landmark, LandmarkFrame, LandmarkIndexMap},
    pose_estimation::Pose,
    Error, Result,
};

/// Normalized positions for the four landmarks the default estimator reads
#[derive(Debug, Clone, Copy)]
pub struct FaceLayout {
    pub left_eye: (f64, f64),
    pub right_eye: (f64, f64),
    pub nose: (f64, f64),
    pub chin: (f64, f64),
}

impl FaceLayout {
    /// Upright face in the middle of the frame
    pub const fn level() -> Self {
        Self {
            left_eye: (0.4, 0.4),
            right_eye: (0.6, 0.4),
            nose: (0.5, 0.5),
            chin: (0.5, 0.7),
        }
    }

    /// Same layout moved by a normalized offset
    pub fn shifted(self, dx: f64, dy: f64) -> Self {
        let shift = |(x, y): (f64, f64)| (x + dx, y + dy);
        Self {
            left_eye: shift(self.left_eye),
            right_eye: shift(self.right_eye),
            nose: shift(self.nose),
            chin: shift(self.chin),
        }
    }

    /// Same layout rotated about (0.5, 0.5) by `angle` radians
    pub fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        let rotate = |(x, y): (f64, f64)| {
            let (dx, dy) = (x - 0.5, y - 0.5);
            (0.5 + dx * cos - dy * sin, 0.5 + dx * sin + dy * cos)
        };
        Self {
            left_eye: rotate(self.left_eye),
            right_eye: rotate(self.right_eye),
            nose: rotate(self.nose),
            chin: rotate(self.chin),
        }
    }

    /// Full face-mesh landmark list with this layout
    pub fn landmarks(&self) -> Vec<Landmark> {
        let map = LandmarkIndexMap::face_mesh();
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); map.max_index() + 1];
        points[map.left_eye_outer] = Landmark::new(self.left_eye.0, self.left_eye.1, 0.0);
        points[map.right_eye_outer] = Landmark::new(self.right_eye.0, self.right_eye.1, 0.0);
        points[map.nose_tip] = Landmark::new(self.nose.0, self.nose.1, 0.0);
        points[map.chin] = Landmark::new(self.chin.0, self.chin.1, 0.0);
        points
    }
}

/// Frame containing a face
pub fn face_frame(timestamp_ms: f64, width: u32, height: u32, layout: FaceLayout) -> LandmarkFrame {
    LandmarkFrame {
        timestamp_ms,
        width,
        height,
        landmarks: Some(layout.landmarks()),
    }
}

/// Frame without a face
pub fn empty_frame(timestamp_ms: f64, width: u32, height: u32) -> LandmarkFrame {
    LandmarkFrame {
        timestamp_ms,
        width,
        height,
        landmarks: None,
    }
}

/// One JSON Lines record for a frame
pub fn to_json_line(frame: &LandmarkFrame) -> Result<String> {
    serde_json::to_string(frame).map_err(Into::into)
}

/// Assert that every pose component is finite
pub fn assert_pose_finite(pose: &Pose) -> Result<()> {
    for (name, value) in [
        ("center_x", pose.center_x),
        ("center_y", pose.center_y),
        ("scale", pose.scale),
        ("rotation", pose.rotation),
    ] {
        if !value.is_finite() {
            return Err(Error::InvalidInput(format!("Non-finite {name}: {value}")));
        }
    }
    Ok(())
}

/// Fresh scratch directory under the system temp dir
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("helmet_overlay_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
