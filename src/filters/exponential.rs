use super::PoseFilter;
use crate::{
    pose_estimation::Pose,
    utils::{lerp, shortest_angle_delta, wrap_angle},
};

/// Exponential smoothing with circular handling of the rotation channel
pub struct ExponentialPoseFilter {
    alpha: f64,
    last: Option<Pose>,
}

impl ExponentialPoseFilter {
    /// Create a filter giving weight `alpha` to each new sample
    ///
    /// # Panics
    ///
    /// Panics if alpha is not in the range (0, 1]
    #[must_use]
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be in (0, 1]");
        Self { alpha, last: None }
    }

    /// Weight given to each new sample
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl PoseFilter for ExponentialPoseFilter {
    fn apply(&mut self, pose: Pose) -> Pose {
        let filtered = match self.last {
            Some(last) => {
                let delta = shortest_angle_delta(last.rotation, pose.rotation);
                Pose {
                    center_x: lerp(last.center_x, pose.center_x, self.alpha),
                    center_y: lerp(last.center_y, pose.center_y, self.alpha),
                    scale: lerp(last.scale, pose.scale, self.alpha),
                    rotation: wrap_angle(self.alpha.mul_add(delta, last.rotation)),
                }
            }
            None => pose,
        };

        self.last = Some(filtered);
        filtered
    }

    fn reset(&mut self) {
        self.last = None;
    }

    fn name(&self) -> &str {
        "ExponentialPoseFilter"
    }
}
