//! Temporal smoothing of the raw pose stream.
//!
//! Landmark detectors jitter from frame to frame. A [`PoseFilter`] turns the
//! raw per-frame poses into a stable stream, and [`PoseSmoother`] adds the
//! frame-level lifecycle on top: nothing until the first face, then the filter
//! output, held unchanged across frames where no face was found.

/// Exponential filter with circular rotation smoothing
pub mod exponential;

use crate::{pose_estimation::Pose, Error, Result};

/// Trait for all pose filters
pub trait PoseFilter: Send + Sync {
    /// Apply filter to a new raw pose
    fn apply(&mut self, pose: Pose) -> Pose;

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes poses through unchanged
pub struct NoFilter;

impl PoseFilter for NoFilter {
    fn apply(&mut self, pose: Pose) -> Pose {
        pose
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a pose filter by type name
///
/// Accepts `none` and `exponential[:alpha]`.
///
/// # Errors
///
/// Returns an error for unknown names or out-of-range parameters
pub fn create_filter(filter_type: &str) -> Result<Box<dyn PoseFilter>> {
    let lowered = filter_type.to_lowercase();
    let mut parts = lowered.split(':');
    let name = parts.next().unwrap_or_default();
    let param = parts.next();

    match name {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "exponential" | "ema" => {
            let alpha = match param {
                Some(value) => value
                    .parse::<f64>()
                    .map_err(|_| Error::FilterError(format!("Invalid exponential alpha: {value}")))?,
                None => crate::constants::DEFAULT_SMOOTHING_FACTOR,
            };
            if !(alpha > 0.0 && alpha <= 1.0) {
                return Err(Error::FilterError(format!("Exponential alpha must be in (0, 1], got {alpha}")));
            }
            Ok(Box::new(exponential::ExponentialPoseFilter::new(alpha)))
        }
        _ => Err(Error::FilterError(format!("Unknown filter type: {filter_type}"))),
    }
}

/// Frame-level smoothed pose state
pub struct PoseSmoother {
    filter: Box<dyn PoseFilter>,
    current: Option<Pose>,
}

impl PoseSmoother {
    #[must_use]
    pub fn new(filter: Box<dyn PoseFilter>) -> Self {
        Self { filter, current: None }
    }

    /// Smoother using exponential filtering with the given factor
    ///
    /// # Panics
    ///
    /// Panics if the factor is not in (0, 1]
    #[must_use]
    pub fn exponential(factor: f64) -> Self {
        Self::new(Box::new(exponential::ExponentialPoseFilter::new(factor)))
    }

    /// Feed this frame's raw pose, or `None` when no face was found
    ///
    /// Returns the smoothed pose, which stays `None` until the first face.
    pub fn update(&mut self, raw: Option<Pose>) -> Option<Pose> {
        if let Some(pose) = raw {
            self.current = Some(self.filter.apply(pose));
        }
        self.current
    }

    /// Current smoothed pose without feeding a sample
    #[must_use]
    pub const fn current(&self) -> Option<Pose> {
        self.current
    }

    /// Forget the smoothed pose; the next face snaps again
    pub fn reset(&mut self) {
        self.filter.reset();
        self.current = None;
    }

    /// Name of the underlying filter
    #[must_use]
    pub fn filter_name(&self) -> &str {
        self.filter.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_filter() {
        let mut filter = NoFilter;
        let pose = Pose::new(1.0, 2.0, 3.0, 0.5);
        assert_eq!(filter.apply(pose), pose);
    }

    #[test]
    fn test_create_filter() {
        assert!(create_filter("none").is_ok());
        assert!(create_filter("exponential").is_ok());
        assert!(create_filter("exponential:0.5").is_ok());
        assert!(create_filter("exponential:0").is_err());
        assert!(create_filter("exponential:abc").is_err());
        assert!(create_filter("kalman").is_err());
    }

    #[test]
    fn test_smoother_uninitialized_until_first_pose() {
        let mut smoother = PoseSmoother::exponential(0.25);
        assert_eq!(smoother.update(None), None);
        let pose = Pose::new(10.0, 20.0, 60.0, 0.1);
        assert_eq!(smoother.update(Some(pose)), Some(pose));
    }

    #[test]
    fn test_smoother_holds_on_dropout() {
        let mut smoother = PoseSmoother::exponential(0.25);
        smoother.update(Some(Pose::new(10.0, 20.0, 60.0, 0.1)));
        let moved = smoother.update(Some(Pose::new(50.0, 20.0, 60.0, 0.1)));
        assert_eq!(smoother.update(None), moved);
        assert_eq!(smoother.update(None), moved);
    }

    #[test]
    fn test_smoother_reset_snaps_again() {
        let mut smoother = PoseSmoother::exponential(0.25);
        smoother.update(Some(Pose::new(10.0, 20.0, 60.0, 0.1)));
        smoother.reset();
        assert_eq!(smoother.current(), None);
        let pose = Pose::new(400.0, 300.0, 90.0, -0.2);
        assert_eq!(smoother.update(Some(pose)), Some(pose));
    }
}
