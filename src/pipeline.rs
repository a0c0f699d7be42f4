//! Per-frame overlay context.
//!
//! [`OverlayPipeline`] owns the only mutable state of the overlay: the
//! smoothed pose and the faceplate animation. Each pipeline is independent,
//! so several overlays can run side by side.

use crate::{
    animation::{FaceplateAnimator, FaceplatePhase},
    config::Config,
    filters::PoseSmoother,
    geometry::{HelmetGeometryBuilder, HelmetShapeSet},
    landmarks::LandmarkFrame,
    pose_estimation::{Pose, PoseEstimator},
    Result,
};
use log::{debug, info};

/// Counters collected while processing frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Frames processed
    pub frames: usize,
    /// Frames where a pose was estimated
    pub faces: usize,
    /// Frames where geometry was produced
    pub drawn: usize,
}

/// Landmarks in, helmet geometry out
pub struct OverlayPipeline {
    estimator: PoseEstimator,
    smoother: PoseSmoother,
    animator: FaceplateAnimator,
    builder: HelmetGeometryBuilder,
    face_present: bool,
    stats: PipelineStats,
}

impl OverlayPipeline {
    /// Build a pipeline from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configured filter cannot be created
    pub fn new(config: &Config) -> Result<Self> {
        let smoother = PoseSmoother::new(config.create_filter()?);
        info!(
            "Overlay pipeline ready (filter: {}, center: {:?})",
            smoother.filter_name(),
            config.pose.center_strategy
        );

        Ok(Self::from_parts(
            PoseEstimator::new(&config.pose),
            smoother,
            FaceplateAnimator::from_config(&config.animation),
            HelmetGeometryBuilder::new(config.style.clone()),
        ))
    }

    #[must_use]
    pub fn from_parts(
        estimator: PoseEstimator,
        smoother: PoseSmoother,
        animator: FaceplateAnimator,
        builder: HelmetGeometryBuilder,
    ) -> Self {
        Self {
            estimator,
            smoother,
            animator,
            builder,
            face_present: false,
            stats: PipelineStats::default(),
        }
    }

    /// Process one frame
    ///
    /// Returns `None` when nothing should be drawn: no face in this frame, or
    /// an estimate that could not be made from the landmarks. The smoothed
    /// pose is held across such frames.
    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> Option<HelmetShapeSet> {
        self.stats.frames += 1;
        let progress = self.animator.tick(frame.timestamp_ms);

        let raw = frame.face().and_then(|landmarks| {
            match self.estimator.estimate(landmarks, frame.width, frame.height) {
                Ok(pose) => Some(pose),
                Err(e) => {
                    debug!("No pose at {:.1}ms: {e}", frame.timestamp_ms);
                    None
                }
            }
        });

        match (raw.is_some(), self.face_present) {
            (true, false) => debug!("Face acquired at {:.1}ms", frame.timestamp_ms),
            (false, true) => debug!("Face lost at {:.1}ms", frame.timestamp_ms),
            _ => {}
        }
        self.face_present = raw.is_some();

        let smoothed = self.smoother.update(raw);
        if raw.is_none() {
            return None;
        }
        self.stats.faces += 1;

        let pose = smoothed?;
        self.stats.drawn += 1;
        Some(self.builder.build(&pose, progress))
    }

    /// Flip the faceplate; returns the new target
    pub fn toggle(&mut self, now_ms: f64) -> f64 {
        self.animator.toggle(now_ms)
    }

    pub fn set_open(&mut self, open: bool, now_ms: f64) {
        self.animator.set_open(open, now_ms);
    }

    /// Move the faceplate toward `value`; `None` uses the scrub duration
    pub fn set_progress(&mut self, value: f64, duration_ms: Option<f64>, now_ms: f64) {
        self.animator.set_progress(value, duration_ms, now_ms);
    }

    #[must_use]
    pub fn current_progress(&self, now_ms: f64) -> f64 {
        self.animator.current_progress(now_ms)
    }

    #[must_use]
    pub const fn phase(&self) -> FaceplatePhase {
        self.animator.phase()
    }

    /// Last smoothed pose, held while the face is missing
    #[must_use]
    pub const fn smoothed_pose(&self) -> Option<Pose> {
        self.smoother.current()
    }

    #[must_use]
    pub const fn face_present(&self) -> bool {
        self.face_present
    }

    #[must_use]
    pub const fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Forget the smoothed pose
    pub fn reset_tracking(&mut self) {
        self.smoother.reset();
        self.face_present = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Landmark, LandmarkIndexMap};

    fn face_frame(timestamp_ms: f64, dx: f64) -> LandmarkFrame {
        let map = LandmarkIndexMap::face_mesh();
        let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0); map.max_index() + 1];
        landmarks[map.left_eye_outer] = Landmark::new(0.4 + dx, 0.4, 0.0);
        landmarks[map.right_eye_outer] = Landmark::new(0.6 + dx, 0.4, 0.0);
        landmarks[map.nose_tip] = Landmark::new(0.5 + dx, 0.5, 0.0);
        landmarks[map.chin] = Landmark::new(0.5 + dx, 0.7, 0.0);
        LandmarkFrame {
            timestamp_ms,
            width: 640,
            height: 480,
            landmarks: Some(landmarks),
        }
    }

    fn empty_frame(timestamp_ms: f64) -> LandmarkFrame {
        LandmarkFrame {
            timestamp_ms,
            width: 640,
            height: 480,
            landmarks: None,
        }
    }

    #[test]
    fn test_face_produces_geometry() {
        let mut pipeline = OverlayPipeline::new(&Config::default()).unwrap();
        let shapes = pipeline.process_frame(&face_frame(0.0, 0.0)).unwrap();
        assert_eq!(shapes.progress, 0.0);
        assert!(pipeline.face_present());
        assert_eq!(Some(shapes.pose), pipeline.smoothed_pose());
    }

    #[test]
    fn test_no_face_draws_nothing_and_holds_pose() {
        let mut pipeline = OverlayPipeline::new(&Config::default()).unwrap();
        assert!(pipeline.process_frame(&empty_frame(0.0)).is_none());
        assert!(pipeline.smoothed_pose().is_none());

        pipeline.process_frame(&face_frame(33.0, 0.0)).unwrap();
        let held = pipeline.smoothed_pose();

        assert!(pipeline.process_frame(&empty_frame(66.0)).is_none());
        assert!(!pipeline.face_present());
        assert_eq!(pipeline.smoothed_pose(), held);

        assert_eq!(
            pipeline.stats(),
            PipelineStats {
                frames: 3,
                faces: 1,
                drawn: 1
            }
        );
    }

    #[test]
    fn test_unusable_landmarks_treated_as_no_face() {
        let mut pipeline = OverlayPipeline::new(&Config::default()).unwrap();
        let short = LandmarkFrame {
            landmarks: Some(vec![Landmark::new(0.5, 0.5, 0.0); 10]),
            ..empty_frame(0.0)
        };
        assert!(pipeline.process_frame(&short).is_none());
        assert!(!pipeline.face_present());
    }

    #[test]
    fn test_toggle_drives_progress() {
        let mut pipeline = OverlayPipeline::new(&Config::default()).unwrap();
        pipeline.process_frame(&face_frame(0.0, 0.0));
        assert_eq!(pipeline.toggle(0.0), 1.0);

        let mid = pipeline.process_frame(&face_frame(175.0, 0.0)).unwrap();
        assert!(mid.progress > 0.0 && mid.progress < 1.0);

        let done = pipeline.process_frame(&face_frame(400.0, 0.0)).unwrap();
        assert_eq!(done.progress, 1.0);
        assert_eq!(pipeline.phase(), FaceplatePhase::Open);
    }

    #[test]
    fn test_smoothing_lags_behind_motion() {
        let mut pipeline = OverlayPipeline::new(&Config::default()).unwrap();
        let first = pipeline.process_frame(&face_frame(0.0, 0.0)).unwrap();
        let second = pipeline.process_frame(&face_frame(33.0, 0.1)).unwrap();

        let moved = second.pose.center_x - first.pose.center_x;
        // 0.1 of 640 px, a quarter of which is applied
        assert!((moved - 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_reset_tracking() {
        let mut pipeline = OverlayPipeline::new(&Config::default()).unwrap();
        pipeline.process_frame(&face_frame(0.0, 0.0));
        pipeline.reset_tracking();
        assert!(pipeline.smoothed_pose().is_none());
    }
}
