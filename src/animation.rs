//! Faceplate open/close animation.
//!
//! The faceplate position is a progress value in [0, 1] (0 = closed,
//! 1 = open). Every control input, discrete toggles and continuous scrubbing
//! alike, goes through [`FaceplateAnimator::set_target`], which starts the new
//! animation from wherever the previous one currently is. Progress is a
//! function of wall-clock time, so a stalled frame source does not slow the
//! animation down.

use crate::{
    config::AnimationConfig,
    constants::{ANIMATION_EPSILON, DEFAULT_SCRUB_DURATION_MS, DEFAULT_TOGGLE_DURATION_MS},
    utils::clamp_unit,
};
use log::{debug, warn};
use serde::Serialize;

/// Cubic ease-in-out on [0, 1]
///
/// Input outside [0, 1] is clamped first.
#[must_use]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = clamp_unit(t);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0f64).mul_add(t, 2.0).powi(3) / 2.0
    }
}

/// Coarse faceplate state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceplatePhase {
    /// At rest with progress 0
    Closed,
    /// At rest with progress 1
    Open,
    /// At rest part-way open (only reachable by scrubbing)
    Ajar,
    /// Moving toward the target
    Animating,
}

impl FaceplatePhase {
    fn settled_at(progress: f64) -> Self {
        if progress <= 0.0 {
            Self::Closed
        } else if progress >= 1.0 {
            Self::Open
        } else {
            Self::Ajar
        }
    }
}

/// Snapshot of the animation bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationState {
    /// Progress as of the last tick
    pub progress: f64,
    /// Progress the current animation is heading to
    pub target: f64,
    /// When the current animation started (ms)
    pub start_time_ms: f64,
    /// Progress at the moment the current animation started
    pub start_progress: f64,
    /// Length of the current animation (ms)
    pub duration_ms: f64,
    /// Coarse state
    pub phase: FaceplatePhase,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            target: 0.0,
            start_time_ms: 0.0,
            start_progress: 0.0,
            duration_ms: DEFAULT_TOGGLE_DURATION_MS,
            phase: FaceplatePhase::Closed,
        }
    }
}

/// Interruptible, retargetable faceplate animation
#[derive(Debug, Clone)]
pub struct FaceplateAnimator {
    state: AnimationState,
    /// Open/closed flag flipped by `toggle`
    open: bool,
    toggle_duration_ms: f64,
    scrub_duration_ms: f64,
}

impl Default for FaceplateAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_TOGGLE_DURATION_MS, DEFAULT_SCRUB_DURATION_MS)
    }
}

fn valid_duration(duration_ms: f64) -> bool {
    duration_ms.is_finite() && duration_ms > 0.0
}

impl FaceplateAnimator {
    /// Create a closed faceplate
    ///
    /// Non-positive or non-finite durations fall back to the defaults.
    #[must_use]
    pub fn new(toggle_duration_ms: f64, scrub_duration_ms: f64) -> Self {
        let toggle_duration_ms = if valid_duration(toggle_duration_ms) {
            toggle_duration_ms
        } else {
            warn!("Invalid toggle duration {toggle_duration_ms}ms, using {DEFAULT_TOGGLE_DURATION_MS}ms");
            DEFAULT_TOGGLE_DURATION_MS
        };
        let scrub_duration_ms = if valid_duration(scrub_duration_ms) {
            scrub_duration_ms
        } else {
            warn!("Invalid scrub duration {scrub_duration_ms}ms, using {DEFAULT_SCRUB_DURATION_MS}ms");
            DEFAULT_SCRUB_DURATION_MS
        };

        Self {
            state: AnimationState {
                duration_ms: toggle_duration_ms,
                ..AnimationState::default()
            },
            open: false,
            toggle_duration_ms,
            scrub_duration_ms,
        }
    }

    #[must_use]
    pub fn from_config(config: &AnimationConfig) -> Self {
        Self::new(config.toggle_duration_ms, config.scrub_duration_ms)
    }

    #[must_use]
    pub const fn state(&self) -> &AnimationState {
        &self.state
    }

    #[must_use]
    pub const fn phase(&self) -> FaceplatePhase {
        self.state.phase
    }

    #[must_use]
    pub const fn target(&self) -> f64 {
        self.state.target
    }

    /// Whether the faceplate was last asked to open
    #[must_use]
    pub const fn is_open_target(&self) -> bool {
        self.open
    }

    fn elapsed_fraction(&self, now_ms: f64) -> f64 {
        clamp_unit((now_ms - self.state.start_time_ms) / self.state.duration_ms)
    }

    /// Progress at `now_ms` without changing any state
    #[must_use]
    pub fn current_progress(&self, now_ms: f64) -> f64 {
        if self.state.phase != FaceplatePhase::Animating {
            return self.state.progress;
        }
        let t = self.elapsed_fraction(now_ms);
        if t >= 1.0 {
            return self.state.target;
        }
        let span = self.state.target - self.state.start_progress;
        span.mul_add(ease_in_out_cubic(t), self.state.start_progress)
    }

    /// Advance the animation to `now_ms` and return the new progress
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        if self.state.phase == FaceplatePhase::Animating {
            if self.elapsed_fraction(now_ms) >= 1.0 {
                self.settle(self.state.target, now_ms);
            } else {
                self.state.progress = self.current_progress(now_ms);
            }
        }
        self.state.progress
    }

    fn settle(&mut self, target: f64, now_ms: f64) {
        self.state.progress = target;
        self.state.target = target;
        self.state.start_progress = target;
        self.state.start_time_ms = now_ms;
        self.state.phase = FaceplatePhase::settled_at(target);
        self.open = target >= 0.5;
    }

    /// Start animating toward `target` from the current progress
    ///
    /// Targets are clamped to [0, 1]. Invalid durations use the toggle
    /// duration. A target within `ANIMATION_EPSILON` of the current progress
    /// is a no-op; any animation in flight carries on.
    pub fn set_target(&mut self, target: f64, duration_ms: f64, now_ms: f64) {
        if !target.is_finite() {
            warn!("Ignoring non-finite faceplate target {target}");
            return;
        }
        let target = target.clamp(0.0, 1.0);
        let duration_ms = if valid_duration(duration_ms) {
            duration_ms
        } else {
            warn!("Invalid faceplate duration {duration_ms}ms, using {}ms", self.toggle_duration_ms);
            self.toggle_duration_ms
        };

        let start_progress = self.current_progress(now_ms);
        if (target - start_progress).abs() < ANIMATION_EPSILON {
            debug!("Faceplate already at {start_progress:.3}, ignoring target {target:.3}");
            return;
        }

        debug!("Faceplate {start_progress:.3} -> {target:.3} over {duration_ms}ms");
        self.state = AnimationState {
            progress: start_progress,
            target,
            start_time_ms: now_ms,
            start_progress,
            duration_ms,
            phase: FaceplatePhase::Animating,
        };
        self.open = target >= 0.5;
    }

    /// Flip between open and closed; returns the new target
    pub fn toggle(&mut self, now_ms: f64) -> f64 {
        self.set_open(!self.open, now_ms);
        if self.open { 1.0 } else { 0.0 }
    }

    /// Open or close explicitly
    pub fn set_open(&mut self, open: bool, now_ms: f64) {
        let target = if open { 1.0 } else { 0.0 };
        self.set_target(target, self.toggle_duration_ms, now_ms);
        self.open = open;
    }

    /// Continuous control; `None` uses the short scrub duration
    pub fn set_progress(&mut self, value: f64, duration_ms: Option<f64>, now_ms: f64) {
        self.set_target(value, duration_ms.unwrap_or(self.scrub_duration_ms), now_ms);
    }
}
