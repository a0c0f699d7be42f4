//! Constants used throughout the library

/// Number of points in the face-mesh landmark model
pub const FACE_MESH_LANDMARK_COUNT: usize = 468;

/// Default face-mesh indices for the semantic landmark roles
pub const FACE_MESH_LEFT_EYE_OUTER: usize = 33;
pub const FACE_MESH_RIGHT_EYE_OUTER: usize = 263;
pub const FACE_MESH_NOSE_TIP: usize = 1;
pub const FACE_MESH_CHIN: usize = 152;
pub const FACE_MESH_FOREHEAD: usize = 10;
pub const FACE_MESH_LEFT_CHEEK: usize = 234;
pub const FACE_MESH_RIGHT_CHEEK: usize = 454;

/// Default scale weights (eye distance, nose-to-chin distance)
pub const DEFAULT_EYE_WEIGHT: f64 = 1.15;
pub const DEFAULT_HEIGHT_WEIGHT: f64 = 0.69;

/// Default lower bound for the pose scale, in pixels
pub const DEFAULT_MIN_SCALE: f64 = 40.0;

/// Eye distances below this (pixels) are degenerate
pub const DEFAULT_MIN_EYE_DISTANCE: f64 = 1e-3;

/// Raise applied to the forehead/chin midpoint by the face-midpoint strategy
pub const FACE_MIDPOINT_RAISE: f64 = 0.05;

/// Default exponential smoothing factor (weight of the newest sample)
pub const DEFAULT_SMOOTHING_FACTOR: f64 = 0.25;

/// Default faceplate animation durations in milliseconds
pub const DEFAULT_TOGGLE_DURATION_MS: f64 = 350.0;
pub const DEFAULT_SCRUB_DURATION_MS: f64 = 120.0;

/// Retargets closer than this to the current progress start no animation
pub const ANIMATION_EPSILON: f64 = 1e-3;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
