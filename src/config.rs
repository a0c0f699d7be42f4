//! Configuration management for the helmet overlay

use crate::{
    constants::{
        DEFAULT_EYE_WEIGHT, DEFAULT_HEIGHT_WEIGHT, DEFAULT_MIN_EYE_DISTANCE, DEFAULT_MIN_SCALE,
        DEFAULT_SCRUB_DURATION_MS, DEFAULT_SMOOTHING_FACTOR, DEFAULT_TOGGLE_DURATION_MS,
    },
    geometry::{Color, GradientStop},
    landmarks::LandmarkIndexMap,
    pose_estimation::CenterStrategy,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pose estimation configuration
    pub pose: PoseConfig,

    /// Pose smoothing configuration
    pub smoothing: SmoothingConfig,

    /// Faceplate animation configuration
    pub animation: AnimationConfig,

    /// Helmet appearance
    pub style: StyleConfig,

    /// Output configuration
    pub output: OutputConfig,
}

/// Pose estimation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Provider indices for the landmark roles
    pub landmark_indices: LandmarkIndexMap,

    /// How the pose center is derived
    pub center_strategy: CenterStrategy,

    /// Weight of the outer eye-corner distance in the scale
    pub eye_weight: f64,

    /// Weight of the nose-to-chin distance in the scale
    pub height_weight: f64,

    /// Lower scale bound in pixels
    pub min_scale: f64,

    /// Upper scale bound in pixels (frame's larger side when unset)
    pub max_scale: Option<f64>,

    /// Eye distances below this many pixels are degenerate
    pub min_eye_distance: f64,
}

/// Smoothing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Filter type (`exponential` or `none`)
    pub filter: String,

    /// Weight given to each new pose sample (0.0-1.0]
    pub factor: f64,
}

/// Faceplate animation timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Duration of a full open/close toggle
    pub toggle_duration_ms: f64,

    /// Duration of a continuous scrub step
    pub scrub_duration_ms: f64,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving rendered frames
    pub directory: PathBuf,

    /// File name prefix for rendered frames
    pub file_prefix: String,

    /// Output format (`svg` or `json`)
    pub format: String,
}

/// Stroke width that grows with the helmet but never gets thinner than `min`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeWidth {
    /// Minimum width in pixels
    pub min: f64,
    /// Width as a fraction of the pose scale
    pub ratio: f64,
}

impl StrokeWidth {
    #[must_use]
    pub const fn new(min: f64, ratio: f64) -> Self {
        Self { min, ratio }
    }

    /// Width in pixels for a pose scale
    #[must_use]
    pub fn resolve(&self, scale: f64) -> f64 {
        self.min.max(self.ratio * scale)
    }
}

/// Helmet appearance. Lengths are in pose-scale units unless noted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub palette: Palette,
    pub shell: ShellStyle,
    pub faceplate: FaceplateStyle,
    pub eyes: EyeStyle,
    pub strokes: StrokeStyle,
}

/// Helmet colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub shell_gradient: Vec<GradientStop>,
    pub forehead_gradient: Vec<GradientStop>,
    pub faceplate_gradient: Vec<GradientStop>,
    pub outline: Color,
    pub detail: Color,
    pub trim: Color,
    pub vent: Color,
    pub jaw: Color,
    pub accent: Color,
    pub eye: Color,
    pub eye_glow: Color,
    pub eye_outline: Color,
    pub shadow: Color,
}

/// Shell proportions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellStyle {
    pub width: f64,
    pub height: f64,
    /// Vertical offset of the shell below the pose center
    pub offset_y: f64,
    pub corner_radius: f64,
    pub forehead_offset_y: f64,
    pub forehead_corner_radius: f64,
    /// Vent slits per side
    pub vent_count: u32,
}

/// Faceplate proportions and hinge motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceplateStyle {
    /// Width as a fraction of the shell width
    pub width: f64,
    /// Height as a fraction of the shell height
    pub height: f64,
    pub offset_y: f64,
    /// Distance from the plate origin up to its top edge
    pub top: f64,
    pub corner_radius: f64,
    /// Hinge position below the top edge, as a fraction of the plate height
    pub hinge_drop: f64,
    /// Hinge rotation when fully open, radians
    pub hinge_max_angle: f64,
    /// Upward travel when fully open
    pub lift_max: f64,
    /// Opacity of the shadow overlay when fully open
    pub shadow_max_alpha: f64,
}

/// Eye slit proportions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeStyle {
    /// Width as a fraction of the faceplate width
    pub width: f64,
    pub height: f64,
    /// Horizontal offset of each eye as a fraction of the faceplate width
    pub spacing: f64,
    /// Vertical offset as a fraction of the faceplate height
    pub offset_y: f64,
    pub glow_blur: f64,
    pub bridge_glow_radius: f64,
}

/// Stroke widths per shape family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    pub shell: StrokeWidth,
    pub faceplate: StrokeWidth,
    pub detail: StrokeWidth,
    pub brow: StrokeWidth,
    pub eye: StrokeWidth,
    pub mouth: StrokeWidth,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            landmark_indices: LandmarkIndexMap::face_mesh(),
            center_strategy: CenterStrategy::Centroid,
            eye_weight: DEFAULT_EYE_WEIGHT,
            height_weight: DEFAULT_HEIGHT_WEIGHT,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: None,
            min_eye_distance: DEFAULT_MIN_EYE_DISTANCE,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            filter: "exponential".to_string(),
            factor: DEFAULT_SMOOTHING_FACTOR,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            toggle_duration_ms: DEFAULT_TOGGLE_DURATION_MS,
            scrub_duration_ms: DEFAULT_SCRUB_DURATION_MS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("out"),
            file_prefix: "frame".to_string(),
            format: "svg".to_string(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            shell_gradient: vec![
                GradientStop::new(0.0, Color::rgb(0x9f, 0x0d, 0x24)),
                GradientStop::new(0.45, Color::rgb(0xc8, 0x10, 0x2e)),
                GradientStop::new(1.0, Color::rgb(0x5b, 0x0a, 0x18)),
            ],
            forehead_gradient: vec![
                GradientStop::new(0.0, Color::rgb(0xa3, 0x0f, 0x26)),
                GradientStop::new(1.0, Color::rgb(0x70, 0x10, 0x1e)),
            ],
            faceplate_gradient: vec![
                GradientStop::new(0.0, Color::rgb(0xf6, 0xe3, 0xa1)),
                GradientStop::new(0.15, Color::rgb(0xe8, 0xc6, 0x5b)),
                GradientStop::new(0.55, Color::rgb(0xd4, 0xaf, 0x37)),
                GradientStop::new(1.0, Color::rgb(0x9c, 0x7f, 0x1e)),
            ],
            outline: Color::rgba(0, 0, 0, 0.35),
            detail: Color::rgba(0, 0, 0, 0.5),
            trim: Color::rgba(0, 0, 0, 0.25),
            vent: Color::rgb(0x2a, 0x04, 0x09),
            jaw: Color::rgb(0x7f, 0x0f, 0x0f),
            accent: Color::rgb(0x8a, 0x6f, 0x1a),
            eye: Color::rgb(0xb8, 0xf0, 0xff),
            eye_glow: Color::rgba(102, 217, 255, 0.8),
            eye_outline: Color::rgba(0, 0, 0, 0.45),
            shadow: Color::rgba(0, 0, 0, 0.5),
        }
    }
}

impl Default for ShellStyle {
    fn default() -> Self {
        Self {
            width: 2.0,
            height: 2.6,
            offset_y: 0.15,
            corner_radius: 0.18,
            forehead_offset_y: 0.02,
            forehead_corner_radius: 0.08,
            vent_count: 3,
        }
    }
}

impl Default for FaceplateStyle {
    fn default() -> Self {
        Self {
            width: 0.85,
            height: 0.9,
            offset_y: 0.10,
            top: 0.55,
            corner_radius: 0.14,
            hinge_drop: 0.05,
            hinge_max_angle: 0.15,
            lift_max: 0.9,
            shadow_max_alpha: 0.25,
        }
    }
}

impl Default for EyeStyle {
    fn default() -> Self {
        Self {
            width: 0.16,
            height: 0.07,
            spacing: 0.23,
            offset_y: -0.02,
            glow_blur: 0.12,
            bridge_glow_radius: 0.08,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            shell: StrokeWidth::new(2.0, 0.035),
            faceplate: StrokeWidth::new(1.5, 0.02),
            detail: StrokeWidth::new(1.0, 0.012),
            brow: StrokeWidth::new(2.0, 0.018),
            eye: StrokeWidth::new(1.0, 0.01),
            mouth: StrokeWidth::new(1.5, 0.014),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create the pose filter named by the smoothing section
    ///
    /// # Errors
    ///
    /// Returns an error for unknown filter names or a bad factor
    pub fn create_filter(&self) -> Result<Box<dyn crate::filters::PoseFilter>> {
        use crate::filters::{create_filter, exponential::ExponentialPoseFilter};

        match self.smoothing.filter.to_lowercase().as_str() {
            "exponential" | "ema" => {
                if !(self.smoothing.factor > 0.0 && self.smoothing.factor <= 1.0) {
                    return Err(Error::ConfigError(
                        "Smoothing factor must be in (0.0, 1.0]".to_string(),
                    ));
                }
                Ok(Box::new(ExponentialPoseFilter::new(self.smoothing.factor)))
            }
            name => create_filter(name),
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns the first problem found
    pub fn validate(&self) -> Result<()> {
        // Validate pose parameters
        let pose = &self.pose;
        if !(pose.min_scale > 0.0) {
            return Err(Error::ConfigError("Minimum scale must be positive".to_string()));
        }
        if let Some(max_scale) = pose.max_scale {
            if !(max_scale >= pose.min_scale) {
                return Err(Error::ConfigError(
                    "Maximum scale must not be below the minimum scale".to_string(),
                ));
            }
        }
        if pose.eye_weight < 0.0 || pose.height_weight < 0.0 {
            return Err(Error::ConfigError("Scale weights must be non-negative".to_string()));
        }
        if pose.eye_weight + pose.height_weight <= 0.0 {
            return Err(Error::ConfigError("At least one scale weight must be positive".to_string()));
        }
        if !(pose.min_eye_distance >= 0.0) {
            return Err(Error::ConfigError("Minimum eye distance must be non-negative".to_string()));
        }

        // Validate smoothing
        self.create_filter()?;

        // Validate animation timing
        if !(self.animation.toggle_duration_ms > 0.0) || !(self.animation.scrub_duration_ms > 0.0) {
            return Err(Error::ConfigError("Animation durations must be positive".to_string()));
        }

        // Validate style proportions
        let style = &self.style;
        let lengths = [
            ("shell.width", style.shell.width),
            ("shell.height", style.shell.height),
            ("shell.corner_radius", style.shell.corner_radius),
            ("shell.forehead_corner_radius", style.shell.forehead_corner_radius),
            ("faceplate.width", style.faceplate.width),
            ("faceplate.height", style.faceplate.height),
            ("faceplate.corner_radius", style.faceplate.corner_radius),
            ("faceplate.lift_max", style.faceplate.lift_max),
            ("eyes.width", style.eyes.width),
            ("eyes.height", style.eyes.height),
            ("eyes.glow_blur", style.eyes.glow_blur),
            ("eyes.bridge_glow_radius", style.eyes.bridge_glow_radius),
        ];
        for (name, value) in lengths {
            if !(value >= 0.0) {
                return Err(Error::ConfigError(format!("style.{name} must be non-negative")));
            }
        }
        if !(0.0..=1.0).contains(&style.faceplate.shadow_max_alpha) {
            return Err(Error::ConfigError(
                "style.faceplate.shadow_max_alpha must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Validate output
        match self.output.format.as_str() {
            "svg" | "json" => {}
            other => return Err(Error::ConfigError(format!("Unknown output format: {other}"))),
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r##"# Helmet Overlay Configuration

# Pose estimation
pose:
  landmark_indices:
    left_eye_outer: 33
    right_eye_outer: 263
    nose_tip: 1
    chin: 152
    forehead: 10
    left_cheek: 234
    right_cheek: 454
  center_strategy: centroid
  eye_weight: 1.15
  height_weight: 0.69
  min_scale: 40.0
  max_scale: null
  min_eye_distance: 0.001

# Pose smoothing
smoothing:
  filter: "exponential"
  factor: 0.25

# Faceplate animation
animation:
  toggle_duration_ms: 350.0
  scrub_duration_ms: 120.0

# Helmet appearance (lengths in pose-scale units)
style:
  palette:
    outline: "rgba(0,0,0,0.35)"
    eye: "#b8f0ff"
    eye_glow: "rgba(102,217,255,0.8)"
  shell:
    width: 2.0
    height: 2.6
    corner_radius: 0.18
    vent_count: 3
  faceplate:
    hinge_max_angle: 0.15
    lift_max: 0.9
    shadow_max_alpha: 0.25

# Rendered output
output:
  directory: "out"
  file_prefix: "frame"
  format: "svg"
"##;
