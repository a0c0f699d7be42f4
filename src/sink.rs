//! Graphics sinks consuming helmet geometry.
//!
//! A sink receives the shape set for every frame, or `None` when there is no
//! face to draw, in which case the previous overlay must be cleared.

use crate::{
    geometry::{BlendMode, Color, GradientStop, HelmetShapeSet, Paint, PathCommand, Shape},
    Error, Result,
};
use kurbo::BezPath;
use log::debug;
use std::fs;
use svg::node::element::{
    Definitions, Filter, FilterEffectGaussianBlur, LinearGradient, Path as SvgPath, RadialGradient, Stop,
};
use svg::Document;
use std::path::{Path, PathBuf};

/// Consumer of per-frame helmet geometry
pub trait GraphicsSink {
    /// Draw one frame
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be rendered or stored
    fn draw(&mut self, frame_index: usize, width: u32, height: u32, shapes: Option<&HelmetShapeSet>) -> Result<()>;

    /// Flush pending output
    ///
    /// # Errors
    ///
    /// Returns an error if buffered output cannot be written
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Create a sink by format name (`svg` or `json`)
///
/// # Errors
///
/// Returns an error for unknown formats or if the directory cannot be created
pub fn create_sink(format: &str, directory: &Path, file_prefix: &str) -> Result<Box<dyn GraphicsSink>> {
    match format.to_lowercase().as_str() {
        "svg" => Ok(Box::new(SvgSink::new(directory, file_prefix)?)),
        "json" => Ok(Box::new(JsonSink::new(directory, file_prefix)?)),
        other => Err(Error::SinkError(format!("Unknown output format: {other}"))),
    }
}

fn prepare_directory(directory: &Path) -> Result<PathBuf> {
    fs::create_dir_all(directory)
        .map_err(|e| Error::SinkError(format!("Failed to create {}: {e}", directory.display())))?;
    Ok(directory.to_path_buf())
}

/// Writes one standalone SVG document per frame
pub struct SvgSink {
    directory: PathBuf,
    file_prefix: String,
    frames_written: usize,
}

impl SvgSink {
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created
    pub fn new<P: AsRef<Path>>(directory: P, file_prefix: &str) -> Result<Self> {
        Ok(Self {
            directory: prepare_directory(directory.as_ref())?,
            file_prefix: file_prefix.to_string(),
            frames_written: 0,
        })
    }

    /// Path of the document for a frame index
    #[must_use]
    pub fn frame_path(&self, frame_index: usize) -> PathBuf {
        self.directory
            .join(format!("{}_{frame_index:06}.svg", self.file_prefix))
    }

    #[must_use]
    pub const fn frames_written(&self) -> usize {
        self.frames_written
    }
}

impl GraphicsSink for SvgSink {
    fn draw(&mut self, frame_index: usize, width: u32, height: u32, shapes: Option<&HelmetShapeSet>) -> Result<()> {
        let path = self.frame_path(frame_index);
        fs::write(&path, render_svg(width, height, shapes))
            .map_err(|e| Error::SinkError(format!("Failed to write {}: {e}", path.display())))?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        debug!("Wrote {} SVG frames to {}", self.frames_written, self.directory.display());
        Ok(())
    }
}

/// Writes the raw shape set of each frame as JSON
pub struct JsonSink {
    directory: PathBuf,
    file_prefix: String,
}

impl JsonSink {
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created
    pub fn new<P: AsRef<Path>>(directory: P, file_prefix: &str) -> Result<Self> {
        Ok(Self {
            directory: prepare_directory(directory.as_ref())?,
            file_prefix: file_prefix.to_string(),
        })
    }
}

impl GraphicsSink for JsonSink {
    fn draw(&mut self, frame_index: usize, _width: u32, _height: u32, shapes: Option<&HelmetShapeSet>) -> Result<()> {
        let path = self.directory.join(format!("{}_{frame_index:06}.json", self.file_prefix));
        let content = serde_json::to_string_pretty(&shapes)?;
        fs::write(&path, content).map_err(|e| Error::SinkError(format!("Failed to write {}: {e}", path.display())))
    }
}

/// Sink that keeps every frame in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<Option<HelmetShapeSet>>,
}

impl GraphicsSink for RecordingSink {
    fn draw(&mut self, _frame_index: usize, _width: u32, _height: u32, shapes: Option<&HelmetShapeSet>) -> Result<()> {
        self.frames.push(shapes.cloned());
        Ok(())
    }
}

/// Render a frame as an SVG document; `None` yields an empty canvas
#[must_use]
pub fn render_svg(width: u32, height: u32, shapes: Option<&HelmetShapeSet>) -> String {
    let mut document = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", format!("0 0 {width} {height}"));

    if let Some(set) = shapes {
        let mut defs = Definitions::new();
        let mut body = Vec::new();
        for (index, shape) in set.shapes.iter().enumerate() {
            defs = add_shape(defs, &mut body, index, shape);
        }
        if !set.shapes.is_empty() {
            document = document.add(defs);
        }
        for path in body {
            document = document.add(path);
        }
    }

    document.to_string()
}

/// Outline of a shape as a kurbo path
#[must_use]
pub fn to_bez_path(commands: &[PathCommand]) -> BezPath {
    let mut path = BezPath::new();
    for command in commands {
        match command {
            PathCommand::MoveTo { to } => path.move_to((to.x, to.y)),
            PathCommand::LineTo { to } => path.line_to((to.x, to.y)),
            PathCommand::QuadTo { ctrl, to } => path.quad_to((ctrl.x, ctrl.y), (to.x, to.y)),
            PathCommand::Close => path.close_path(),
        }
    }
    path
}

fn with_color(path: SvgPath, attribute: &str, color: Color) -> SvgPath {
    let path = path.set(attribute, color.hex());
    if (color.a - 1.0).abs() < f64::EPSILON {
        path
    } else {
        path.set(format!("{attribute}-opacity"), color.a)
    }
}

fn stop(stop: &GradientStop) -> Stop {
    Stop::new()
        .set("offset", stop.offset)
        .set("stop-color", stop.color.hex())
        .set("stop-opacity", stop.color.a)
}

/// Fill a path with a paint, adding any gradient it needs to the definitions
fn with_paint(defs: Definitions, path: SvgPath, id: &str, paint: &Paint) -> (Definitions, SvgPath) {
    match paint {
        Paint::Solid { color } => (defs, with_color(path, "fill", *color)),
        Paint::LinearGradient { start, end, stops } => {
            let gradient = stops.iter().map(stop).fold(
                LinearGradient::new()
                    .set("id", id)
                    .set("gradientUnits", "userSpaceOnUse")
                    .set("x1", start.x)
                    .set("y1", start.y)
                    .set("x2", end.x)
                    .set("y2", end.y),
                |gradient, stop| gradient.add(stop),
            );
            (defs.add(gradient), path.set("fill", format!("url(#{id})")))
        }
        Paint::RadialGradient { center, radius, stops } => {
            let gradient = stops.iter().map(stop).fold(
                RadialGradient::new()
                    .set("id", id)
                    .set("gradientUnits", "userSpaceOnUse")
                    .set("cx", center.x)
                    .set("cy", center.y)
                    .set("r", *radius),
                |gradient, stop| gradient.add(stop),
            );
            (defs.add(gradient), path.set("fill", format!("url(#{id})")))
        }
    }
}

fn with_common(path: SvgPath, shape: &Shape) -> SvgPath {
    let path = if (shape.opacity - 1.0).abs() > f64::EPSILON {
        path.set("opacity", shape.opacity)
    } else {
        path
    };
    match shape.blend {
        BlendMode::Lighter => path.set("style", "mix-blend-mode:plus-lighter"),
        BlendMode::Normal => path,
    }
}

fn add_shape(mut defs: Definitions, body: &mut Vec<SvgPath>, index: usize, shape: &Shape) -> Definitions {
    let d = to_bez_path(&shape.path).to_svg();

    if let Some(glow) = shape.glow {
        let filter_id = format!("glow{index}");
        defs = defs.add(
            Filter::new()
                .set("id", filter_id.as_str())
                .set("x", "-50%")
                .set("y", "-50%")
                .set("width", "200%")
                .set("height", "200%")
                .add(FilterEffectGaussianBlur::new().set("stdDeviation", glow.blur / 2.0)),
        );
        let halo = SvgPath::new()
            .set("d", d.as_str())
            .set("filter", format!("url(#{filter_id})"));
        body.push(with_common(with_color(halo, "fill", glow.color), shape));
    }

    let mut path = SvgPath::new().set("id", shape.name.as_str()).set("d", d);
    match &shape.fill {
        Some(paint) => (defs, path) = with_paint(defs, path, &format!("paint{index}"), paint),
        None => path = path.set("fill", "none"),
    }
    if let Some(stroke) = shape.stroke {
        path = with_color(path, "stroke", stroke.color)
            .set("stroke-width", stroke.width)
            .set("stroke-linejoin", "round");
    }
    body.push(with_common(path, shape));
    defs
}
