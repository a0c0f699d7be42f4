//! Assembles the helmet from pose, faceplate progress and style.
//!
//! Local helmet units are multiples of `pose.scale`, with the origin at the
//! pose center, x to the wearer's left-to-right eye direction and y pointing
//! down the face. One similarity transform maps every shape into the frame, so
//! the whole helmet rolls and scales as a rigid body. Faceplate shapes get an
//! extra hinge motion on top of it.

use super::{
    path::PathBuilder, BlendMode, GradientStop, Glow, HelmetShapeSet, HingeTransform, Paint, Shape, ShapeGroup,
    Stroke,
};
use crate::{config::StyleConfig, pose_estimation::Pose, utils::clamp_unit};
use nalgebra::{Isometry2, Point2, Similarity2, Translation2, UnitComplex, Vector2};

fn shape(name: &str, group: ShapeGroup, path: PathBuilder) -> Shape {
    Shape {
        name: name.to_string(),
        group,
        path: path.finish(),
        fill: None,
        stroke: None,
        glow: None,
        opacity: 1.0,
        blend: BlendMode::Normal,
    }
}

fn linear(frame: &Similarity2<f64>, from: (f64, f64), to: (f64, f64), stops: &[GradientStop]) -> Paint {
    Paint::LinearGradient {
        start: frame.transform_point(&Point2::new(from.0, from.1)),
        end: frame.transform_point(&Point2::new(to.0, to.1)),
        stops: stops.to_vec(),
    }
}

/// Build the helmet for one frame
///
/// Pure and deterministic: identical inputs give identical coordinates.
/// `progress` is clamped to [0, 1]; 0 places the faceplate exactly in its
/// closed position.
#[must_use]
pub fn build(pose: &Pose, progress: f64, style: &StyleConfig) -> HelmetShapeSet {
    let s = pose.scale;
    let progress = clamp_unit(progress);
    let palette = &style.palette;
    let strokes = &style.strokes;
    let frame = Similarity2::new(Vector2::new(pose.center_x, pose.center_y), pose.rotation, s);

    let w = style.shell.width;
    let h = style.shell.height;
    let (rx, ry) = (w / 2.0, h / 2.0);
    let mut shapes = Vec::new();

    // Shell group, behind the faceplate
    let shell_frame = frame * Translation2::new(0.0, style.shell.offset_y);
    let outline = [
        (-rx * 0.85, -ry * 0.9),
        (rx * 0.85, -ry * 0.9),
        (rx, -ry * 0.25),
        (rx * 0.9, ry * 0.85),
        (0.0, ry),
        (-rx * 0.9, ry * 0.85),
        (-rx, -ry * 0.25),
    ];
    shapes.push(Shape {
        fill: Some(linear(&shell_frame, (0.0, -ry), (0.0, ry), &palette.shell_gradient)),
        stroke: Some(Stroke {
            color: palette.outline,
            width: strokes.shell.resolve(s),
        }),
        ..shape(
            "shell",
            ShapeGroup::Shell,
            PathBuilder::new(shell_frame).rounded_polygon(&outline, style.shell.corner_radius),
        )
    });

    let (panel_w, panel_h) = (w * 0.12, h * 0.35);
    let panel_top = -h * 0.1;
    for (side, sign) in [("left", -1.0), ("right", 1.0)] {
        let panel_x = sign * w * 0.40 - panel_w / 2.0;
        shapes.push(Shape {
            fill: Some(Paint::Solid { color: palette.trim }),
            ..shape(
                &format!("{side}_cheek_panel"),
                ShapeGroup::Shell,
                PathBuilder::new(shell_frame).rounded_rect(panel_x, panel_top, panel_w, panel_h, w * 0.03),
            )
        });

        let (vent_w, vent_h) = (panel_w * 0.66, h * 0.015);
        for i in 0..style.shell.vent_count {
            let vent_y = panel_top + panel_h * 0.2 + f64::from(i) * h * 0.08;
            shapes.push(Shape {
                fill: Some(Paint::Solid { color: palette.vent }),
                ..shape(
                    &format!("{side}_vent_{i}"),
                    ShapeGroup::Shell,
                    PathBuilder::new(shell_frame).rounded_rect(
                        sign * w * 0.40 - vent_w / 2.0,
                        vent_y,
                        vent_w,
                        vent_h,
                        vent_h / 2.0,
                    ),
                )
            });
        }
    }

    let jaw = [
        (-w * 0.35, h * 0.25),
        (w * 0.35, h * 0.25),
        (w * 0.18, h * 0.45),
        (-w * 0.18, h * 0.45),
    ];
    shapes.push(Shape {
        fill: Some(Paint::Solid { color: palette.jaw }),
        ..shape(
            "jaw",
            ShapeGroup::Shell,
            PathBuilder::new(shell_frame).rounded_polygon(&jaw, w * 0.04),
        )
    });

    // Faceplate group
    let plate = &style.faceplate;
    let fw = plate.width * w;
    let fh = plate.height * h;
    let plate_rest = frame * Translation2::new(0.0, plate.offset_y);
    let hinge_local = Point2::new(0.0, plate.hinge_drop.mul_add(fh, -plate.top));
    let angle = -plate.hinge_max_angle * progress;
    let lift = plate.lift_max * progress;
    let motion: Isometry2<f64> =
        Translation2::new(0.0, -lift) * Isometry2::rotation_wrt_point(UnitComplex::new(angle), hinge_local);
    let plate_frame = plate_rest * motion;

    let hinge = HingeTransform {
        pivot: plate_rest.transform_point(&hinge_local),
        angle,
        lift: lift * s,
    };

    let plate_outline = [
        (-fw * 0.2, -plate.top),
        (fw * 0.2, -plate.top),
        (fw * 0.46, -fh * 0.35),
        (fw * 0.52, fh * 0.35),
        (0.0, fh * 0.475),
        (-fw * 0.52, fh * 0.35),
        (-fw * 0.46, -fh * 0.35),
    ];
    shapes.push(Shape {
        fill: Some(linear(&plate_frame, (0.0, -plate.top), (0.0, fh * 0.475), &palette.faceplate_gradient)),
        stroke: Some(Stroke {
            color: palette.outline,
            width: strokes.faceplate.resolve(s),
        }),
        ..shape(
            "faceplate",
            ShapeGroup::Faceplate,
            PathBuilder::new(plate_frame).rounded_polygon(&plate_outline, plate.corner_radius),
        )
    });

    let detail = |width: f64| Stroke {
        color: palette.detail,
        width,
    };
    shapes.push(Shape {
        stroke: Some(detail(strokes.detail.resolve(s))),
        ..shape(
            "cheek_lines",
            ShapeGroup::Faceplate,
            PathBuilder::new(plate_frame)
                .move_to(-fw * 0.40, -fh * 0.10)
                .line_to(-fw * 0.10, fh * 0.22)
                .move_to(fw * 0.40, -fh * 0.10)
                .line_to(fw * 0.10, fh * 0.22),
        )
    });
    shapes.push(Shape {
        stroke: Some(detail(strokes.brow.resolve(s))),
        ..shape(
            "brow_ridge",
            ShapeGroup::Faceplate,
            PathBuilder::new(plate_frame)
                .move_to(-fw * 0.35, -fh * 0.08)
                .quad_to(0.0, -fh * 0.22, fw * 0.35, -fh * 0.08),
        )
    });
    shapes.push(Shape {
        fill: Some(Paint::Solid { color: palette.accent }),
        ..shape(
            "nose_bridge",
            ShapeGroup::Faceplate,
            PathBuilder::new(plate_frame).rounded_rect(-fw * 0.05, fh * 0.10, fw * 0.1, fh * 0.08, fw * 0.01),
        )
    });
    shapes.push(Shape {
        stroke: Some(detail(strokes.mouth.resolve(s))),
        ..shape(
            "mouth_slit",
            ShapeGroup::Faceplate,
            PathBuilder::new(plate_frame)
                .move_to(-fw * 0.18, fh * 0.28)
                .line_to(fw * 0.18, fh * 0.28),
        )
    });

    let eyes = &style.eyes;
    let eye_y = eyes.offset_y * fh;
    let glow_r = eyes.bridge_glow_radius;
    shapes.push(Shape {
        fill: Some(Paint::RadialGradient {
            center: plate_frame.transform_point(&Point2::new(0.0, eye_y)),
            radius: glow_r * s,
            stops: vec![
                GradientStop::new(0.0, palette.eye_glow.fade(0.45)),
                GradientStop::new(1.0, palette.eye_glow.fade(0.0)),
            ],
        }),
        blend: BlendMode::Lighter,
        ..shape(
            "eye_bridge_glow",
            ShapeGroup::Faceplate,
            PathBuilder::new(plate_frame).rounded_rect(-glow_r, eye_y - glow_r, 2.0 * glow_r, 2.0 * glow_r, glow_r),
        )
    });

    let (eye_w, eye_h) = (eyes.width * fw, eyes.height);
    for (side, sign) in [("left", -1.0), ("right", 1.0)] {
        let x = sign * eyes.spacing * fw;
        shapes.push(Shape {
            fill: Some(Paint::Solid { color: palette.eye }),
            stroke: Some(Stroke {
                color: palette.eye_outline,
                width: strokes.eye.resolve(s),
            }),
            glow: Some(Glow {
                color: palette.eye_glow,
                blur: eyes.glow_blur * s,
            }),
            ..shape(
                &format!("{side}_eye"),
                ShapeGroup::Faceplate,
                PathBuilder::new(plate_frame)
                    .move_to(x - eye_w / 2.0, eye_y)
                    .quad_to(x, eye_y - eye_h * 0.95, x + eye_w / 2.0, eye_y)
                    .quad_to(x, eye_h.mul_add(0.65, eye_y), x - eye_w / 2.0, eye_y)
                    .close(),
            )
        });
    }

    shapes.push(Shape {
        fill: Some(Paint::Solid { color: palette.shadow }),
        opacity: plate.shadow_max_alpha * progress,
        ..shape(
            "faceplate_shadow",
            ShapeGroup::Faceplate,
            PathBuilder::new(plate_frame).rounded_polygon(&plate_outline, plate.corner_radius),
        )
    });

    // Forehead plate sits over the faceplate's top edge as it lifts
    let forehead_frame = frame * Translation2::new(0.0, style.shell.forehead_offset_y);
    let forehead = [
        (-w * 0.36, -h * 0.62),
        (w * 0.36, -h * 0.62),
        (w * 0.46, -h * 0.38),
        (-w * 0.46, -h * 0.38),
    ];
    shapes.push(Shape {
        fill: Some(linear(
            &forehead_frame,
            (0.0, -h * 0.7),
            (0.0, -h * 0.3),
            &palette.forehead_gradient,
        )),
        ..shape(
            "forehead_plate",
            ShapeGroup::Shell,
            PathBuilder::new(forehead_frame).rounded_polygon(&forehead, style.shell.forehead_corner_radius),
        )
    });

    HelmetShapeSet {
        pose: *pose,
        progress,
        hinge,
        shapes,
    }
}

/// Geometry builder bound to a fixed style
#[derive(Debug, Clone, Default)]
pub struct HelmetGeometryBuilder {
    style: StyleConfig,
}

impl HelmetGeometryBuilder {
    #[must_use]
    pub const fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    #[must_use]
    pub const fn style(&self) -> &StyleConfig {
        &self.style
    }

    #[must_use]
    pub fn build(&self, pose: &Pose, progress: f64) -> HelmetShapeSet {
        build(pose, progress, &self.style)
    }
}
