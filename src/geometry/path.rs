use super::PathCommand;
use crate::constants::EPSILON;
use nalgebra::{Point2, Similarity2, Vector2};

/// Builds a path in a local frame, emitting frame-pixel coordinates
///
/// Every point passes through the builder's similarity transform as it is
/// added, so shapes can be described in helmet units and still come out in
/// pixels. Quadratic curves stay exact under similarity transforms.
pub struct PathBuilder {
    transform: Similarity2<f64>,
    commands: Vec<PathCommand>,
}

impl PathBuilder {
    #[must_use]
    pub fn new(transform: Similarity2<f64>) -> Self {
        Self {
            transform,
            commands: Vec::new(),
        }
    }

    fn map(&self, x: f64, y: f64) -> Point2<f64> {
        self.transform.transform_point(&Point2::new(x, y))
    }

    #[must_use]
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let to = self.map(x, y);
        self.commands.push(PathCommand::MoveTo { to });
        self
    }

    #[must_use]
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let to = self.map(x, y);
        self.commands.push(PathCommand::LineTo { to });
        self
    }

    #[must_use]
    pub fn quad_to(mut self, cx: f64, cy: f64, x: f64, y: f64) -> Self {
        let ctrl = self.map(cx, cy);
        let to = self.map(x, y);
        self.commands.push(PathCommand::QuadTo { ctrl, to });
        self
    }

    #[must_use]
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Closed polygon whose corners are rounded with quadratic curves
    ///
    /// Each corner radius is limited to half of the shorter adjacent edge.
    /// Corners with a zero-length edge stay sharp. Fewer than two points
    /// produce nothing.
    #[must_use]
    pub fn rounded_polygon(mut self, points: &[(f64, f64)], radius: f64) -> Self {
        let n = points.len();
        if n < 2 {
            return self;
        }

        for i in 0..n {
            let prev = Vector2::new(points[(i + n - 1) % n].0, points[(i + n - 1) % n].1);
            let curr = Vector2::new(points[i].0, points[i].1);
            let next = Vector2::new(points[(i + 1) % n].0, points[(i + 1) % n].1);

            let incoming = curr - prev;
            let outgoing = next - curr;
            let (len_in, len_out) = (incoming.norm(), outgoing.norm());

            if len_in < EPSILON || len_out < EPSILON {
                self = if i == 0 {
                    self.move_to(curr.x, curr.y)
                } else {
                    self.line_to(curr.x, curr.y)
                };
                continue;
            }

            let r = radius.max(0.0).min(len_in / 2.0).min(len_out / 2.0);
            let entry = curr - incoming * (r / len_in);
            let exit = curr + outgoing * (r / len_out);

            self = if i == 0 {
                self.move_to(entry.x, entry.y)
            } else {
                self.line_to(entry.x, entry.y)
            };
            self = self.quad_to(curr.x, curr.y, exit.x, exit.y);
        }

        self.close()
    }

    /// Axis-aligned (in the local frame) rectangle with rounded corners
    #[must_use]
    pub fn rounded_rect(self, x: f64, y: f64, width: f64, height: f64, radius: f64) -> Self {
        let r = radius.max(0.0).min(width.abs() / 2.0).min(height.abs() / 2.0);
        let (right, bottom) = (x + width, y + height);

        self.move_to(x + r, y)
            .line_to(right - r, y)
            .quad_to(right, y, right, y + r)
            .line_to(right, bottom - r)
            .quad_to(right, bottom, right - r, bottom)
            .line_to(x + r, bottom)
            .quad_to(x, bottom, x, bottom - r)
            .line_to(x, y + r)
            .quad_to(x, y, x + r, y)
            .close()
    }

    #[must_use]
    pub fn finish(self) -> Vec<PathCommand> {
        self.commands
    }
}
