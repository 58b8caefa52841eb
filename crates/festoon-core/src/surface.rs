//! Canvas-style drawing abstraction the engine renders through.

use glam::{Affine2, Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Size of the visible drawing area in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Subset of a 2D canvas context. Shape coordinates are local to the current transform.
///
/// Polygons handed to `fill_polygon` are simple and star-shaped around their vertex centroid.
pub trait Surface {
    /// Current size, re-read by the engine every time it needs bounds.
    fn viewport(&self) -> Viewport;
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);
    fn alpha(&self) -> f32;
    fn set_alpha(&mut self, alpha: f32);
    fn set_fill(&mut self, color: Vec4);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2);
    fn fill_polygon(&mut self, points: &[Vec2]);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub transform: Affine2,
    pub alpha: f32,
    pub fill: Vec4,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            fill: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

/// Transform, alpha and fill state with save/restore, shared by surface implementations.
#[derive(Debug, Clone, Default)]
pub struct PenStack {
    current: Pen,
    saved: Vec<Pen>,
}

impl PenStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pen(&self) -> &Pen {
        &self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Unbalanced restores leave the state untouched.
    pub fn restore(&mut self) {
        if let Some(pen) = self.saved.pop() {
            self.current = pen;
        }
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.current.transform = self.current.transform * Affine2::from_translation(offset);
    }

    pub fn rotate(&mut self, angle: f32) {
        self.current.transform = self.current.transform * Affine2::from_angle(angle);
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.current.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn set_fill(&mut self, color: Vec4) {
        self.current.fill = color;
    }

    pub fn to_world(&self, point: Vec2) -> Vec2 {
        self.current.transform.transform_point2(point)
    }

    /// Corners of a local rectangle in world space, in winding order.
    pub fn rect_to_world(&self, origin: Vec2, size: Vec2) -> [Vec2; 4] {
        [
            self.to_world(origin),
            self.to_world(origin + Vec2::new(size.x, 0.0)),
            self.to_world(origin + size),
            self.to_world(origin + Vec2::new(0.0, size.y)),
        ]
    }

    /// Fill colour with the pen alpha folded into its alpha channel.
    pub fn effective_fill(&self) -> Vec4 {
        let fill = self.current.fill;
        Vec4::new(fill.x, fill.y, fill.z, fill.w * self.current.alpha)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    Clear,
    Polygon { points: Vec<Vec2>, fill: Vec4, alpha: f32 },
}

/// In-memory surface that records world-space fills.
#[derive(Debug, Clone)]
pub struct Recorder {
    viewport: Viewport,
    pen: PenStack,
    ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            pen: PenStack::new(),
            ops: Vec::new(),
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Fills recorded since the last clear.
    pub fn fills(&self) -> impl Iterator<Item = &DrawOp> {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::Clear))
            .map_or(0, |index| index + 1);
        self.ops[start..].iter()
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for Recorder {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn save(&mut self) {
        self.pen.save();
    }

    fn restore(&mut self) {
        self.pen.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        self.pen.translate(offset);
    }

    fn rotate(&mut self, angle: f32) {
        self.pen.rotate(angle);
    }

    fn alpha(&self) -> f32 {
        self.pen.pen().alpha
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.pen.set_alpha(alpha);
    }

    fn set_fill(&mut self, color: Vec4) {
        self.pen.set_fill(color);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2) {
        let points = self.pen.rect_to_world(origin, size).to_vec();
        self.ops.push(DrawOp::Polygon {
            points,
            fill: self.pen.pen().fill,
            alpha: self.pen.pen().alpha,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2]) {
        let points = points.iter().map(|p| self.pen.to_world(*p)).collect();
        self.ops.push(DrawOp::Polygon {
            points,
            fill: self.pen.pen().fill,
            alpha: self.pen.pen().alpha,
        });
    }
}
