use egui::{Color32, Painter, Pos2, Shape, Stroke};
use festoon_core::surface::PenStack;
use festoon_core::{Surface, Viewport};
use glam::{Vec2, Vec4};

/// Paints engine output onto an egui layer. egui rebuilds layers every frame, so `clear` is a no-op.
pub struct EguiSurface {
    painter: Painter,
    origin: Pos2,
    viewport: Viewport,
    pen: PenStack,
}

impl EguiSurface {
    pub fn new(painter: Painter) -> Self {
        let rect = painter.clip_rect();
        Self {
            origin: rect.min,
            viewport: Viewport::new(rect.width(), rect.height()),
            painter,
            pen: PenStack::new(),
        }
    }

    fn to_screen(&self, point: Vec2) -> Pos2 {
        Pos2::new(self.origin.x + point.x, self.origin.y + point.y)
    }

    fn fill_color(&self) -> Color32 {
        to_color32(self.pen.effective_fill())
    }
}

pub fn to_color32(color: Vec4) -> Color32 {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(channel(color.x), channel(color.y), channel(color.z), channel(color.w))
}

impl Surface for EguiSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {}

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
        let points = self
            .pen
            .rect_to_world(origin, size)
            .iter()
            .map(|p| self.to_screen(*p))
            .collect();
        self.painter
            .add(Shape::convex_polygon(points, self.fill_color(), Stroke::NONE));
    }

    fn fill_polygon(&mut self, points: &[Vec2]) {
        if points.len() < 3 {
            return;
        }
        let fill = self.fill_color();
        let world: Vec<Pos2> = points
            .iter()
            .map(|p| self.to_screen(self.pen.to_world(*p)))
            .collect();
        // Stars are concave, so fan out from the centroid in convex slices.
        let centroid = world.iter().fold(Vec2::ZERO, |acc, p| acc + Vec2::new(p.x, p.y))
            / world.len() as f32;
        let centroid = Pos2::new(centroid.x, centroid.y);
        for (i, point) in world.iter().enumerate() {
            let next = world[(i + 1) % world.len()];
            self.painter.add(Shape::convex_polygon(
                vec![centroid, *point, next],
                fill,
                Stroke::NONE,
            ));
        }
    }
}
