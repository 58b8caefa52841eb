use festoon_core::surface::PenStack;
use festoon_core::{Surface, Viewport};
use glam::{Affine2, Vec2, Vec4};
use image::{Rgba, RgbaImage};
use vello_cpu::kurbo::{Affine, BezPath, Point, Rect};
use vello_cpu::peniko::Color;
use vello_cpu::{Pixmap, RenderContext};

/// CPU surface backed by `vello_cpu`. Fills are recorded into a render context and
/// rasterised with anti-aliasing when a snapshot is taken.
pub struct RasterSurface {
    width: u16,
    height: u16,
    ctx: RenderContext,
    background: Rgba<u8>,
    pen: PenStack,
    image: RgbaImage,
    dirty: bool,
}

impl RasterSurface {
    pub fn new(width: u16, height: u16, background: Rgba<u8>) -> Self {
        let mut surface = Self {
            width,
            height,
            ctx: RenderContext::new(width, height),
            background,
            pen: PenStack::new(),
            image: RgbaImage::from_pixel(u32::from(width), u32::from(height), background),
            dirty: true,
        };
        surface.clear();
        surface
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clear();
    }

    /// The current frame as straight-alpha RGBA.
    pub fn snapshot(&mut self) -> &RgbaImage {
        if self.dirty {
            let mut pixmap = Pixmap::new(self.width, self.height);
            self.ctx.flush();
            self.ctx.render_to_pixmap(&mut pixmap);
            self.image = pixmap_to_image(&pixmap, self.width, self.height);
            self.dirty = false;
        }
        &self.image
    }

    fn set_paint(&mut self) -> bool {
        let color = self.pen.effective_fill();
        if color.w <= 0.0 {
            return false;
        }
        self.ctx.set_transform(affine_to_cpu(self.pen.pen().transform));
        self.ctx.set_paint(color_to_cpu(color));
        self.dirty = true;
        true
    }
}

fn affine_to_cpu(transform: Affine2) -> Affine {
    let m = transform.matrix2;
    let t = transform.translation;
    Affine::new([
        f64::from(m.x_axis.x),
        f64::from(m.x_axis.y),
        f64::from(m.y_axis.x),
        f64::from(m.y_axis.y),
        f64::from(t.x),
        f64::from(t.y),
    ])
}

fn color_to_cpu(color: Vec4) -> Color {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba8(channel(color.x), channel(color.y), channel(color.z), channel(color.w))
}

fn polygon_path(points: &[Vec2]) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.iter().enumerate() {
        let point = Point::new(f64::from(p.x), f64::from(p.y));
        if i == 0 {
            path.move_to(point);
        } else {
            path.line_to(point);
        }
    }
    path.close_path();
    path
}

/// `vello_cpu` pixmaps hold premultiplied alpha; PNG output wants it straight.
fn pixmap_to_image(pixmap: &Pixmap, width: u16, height: u16) -> RgbaImage {
    let mut image = RgbaImage::new(u32::from(width), u32::from(height));
    for (dst, src) in image
        .pixels_mut()
        .zip(pixmap.data_as_u8_slice().chunks_exact(4))
    {
        let a = src[3];
        let unpremul = |c: u8| {
            if a == 0 {
                0
            } else {
                ((u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8
            }
        };
        *dst = Rgba([unpremul(src[0]), unpremul(src[1]), unpremul(src[2]), a]);
    }
    image
}

impl Surface for RasterSurface {
    fn viewport(&self) -> Viewport {
        Viewport::new(f32::from(self.width), f32::from(self.height))
    }

    fn clear(&mut self) {
        self.ctx = RenderContext::new(self.width, self.height);
        self.dirty = true;
        let [r, g, b, a] = self.background.0;
        if a > 0 {
            self.ctx.set_transform(Affine::IDENTITY);
            self.ctx.set_paint(Color::from_rgba8(r, g, b, a));
            self.ctx.fill_rect(&Rect::new(
                0.0,
                0.0,
                f64::from(self.width),
                f64::from(self.height),
            ));
        }
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
        if self.set_paint() {
            self.ctx.fill_rect(&Rect::new(
                f64::from(origin.x),
                f64::from(origin.y),
                f64::from(origin.x + size.x),
                f64::from(origin.y + size.y),
            ));
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2]) {
        if points.len() >= 3 && self.set_paint() {
            self.ctx.fill_path(&polygon_path(points));
        }
    }
}
