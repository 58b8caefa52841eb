use glam::Vec4;
use serde::{Deserialize, Serialize};
use vello_cpu::peniko::color::{AlphaColor, Hsl as HslSpace, Srgb};

/// CSS-style HSL colour: hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

pub const TREE_FOLIAGE: Hsl = Hsl::new(135.0, 65.0, 45.0);
pub const TREE_TRUNK: Hsl = Hsl::new(30.0, 55.0, 40.0);
pub const ORNAMENT_RED: Hsl = Hsl::new(350.0, 85.0, 60.0);
pub const ORNAMENT_BLUE: Hsl = Hsl::new(200.0, 85.0, 60.0);

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    pub fn confetti(hue: f32) -> Self {
        Self::new(hue, 90.0, 60.0)
    }

    pub fn falling_star(hue: f32) -> Self {
        Self::new(hue, 95.0, 65.0)
    }

    /// Opaque sRGB with channels in `[0, 1]`.
    pub fn to_rgba(self) -> Vec4 {
        let hsl = AlphaColor::<HslSpace>::new([
            self.h.rem_euclid(360.0),
            self.s.clamp(0.0, 100.0),
            self.l.clamp(0.0, 100.0),
            1.0,
        ]);
        let [r, g, b, a] = hsl.convert::<Srgb>().components;
        Vec4::new(r, g, b, a).clamp(Vec4::ZERO, Vec4::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    #[test]
    fn primary_hues() {
        assert!(close(Hsl::new(0.0, 100.0, 50.0).to_rgba(), Vec4::new(1.0, 0.0, 0.0, 1.0)));
        assert!(close(Hsl::new(120.0, 100.0, 50.0).to_rgba(), Vec4::new(0.0, 1.0, 0.0, 1.0)));
        assert!(close(Hsl::new(240.0, 100.0, 50.0).to_rgba(), Vec4::new(0.0, 0.0, 1.0, 1.0)));
        assert!(close(Hsl::new(360.0, 100.0, 50.0).to_rgba(), Vec4::new(1.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn grey_when_unsaturated() {
        assert!(close(Hsl::new(200.0, 0.0, 40.0).to_rgba(), Vec4::new(0.4, 0.4, 0.4, 1.0)));
    }

    #[test]
    fn palette_matches_css_values() {
        // hsl(350 85% 60%) is rgb(240, 66, 95) in CSS.
        let red = ORNAMENT_RED.to_rgba() * 255.0;
        assert!((red.x - 239.7).abs() < 1.0);
        assert!((red.y - 66.3).abs() < 1.0);
        assert!((red.z - 95.2).abs() < 1.0);
        let c = TREE_FOLIAGE.to_rgba();
        assert!(c.y > c.x && c.y > c.z);
    }
}
