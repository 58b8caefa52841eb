//! Stateless shape drawing. Every routine draws around the surface's current local origin.

use std::f32::consts::PI;

use glam::Vec2;

use crate::color::{ORNAMENT_BLUE, ORNAMENT_RED, TREE_FOLIAGE, TREE_TRUNK};
use crate::surface::Surface;

pub const STAR_SPIKES: usize = 5;
pub const STAR_INNER_RATIO: f32 = 0.45;

/// 0 empty, 1 foliage, 2 trunk.
pub const TREE_GRID: [[u8; 7]; 5] = [
    [0, 0, 0, 1, 0, 0, 0],
    [0, 0, 1, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 1, 0],
    [0, 0, 0, 2, 0, 0, 0],
    [0, 0, 0, 2, 0, 0, 0],
];
const TREE_ORIGIN_COL: f32 = 3.0;
const TREE_ORIGIN_ROW: f32 = 2.0;
const ORNAMENT_ALPHA: f32 = 0.9;

/// Alternating outer/inner vertices of a five-pointed star.
pub fn star_points(radius: f32, rotation: f32) -> [Vec2; STAR_SPIKES * 2] {
    let step = PI / STAR_SPIKES as f32;
    std::array::from_fn(|i| {
        let r = if i % 2 == 0 {
            radius
        } else {
            radius * STAR_INNER_RATIO
        };
        let angle = rotation + i as f32 * step;
        Vec2::new(angle.cos() * r, angle.sin() * r)
    })
}

pub fn draw_star<S: Surface + ?Sized>(surface: &mut S, radius: f32, rotation: f32) {
    surface.fill_polygon(&star_points(radius, rotation));
}

pub fn draw_confetti_rect<S: Surface + ?Sized>(surface: &mut S, size: f32) {
    surface.fill_rect(Vec2::splat(-size / 2.0), Vec2::new(size, size * 0.6));
}

/// Side of one tree pixel for a particle of the given size.
pub fn tree_pixel(size: f32) -> f32 {
    (size / 6.0).floor().max(2.0)
}

pub fn draw_pixel_tree<S: Surface + ?Sized>(surface: &mut S, size: f32) {
    let px = tree_pixel(size);
    let cell = Vec2::splat(px);
    let foliage = TREE_FOLIAGE.to_rgba();
    let trunk = TREE_TRUNK.to_rgba();

    for (row, cells) in TREE_GRID.iter().enumerate() {
        for (col, value) in cells.iter().enumerate() {
            let color = match value {
                1 => foliage,
                2 => trunk,
                _ => continue,
            };
            surface.set_fill(color);
            let origin = Vec2::new(
                (col as f32 - TREE_ORIGIN_COL) * px,
                (row as f32 - TREE_ORIGIN_ROW) * px,
            );
            surface.fill_rect(origin, cell);
        }
    }

    let alpha = surface.alpha();
    surface.set_alpha(alpha * ORNAMENT_ALPHA);
    surface.set_fill(ORNAMENT_RED.to_rgba());
    surface.fill_rect(Vec2::new(-px, -px), cell);
    surface.set_fill(ORNAMENT_BLUE.to_rgba());
    surface.fill_rect(Vec2::new(px, 0.0), cell);
}
