//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::TAU;

use super::surface::DrawList;
use super::vertex::Vertex;

/// Segments per circle; enough that a 30px asteroid looks round
pub const CIRCLE_SEGMENTS: u32 = 32;

/// Point on a circle's rim at angle `theta`
#[inline]
fn rim(center: Vec2, radius: f32, theta: f32) -> Vec2 {
    center + Vec2::from_angle(theta) * radius
}

/// Triangle fan for a filled circle, as a triangle list
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let step = TAU / segments as f32;
    (0..segments)
        .flat_map(|i| {
            let a = rim(center, radius, i as f32 * step);
            let b = rim(center, radius, (i + 1) as f32 * step);
            [
                Vertex::at(center, color),
                Vertex::at(a, color),
                Vertex::at(b, color),
            ]
        })
        .collect()
}

/// Tessellate every circle of a frame, in draw order
pub fn frame_vertices(list: &DrawList) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for (center, radius, color) in list.circles() {
        vertices.extend(circle(center, radius, color, CIRCLE_SEGMENTS));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Surface;

    #[test]
    fn test_circle_vertices_stay_on_rim() {
        let center = Vec2::new(100.0, 200.0);
        let verts = circle(center, 20.0, [1.0; 4], 8);
        assert_eq!(verts.len(), 24);

        for tri in verts.chunks(3) {
            assert_eq!(tri[0].position, [center.x, center.y]);
            for v in &tri[1..] {
                let d = Vec2::from(v.position).distance(center);
                assert!((d - 20.0).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_frame_vertices_skip_text() {
        let mut list = DrawList::new();
        list.clear();
        list.fill_circle(Vec2::ZERO, 5.0, [1.0; 4]);
        list.fill_text("Score: 0", Vec2::new(10.0, 30.0), crate::renderer::TextStyle::HUD);
        list.fill_circle(Vec2::ONE, 5.0, [0.5; 4]);

        let verts = frame_vertices(&list);
        assert_eq!(verts.len(), 2 * 3 * CIRCLE_SEGMENTS as usize);
        // Later circles come later in the buffer (drawn on top)
        assert_eq!(verts.last().map(|v| v.color), Some([0.5; 4]));
    }
}
