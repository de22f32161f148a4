//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle-list vertices in field coordinates.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Append a thick line segment (two triangles)
pub fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a1 = a + perp;
    let a2 = a - perp;
    let b1 = b + perp;
    let b2 = b - perp;

    out.push(Vertex::new(a1.x, a1.y, color));
    out.push(Vertex::new(a2.x, a2.y, color));
    out.push(Vertex::new(b1.x, b1.y, color));

    out.push(Vertex::new(b1.x, b1.y, color));
    out.push(Vertex::new(a2.x, a2.y, color));
    out.push(Vertex::new(b2.x, b2.y, color));
}

/// Append the outline of a closed polygon
pub fn closed_outline(out: &mut Vec<Vertex>, points: &[Vec2], width: f32, color: [f32; 4]) {
    if points.len() < 2 {
        return;
    }
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        line(out, a, b, width, color);
    }
}

/// Axis-aligned filled square centered on `center`
pub fn square(out: &mut Vec<Vertex>, center: Vec2, size: f32, color: [f32; 4]) {
    let h = size * 0.5;
    let (x0, y0, x1, y1) = (center.x - h, center.y - h, center.x + h, center.y + h);

    out.push(Vertex::new(x0, y0, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x0, y1, color));

    out.push(Vertex::new(x0, y1, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x1, y1, color));
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        let (dir1, dir2) = (Vec2::from_angle(theta1), Vec2::from_angle(theta2));

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Offsets at which an object of `radius` at `pos` must also be drawn so
/// it shows on the opposite edge while straddling a border. Always
/// includes the zero offset.
pub fn wrap_offsets(pos: Vec2, radius: f32, bounds: Vec2) -> Vec<Vec2> {
    let xs: &[f32] = if pos.x < radius {
        &[0.0, 1.0]
    } else if pos.x > bounds.x - radius {
        &[0.0, -1.0]
    } else {
        &[0.0]
    };
    let ys: &[f32] = if pos.y < radius {
        &[0.0, 1.0]
    } else if pos.y > bounds.y - radius {
        &[0.0, -1.0]
    } else {
        &[0.0]
    };

    let mut offsets = Vec::with_capacity(xs.len() * ys.len());
    for &sx in xs {
        for &sy in ys {
            offsets.push(Vec2::new(sx * bounds.x, sy * bounds.y));
        }
    }
    offsets
}
