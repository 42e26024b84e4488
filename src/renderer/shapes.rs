//! Shape generation for 2D primitives
//!
//! Sprites are built from colored triangles in world space; the pipeline
//! projects them through the camera.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::assets::{BUCKET_TEXTURE, DROP_TEXTURE};
use crate::sim::Rect;

/// Procedural stand-in for a texture file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteShape {
    Bucket,
    Raindrop,
}

impl SpriteShape {
    /// Shape for a manifest texture name
    pub fn from_texture_name(name: &str) -> Option<Self> {
        match name {
            BUCKET_TEXTURE => Some(SpriteShape::Bucket),
            DROP_TEXTURE => Some(SpriteShape::Raindrop),
            _ => None,
        }
    }

    /// Triangles filling `rect`
    pub fn vertices(&self, rect: Rect) -> Vec<Vertex> {
        match self {
            SpriteShape::Bucket => bucket(rect),
            SpriteShape::Raindrop => raindrop(rect),
        }
    }
}

/// Two triangles covering a rectangle
pub fn quad(rect: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (l, r, b, t) = (rect.left(), rect.right(), rect.bottom(), rect.top());
    vec![
        Vertex::new(l, b, color),
        Vertex::new(r, b, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(l, t, color),
    ]
}

/// Quadrilateral from four corners, counter-clockwise
pub fn quadrilateral(corners: [Vec2; 4], color: [f32; 4]) -> Vec<Vertex> {
    let [a, b, c, d] = corners;
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(a.x, a.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

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

/// Tapered pail: wide rim at the top, narrower base, a band of water inside
pub fn bucket(rect: Rect) -> Vec<Vertex> {
    let w = rect.size.x;
    let h = rect.size.y;
    let p = |fx: f32, fy: f32| rect.pos + Vec2::new(fx * w, fy * h);

    let mut vertices = quadrilateral(
        [p(0.15, 0.0), p(0.85, 0.0), p(0.95, 0.8), p(0.05, 0.8)],
        colors::BUCKET_BODY,
    );
    vertices.extend(quadrilateral(
        [p(0.11, 0.55), p(0.89, 0.55), p(0.92, 0.72), p(0.08, 0.72)],
        colors::BUCKET_WATER,
    ));
    vertices.extend(quad(
        Rect::new(rect.pos.x, rect.pos.y + 0.8 * h, w, 0.1 * h),
        colors::BUCKET_RIM,
    ));
    vertices
}

/// Teardrop: round belly in the lower half, point at the top
pub fn raindrop(rect: Rect) -> Vec<Vertex> {
    let w = rect.size.x;
    let h = rect.size.y;
    let radius = 0.3 * w.min(h);
    let belly = rect.pos + Vec2::new(0.5 * w, 0.35 * h);
    let tip = rect.pos + Vec2::new(0.5 * w, 0.95 * h);

    let mut vertices = circle(belly, radius, colors::DROP, 16);
    vertices.push(Vertex::new(belly.x - radius, belly.y, colors::DROP));
    vertices.push(Vertex::new(belly.x + radius, belly.y, colors::DROP));
    vertices.push(Vertex::new(tip.x, tip.y, colors::DROP));
    vertices.extend(circle(
        belly + Vec2::new(-0.35 * radius, 0.3 * radius),
        0.2 * radius,
        colors::DROP_HIGHLIGHT,
        8,
    ));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inside(rect: Rect, vertices: &[Vertex]) -> bool {
        vertices.iter().all(|v| {
            let [x, y] = v.position;
            x >= rect.left() - 1e-3
                && x <= rect.right() + 1e-3
                && y >= rect.bottom() - 1e-3
                && y <= rect.top() + 1e-3
        })
    }

    #[test]
    fn test_texture_names_map_to_shapes() {
        assert_eq!(SpriteShape::from_texture_name("drop.png"), Some(SpriteShape::Raindrop));
        assert_eq!(SpriteShape::from_texture_name("bucket.png"), Some(SpriteShape::Bucket));
        assert_eq!(SpriteShape::from_texture_name("cat.png"), None);
    }

    #[test]
    fn test_sprites_stay_inside_their_rect() {
        let rect = Rect::square(368.0, 20.0, 64.0);
        for shape in [SpriteShape::Bucket, SpriteShape::Raindrop] {
            let vertices = shape.vertices(rect);
            assert_eq!(vertices.len() % 3, 0);
            assert!(inside(rect, &vertices), "{shape:?} leaks outside its rect");
        }
    }

    #[test]
    fn test_quad_corners() {
        let vertices = quad(Rect::new(1.0, 2.0, 3.0, 4.0), [1.0; 4]);
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[0].position, [1.0, 2.0]);
        assert_eq!(vertices[2].position, [4.0, 6.0]);
    }
}
