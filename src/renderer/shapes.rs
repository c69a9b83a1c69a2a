//! Shape generation for 2D primitives
//!
//! Everything in the game is built from axis-aligned rectangles, so this
//! is just quad tessellation in screen pixels.

use super::scene::{Rect, Scene};
use super::vertex::Vertex;

/// Two triangles covering `(x, y)..(x + w, y + h)`
pub fn quad(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> [Vertex; 6] {
    let (x0, y0, x1, y1) = (x, y, x + w, y + h);
    [
        Vertex::new(x0, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Tessellate a single scene rectangle
pub fn rect(r: &Rect) -> [Vertex; 6] {
    quad(r.x, r.y, r.w, r.h, r.color)
}

/// Vertices for every rectangle in the scene, in draw order
pub fn scene_vertices(scene: &Scene) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(scene.rects.len() * 6);
    for r in scene.rects.iter().filter(|r| r.w > 0.0 && r.h > 0.0) {
        vertices.extend_from_slice(&rect(r));
    }
    vertices
}
