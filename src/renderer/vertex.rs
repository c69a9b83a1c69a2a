//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::Rgb;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// 8-bit sRGB colour to the `[0, 1]` RGBA the pipeline takes
pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> [f32; 4] {
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ]
}

/// Opaque colour from a simulation `Rgb`
pub fn from_rgb(rgb: Rgb) -> [f32; 4] {
    rgba8(rgb[0], rgb[1], rgb[2], 255)
}

/// Convert an sRGB-encoded colour to linear (alpha untouched)
pub fn srgb_to_linear(color: [f32; 4]) -> [f32; 4] {
    fn channel(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    [channel(color[0]), channel(color[1]), channel(color[2]), color[3]]
}

/// Colors for game elements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub sky: [f32; 4],
    pub ground: [f32; 4],
    pub cloud: [f32; 4],
    pub rabbit: [f32; 4],
    pub ear_inner: [f32; 4],
    pub eye: [f32; 4],
    pub overlay: [f32; 4],
}

impl Palette {
    pub const DEFAULT: Palette = Palette {
        sky: rgba8(135, 206, 250, 255),
        ground: rgba8(144, 238, 144, 255),
        cloud: rgba8(255, 250, 250, 255),
        rabbit: rgba8(255, 255, 255, 255),
        ear_inner: rgba8(255, 182, 193, 255),
        eye: rgba8(0, 0, 0, 255),
        overlay: rgba8(255, 0, 0, 255),
    };

    pub const HIGH_CONTRAST: Palette = Palette {
        sky: rgba8(10, 10, 40, 255),
        ground: rgba8(0, 200, 0, 255),
        cloud: rgba8(90, 90, 120, 255),
        rabbit: rgba8(255, 255, 255, 255),
        ear_inner: rgba8(255, 80, 160, 255),
        eye: rgba8(0, 0, 0, 255),
        overlay: rgba8(255, 0, 0, 255),
    };

    pub fn for_contrast(high_contrast: bool) -> Self {
        if high_contrast {
            Self::HIGH_CONTRAST
        } else {
            Self::DEFAULT
        }
    }
}
