//! Rendering module
//!
//! `scene` turns game state into rectangles and HUD text; `pipeline` pushes
//! the rectangles through WebGPU. Text goes to the DOM HUD.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{HudExtras, HudSlot, Label, Rect, Scene, build};
pub use vertex::{Palette, Vertex};
