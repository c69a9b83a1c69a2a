//! Scene building
//!
//! A pure function of the game state: turns entities into coloured
//! rectangles (the pixel art) and HUD labels. Nothing here touches the GPU
//! or the DOM, so every frame's picture can be checked in tests.

use super::vertex::{Palette, from_rgb};
use crate::settings::Settings;
use crate::sim::{Cloud, GamePhase, GameState, Obstacle, Player};

/// An axis-aligned filled rectangle in screen pixels (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: [f32; 4],
}

/// Where a HUD label goes on the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HudSlot {
    Title,
    StartPrompt,
    Score,
    Instructions,
    GameOver,
    FinalScore,
    RestartPrompt,
    Best,
    Fps,
}

impl HudSlot {
    pub const ALL: [HudSlot; 9] = [
        HudSlot::Title,
        HudSlot::StartPrompt,
        HudSlot::Score,
        HudSlot::Instructions,
        HudSlot::GameOver,
        HudSlot::FinalScore,
        HudSlot::RestartPrompt,
        HudSlot::Best,
        HudSlot::Fps,
    ];

    /// DOM element id of the slot
    pub fn element_id(&self) -> &'static str {
        match self {
            HudSlot::Title => "hud-title",
            HudSlot::StartPrompt => "hud-start-prompt",
            HudSlot::Score => "hud-score",
            HudSlot::Instructions => "hud-instructions",
            HudSlot::GameOver => "hud-game-over",
            HudSlot::FinalScore => "hud-final-score",
            HudSlot::RestartPrompt => "hud-restart-prompt",
            HudSlot::Best => "hud-best",
            HudSlot::Fps => "hud-fps",
        }
    }
}

/// A line of HUD text
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub slot: HudSlot,
    pub text: String,
}

/// Host-side numbers shown alongside the game state
#[derive(Debug, Clone, Copy, Default)]
pub struct HudExtras {
    pub best: Option<u64>,
    pub fps: Option<u32>,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub clear_color: [f32; 4],
    pub rects: Vec<Rect>,
    pub labels: Vec<Label>,
}

impl Scene {
    pub fn label(&self, slot: HudSlot) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.slot == slot)
            .map(|l| l.text.as_str())
    }
}

/// Collects rectangles relative to a translated origin
struct Canvas {
    rects: Vec<Rect>,
    origin: (f32, f32),
}

impl Canvas {
    fn fill(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        self.rects.push(Rect {
            x: self.origin.0 + x,
            y: self.origin.1 + y,
            w,
            h,
            color,
        });
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.origin = (x, y);
    }
}

/// Build the scene for the current frame
pub fn build(state: &GameState, settings: &Settings, extras: HudExtras) -> Scene {
    let palette = Palette::for_contrast(settings.high_contrast);
    let viewport = &state.viewport;
    let mut canvas = Canvas {
        rects: Vec::new(),
        origin: (0.0, 0.0),
    };

    if settings.show_clouds() {
        for cloud in &state.clouds {
            draw_cloud(&mut canvas, cloud, palette.cloud);
        }
    }

    canvas.translate(0.0, 0.0);
    canvas.fill(
        0.0,
        viewport.ground_y,
        viewport.width,
        viewport.height - viewport.ground_y,
        palette.ground,
    );

    draw_rabbit(&mut canvas, &state.player, &palette);
    if state.phase != GamePhase::Start {
        for obstacle in &state.obstacles {
            draw_egg(&mut canvas, obstacle);
        }
    }

    let score = state.display_score();
    let mut labels = Vec::new();
    let mut label = |slot: HudSlot, text: String| labels.push(Label { slot, text });

    match state.phase {
        GamePhase::Start => {
            label(HudSlot::Title, "Easter Runner".to_string());
            label(
                HudSlot::StartPrompt,
                "Press Space / Tap / Click to Start".to_string(),
            );
        }
        GamePhase::Playing => {
            label(HudSlot::Score, format!("Score: {}", score));
            if settings.show_instructions {
                label(
                    HudSlot::Instructions,
                    "Space / Tap / Click = Jump".to_string(),
                );
            }
        }
        GamePhase::GameOver => {
            let mut overlay = palette.overlay;
            overlay[3] = settings.game_over_overlay_alpha();
            canvas.translate(0.0, 0.0);
            canvas.fill(0.0, 0.0, viewport.width, viewport.height, overlay);

            label(HudSlot::GameOver, "GAME OVER".to_string());
            label(HudSlot::FinalScore, format!("Final Score: {}", score));
            label(
                HudSlot::RestartPrompt,
                "Space / Tap / Click to Restart".to_string(),
            );
        }
    }

    if settings.show_best && state.phase != GamePhase::Playing {
        if let Some(best) = extras.best {
            label(HudSlot::Best, format!("Best: {}", best));
        }
    }
    if settings.show_fps {
        if let Some(fps) = extras.fps {
            label(HudSlot::Fps, format!("{} FPS", fps));
        }
    }

    Scene {
        clear_color: palette.sky,
        rects: canvas.rects,
        labels,
    }
}

/// Blocky cloud on a 5x4 grid anchored at its top-left corner
fn draw_cloud(canvas: &mut Canvas, cloud: &Cloud, color: [f32; 4]) {
    let p = cloud.size / 5.0;
    canvas.translate(cloud.pos.x, cloud.pos.y);
    canvas.fill(0.0, p, cloud.size, p * 2.0, color);
    canvas.fill(p, 0.0, p * 3.0, p, color);
    canvas.fill(p, p * 3.0, p * 3.0, p, color);
}

/// Pixel rabbit on an 8x8 grid (ears poke two pixels above it)
fn draw_rabbit(canvas: &mut Canvas, player: &Player, palette: &Palette) {
    let size = player.size;
    let p = size / 8.0;
    let bottom = player.pos.y + size / 2.0;
    canvas.translate(player.pos.x - size / 2.0, bottom - size);

    let white = palette.rabbit;
    // Body, neck, head
    canvas.fill(p * 2.0, p * 3.0, p * 4.0, p * 4.0, white);
    canvas.fill(p * 3.0, p * 2.0, p * 2.0, p, white);
    canvas.fill(p * 3.0, 0.0, p * 2.0, p * 2.0, white);
    // Ears
    canvas.fill(p * 2.0, -p * 2.0, p, p * 3.0, white);
    canvas.fill(p * 5.0, -p * 2.0, p, p * 3.0, white);
    canvas.fill(p * 2.0, -p, p, p, palette.ear_inner);
    canvas.fill(p * 5.0, -p, p, p, palette.ear_inner);
    // Eye
    canvas.fill(p * 4.0, p * 0.5, p * 0.5, p * 0.5, palette.eye);
    // Feet
    canvas.fill(p * 2.0, p * 7.0, p * 1.5, p, white);
    canvas.fill(p * 4.5, p * 7.0, p * 1.5, p, white);
}

/// Pixel egg on a 6x7 grid with two pattern stripes
fn draw_egg(canvas: &mut Canvas, egg: &Obstacle) {
    let size = egg.size;
    let p = size / 6.0;
    let bottom = egg.pos.y + size / 2.0;
    canvas.translate(egg.pos.x - size / 2.0, bottom - size);

    let base = from_rgb(egg.base_color);
    canvas.fill(p, p, p * 4.0, p * 5.0, base);
    canvas.fill(p * 2.0, 0.0, p * 2.0, p, base);
    canvas.fill(0.0, p * 3.0, p, p * 2.0, base);
    canvas.fill(p * 5.0, p * 3.0, p, p * 2.0, base);
    canvas.fill(p * 2.0, p * 6.0, p * 2.0, p, base);

    let pattern = from_rgb(egg.pattern_color);
    canvas.fill(p, p * 2.0, p * 4.0, p, pattern);
    canvas.fill(p, p * 4.0, p * 4.0, p, pattern);
}
