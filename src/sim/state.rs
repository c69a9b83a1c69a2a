//! Game state and core simulation types
//!
//! Entities are plain data records. The session (`GameState`) owns all of
//! them; nothing holds a reference to anything else.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Bounds;
use crate::rand_between;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing moves
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, scene frozen under the overlay
    GameOver,
}

/// Things that happened during a tick, drained by the host each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    ObstacleSpawned { id: u32 },
    ObstacleCleared { id: u32 },
    /// The player hit an obstacle; carries the final score
    Crashed { score: f64, speed: f32 },
    Restarted,
}

/// RGB colour (0-255 per channel)
pub type Rgb = [u8; 3];

/// Drawable area and the ground line derived from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Y coordinate of the ground surface
    pub ground_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, ground_fraction: f32) -> Self {
        Self {
            width,
            height,
            ground_y: height * ground_fraction,
        }
    }
}

/// The rabbit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Centre of the sprite
    pub pos: Vec2,
    /// Vertical velocity (positive is down)
    pub vel_y: f32,
    pub size: f32,
}

impl Player {
    /// A player standing on the ground at its fixed column
    pub fn new(viewport: &Viewport, tuning: &Tuning) -> Self {
        let size = tuning.player_size;
        Self {
            pos: Vec2::new(
                viewport.width * tuning.player_x_fraction,
                Self::rest_y(viewport.ground_y, size),
            ),
            vel_y: 0.0,
            size,
        }
    }

    /// Centre Y when standing on the ground
    #[inline]
    pub fn rest_y(ground_y: f32, size: f32) -> f32 {
        ground_y - size / 2.0
    }

    /// Highest allowed centre Y (sprite top at the top of the screen)
    #[inline]
    pub fn ceiling_y(&self) -> f32 {
        self.size / 2.0
    }

    pub fn is_grounded(&self, ground_y: f32, tolerance: f32) -> bool {
        self.pos.y >= Self::rest_y(ground_y, self.size) - tolerance
    }

    /// Jump if on (or within tolerance of) the ground. No double jumps.
    pub fn jump(&mut self, ground_y: f32, tuning: &Tuning) -> bool {
        if self.is_grounded(ground_y, tuning.jump_tolerance) {
            self.vel_y = tuning.jump_impulse;
            true
        } else {
            false
        }
    }

    /// Integrate one frame of gravity, then clamp to ground and ceiling
    pub fn apply_gravity(&mut self, ground_y: f32, gravity: f32) {
        self.pos.y += self.vel_y;
        self.vel_y += gravity;

        let rest = Self::rest_y(ground_y, self.size);
        if self.pos.y >= rest {
            self.pos.y = rest;
            self.vel_y = 0.0;
        }
        let ceiling = self.ceiling_y();
        if self.pos.y < ceiling {
            self.pos.y = ceiling;
            self.vel_y = 0.0;
        }
    }

    /// Hitbox: full height, narrowed horizontally
    pub fn bounds(&self, hitbox_divisor: f32) -> Bounds {
        Bounds::centered(
            self.pos.x,
            self.pos.y,
            self.size / hitbox_divisor,
            self.size / 2.0,
        )
    }
}

/// An egg rolling in from the right
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Centre of the sprite
    pub pos: Vec2,
    pub size: f32,
    pub base_color: Rgb,
    pub pattern_color: Rgb,
}

impl Obstacle {
    /// Random egg at the right screen edge, resting on the ground
    pub fn spawn(id: u32, rng: &mut impl Rng, viewport: &Viewport, tuning: &Tuning) -> Self {
        let size = rand_between(rng, tuning.obstacle_min_size, tuning.obstacle_max_size);
        Self {
            id,
            pos: Vec2::new(viewport.width, viewport.ground_y - size / 2.0),
            size,
            base_color: pastel(rng, 150, 150, 200),
            pattern_color: pastel(rng, 100, 100, 150),
        }
    }

    pub fn advance(&mut self, speed: f32) {
        self.pos.x -= speed;
    }

    /// Visual right edge
    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.size / 2.0
    }

    /// Fully past the left screen edge
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.right_edge() < 0.0
    }

    /// Hitbox: full height, narrower than the sprite
    pub fn bounds(&self, hitbox_divisor: f32) -> Bounds {
        Bounds::centered(
            self.pos.x,
            self.pos.y,
            self.size / hitbox_divisor,
            self.size / 2.0,
        )
    }
}

/// Random colour with each channel drawn from `[min, 255)`
fn pastel(rng: &mut impl Rng, r_min: u8, g_min: u8, b_min: u8) -> Rgb {
    [
        rng.random_range(r_min..255),
        rng.random_range(g_min..255),
        rng.random_range(b_min..255),
    ]
}

/// A background cloud; recycled forever, never destroyed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    /// Drift speed at the reference scroll speed
    pub speed: f32,
}

impl Cloud {
    /// Random cloud somewhere off the right edge
    pub fn spawn(rng: &mut impl Rng, viewport: &Viewport, tuning: &Tuning) -> Self {
        let y = cloud_y(rng, viewport, tuning);
        let size = rand_between(rng, tuning.cloud_min_size, tuning.cloud_max_size);
        Self {
            pos: Vec2::new(viewport.width + rand_between(rng, size, viewport.width), y),
            size,
            speed: rand_between(rng, tuning.cloud_min_speed, tuning.cloud_max_speed),
        }
    }

    /// Drift left (parallax-scaled); wrap to the right once fully offscreen.
    /// Returns true if the cloud wrapped.
    pub fn update(
        &mut self,
        scroll_speed: f32,
        rng: &mut impl Rng,
        viewport: &Viewport,
        tuning: &Tuning,
    ) -> bool {
        self.pos.x -= self.speed * (scroll_speed / tuning.cloud_reference_speed);
        if self.pos.x + self.size < 0.0 {
            self.pos.x = viewport.width + rand_between(rng, self.size, viewport.width / 2.0);
            self.pos.y = cloud_y(rng, viewport, tuning);
            true
        } else {
            false
        }
    }
}

fn cloud_y(rng: &mut impl Rng, viewport: &Viewport, tuning: &Tuning) -> f32 {
    rand_between(
        rng,
        viewport.height * tuning.cloud_band_top,
        viewport.height * tuning.cloud_band_bottom,
    )
}

/// Complete game session (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// All randomness flows through this generator
    pub rng: Pcg32,
    /// Balance constants for this session
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Frames since the last reset (first playing frame is 1)
    pub frame: u64,
    /// Accumulated score (displayed floored)
    pub score: f64,
    /// Current scroll speed
    pub speed: f32,
    /// Obstacles that made it off the left edge this run
    pub obstacles_cleared: u32,
    pub viewport: Viewport,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub clouds: Vec<Cloud>,
    /// Events raised since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a session on the start screen
    pub fn new(seed: u64, tuning: Tuning, width: f32, height: f32) -> Self {
        let viewport = Viewport::new(width, height, tuning.ground_fraction);
        let player = Player::new(&viewport, &tuning);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            speed: tuning.base_speed,
            tuning,
            phase: GamePhase::Start,
            frame: 0,
            score: 0.0,
            obstacles_cleared: 0,
            viewport,
            player,
            obstacles: Vec::new(),
            clouds: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };
        state.respawn_clouds();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace the cloud batch with a fresh one
    pub fn respawn_clouds(&mut self) {
        let count = self.tuning.cloud_count;
        self.clouds.clear();
        for _ in 0..count {
            let cloud = Cloud::spawn(&mut self.rng, &self.viewport, &self.tuning);
            self.clouds.push(cloud);
        }
    }

    /// Score as shown to the player
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
