//! Per-frame simulation tick
//!
//! Core game loop that advances the simulation by one display frame.

use rand::Rng;

use super::collision::hits;
use super::state::{GameEvent, GamePhase, GameState, Obstacle, Player, Viewport};
use crate::tuning::Tuning;

/// Frames of warning the autopilot wants before an egg reaches the rabbit
const AUTOPILOT_LEAD_FRAMES: f32 = 8.0;

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (honoured only while playing)
    pub jump: bool,
    /// Start a new run (honoured only on the start and game-over screens)
    pub restart: bool,
    /// Idle/demo mode - the game plays itself
    pub autopilot: bool,
}

impl TickInput {
    /// Translate the single Activate event into the intent that fits `phase`
    pub fn activate(&mut self, phase: GamePhase) {
        match phase {
            GamePhase::Playing => self.jump = true,
            GamePhase::Start | GamePhase::GameOver => self.restart = true,
        }
    }

    /// Clear one-shot intents after a tick consumed them
    pub fn clear_one_shots(&mut self) {
        self.jump = false;
        self.restart = false;
    }
}

/// Frames between spawn attempts for a given scroll speed.
///
/// Linear in speed (faster means more frequent), clamped to the interval range.
pub fn spawn_interval(speed: f32, tuning: &Tuning) -> f32 {
    let t = (speed - tuning.spawn_speed_low) / (tuning.spawn_speed_high - tuning.spawn_speed_low);
    let raw = tuning.spawn_interval_slow + t * (tuning.spawn_interval_fast - tuning.spawn_interval_slow);
    let lo = tuning.spawn_interval_slow.min(tuning.spawn_interval_fast);
    let hi = tuning.spawn_interval_slow.max(tuning.spawn_interval_fast);
    raw.clamp(lo, hi)
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    let mut input = input.clone();
    if input.autopilot {
        match state.phase {
            GamePhase::Playing => input.jump |= autopilot_wants_jump(state),
            GamePhase::Start | GamePhase::GameOver => input.restart = true,
        }
    }

    if input.restart && state.phase != GamePhase::Playing {
        reset(state);
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    if input.jump && state.player.jump(state.viewport.ground_y, &state.tuning) {
        state.events.push(GameEvent::Jumped);
    }

    // Background drifts first, at this frame's speed
    for cloud in &mut state.clouds {
        cloud.update(state.speed, &mut state.rng, &state.viewport, &state.tuning);
    }

    state.frame += 1;

    state
        .player
        .apply_gravity(state.viewport.ground_y, state.tuning.gravity);

    // Spawn on eligible frames, with a chance to skip
    let interval = (spawn_interval(state.speed, &state.tuning).floor() as u64).max(1);
    if state.frame % interval == 0 && state.rng.random_bool(state.tuning.spawn_chance.clamp(0.0, 1.0)) {
        let id = state.next_entity_id();
        let obstacle = Obstacle::spawn(id, &mut state.rng, &state.viewport, &state.tuning);
        state.obstacles.push(obstacle);
        state.events.push(GameEvent::ObstacleSpawned { id });
    }

    // Move, collide, prune
    let speed = state.speed;
    let divisor = state.tuning.obstacle_hitbox_divisor;
    let player_bounds = state.player.bounds(state.tuning.player_hitbox_divisor);
    let mut crashed = false;
    let mut cleared = Vec::new();
    state.obstacles.retain_mut(|obstacle| {
        obstacle.advance(speed);
        if hits(&player_bounds, &obstacle.bounds(divisor)) {
            crashed = true;
        }
        if obstacle.is_offscreen() {
            cleared.push(obstacle.id);
            false
        } else {
            true
        }
    });

    for id in cleared {
        state.score += state.tuning.score_per_clear;
        state.obstacles_cleared += 1;
        state.events.push(GameEvent::ObstacleCleared { id });
    }

    // Score and speed
    state.score += state.tuning.score_per_frame;
    state.speed = state.tuning.cap_speed(state.speed + state.tuning.speed_increment);

    if crashed {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::Crashed {
            score: state.score,
            speed: state.speed,
        });
        log::info!(
            "Game over: score {} at speed {:.2} ({} eggs cleared)",
            state.display_score(),
            state.speed,
            state.obstacles_cleared
        );
    }
}

/// Start a fresh run: empty field, zero score, base speed, new rabbit and clouds
pub fn reset(state: &mut GameState) {
    state.obstacles.clear();
    state.score = 0.0;
    state.speed = state.tuning.base_speed;
    state.obstacles_cleared = 0;
    state.frame = 0;
    state.player = Player::new(&state.viewport, &state.tuning);
    state.respawn_clouds();
    state.phase = GamePhase::Playing;
    state.events.push(GameEvent::Restarted);
    log::debug!("Run reset (seed {})", state.seed);
}

/// Adopt a new viewport size. Ground level follows the height; entities
/// keep their positions, except the rabbit is re-seated outside of play.
pub fn resize(state: &mut GameState, width: f32, height: f32) {
    state.viewport = Viewport::new(width, height, state.tuning.ground_fraction);
    if state.phase != GamePhase::Playing {
        state.player = Player::new(&state.viewport, &state.tuning);
    }
    log::debug!(
        "Viewport {}x{}, ground at {}",
        width,
        height,
        state.viewport.ground_y
    );
}

/// Jump when the nearest egg ahead is about to reach the rabbit
fn autopilot_wants_jump(state: &GameState) -> bool {
    let player = state.player.bounds(state.tuning.player_hitbox_divisor);
    let reach = state.speed * AUTOPILOT_LEAD_FRAMES;
    state.obstacles.iter().any(|o| {
        let gap = o.bounds(state.tuning.obstacle_hitbox_divisor).left - player.right;
        gap > 0.0 && gap <= reach
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default(), 800.0, 600.0);
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        state.drain_events();
        state
    }

    fn egg_at(state: &mut GameState, x: f32) -> u32 {
        let id = state.next_entity_id();
        let mut egg = Obstacle::spawn(id, &mut state.rng, &state.viewport, &state.tuning);
        egg.pos.x = x;
        state.obstacles.push(egg);
        id
    }

    #[test]
    fn test_start_screen_is_static() {
        let mut state = GameState::new(1, Tuning::default(), 800.0, 600.0);
        let clouds: Vec<Vec2> = state.clouds.iter().map(|c| c.pos).collect();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.frame, 0);
        assert_eq!(state.score, 0.0);
        let after: Vec<Vec2> = state.clouds.iter().map(|c| c.pos).collect();
        assert_eq!(clouds, after);
    }

    #[test]
    fn test_start_to_playing() {
        let mut state = GameState::new(1, Tuning::default(), 800.0, 600.0);
        let mut input = TickInput::default();
        input.activate(state.phase);
        assert!(input.restart && !input.jump);
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.frame, 1);
        assert!(state.drain_events().contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_activate_while_playing_is_jump() {
        let state = playing_state(1);
        let mut input = TickInput::default();
        input.activate(state.phase);
        assert!(input.jump && !input.restart);
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut state = playing_state(1);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
        }
        let frame = state.frame;
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.frame, frame + 1);
    }

    #[test]
    fn test_jump_through_tick() {
        let mut state = playing_state(1);
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        let ground_y = state.player.pos.y;
        tick(&mut state, &input);
        // Impulse applied, then one frame of gravity integration
        assert_eq!(state.player.pos.y, ground_y - 10.0);
        assert_eq!(state.player.vel_y, -9.5);
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);

        // Airborne jump does nothing
        tick(&mut state, &input);
        assert_eq!(state.player.vel_y, -9.0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_score_and_speed_per_frame() {
        let mut state = playing_state(1);
        let (score, speed) = (state.score, state.speed);
        tick(&mut state, &TickInput::default());
        assert!((state.score - score - 0.05).abs() < 1e-9);
        assert!((state.speed - speed - 0.005).abs() < 1e-5);
    }

    #[test]
    fn test_speed_cap() {
        let mut tuning = Tuning::default();
        tuning.max_speed = Some(5.01);
        let mut state = GameState::new(1, tuning, 800.0, 600.0);
        reset(&mut state);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
            state.obstacles.clear();
        }
        assert_eq!(state.speed, 5.01);
    }

    #[test]
    fn test_offscreen_obstacle_is_removed_and_scored() {
        let mut state = playing_state(1);
        let id = egg_at(&mut state, 0.0);
        let size = state.obstacles[0].size;
        // Right edge 4px on screen; one frame of scrolling takes it past
        state.obstacles[0].pos.x = -size / 2.0 + 4.0;
        let score = state.score;
        tick(&mut state, &TickInput::default());
        assert!(state.obstacles.iter().all(|o| o.id != id));
        assert_eq!(state.obstacles_cleared, 1);
        assert!((state.score - score - 1.05).abs() < 1e-9);
        assert!(state.drain_events().contains(&GameEvent::ObstacleCleared { id }));
    }

    #[test]
    fn test_collision_ends_run() {
        let mut state = playing_state(1);
        let x = state.player.pos.x + 5.0;
        egg_at(&mut state, x);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        // Colliding egg stays on screen for the game-over frame
        assert_eq!(state.obstacles.len(), 1);
        let events = state.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::Crashed { .. })));

        // Frozen afterwards
        let snapshot = (state.frame, state.score, state.obstacles[0].pos);
        tick(&mut state, &TickInput::default());
        assert_eq!(snapshot, (state.frame, state.score, state.obstacles[0].pos));
    }

    #[test]
    fn test_multiple_collisions_same_frame() {
        let mut state = playing_state(1);
        let x = state.player.pos.x;
        egg_at(&mut state, x + 5.0);
        egg_at(&mut state, x + 8.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        let crashes = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Crashed { .. }))
            .count();
        assert_eq!(crashes, 1);
    }

    #[test]
    fn test_jumping_clears_egg() {
        let mut state = playing_state(1);
        let x = state.player.pos.x + 60.0;
        egg_at(&mut state, x);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default());
            state.obstacles.retain(|o| o.pos.x > 0.0);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut state = playing_state(1);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        let x = state.player.pos.x;
        egg_at(&mut state, x);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        reset(&mut state);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.speed, 5.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.frame, 0);
        assert_eq!(state.clouds.len(), 5);
        assert_eq!(state.player.vel_y, 0.0);
    }

    #[test]
    fn test_game_over_to_playing_on_activate() {
        let mut state = playing_state(1);
        let x = state.player.pos.x;
        egg_at(&mut state, x);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        let mut input = TickInput::default();
        input.activate(state.phase);
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_spawn_interval_endpoints() {
        let tuning = Tuning::default();
        assert_eq!(spawn_interval(5.0, &tuning), 90.0);
        assert_eq!(spawn_interval(20.0, &tuning), 40.0);
        assert_eq!(spawn_interval(12.5, &tuning), 65.0);
        assert_eq!(spawn_interval(0.0, &tuning), 90.0);
        assert_eq!(spawn_interval(500.0, &tuning), 40.0);
    }

    #[test]
    fn test_spawns_only_on_interval_frames() {
        let mut state = playing_state(5);
        let mut spawns = 0;
        for _ in 0..1500 {
            let interval = spawn_interval(state.speed, &state.tuning).floor() as u64;
            tick(&mut state, &TickInput::default());
            for event in state.drain_events() {
                if let GameEvent::ObstacleSpawned { .. } = event {
                    assert_eq!(state.frame % interval, 0, "spawned on frame {}", state.frame);
                    spawns += 1;
                }
            }
            // Keep the rabbit alive
            state.obstacles.clear();
        }
        assert!(spawns > 0);
    }

    #[test]
    fn test_spawn_chance_on_eligible_frames() {
        // Every frame eligible, constant speed
        let tuning = Tuning {
            speed_increment: 0.0,
            spawn_interval_slow: 1.0,
            spawn_interval_fast: 1.0,
            ..Default::default()
        };
        let mut state = GameState::new(11, tuning, 800.0, 600.0);
        reset(&mut state);
        state.drain_events();

        let eligible = 4000;
        let mut spawns = 0;
        for _ in 0..eligible {
            tick(&mut state, &TickInput::default());
            spawns += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::ObstacleSpawned { .. }))
                .count();
            state.obstacles.clear();
        }
        assert_eq!(state.phase, GamePhase::Playing);
        let ratio = spawns as f64 / eligible as f64;
        assert!((0.65..=0.75).contains(&ratio), "spawn ratio {}", ratio);
    }

    #[test]
    fn test_resize_reseats_player_outside_play() {
        let mut state = GameState::new(1, Tuning::default(), 800.0, 600.0);
        resize(&mut state, 1000.0, 400.0);
        assert_eq!(state.viewport.ground_y, 340.0);
        assert_eq!(state.player.pos, Vec2::new(250.0, 315.0));
    }

    #[test]
    fn test_resize_during_play_keeps_entities() {
        let mut state = playing_state(1);
        let x = state.player.pos.x;
        egg_at(&mut state, 600.0);
        resize(&mut state, 1000.0, 400.0);
        assert_eq!(state.player.pos.x, x);
        assert_eq!(state.obstacles[0].pos.x, 600.0);
        // Rabbit falls onto the new, higher ground on the next frame
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.pos.y, 315.0);
    }

    #[test]
    fn test_cloud_wrap_during_play() {
        let mut state = playing_state(1);
        let size = state.clouds[0].size;
        state.clouds[0].pos.x = -size - 0.1;
        tick(&mut state, &TickInput::default());
        assert!(state.clouds[0].pos.x >= state.viewport.width);
    }

    #[test]
    fn test_autopilot_restarts_and_jumps() {
        let mut state = GameState::new(1, Tuning::default(), 800.0, 600.0);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);

        // Egg hitbox 30px ahead of the rabbit's hitbox
        let player_right = state.player.bounds(state.tuning.player_hitbox_divisor).right;
        let id = egg_at(&mut state, 0.0);
        let egg = state.obstacles.iter_mut().find(|o| o.id == id).unwrap();
        egg.pos.x = player_right + 30.0 + egg.size / state.tuning.obstacle_hitbox_divisor;
        state.drain_events();
        tick(&mut state, &input);
        assert!(state.drain_events().contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, Tuning::default(), 800.0, 600.0);
        let mut state2 = GameState::new(99999, Tuning::default(), 800.0, 600.0);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..2000 {
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }
        assert_eq!(state1.frame, state2.frame);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.obstacles.len(), state2.obstacles.len());
        assert_eq!(state1.player.pos, state2.player.pos);
    }

    proptest! {
        #[test]
        fn spawn_interval_is_clamped(speed in -1000.0f32..100_000.0) {
            let interval = spawn_interval(speed, &Tuning::default());
            prop_assert!((40.0..=90.0).contains(&interval));
        }

        #[test]
        fn speed_never_decreases_while_playing(
            seed in any::<u64>(),
            jumps in proptest::collection::vec(any::<bool>(), 1..300),
        ) {
            let mut state = playing_state(seed);
            for jump in jumps {
                let before = state.speed;
                let input = TickInput { jump, ..Default::default() };
                tick(&mut state, &input);
                prop_assert!(state.speed >= before);
                if state.phase != GamePhase::Playing {
                    break;
                }
            }
        }

        #[test]
        fn player_stays_between_ceiling_and_ground(
            seed in any::<u64>(),
            jumps in proptest::collection::vec(any::<bool>(), 1..300),
        ) {
            let mut state = playing_state(seed);
            for jump in jumps {
                let input = TickInput { jump, ..Default::default() };
                tick(&mut state, &input);
                state.obstacles.clear();
                let rest = Player::rest_y(state.viewport.ground_y, state.player.size);
                prop_assert!(state.player.pos.y <= rest);
                prop_assert!(state.player.pos.y >= state.player.ceiling_y());
            }
        }

        #[test]
        fn score_never_decreases_while_playing(seed in any::<u64>(), frames in 1usize..500) {
            let mut state = playing_state(seed);
            for _ in 0..frames {
                let before = state.score;
                tick(&mut state, &TickInput::default());
                prop_assert!(state.score >= before);
                if state.phase != GamePhase::Playing {
                    break;
                }
            }
        }
    }
}
