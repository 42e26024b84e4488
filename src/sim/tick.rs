//! Per-frame simulation step
//!
//! Each playing frame runs `apply_input` → `maybe_spawn` → `advance`, in
//! that order, with the frame's variable `delta`.

use glam::Vec2;

use super::clock::{MonotonicTime, RandomRange};
use super::state::{GameEvent, GamePhase, GameState};

/// Input sampled for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch position already unprojected into world space
    pub pointer: Option<Vec2>,
    /// Move-left key held
    pub left: bool,
    /// Move-right key held
    pub right: bool,
    /// Start key pressed (leaves the menu)
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game by one rendered frame.
///
/// Returns the events raised this frame, in the order they happened.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    delta: f32,
    now: MonotonicTime,
    rng: &mut impl RandomRange,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.pause(now);
                events.push(GameEvent::Paused);
                return events;
            }
            GamePhase::Paused => {
                state.resume(now);
                events.push(GameEvent::Resumed);
            }
            GamePhase::Menu => {}
        }
    }

    match state.phase {
        GamePhase::Menu => {
            if input.start || input.pointer.is_some() {
                events.extend(state.begin(now, rng));
            }
        }
        GamePhase::Paused => {}
        GamePhase::Playing => {
            state.frames += 1;
            apply_input(state, input, delta);
            if let Some(x) = maybe_spawn(state, now, rng) {
                events.push(GameEvent::Spawned { x });
            }
            advance(state, delta, &mut events);
        }
    }

    events
}

/// Move the bucket from pointer and keyboard input, then keep it on screen
pub fn apply_input(state: &mut GameState, input: &TickInput, delta: f32) {
    let tuning = &state.tuning;
    let bucket = &mut state.bucket.rect;

    if let Some(world) = input.pointer {
        bucket.pos.x = world.x - tuning.touch_center_width / 2.0;
    }

    let step = tuning.bucket_speed * delta;
    if input.left {
        bucket.pos.x -= step;
    }
    if input.right {
        bucket.pos.x += step;
    }

    bucket.clamp_x(0.0, tuning.max_x());
}

/// Spawn one drop if more than a spawn interval has passed since the last.
///
/// Missed intervals are not caught up; at most one drop per call.
pub fn maybe_spawn(
    state: &mut GameState,
    now: MonotonicTime,
    rng: &mut impl RandomRange,
) -> Option<f32> {
    if now.saturating_since(state.last_spawn) > state.tuning.spawn_interval() {
        Some(state.spawn_raindrop(now, rng))
    } else {
        None
    }
}

/// Drop every raindrop by `fall_speed * delta`, then retire the ones that
/// left the screen (no score) or landed in the bucket (+1 score each).
pub fn advance(state: &mut GameState, delta: f32, events: &mut Vec<GameEvent>) {
    let fall = state.tuning.fall_speed * delta;
    let bucket = state.bucket.rect;
    let score = &mut state.score;

    state.raindrops.retain_mut(|raindrop| {
        raindrop.rect.pos.y -= fall;

        if raindrop.exited() {
            log::debug!("Drop missed at x={:.1}", raindrop.rect.pos.x);
            events.push(GameEvent::Missed);
            return false;
        }

        if raindrop.rect.overlaps(&bucket) {
            *score += 1;
            log::debug!("Drop collected (score {})", *score);
            events.push(GameEvent::Collected { score: *score });
            return false;
        }

        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::clock::SequenceRandom;
    use crate::sim::state::Raindrop;
    use crate::tuning::Tuning;
    use std::time::Duration;

    /// Tuning with spawning pushed far out so a test controls every drop
    fn quiet_tuning() -> Tuning {
        Tuning {
            spawn_interval_secs: 1000.0,
            ..Default::default()
        }
    }

    fn run_frames(
        state: &mut GameState,
        input: &TickInput,
        delta: f32,
        frames: usize,
        clock: &mut MonotonicTime,
        rng: &mut SequenceRandom,
    ) -> Vec<GameEvent> {
        let mut all = Vec::new();
        for _ in 0..frames {
            *clock = clock.saturating_add(Duration::from_secs_f32(delta));
            all.extend(tick(state, input, delta, *clock, rng));
        }
        all
    }

    #[test]
    fn test_menu_to_playing() {
        let mut state = GameState::new(Tuning::default());
        let mut rng = SequenceRandom::new(vec![50.0]);

        // Nothing pressed - stay on the menu
        let events = tick(&mut state, &TickInput::default(), 0.016, MonotonicTime::ZERO, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.phase, GamePhase::Menu);

        // Tap anywhere
        let input = TickInput {
            pointer: Some(Vec2::new(10.0, 10.0)),
            ..Default::default()
        };
        let events = tick(&mut state, &input, 0.016, MonotonicTime::ZERO, &mut rng);
        assert_eq!(events, vec![GameEvent::Started, GameEvent::Spawned { x: 50.0 }]);
        assert_eq!(state.phase, GamePhase::Playing);
        // The tap only starts the game; the bucket has not moved yet
        assert_eq!(state.bucket.rect.pos.x, 368.0);
    }

    #[test]
    fn test_pause_freezes_drops() {
        let mut state = GameState::playing(quiet_tuning(), MonotonicTime::ZERO);
        state.raindrops.push(Raindrop::new(0.0, 300.0, 64.0));
        let mut rng = SequenceRandom::new(vec![0.0]);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let events = tick(&mut state, &pause, 0.1, MonotonicTime::ZERO, &mut rng);
        assert_eq!(events, vec![GameEvent::Paused]);

        let mut clock = MonotonicTime::ZERO;
        run_frames(&mut state, &TickInput::default(), 0.1, 10, &mut clock, &mut rng);
        assert_eq!(state.raindrops[0].rect.pos.y, 300.0);

        let events = tick(&mut state, &pause, 0.1, clock, &mut rng);
        assert_eq!(events, vec![GameEvent::Resumed]);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.raindrops[0].rect.pos.y, 280.0);
    }

    #[test]
    fn test_keyboard_moves_at_bucket_speed() {
        let mut state = GameState::playing(quiet_tuning(), MonotonicTime::ZERO);
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        apply_input(&mut state, &left, 0.5);
        assert_eq!(state.bucket.rect.pos.x, 268.0);

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        apply_input(&mut state, &right, 0.25);
        assert_eq!(state.bucket.rect.pos.x, 318.0);

        // Both held cancel out
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        apply_input(&mut state, &both, 0.25);
        assert_eq!(state.bucket.rect.pos.x, 318.0);
    }

    #[test]
    fn test_bucket_clamped_to_screen() {
        let mut state = GameState::playing(quiet_tuning(), MonotonicTime::ZERO);
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        apply_input(&mut state, &left, 5.0);
        assert_eq!(state.bucket.rect.pos.x, 0.0);

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        apply_input(&mut state, &right, 5.0);
        assert_eq!(state.bucket.rect.pos.x, 736.0);
    }

    #[test]
    fn test_pointer_centers_with_touch_width() {
        let mut state = GameState::playing(quiet_tuning(), MonotonicTime::ZERO);
        let input = TickInput {
            pointer: Some(Vec2::new(400.0, 240.0)),
            ..Default::default()
        };
        apply_input(&mut state, &input, 0.016);
        assert_eq!(state.bucket.rect.pos.x, 369.0);

        // Configurable centering width
        state.tuning.touch_center_width = 64.0;
        apply_input(&mut state, &input, 0.016);
        assert_eq!(state.bucket.rect.pos.x, 368.0);

        // Pointer near the edge still clamps
        let edge = TickInput {
            pointer: Some(Vec2::new(5.0, 0.0)),
            ..Default::default()
        };
        apply_input(&mut state, &edge, 0.016);
        assert_eq!(state.bucket.rect.pos.x, 0.0);
    }

    #[test]
    fn test_pointer_then_keys_same_frame() {
        let mut state = GameState::playing(quiet_tuning(), MonotonicTime::ZERO);
        let input = TickInput {
            pointer: Some(Vec2::new(400.0, 240.0)),
            right: true,
            ..Default::default()
        };
        apply_input(&mut state, &input, 0.1);
        assert_eq!(state.bucket.rect.pos.x, 389.0);
    }

    #[test]
    fn test_spawn_requires_strictly_more_than_interval() {
        let mut state = GameState::playing(Tuning::default(), MonotonicTime::ZERO);
        let mut rng = SequenceRandom::new(vec![123.0]);

        assert_eq!(maybe_spawn(&mut state, MonotonicTime::from_nanos(1_000_000_000), &mut rng), None);
        assert!(state.raindrops.is_empty());

        let now = MonotonicTime::from_nanos(1_000_000_001);
        assert_eq!(maybe_spawn(&mut state, now, &mut rng), Some(123.0));
        assert_eq!(state.raindrops.len(), 1);
        assert_eq!(state.raindrops[0].rect.pos.y, 480.0);
        assert_eq!(state.last_spawn, now);
    }

    #[test]
    fn test_no_catch_up_spawning() {
        let mut state = GameState::playing(Tuning::default(), MonotonicTime::ZERO);
        let mut rng = SequenceRandom::new(vec![0.0]);

        // Five seconds late: still only one drop
        let now = MonotonicTime::from_nanos(5_000_000_000);
        assert!(maybe_spawn(&mut state, now, &mut rng).is_some());
        assert!(maybe_spawn(&mut state, now, &mut rng).is_none());
        assert_eq!(state.raindrops.len(), 1);
    }

    #[test]
    fn test_uncollected_drop_reaches_floor() {
        // Bucket at 368..432, drop at 100..164: never overlap
        let mut state = GameState::playing(quiet_tuning(), MonotonicTime::ZERO);
        state.raindrops.push(Raindrop::new(100.0, 480.0, 64.0));
        let mut rng = SequenceRandom::new(vec![0.0]);
        let mut clock = MonotonicTime::ZERO;

        let events = run_frames(&mut state, &TickInput::default(), 0.1, 24, &mut clock, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.raindrops.len(), 1);
        assert_eq!(state.raindrops[0].rect.pos.y, 0.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_drop_removed_after_leaving_screen() {
        let mut state = GameState::playing(quiet_tuning(), MonotonicTime::ZERO);
        state.raindrops.push(Raindrop::new(100.0, 480.0, 64.0));
        let mut rng = SequenceRandom::new(vec![0.0]);
        let mut clock = MonotonicTime::ZERO;

        // 2.7s: y = -60, top edge still on screen
        run_frames(&mut state, &TickInput::default(), 0.1, 27, &mut clock, &mut rng);
        assert_eq!(state.raindrops.len(), 1);
        assert_eq!(state.raindrops[0].rect.pos.y, -60.0);

        // 2.8s: y = -80, gone without scoring
        let events = run_frames(&mut state, &TickInput::default(), 0.1, 1, &mut clock, &mut rng);
        assert_eq!(events, vec![GameEvent::Missed]);
        assert!(state.raindrops.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_drop_collected_entering_bucket_band() {
        let mut state = GameState::playing(quiet_tuning(), MonotonicTime::ZERO);
        state.raindrops.push(Raindrop::new(368.0, 480.0, 64.0));
        let mut rng = SequenceRandom::new(vec![0.0]);
        let mut clock = MonotonicTime::ZERO;

        // y = 100 after 19 frames: bottom edge above the bucket's top (84)
        run_frames(&mut state, &TickInput::default(), 0.1, 19, &mut clock, &mut rng);
        assert_eq!(state.raindrops.len(), 1);
        assert_eq!(state.score, 0);

        // y = 80 overlaps the 20..84 band
        let events = run_frames(&mut state, &TickInput::default(), 0.1, 1, &mut clock, &mut rng);
        assert_eq!(events, vec![GameEvent::Collected { score: 1 }]);
        assert!(state.raindrops.is_empty());
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_multiple_drops_retired_same_frame() {
        let mut state = GameState::playing(quiet_tuning(), MonotonicTime::ZERO);
        state.raindrops.push(Raindrop::new(368.0, 90.0, 64.0));
        state.raindrops.push(Raindrop::new(380.0, 88.0, 64.0));
        state.raindrops.push(Raindrop::new(0.0, -60.0, 64.0));
        state.raindrops.push(Raindrop::new(600.0, 300.0, 64.0));

        let mut events = Vec::new();
        advance(&mut state, 0.1, &mut events);

        assert_eq!(state.score, 2);
        assert_eq!(state.raindrops.len(), 1);
        assert_eq!(state.raindrops[0].rect.pos, Vec2::new(600.0, 280.0));
        assert_eq!(
            events,
            vec![
                GameEvent::Collected { score: 1 },
                GameEvent::Collected { score: 2 },
                GameEvent::Missed,
            ]
        );
    }

    #[test]
    fn test_edge_touching_drop_not_collected() {
        let mut state = GameState::playing(quiet_tuning(), MonotonicTime::ZERO);
        // Will land at y = 50, right edge exactly at the bucket's left edge
        state.raindrops.push(Raindrop::new(368.0 - 64.0, 70.0, 64.0));

        let mut events = Vec::new();
        advance(&mut state, 0.1, &mut events);
        assert!(events.is_empty());
        assert_eq!(state.raindrops.len(), 1);
    }
}
