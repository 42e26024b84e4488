//! Game state and core simulation types
//!
//! The simulation owns all of this; the presentation shell only reads it.

use serde::{Deserialize, Serialize};

use super::clock::{MonotonicTime, RandomRange};
use super::rect::Rect;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a tap or key
    Menu,
    /// Drops are falling
    Playing,
    /// Simulation frozen
    Paused,
}

/// Something that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Left the menu and started play
    Started,
    /// A drop appeared at the given x
    Spawned { x: f32 },
    /// A drop landed in the bucket; carries the new score
    Collected { score: u32 },
    /// A drop fell off the bottom of the screen
    Missed,
    Paused,
    Resumed,
}

/// A falling raindrop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Raindrop {
    pub rect: Rect,
}

impl Raindrop {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            rect: Rect::square(x, y, size),
        }
    }

    /// True once the drop's top edge has passed below the screen
    pub fn exited(&self) -> bool {
        self.rect.top() < 0.0
    }
}

/// The player's bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub rect: Rect,
}

impl Bucket {
    /// Horizontally centered bucket at its fixed height
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            rect: Rect::square(tuning.bucket_start_x(), tuning.bucket_y, tuning.sprite_size),
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub bucket: Bucket,
    /// Active drops. Order carries no meaning.
    pub raindrops: Vec<Raindrop>,
    /// Time of the most recent spawn
    pub last_spawn: MonotonicTime,
    /// Drops collected this session
    pub score: u32,
    /// Frames stepped while playing
    pub frames: u64,
    /// When the current pause began
    pub paused_at: Option<MonotonicTime>,
}

impl GameState {
    /// Fresh session sitting on the menu
    pub fn new(tuning: Tuning) -> Self {
        let bucket = Bucket::new(&tuning);
        Self {
            tuning,
            phase: GamePhase::Menu,
            bucket,
            raindrops: Vec::new(),
            last_spawn: MonotonicTime::ZERO,
            score: 0,
            frames: 0,
            paused_at: None,
        }
    }

    /// Fresh session already playing, with no drops and the spawn timer
    /// anchored at `now`
    pub fn playing(tuning: Tuning, now: MonotonicTime) -> Self {
        let mut state = Self::new(tuning);
        state.phase = GamePhase::Playing;
        state.last_spawn = now;
        state
    }

    /// Leave the menu: spawn the first drop right away and start the timer
    pub fn begin(&mut self, now: MonotonicTime, rng: &mut impl RandomRange) -> Vec<GameEvent> {
        if self.phase != GamePhase::Menu {
            return Vec::new();
        }
        self.phase = GamePhase::Playing;
        log::info!("Play started");
        let x = self.spawn_raindrop(now, rng);
        vec![GameEvent::Started, GameEvent::Spawned { x }]
    }

    /// Push a new drop at a random x along the top of the screen.
    /// Returns its x.
    pub fn spawn_raindrop(&mut self, now: MonotonicTime, rng: &mut impl RandomRange) -> f32 {
        let x = rng.random_range(0.0, self.tuning.max_x());
        self.raindrops
            .push(Raindrop::new(x, self.tuning.screen_height, self.tuning.sprite_size));
        self.last_spawn = now;
        log::trace!("Spawned drop at x={x:.1} ({} active)", self.raindrops.len());
        x
    }

    /// Freeze the simulation. Returns false if not playing.
    pub fn pause(&mut self, now: MonotonicTime) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        self.paused_at = Some(now);
        true
    }

    /// Unfreeze. The spawn timer is shifted forward by the paused interval
    /// so time spent paused does not count toward the next spawn.
    pub fn resume(&mut self, now: MonotonicTime) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        if let Some(at) = self.paused_at.take() {
            self.last_spawn = self.last_spawn.saturating_add(now.saturating_since(at));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::clock::SequenceRandom;

    #[test]
    fn test_new_state_on_menu() {
        let state = GameState::new(Tuning::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.bucket.rect, Rect::square(368.0, 20.0, 64.0));
        assert!(state.raindrops.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_begin_spawns_first_drop() {
        let mut state = GameState::new(Tuning::default());
        let mut rng = SequenceRandom::new(vec![100.0]);
        let now = MonotonicTime::from_nanos(5);

        let events = state.begin(now, &mut rng);
        assert_eq!(events, vec![GameEvent::Started, GameEvent::Spawned { x: 100.0 }]);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.raindrops.len(), 1);
        assert_eq!(state.raindrops[0].rect, Rect::square(100.0, 480.0, 64.0));
        assert_eq!(state.last_spawn, now);

        // Second begin is a no-op
        assert!(state.begin(now, &mut rng).is_empty());
        assert_eq!(state.raindrops.len(), 1);
    }

    #[test]
    fn test_drop_exit_uses_top_edge() {
        let mut raindrop = Raindrop::new(0.0, -64.0, 64.0);
        assert!(!raindrop.exited());
        raindrop.rect.pos.y = -64.01;
        assert!(raindrop.exited());
    }

    #[test]
    fn test_pause_resume_rebases_timer() {
        let mut state = GameState::playing(Tuning::default(), MonotonicTime::from_nanos(1_000));
        assert!(state.pause(MonotonicTime::from_nanos(2_000)));
        assert!(!state.pause(MonotonicTime::from_nanos(2_100)));
        assert_eq!(state.phase, GamePhase::Paused);

        assert!(state.resume(MonotonicTime::from_nanos(2_500)));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.last_spawn, MonotonicTime::from_nanos(1_500));
    }
}
