/// GameState: the complete snapshot of a running game.
///
/// One instance per session. The engine (`step::tick`) and the input
/// resolver (`input::apply_key`) are the only writers; the renderer gets a
/// shared reference. The outer loop serialises the two writers, so no
/// locking is needed.
///
/// ## Word order
///
/// `words` is kept in insertion order, newest last. Completion matching and
/// expiry both scan from the back, so a duplicate typed word always takes
/// the newer copy first.

use crate::config::FieldConfig;
use crate::domain::difficulty::Difficulty;
use crate::domain::entity::{Ship, Word};
use crate::domain::rules::Pacing;

/// Every session starts against the same first enemy.
pub const FIRST_ENEMY_HEALTH: i32 = 50;
pub const FIRST_ENEMY_SHIELD: u32 = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Debug)]
pub struct GameState {
    // ── Ships ──
    pub player: Ship,
    pub enemy: Ship,

    // ── Words ──
    pub words: Vec<Word>,
    pub typed: String,

    // ── Tracking ──
    pub score: u32,
    pub ships_destroyed: u32,
    pub pacing: Pacing,
    pub frame: u64,

    // ── Meta ──
    pub phase: Phase,
    pub message: Option<String>,
    pub difficulty: Difficulty,
    pub field: FieldConfig,
}

impl GameState {
    pub fn new(difficulty: Difficulty, field: FieldConfig) -> Self {
        let stats = difficulty.stats();
        GameState {
            player: Ship::new(stats.health, stats.shield),
            enemy: Ship::new(FIRST_ENEMY_HEALTH, FIRST_ENEMY_SHIELD),
            words: Vec::new(),
            typed: String::new(),
            score: 0,
            ships_destroyed: 0,
            pacing: Pacing::new(stats.word_duration_ms, stats.spawn_frequency),
            frame: 0,
            phase: Phase::Running,
            message: None,
            difficulty,
            field,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn set_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}
