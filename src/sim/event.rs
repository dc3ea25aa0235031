/// Events emitted during a tick or a keystroke.
/// The outer loop consumes these for logging.

use crate::domain::entity::WordKind;

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum GameEvent {
    WordSpawned { kind: WordKind, text: String },
    WordExpired { kind: WordKind, text: String, damage: i32 },
    WordCompleted { kind: WordKind, text: String },
    EnemyHit { damage: i32 },
    EnemyDestroyed { ships_destroyed: u32, next_health: i32, next_shield: u32 },
    PlayerRepaired { health: i32 },
    PlayerSunk { score: u32 },
    Paused,
    Resumed,
}
