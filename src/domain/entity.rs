/// Entities: Ship (player or enemy) and Word (a typing target on the surface).

/// A ship: the player's or the current enemy's.
///
/// Health is signed: a hit can push it below zero for the instant before the
/// engine turns that into a sinking. Shield is a flat damage reduction and
/// can never be negative.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Ship {
    pub health: i32,
    pub shield: u32,
}

impl Ship {
    pub fn new(health: i32, shield: u32) -> Self {
        Ship { health, shield }
    }

    pub fn is_sunk(&self) -> bool {
        self.health <= 0
    }
}

/// Cannonball words hurt: the enemy when typed, the player when they expire.
/// Repair words heal the player when typed and vanish harmlessly otherwise.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WordKind {
    Cannonball,
    Repair,
}

#[derive(Clone, Debug)]
pub struct Word {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub created_ms: u64,
    pub kind: WordKind,
}

impl Word {
    pub fn new(text: &str, x: u32, y: u32, created_ms: u64, kind: WordKind) -> Self {
        Word {
            text: text.to_string(),
            x, y,
            created_ms,
            kind,
        }
    }

    /// Length in characters, which is also its raw damage.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Milliseconds on the board at play-clock time `now_ms`.
    pub fn age(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_ms)
    }
}
