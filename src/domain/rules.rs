/// Combat and pacing rules.
///
/// Pure functions with no access to the game state. The engine (expiry) and
/// the input resolver (completion) both go through these, so the damage
/// formula and the difficulty ramp have a single definition.
///
/// ## Damage
///
///   damage = max(0, len(word) − shield)
///
/// ## Enemy generation (after the n-th kill)
///
///   health = 60 · n + rand[70, 119]
///   shield = rand[1, 5]
///
/// ## Pacing ramp (per kill)
///
///   word duration   −100 ms, floor 1500 ms
///   spawn frequency −1 frame, floor 50 frames

use rand::Rng;

use super::entity::Ship;

pub const MIN_WORD_DURATION_MS: u64 = 1500;
pub const MIN_SPAWN_FREQUENCY: u64 = 50;
const WORD_DURATION_STEP_MS: u64 = 100;
const SPAWN_FREQUENCY_STEP: u64 = 1;

pub const KILL_BONUS: u32 = 100;
pub const REPAIR_AMOUNT: i32 = 2;

/// How long words live and how often new ones appear.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pacing {
    pub word_duration_ms: u64,
    pub spawn_frequency: u64,
}

impl Pacing {
    /// Build pacing with both floors applied.
    pub fn new(word_duration_ms: u64, spawn_frequency: u64) -> Self {
        Pacing {
            word_duration_ms: word_duration_ms.max(MIN_WORD_DURATION_MS),
            spawn_frequency: spawn_frequency.max(MIN_SPAWN_FREQUENCY),
        }
    }

    /// One step harder. Floors hold after every call.
    pub fn tighten(&mut self) {
        self.word_duration_ms = self.word_duration_ms
            .saturating_sub(WORD_DURATION_STEP_MS)
            .max(MIN_WORD_DURATION_MS);
        self.spawn_frequency = self.spawn_frequency
            .saturating_sub(SPAWN_FREQUENCY_STEP)
            .max(MIN_SPAWN_FREQUENCY);
    }
}

/// Damage a word of `len` characters deals through `shield`.
pub fn damage(len: usize, shield: u32) -> i32 {
    let raw = len as i64 - shield as i64;
    raw.clamp(0, i32::MAX as i64) as i32
}

/// Apply a hit to `ship`; returns the damage actually dealt.
pub fn hit(ship: &mut Ship, len: usize) -> i32 {
    let dealt = damage(len, ship.shield);
    ship.health = ship.health.saturating_sub(dealt);
    dealt
}

/// The replacement enemy after `ships_destroyed` kills.
pub fn next_enemy(ships_destroyed: u32, rng: &mut impl Rng) -> Ship {
    let base = 60_i32.saturating_mul(ships_destroyed.min(i32::MAX as u32) as i32);
    let health = base.saturating_add(rng.gen_range(70..120));
    let shield = rng.gen_range(1..=5);
    Ship::new(health, shield)
}

/// Canonical form used when comparing typed text to a word.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Does the typed buffer spell `word`?
pub fn matches(word: &str, typed: &str) -> bool {
    normalize(word) == normalize(typed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn damage_is_length_minus_shield() {
        assert_eq!(damage(5, 2), 3);
        assert_eq!(damage(3, 0), 3);
        assert_eq!(damage(1, 0), 1);
    }

    #[test]
    fn shield_at_or_above_length_blocks_everything() {
        assert_eq!(damage(4, 4), 0);
        assert_eq!(damage(2, 5), 0);
        assert_eq!(damage(0, 0), 0);
    }

    #[test]
    fn hit_reports_dealt_damage() {
        let mut ship = Ship::new(10, 1);
        assert_eq!(hit(&mut ship, 6), 5);
        assert_eq!(ship.health, 5);
        assert_eq!(hit(&mut ship, 1), 0);
        assert_eq!(ship.health, 5);
    }

    #[test]
    fn pacing_floors_hold_for_any_number_of_kills() {
        let mut p = Pacing::new(5000, 100);
        for _ in 0..500 {
            p.tighten();
            assert!(p.word_duration_ms >= MIN_WORD_DURATION_MS);
            assert!(p.spawn_frequency >= MIN_SPAWN_FREQUENCY);
        }
        assert_eq!(p, Pacing { word_duration_ms: 1500, spawn_frequency: 50 });
    }

    #[test]
    fn pacing_single_step() {
        let mut p = Pacing::new(3500, 80);
        p.tighten();
        assert_eq!(p, Pacing { word_duration_ms: 3400, spawn_frequency: 79 });
    }

    #[test]
    fn pacing_new_applies_floors() {
        let p = Pacing::new(10, 0);
        assert_eq!(p.word_duration_ms, MIN_WORD_DURATION_MS);
        assert_eq!(p.spawn_frequency, MIN_SPAWN_FREQUENCY);
    }

    #[test]
    fn next_enemy_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for kills in 1..20u32 {
            let e = next_enemy(kills, &mut rng);
            let base = 60 * kills as i32;
            assert!((base + 70..=base + 119).contains(&e.health), "health {}", e.health);
            assert!((1..=5).contains(&e.shield), "shield {}", e.shield);
        }
    }

    #[test]
    fn matching_ignores_case_and_surrounding_space() {
        assert!(matches("Anchor", "anchor"));
        assert!(matches("  parrot ", "PARROT"));
        assert!(!matches("parrot", "parro"));
        assert!(!matches("parrot", ""));
    }
}
