/// Input resolver: key actions → typed-buffer edits and word completion.
///
/// Key actions are already decoded from the terminal by `ui::input`; this
/// module only knows what each action does to the game state.
///
/// Completion matching runs on every letter (auto-submit) and again on
/// commit. Commit additionally clears the buffer whether or not anything
/// matched.

use rand::Rng;

use crate::domain::entity::WordKind;
use crate::domain::rules::{self, KILL_BONUS, REPAIR_AMOUNT};
use super::event::GameEvent;
use super::world::{GameState, Phase};

pub const PAUSE_MESSAGE: &str = "Paused. Press → to continue.";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyAction {
    TogglePause,
    DeleteLast,
    Commit,
    Letter(char),
    Ignored,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn apply_key(state: &mut GameState, action: KeyAction, rng: &mut impl Rng) -> Vec<GameEvent> {
    if state.phase == Phase::GameOver { return vec![]; }

    let mut events = Vec::new();
    match action {
        KeyAction::TogglePause => toggle_pause(state, &mut events),
        KeyAction::DeleteLast => {
            state.typed.pop();
        }
        KeyAction::Commit => {
            check_for_complete_word(state, rng, &mut events);
            state.typed.clear();
        }
        KeyAction::Letter(c) if c.is_ascii_alphabetic() => {
            state.typed.push(c);
            check_for_complete_word(state, rng, &mut events);
        }
        KeyAction::Letter(_) | KeyAction::Ignored => {}
    }
    events
}

fn toggle_pause(state: &mut GameState, events: &mut Vec<GameEvent>) {
    match state.phase {
        Phase::Running => {
            state.phase = Phase::Paused;
            state.set_message(PAUSE_MESSAGE);
            events.push(GameEvent::Paused);
        }
        Phase::Paused => {
            state.phase = Phase::Running;
            state.clear_message();
            events.push(GameEvent::Resumed);
        }
        Phase::GameOver => {}
    }
}

// ══════════════════════════════════════════════════════════════
// Word completion
// ══════════════════════════════════════════════════════════════

/// Resolve the typed buffer against the live words.
///
/// Scans newest → oldest; the first word equal to the buffer (ignoring case
/// and surrounding whitespace) is consumed. Returns whether a word matched.
/// No match leaves the state untouched.
pub fn check_for_complete_word(
    state: &mut GameState,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) -> bool {
    let idx = match state.words.iter().rposition(|w| rules::matches(&w.text, &state.typed)) {
        Some(i) => i,
        None => return false,
    };

    let word = state.words.remove(idx);
    match word.kind {
        WordKind::Cannonball => fire_at_enemy(state, word.len(), rng, events),
        WordKind::Repair => {
            state.player.health = state.player.health.saturating_add(REPAIR_AMOUNT);
            events.push(GameEvent::PlayerRepaired { health: state.player.health });
        }
    }
    events.push(GameEvent::WordCompleted { kind: word.kind, text: word.text });

    state.typed.clear();
    true
}

fn fire_at_enemy(state: &mut GameState, len: usize, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    state.score = state.score.saturating_add(1);
    let damage = rules::hit(&mut state.enemy, len);
    events.push(GameEvent::EnemyHit { damage });

    if !state.enemy.is_sunk() { return; }

    state.score = state.score.saturating_add(KILL_BONUS);
    state.ships_destroyed += 1;
    state.enemy = rules::next_enemy(state.ships_destroyed, rng);
    state.pacing.tighten();
    events.push(GameEvent::EnemyDestroyed {
        ships_destroyed: state.ships_destroyed,
        next_health: state.enemy.health,
        next_shield: state.enemy.shield,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::domain::difficulty::Difficulty;
    use crate::domain::entity::{Ship, Word};
    use crate::domain::rules::Pacing;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1)
    }

    fn easy() -> GameState {
        GameState::new(Difficulty::Easy, FieldConfig::default())
    }

    fn push(s: &mut GameState, text: &str, x: u32, kind: WordKind) {
        s.words.push(Word::new(text, x, 100, 0, kind));
    }

    fn type_word(s: &mut GameState, text: &str, r: &mut StdRng) -> Vec<GameEvent> {
        let mut all = Vec::new();
        for c in text.chars() {
            all.extend(apply_key(s, KeyAction::Letter(c), r));
        }
        all
    }

    // ── Buffer editing ──

    #[test]
    fn letters_append_and_delete_pops() {
        let mut s = easy();
        let mut r = rng();
        type_word(&mut s, "Sea", &mut r);
        assert_eq!(s.typed, "Sea");
        apply_key(&mut s, KeyAction::DeleteLast, &mut r);
        assert_eq!(s.typed, "Se");
        apply_key(&mut s, KeyAction::DeleteLast, &mut r);
        apply_key(&mut s, KeyAction::DeleteLast, &mut r);
        apply_key(&mut s, KeyAction::DeleteLast, &mut r);
        assert_eq!(s.typed, "");
    }

    #[test]
    fn non_letters_never_enter_the_buffer() {
        let mut s = easy();
        let mut r = rng();
        apply_key(&mut s, KeyAction::Letter('7'), &mut r);
        apply_key(&mut s, KeyAction::Letter(' '), &mut r);
        apply_key(&mut s, KeyAction::Letter('é'), &mut r);
        apply_key(&mut s, KeyAction::Ignored, &mut r);
        assert_eq!(s.typed, "");
    }

    #[test]
    fn commit_clears_buffer_even_without_match() {
        let mut s = easy();
        let mut r = rng();
        push(&mut s, "anchor", 60, WordKind::Cannonball);
        type_word(&mut s, "anch", &mut r);
        let events = apply_key(&mut s, KeyAction::Commit, &mut r);
        assert!(events.is_empty());
        assert_eq!(s.typed, "");
        assert_eq!(s.words.len(), 1);
    }

    // ── Pause ──

    #[test]
    fn pause_toggles_phase_and_message_only() {
        let mut s = easy();
        let mut r = rng();
        type_word(&mut s, "ab", &mut r);

        let ev = apply_key(&mut s, KeyAction::TogglePause, &mut r);
        assert_eq!(ev, vec![GameEvent::Paused]);
        assert_eq!(s.phase, Phase::Paused);
        assert_eq!(s.message.as_deref(), Some(PAUSE_MESSAGE));
        assert_eq!(s.typed, "ab");

        let ev = apply_key(&mut s, KeyAction::TogglePause, &mut r);
        assert_eq!(ev, vec![GameEvent::Resumed]);
        assert_eq!(s.phase, Phase::Running);
        assert!(s.message.is_none());
    }

    #[test]
    fn game_over_ignores_every_key() {
        let mut s = easy();
        let mut r = rng();
        push(&mut s, "a", 60, WordKind::Cannonball);
        s.phase = Phase::GameOver;
        for action in [
            KeyAction::Letter('a'), KeyAction::Commit,
            KeyAction::TogglePause, KeyAction::DeleteLast,
        ] {
            assert!(apply_key(&mut s, action, &mut r).is_empty());
        }
        assert_eq!(s.phase, Phase::GameOver);
        assert_eq!(s.words.len(), 1);
        assert_eq!(s.typed, "");
        assert_eq!(s.score, 0);
    }

    // ── Completion ──

    #[test]
    fn completed_cannonball_scores_and_damages_enemy() {
        let mut s = easy();
        let mut r = rng();
        push(&mut s, "cutlass", 60, WordKind::Cannonball);
        let events = type_word(&mut s, "cutlass", &mut r);

        assert!(s.words.is_empty());
        assert_eq!(s.typed, "");
        assert_eq!(s.score, 1);
        // enemy 50/3, word length 7 → 4 damage
        assert_eq!(s.enemy.health, 46);
        assert!(events.contains(&GameEvent::EnemyHit { damage: 4 }));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let mut s = easy();
        let mut r = rng();
        push(&mut s, "Galleon", 60, WordKind::Cannonball);
        type_word(&mut s, "gALLEON", &mut r);
        assert!(s.words.is_empty());
    }

    #[test]
    fn newest_duplicate_is_consumed_first() {
        let mut s = easy();
        let mut r = rng();
        push(&mut s, "rum", 60, WordKind::Cannonball);
        push(&mut s, "sail", 70, WordKind::Cannonball);
        push(&mut s, "RUM", 80, WordKind::Cannonball);

        type_word(&mut s, "rum", &mut r);
        assert_eq!(s.words.len(), 2);
        assert_eq!(s.words[0].x, 60, "older copy survives");
        assert_eq!(s.words[1].text, "sail");

        type_word(&mut s, "rum", &mut r);
        assert_eq!(s.words.len(), 1);
        assert_eq!(s.words[0].text, "sail");
    }

    #[test]
    fn no_match_leaves_state_unchanged() {
        let mut s = easy();
        let mut r = rng();
        push(&mut s, "parrot", 60, WordKind::Cannonball);
        push(&mut s, "rum", 70, WordKind::Repair);
        s.typed = "plank".into();
        let before = s.clone();

        let mut events = Vec::new();
        assert!(!check_for_complete_word(&mut s, &mut r, &mut events));
        assert!(events.is_empty());
        assert_eq!(s.typed, before.typed);
        assert_eq!(s.words.len(), before.words.len());
        assert_eq!(s.player, before.player);
        assert_eq!(s.enemy, before.enemy);
        assert_eq!(s.score, before.score);
        assert_eq!(s.pacing, before.pacing);
        assert_eq!(s.ships_destroyed, before.ships_destroyed);
    }

    #[test]
    fn destroying_an_enemy_awards_bonus_and_spawns_a_tougher_one() {
        let mut s = easy();
        let mut r = rng();
        s.enemy = Ship::new(2, 1);
        push(&mut s, "sea", 60, WordKind::Cannonball);

        let events = type_word(&mut s, "sea", &mut r);

        assert_eq!(s.score, 101);
        assert_eq!(s.ships_destroyed, 1);
        assert!((130..=179).contains(&s.enemy.health), "health {}", s.enemy.health);
        assert!((1..=5).contains(&s.enemy.shield), "shield {}", s.enemy.shield);
        assert_eq!(s.pacing, Pacing { word_duration_ms: 4900, spawn_frequency: 99 });
        assert!(events.iter().any(|e| matches!(e, GameEvent::EnemyDestroyed { ships_destroyed: 1, .. })));
    }

    #[test]
    fn repeated_kills_never_break_pacing_floors() {
        let mut s = GameState::new(Difficulty::Hard, FieldConfig::default());
        let mut r = rng();
        for _ in 0..200 {
            s.enemy = Ship::new(1, 0);
            push(&mut s, "boom", 60, WordKind::Cannonball);
            type_word(&mut s, "boom", &mut r);
            assert!(s.pacing.word_duration_ms >= 1500);
            assert!(s.pacing.spawn_frequency >= 50);
        }
        assert_eq!(s.ships_destroyed, 200);
        assert_eq!(s.pacing, Pacing { word_duration_ms: 1500, spawn_frequency: 50 });
    }

    #[test]
    fn repair_word_heals_two_regardless_of_health() {
        let mut r = rng();
        for start in [1, 150, 10_000] {
            let mut s = easy();
            s.player.health = start;
            push(&mut s, "rum", 60, WordKind::Repair);
            let events = type_word(&mut s, "rum", &mut r);
            assert_eq!(s.player.health, start + 2);
            assert_eq!(s.score, 0);
            assert_eq!(s.enemy, Ship::new(50, 3));
            assert!(events.contains(&GameEvent::PlayerRepaired { health: start + 2 }));
        }
    }

    #[test]
    fn typing_is_accepted_while_paused() {
        let mut s = easy();
        let mut r = rng();
        push(&mut s, "mast", 60, WordKind::Cannonball);
        apply_key(&mut s, KeyAction::TogglePause, &mut r);
        type_word(&mut s, "mast", &mut r);
        assert!(s.words.is_empty());
        assert_eq!(s.phase, Phase::Paused);
    }
}
