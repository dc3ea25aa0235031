/// The step function: advances the game by one tick.
///
/// Processing order:
///   1. Spawn (every `spawn_frequency` frames, plus the occasional repair word)
///   2. Expiry (cannonballs that reach the player's ship deal damage)
///   3. Lose check (player health ≤ 0 → GameOver)
///   4. Frame counter
///
/// Time is play-clock milliseconds supplied by the caller, so the engine is
/// deterministic given `now_ms` and the RNG.

use rand::Rng;

use crate::domain::entity::{Word, WordKind};
use crate::domain::rules;
use crate::domain::vocab::Vocabulary;
use super::event::GameEvent;
use super::world::{GameState, Phase};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn tick(
    state: &mut GameState,
    now_ms: u64,
    rng: &mut impl Rng,
    vocab: &Vocabulary,
) -> Vec<GameEvent> {
    if state.phase != Phase::Running { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();

    resolve_spawn(state, now_ms, rng, vocab, &mut events);
    resolve_expiry(state, now_ms, &mut events);

    state.frame += 1;
    events
}

// ══════════════════════════════════════════════════════════════
// Spawn
// ══════════════════════════════════════════════════════════════

fn resolve_spawn(
    state: &mut GameState,
    now_ms: u64,
    rng: &mut impl Rng,
    vocab: &Vocabulary,
    events: &mut Vec<GameEvent>,
) {
    // Pacing floors keep the divisor ≥ 50.
    if state.frame % state.pacing.spawn_frequency != 0 { return; }

    spawn_word(state, now_ms, WordKind::Cannonball, rng, vocab, events);

    if rng.gen_bool(state.field.repair_chance) {
        spawn_word(state, now_ms, WordKind::Repair, rng, vocab, events);
    }
}

fn spawn_word(
    state: &mut GameState,
    now_ms: u64,
    kind: WordKind,
    rng: &mut impl Rng,
    vocab: &Vocabulary,
    events: &mut Vec<GameEvent>,
) {
    let x = rng.gen_range(state.field.safe_x());
    let y = rng.gen_range(state.field.safe_y());
    let text = vocab.pick(rng);
    state.words.push(Word::new(text, x, y, now_ms, kind));
    events.push(GameEvent::WordSpawned { kind, text: text.to_string() });
}

// ══════════════════════════════════════════════════════════════
// Expiry
// ══════════════════════════════════════════════════════════════

/// Remove every word that has outlived the current word duration.
/// Newest-first, and every expired word is handled even if the player
/// sinks part-way through.
fn resolve_expiry(state: &mut GameState, now_ms: u64, events: &mut Vec<GameEvent>) {
    let duration = state.pacing.word_duration_ms;

    for i in (0..state.words.len()).rev() {
        if state.words[i].age(now_ms) < duration { continue; }

        let word = state.words.remove(i);
        let damage = match word.kind {
            WordKind::Cannonball => rules::hit(&mut state.player, word.len()),
            WordKind::Repair => 0,
        };
        events.push(GameEvent::WordExpired { kind: word.kind, text: word.text, damage });

        if state.player.is_sunk() && state.phase != Phase::GameOver {
            state.phase = Phase::GameOver;
            state.set_message(&format!(
                "Your ship went down after sinking {} enemy ship{}.",
                state.ships_destroyed,
                if state.ships_destroyed == 1 { "" } else { "s" },
            ));
            events.push(GameEvent::PlayerSunk { score: state.score });
        }
    }
}
