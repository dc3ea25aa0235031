/// Lifecycle controller: owns one game session and schedules its frames.
///
/// ## States
///
///   Running ──TogglePause──▶ Paused ──TogglePause──▶ Running
///   Running ──player sunk (during tick)──▶ GameOver   (terminal)
///
/// ## One frame
///
///   1. GameOver reached? Present the final frame once, then finish.
///   2. Drain queued keys, each applied whole, in arrival order.
///   3. Running: advance the play clock, tick, present.
///      Paused:  no clock, no tick; present only if a key changed something.
///
/// The outer loop calls `frame` at a fixed rate until it returns
/// `FrameOutcome::Finished`.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use rand::Rng;

use crate::config::FieldConfig;
use crate::domain::difficulty::Difficulty;
use crate::domain::vocab::Vocabulary;
use super::event::GameEvent;
use super::input::{self, KeyAction};
use super::step;
use super::world::{GameState, Phase};

/// Rendering capability. Receives a read-only view of the state.
pub trait Present {
    fn present(&mut self, state: &GameState) -> io::Result<()>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FrameOutcome {
    Continue,
    Finished,
}

/// Game time. Only advances while the session is Running, so words do not
/// age behind the pause screen.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayClock {
    elapsed: Duration,
}

impl PlayClock {
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    pub fn now_ms(&self) -> u64 {
        self.elapsed.as_millis().min(u64::MAX as u128) as u64
    }
}

pub struct Session<R: Rng> {
    state: GameState,
    vocab: Vocabulary,
    rng: R,
    clock: PlayClock,
    pending: VecDeque<KeyAction>,
    capacity: usize,
    events: Vec<GameEvent>,
    finished: bool,
}

impl<R: Rng> Session<R> {
    pub fn new(
        difficulty: Difficulty,
        field: FieldConfig,
        vocab: Vocabulary,
        rng: R,
        queue_capacity: usize,
    ) -> Self {
        let capacity = queue_capacity.max(1);
        Session {
            state: GameState::new(difficulty, field),
            vocab,
            rng,
            clock: PlayClock::default(),
            pending: VecDeque::with_capacity(capacity),
            capacity,
            events: Vec::new(),
            finished: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Queue a key for the next frame. Returns false if the queue was full
    /// and the key was dropped.
    pub fn push_key(&mut self, action: KeyAction) -> bool {
        if self.finished || action == KeyAction::Ignored {
            return true;
        }
        if self.pending.len() >= self.capacity {
            log::warn!("input queue full ({}), dropping {:?}", self.capacity, action);
            return false;
        }
        self.pending.push_back(action);
        true
    }

    /// Events produced since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn frame(&mut self, dt: Duration, out: &mut impl Present) -> io::Result<FrameOutcome> {
        if self.finished {
            return Ok(FrameOutcome::Finished);
        }

        if self.state.phase == Phase::GameOver {
            return self.finish(out);
        }

        let applied = self.drain_input();

        match self.state.phase {
            Phase::Running => {
                self.clock.advance(dt);
                let events = step::tick(&mut self.state, self.clock.now_ms(), &mut self.rng, &self.vocab);
                self.events.extend(events);
                out.present(&self.state)?;
            }
            Phase::Paused => {
                if applied > 0 {
                    out.present(&self.state)?;
                }
            }
            Phase::GameOver => {}
        }

        Ok(FrameOutcome::Continue)
    }

    fn drain_input(&mut self) -> usize {
        let mut applied = 0;
        while let Some(action) = self.pending.pop_front() {
            let events = input::apply_key(&mut self.state, action, &mut self.rng);
            self.events.extend(events);
            applied += 1;
        }
        applied
    }

    fn finish(&mut self, out: &mut impl Present) -> io::Result<FrameOutcome> {
        self.pending.clear();
        self.finished = true;
        log::info!(
            "session over: difficulty={} score={} ships_destroyed={} frames={}",
            self.state.difficulty, self.state.score, self.state.ships_destroyed, self.state.frame,
        );
        out.present(&self.state)?;
        Ok(FrameOutcome::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Ship, Word, WordKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Records what it was shown.
    #[derive(Default)]
    struct Recorder {
        frames: Vec<(Phase, u64, usize)>,
    }

    impl Present for Recorder {
        fn present(&mut self, state: &GameState) -> io::Result<()> {
            self.frames.push((state.phase, state.frame, state.words.len()));
            Ok(())
        }
    }

    const DT: Duration = Duration::from_millis(16);

    fn session(capacity: usize) -> Session<StdRng> {
        let field = FieldConfig::new(600, 600, 0.0);
        let vocab = Vocabulary::parse("kraken").unwrap();
        Session::new(Difficulty::Easy, field, vocab, StdRng::seed_from_u64(5), capacity)
    }

    #[test]
    fn running_frames_tick_and_present() {
        let mut s = session(8);
        let mut out = Recorder::default();
        for _ in 0..3 {
            assert_eq!(s.frame(DT, &mut out).unwrap(), FrameOutcome::Continue);
        }
        assert_eq!(s.state().frame, 3);
        assert_eq!(out.frames.len(), 3);
        assert_eq!(s.clock.now_ms(), 48);
        // frame 0 spawned the first word
        assert_eq!(s.state().words.len(), 1);
        assert!(s.take_events().iter().any(|e| matches!(e, GameEvent::WordSpawned { .. })));
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn paused_frames_freeze_tick_and_clock() {
        let mut s = session(8);
        let mut out = Recorder::default();
        s.frame(DT, &mut out).unwrap();

        s.push_key(KeyAction::TogglePause);
        s.frame(DT, &mut out).unwrap(); // applies pause, one presentation
        let presented = out.frames.len();
        let clock = s.clock.now_ms();

        for _ in 0..10 {
            assert_eq!(s.frame(DT, &mut out).unwrap(), FrameOutcome::Continue);
        }
        assert_eq!(s.state().phase, Phase::Paused);
        assert_eq!(s.state().frame, 1);
        assert_eq!(s.clock.now_ms(), clock);
        assert_eq!(out.frames.len(), presented);

        s.push_key(KeyAction::TogglePause);
        s.frame(DT, &mut out).unwrap();
        assert_eq!(s.state().phase, Phase::Running);
        assert_eq!(s.state().frame, 2);
    }

    #[test]
    fn words_do_not_age_while_paused() {
        let mut s = session(8);
        let mut out = Recorder::default();
        s.frame(DT, &mut out).unwrap(); // spawns at t=16
        s.push_key(KeyAction::TogglePause);
        for _ in 0..1000 {
            s.frame(Duration::from_millis(100), &mut out).unwrap();
        }
        s.push_key(KeyAction::TogglePause);
        s.frame(DT, &mut out).unwrap();
        assert_eq!(s.state().words.len(), 1);
        assert_eq!(s.state().player.health, 150);
    }

    #[test]
    fn keys_are_applied_before_the_tick() {
        let mut s = session(8);
        let mut out = Recorder::default();
        s.frame(DT, &mut out).unwrap();
        for c in "kraken".chars() {
            s.push_key(KeyAction::Letter(c));
        }
        s.frame(DT, &mut out).unwrap();
        assert!(s.state().words.is_empty());
        assert_eq!(s.state().score, 1);
    }

    #[test]
    fn full_queue_drops_keys() {
        let mut s = session(2);
        assert!(s.push_key(KeyAction::Letter('a')));
        assert!(s.push_key(KeyAction::Letter('b')));
        assert!(!s.push_key(KeyAction::Letter('c')));
        let mut out = Recorder::default();
        s.frame(DT, &mut out).unwrap();
        assert_eq!(s.state().typed, "ab");
    }

    #[test]
    fn game_over_presents_one_final_frame_then_stops() {
        let mut s = session(8);
        let mut out = Recorder::default();
        s.state.frame = 1;
        s.state.player = Ship::new(1, 0);
        s.state.words.push(Word::new("kraken", 60, 90, 0, WordKind::Cannonball));

        // Word outlives the 5s Easy duration in one big step
        assert_eq!(s.frame(Duration::from_secs(6), &mut out).unwrap(), FrameOutcome::Continue);
        assert_eq!(s.state().phase, Phase::GameOver);

        s.push_key(KeyAction::TogglePause);
        assert_eq!(s.frame(DT, &mut out).unwrap(), FrameOutcome::Finished);
        assert!(s.is_finished());
        let presented = out.frames.len();
        assert_eq!(out.frames.last().map(|f| f.0), Some(Phase::GameOver));

        for _ in 0..5 {
            assert_eq!(s.frame(DT, &mut out).unwrap(), FrameOutcome::Finished);
        }
        assert_eq!(out.frames.len(), presented);
        assert_eq!(s.state().frame, 2);
        assert_eq!(s.state().phase, Phase::GameOver);
    }
}
