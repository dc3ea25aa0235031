/// Entry point and frame loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use rand::SeedableRng;

use config::GameConfig;
use domain::difficulty::Difficulty;
use domain::vocab::Vocabulary;
use error::GameError;
use sim::event::GameEvent;
use sim::highscore::{HighScoreEntry, HighScores};
use sim::lifecycle::{FrameOutcome, Session};
use ui::input::{key_action, InputState};
use ui::menu::{NameEntry, Screen, TitleMenu};
use ui::renderer::Renderer;

fn main() {
    let config = GameConfig::load();
    init_logging(&config);

    let code = match run(&config) {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Game error: {e}");
            match e {
                GameError::UnknownDifficulty(_) => 2,
                _ => 1,
            }
        }
    };
    std::process::exit(code);
}

/// Log to a file: the terminal belongs to the renderer while the game runs.
fn init_logging(config: &GameConfig) {
    let path = match &config.log_file {
        Some(p) => p,
        None => return,
    };
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => {
            let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
            env_logger::Builder::from_env(env)
                .target(env_logger::Target::Pipe(Box::new(file)))
                .format_timestamp_millis()
                .init();
        }
        Err(e) => eprintln!("Warning: could not open log file {}: {e}", path.display()),
    }
}

/// Everything the frame loop owns outside the current session.
struct App {
    screen: Screen,
    menu: TitleMenu,
    entry: NameEntry,
    scores: HighScores,
    scores_path: PathBuf,
    session: Option<Session<StdRng>>,
    games_played: u64,
}

fn run(config: &GameConfig) -> error::Result<()> {
    // Difficulty labels are validated before the terminal is touched, so a
    // bad label is reported on a normal screen.
    let preselected = match &config.difficulty {
        Some(label) => label.parse::<Difficulty>()?,
        None => Difficulty::Easy,
    };
    let direct = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<Difficulty>())
        .transpose()?;

    let vocab = Vocabulary::load(config.words_file.as_deref());
    let scores_path = HighScores::default_path();

    let mut app = App {
        screen: Screen::Title,
        menu: TitleMenu::new(preselected),
        entry: NameEntry::default(),
        scores: HighScores::load(&scores_path),
        scores_path,
        session: None,
        games_played: 0,
    };

    if let Some(difficulty) = direct {
        start_session(&mut app, difficulty, &vocab, config);
    }

    let mut renderer = Renderer::new();
    renderer.init()?;

    let result = game_loop(&mut app, &mut renderer, &vocab, config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    result?;

    println!();
    println!("Thanks for playing Pirate Typer!");
    if let Some(best) = app.scores.top_score() {
        println!("Best score on the board: {best}");
    }
    Ok(())
}

fn game_loop(
    app: &mut App,
    renderer: &mut Renderer,
    vocab: &Vocabulary,
    config: &GameConfig,
) -> error::Result<()> {
    let mut kb = InputState::new();
    let frame_time = Duration::from_millis(config.timing.frame_ms);
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        kb.drain_events();
        if kb.ctrl_c_pressed() {
            break;
        }

        let quit = match app.screen {
            Screen::Title => {
                let quit = handle_title(app, &kb, vocab, config);
                if app.screen == Screen::Title {
                    renderer.render_title(&app.menu, &app.scores)?;
                }
                quit
            }
            Screen::Playing => handle_playing(app, &kb, dt, renderer)?,
            Screen::Results => {
                let quit = handle_results(app, &kb);
                if app.screen == Screen::Results {
                    if let Some(session) = &app.session {
                        renderer.render_results(session.state(), &app.entry, &app.scores)?;
                    }
                }
                quit
            }
        };
        if quit {
            break;
        }

        std::thread::sleep(frame_time.saturating_sub(frame_start.elapsed()));
    }

    Ok(())
}

fn start_session(app: &mut App, difficulty: Difficulty, vocab: &Vocabulary, config: &GameConfig) {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(app.games_played)),
        None => StdRng::from_entropy(),
    };
    app.games_played += 1;
    log::info!(
        "session start: difficulty={} seed={:?} words={}",
        difficulty, config.seed, vocab.len(),
    );
    app.session = Some(Session::new(
        difficulty,
        config.field.clone(),
        vocab.clone(),
        rng,
        config.timing.input_queue,
    ));
    app.entry = NameEntry::default();
    app.screen = Screen::Playing;
}

// ── Screen handlers (return true to quit) ──

fn handle_title(app: &mut App, kb: &InputState, vocab: &Vocabulary, config: &GameConfig) -> bool {
    for key in &kb.presses {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            KeyCode::Up => app.menu.up(),
            KeyCode::Down => app.menu.down(),
            KeyCode::Char(c) if c.is_ascii_digit() => app.menu.jump(c.to_digit(10).unwrap_or(0)),
            KeyCode::Enter => {
                let difficulty = app.menu.selected();
                start_session(app, difficulty, vocab, config);
                return false;
            }
            _ => {}
        }
    }
    false
}

fn handle_playing(
    app: &mut App,
    kb: &InputState,
    dt: Duration,
    renderer: &mut Renderer,
) -> error::Result<bool> {
    let session = match app.session.as_mut() {
        Some(s) => s,
        None => {
            app.screen = Screen::Title;
            return Ok(false);
        }
    };

    if kb.any_pressed(&[KeyCode::Esc]) {
        return Ok(true);
    }

    // The final frame stays up until the player moves on.
    if session.is_finished() {
        if kb.any_pressed(&[KeyCode::Enter]) {
            app.screen = Screen::Results;
        }
        return Ok(false);
    }

    for key in &kb.presses {
        session.push_key(key_action(key));
    }
    let outcome = session.frame(dt, renderer)?;
    log_events(&session.take_events());

    if outcome == FrameOutcome::Finished {
        log::info!("final frame shown, waiting for ENTER");
    }
    Ok(false)
}

fn handle_results(app: &mut App, kb: &InputState) -> bool {
    for key in &kb.presses {
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Enter if app.entry.recorded => {
                app.screen = Screen::Title;
                return false;
            }
            KeyCode::Enter => record_score(app),
            KeyCode::Backspace | KeyCode::Delete => app.entry.pop(),
            KeyCode::Char(c) => app.entry.push(c),
            _ => {}
        }
    }
    false
}

fn record_score(app: &mut App) {
    let state = match &app.session {
        Some(s) => s.state(),
        None => return,
    };
    let entry = HighScoreEntry {
        name: app.entry.final_name(),
        score: state.score,
        ships_destroyed: state.ships_destroyed,
        difficulty: state.difficulty.label().to_string(),
    };
    app.entry.rank = app.scores.add_score(entry);
    app.entry.recorded = true;

    if app.entry.rank.is_some() {
        save_scores(&app.scores, &app.scores_path);
    }
}

fn save_scores(scores: &HighScores, path: &Path) {
    if let Err(e) = scores.save(path) {
        log::error!("could not save high scores to {}: {e}", path.display());
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::EnemyDestroyed { ships_destroyed, next_health, next_shield } => log::info!(
                "enemy ship #{ships_destroyed} sunk; next enemy health={next_health} shield={next_shield}"
            ),
            GameEvent::PlayerSunk { score } => log::info!("player sunk with score {score}"),
            GameEvent::Paused => log::info!("paused"),
            GameEvent::Resumed => log::info!("resumed"),
            other => log::debug!("{other:?}"),
        }
    }
}
