/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const APP_DIR: &str = ".local/share/pirate-typer";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Raw difficulty label; validated when a session starts.
    pub difficulty: Option<String>,
    pub words_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    pub timing: TimingConfig,
    pub field: FieldConfig,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub frame_ms: u64,
    pub input_queue: usize,
}

/// Play surface and spawn odds. Copied into each game state.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub width: u32,
    pub height: u32,
    pub repair_chance: f64,
}

pub const MIN_FIELD_WIDTH: u32 = 200;
pub const MIN_FIELD_HEIGHT: u32 = 150;

// Margins keep words clear of the score block (top-left) and the enemy
// block (top-right).
const MARGIN_LEFT: u32 = 50;
const MARGIN_RIGHT: u32 = 100;
const MARGIN_TOP: u32 = 85;
const MARGIN_BOTTOM: u32 = 15;

impl FieldConfig {
    /// Build with sizes and odds clamped to usable values.
    pub fn new(width: u32, height: u32, repair_chance: f64) -> Self {
        let repair_chance = if repair_chance.is_finite() {
            repair_chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        FieldConfig {
            width: width.max(MIN_FIELD_WIDTH),
            height: height.max(MIN_FIELD_HEIGHT),
            repair_chance,
        }
    }

    /// Horizontal spawn range. Never empty for a clamped field.
    pub fn safe_x(&self) -> Range<u32> {
        MARGIN_LEFT..self.width.saturating_sub(MARGIN_RIGHT).max(MARGIN_LEFT + 1)
    }

    /// Vertical spawn range. Never empty for a clamped field.
    pub fn safe_y(&self) -> Range<u32> {
        MARGIN_TOP..self.height.saturating_sub(MARGIN_BOTTOM).max(MARGIN_TOP + 1)
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig::new(default_width(), default_height(), default_repair_chance())
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    field: TomlField,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default = "default_words_file")]
    words_file: String,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_input_queue")]
    input_queue: usize,
}

#[derive(Deserialize, Debug)]
struct TomlField {
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    #[serde(default = "default_repair_chance")]
    repair_chance: f64,
}

// ── Defaults ──

fn default_words_file() -> String { "words.txt".into() }
fn default_log_file() -> String { "pirate-typer.log".into() }
fn default_log_level() -> String { "info".into() }
fn default_frame_ms() -> u64 { 16 }      // ~60 frames per second
fn default_input_queue() -> usize { 64 }
fn default_width() -> u32 { 600 }
fn default_height() -> u32 { 600 }
fn default_repair_chance() -> f64 { 0.02 }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            difficulty: None,
            words_file: default_words_file(),
            seed: None,
            log_file: default_log_file(),
            log_level: default_log_level(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            frame_ms: default_frame_ms(),
            input_queue: default_input_queue(),
        }
    }
}

impl Default for TomlField {
    fn default() -> Self {
        TomlField {
            width: default_width(),
            height: default_height(),
            repair_chance: default_repair_chance(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/pirate-typer.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    fn from_toml(cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let words_file = non_empty(&cfg.general.words_file).map(|name| {
            let p = PathBuf::from(name);
            if p.is_absolute() {
                p
            } else {
                search_dirs.iter()
                    .map(|d| d.join(name))
                    .find(|p| p.is_file())
                    .unwrap_or(p)
            }
        });

        let log_file = non_empty(&cfg.general.log_file).map(|name| {
            let p = PathBuf::from(name);
            if p.is_absolute() { p } else { data_dir().join(p) }
        });

        GameConfig {
            difficulty: cfg.general.difficulty.filter(|d| !d.trim().is_empty()),
            words_file,
            seed: cfg.general.seed,
            log_file,
            log_level: cfg.general.log_level,
            timing: TimingConfig {
                frame_ms: cfg.timing.frame_ms.max(1),
                input_queue: cfg.timing.input_queue.max(1),
            },
            field: FieldConfig::new(cfg.field.width, cfg.field.height, cfg.field.repair_chance),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), &[])
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t) }
}

/// Candidate directories to search: exe dir + CWD + data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(APP_DIR);
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Writable directory for high scores and the log file.
///
/// Exe directory if writable (portable installs), else the XDG data home,
/// else CWD.
pub fn data_dir() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            if is_writable(parent) {
                return parent.to_path_buf();
            }
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(APP_DIR);
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn is_writable(dir: &Path) -> bool {
    let probe = dir.join(".write_test_pirate_typer");
    if std::fs::write(&probe, "").is_ok() {
        let _ = std::fs::remove_file(&probe);
        true
    } else {
        false
    }
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
