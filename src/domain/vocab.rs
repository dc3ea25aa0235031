/// Word vocabulary: the pool spawned words draw their text from.
///
/// ## Sources (priority order):
///   1. `general.words_file` from config.toml, if it exists
///   2. Built-in list
///
/// ## Word file format:
///   One word per line. Blank lines and lines starting with `#` are skipped.
///   Only lines made entirely of ASCII letters are kept (the typed buffer can
///   never contain anything else, so other words would be untypeable).

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

const BUILTIN: &[&str] = &[
    "ahoy", "anchor", "armada", "ballast", "barrel", "bilge", "blunderbuss",
    "booty", "bosun", "bounty", "bow", "brig", "buccaneer", "cannon", "captain",
    "cargo", "compass", "corsair", "cove", "crew", "crows", "cutlass", "deck",
    "doubloon", "flag", "fleet", "galleon", "gangplank", "gold", "grog",
    "gunpowder", "harbor", "helm", "hook", "hull", "island", "jolly", "keel",
    "kraken", "lagoon", "landlubber", "lantern", "loot", "map", "mast", "mate",
    "musket", "mutiny", "navy", "oar", "parley", "parrot", "pistol", "plank",
    "plunder", "port", "powder", "quarterdeck", "raid", "reef", "rigging",
    "rope", "rudder", "rum", "sail", "scallywag", "schooner", "scurvy", "sea",
    "shanty", "ship", "shore", "skull", "sloop", "spyglass", "starboard",
    "stern", "storm", "sword", "tide", "treasure", "voyage", "wave", "wheel",
];

#[derive(Clone, Debug)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    pub fn builtin() -> Self {
        Vocabulary {
            words: BUILTIN.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Build from file content. `None` if no usable word remains.
    pub fn parse(content: &str) -> Option<Self> {
        let words: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .filter(|l| l.chars().all(|c| c.is_ascii_alphabetic()))
            .map(str::to_string)
            .collect();
        if words.is_empty() {
            None
        } else {
            Some(Vocabulary { words })
        }
    }

    /// Load from `path`, falling back to the built-in list.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) if p.is_file() => p,
            Some(p) => {
                log::info!("word list {} not found, using built-in words", p.display());
                return Self::builtin();
            }
            None => return Self::builtin(),
        };

        match std::fs::read_to_string(path) {
            Ok(text) => match Self::parse(&text) {
                Some(v) => {
                    log::info!("loaded {} words from {}", v.len(), path.display());
                    v
                }
                None => {
                    log::warn!("{} has no usable words, using built-in words", path.display());
                    Self::builtin()
                }
            },
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                Self::builtin()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Random word. The list is never empty.
    pub fn pick(&self, rng: &mut impl Rng) -> &str {
        self.words
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("ahoy")
    }
}
