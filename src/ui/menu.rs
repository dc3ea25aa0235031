/// Screen-level UI state outside the game session: the difficulty menu on
/// the title screen and the name prompt on the results screen.

use crate::domain::difficulty::Difficulty;

pub const MAX_NAME_LEN: usize = 16;
pub const ANONYMOUS: &str = "anonymous";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Title,
    Playing,
    Results,
}

#[derive(Clone, Debug)]
pub struct TitleMenu {
    pub cursor: usize,
}

impl TitleMenu {
    pub fn new(preselected: Difficulty) -> Self {
        TitleMenu { cursor: preselected.index() }
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn down(&mut self) {
        self.cursor = (self.cursor + 1).min(Difficulty::ALL.len() - 1);
    }

    /// Jump to a 1-based menu number; out-of-range numbers are ignored.
    pub fn jump(&mut self, number: u32) {
        let idx = number as usize;
        if (1..=Difficulty::ALL.len()).contains(&idx) {
            self.cursor = idx - 1;
        }
    }

    pub fn selected(&self) -> Difficulty {
        Difficulty::ALL[self.cursor.min(Difficulty::ALL.len() - 1)]
    }
}

/// Name typed at the end of a game for the high-score table.
#[derive(Clone, Debug, Default)]
pub struct NameEntry {
    pub name: String,
    /// Rank achieved once recorded; None before recording or if the score
    /// didn't make the board.
    pub rank: Option<usize>,
    pub recorded: bool,
}

impl NameEntry {
    pub fn push(&mut self, c: char) {
        if self.recorded || self.name.chars().count() >= MAX_NAME_LEN {
            return;
        }
        if c.is_ascii_alphanumeric() || (c == ' ' && !self.name.is_empty()) {
            self.name.push(c);
        }
    }

    pub fn pop(&mut self) {
        if !self.recorded {
            self.name.pop();
        }
    }

    /// Name to record: trimmed, or `anonymous` if blank.
    pub fn final_name(&self) -> String {
        let trimmed = self.name.trim();
        if trimmed.is_empty() { ANONYMOUS.to_string() } else { trimmed.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_cursor_stays_in_range() {
        let mut m = TitleMenu::new(Difficulty::Easy);
        m.up();
        assert_eq!(m.selected(), Difficulty::Easy);
        m.down();
        m.down();
        m.down();
        assert_eq!(m.selected(), Difficulty::Hard);
        m.jump(2);
        assert_eq!(m.selected(), Difficulty::Medium);
        m.jump(0);
        m.jump(9);
        assert_eq!(m.selected(), Difficulty::Medium);
    }

    #[test]
    fn name_entry_filters_and_caps() {
        let mut n = NameEntry::default();
        for c in " Long John Silver the Third!".chars() {
            n.push(c);
        }
        assert_eq!(n.name, "Long John Silver");
        n.pop();
        assert_eq!(n.final_name(), "Long John Silve");
    }

    #[test]
    fn blank_name_is_anonymous_and_recorded_name_is_frozen() {
        let mut n = NameEntry::default();
        assert_eq!(n.final_name(), ANONYMOUS);
        n.push('A');
        n.recorded = true;
        n.push('B');
        n.pop();
        assert_eq!(n.final_name(), "A");
    }
}
