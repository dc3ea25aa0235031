/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The play surface (field width × height, in surface units) is scaled onto
/// whatever part of the terminal is left after the HUD and the prompt rows.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::difficulty::Difficulty;
use crate::domain::entity::WordKind;
use crate::sim::highscore::HighScores;
use crate::sim::lifecycle::Present;
use crate::sim::world::GameState;
use super::menu::{NameEntry, Screen, TitleMenu};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every cell, so the gaps between rows match.
    const BASE_BG: Color = Color::Rgb { r: 8, g: 14, b: 32 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Single-line banner: `text` centered inside a double-line box of
    /// `inner` columns. Occupies three rows starting at `y`.
    fn put_box(&mut self, x: usize, y: usize, inner: usize, text: &str, fg: Color) {
        let len = text.chars().count().min(inner);
        let pad_l = (inner - len) / 2;
        let pad_r = inner - len - pad_l;
        let rule = "═".repeat(inner);
        let clipped: String = text.chars().take(len).collect();
        self.put_str(x, y, &format!("╔{rule}╗"), fg, Color::Reset);
        self.put_str(x, y + 1, &format!("║{}{clipped}{}║", " ".repeat(pad_l), " ".repeat(pad_r)), fg, Color::Reset);
        self.put_str(x, y + 2, &format!("╚{rule}╝"), fg, Color::Reset);
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }

    /// Centered column for a string of `len` chars.
    fn center_x(&self, len: usize) -> usize {
        self.width.saturating_sub(len) / 2
    }
}

// ── Layout ──

const HUD_ROW: usize = 0;
const SUB_HUD_ROW: usize = 1;
const FIELD_ROW: usize = 3;
/// Rows below the field: prompt, message, help.
const FOOTER_ROWS: usize = 4;

const WHITE: Color = Color::White;
const DIM: Color = Color::DarkGrey;
const RED: Color = Color::Rgb { r: 255, g: 80, b: 80 };
const GREEN: Color = Color::Rgb { r: 80, g: 230, b: 110 };
const GOLD: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const HUD_BG: Color = Color::Rgb { r: 16, g: 28, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_screen: Option<Screen>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render_title(&mut self, menu: &TitleMenu, scores: &HighScores) -> io::Result<()> {
        self.begin(Screen::Title)?;
        self.compose_title(menu, scores);
        self.finish()
    }

    pub fn render_results(&mut self, state: &GameState, entry: &NameEntry, scores: &HighScores) -> io::Result<()> {
        self.begin(Screen::Results)?;
        self.compose_results(state, entry, scores);
        self.finish()
    }

    // ── Frame bracket ──

    fn begin(&mut self, screen: Screen) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Screen change → clear for clean transition
        if self.last_screen != Some(screen) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_screen = Some(screen);
        }

        self.front.clear();
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = WHITE;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetForegroundColor(WHITE),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: game ──

    fn compose_game(&mut self, s: &GameState) {
        let buf_w = self.front.width;

        // HUD: player on the left, enemy on the right
        self.front.fill_row(HUD_ROW, HUD_BG);
        let player = format!(
            " Score: {:<6}  Health: {:<5}  Shield: {}",
            s.score, s.player.health, s.player.shield,
        );
        self.front.put_str(0, HUD_ROW, &player, WHITE, HUD_BG);
        let enemy = format!("Enemy  Health: {:<5}  Shield: {} ", s.enemy.health, s.enemy.shield);
        let enemy_x = buf_w.saturating_sub(enemy.chars().count());
        self.front.put_str(enemy_x, HUD_ROW, &enemy, RED, HUD_BG);

        let sub = format!(
            " {}  ·  Ships sunk: {}  ·  Words live: {}",
            s.difficulty, s.ships_destroyed, s.words.len(),
        );
        self.front.put_str(0, SUB_HUD_ROW, &sub, DIM, Color::Reset);

        // Field
        let (field_h, footer) = self.field_rows();
        let typed = s.typed.to_lowercase();
        for word in &s.words {
            let col = scale(word.x, s.field.width, buf_w);
            let row = FIELD_ROW + scale(word.y, s.field.height, field_h).min(field_h.saturating_sub(1));
            let len = word.text.chars().count();
            let col = col.min(buf_w.saturating_sub(len));

            let color = match word.kind {
                WordKind::Cannonball => WHITE,
                WordKind::Repair => GREEN,
            };
            self.front.put_str(col, row, &word.text, color, Color::Reset);

            // Highlight the part already typed
            if !typed.is_empty() && word.text.to_lowercase().starts_with(&typed) {
                let prefix: String = word.text.chars().take(typed.chars().count()).collect();
                self.front.put_str(col, row, &prefix, GOLD, Color::Reset);
            }
        }

        // Prompt
        let prompt = format!(" › {}_", s.typed);
        self.front.put_str(0, footer, &prompt, GOLD, Color::Reset);

        // Message bar
        if let Some(msg) = &s.message {
            let row = footer + 1;
            self.front.fill_row(row, MSG_BG);
            self.front.put_str(0, row, &format!(" {} ", msg), Color::Black, MSG_BG);
        }

        // Help
        let help = " Type the words · Enter: fire & clear · Backspace: delete · →: pause · Esc: quit";
        self.front.put_str(0, footer + 3, help, DIM, Color::Reset);
    }

    /// Field height in rows, and the first row below it.
    fn field_rows(&self) -> (usize, usize) {
        let field_h = self.front.height.saturating_sub(FIELD_ROW + FOOTER_ROWS).max(1);
        (field_h, FIELD_ROW + field_h)
    }

    fn compose_pause_overlay(&mut self) {
        let (field_h, _) = self.field_rows();
        let x = self.front.center_x(20);
        let y = FIELD_ROW + field_h.saturating_sub(3) / 2;
        self.front.put_box(x, y, 18, "PAUSED", GOLD);
    }

    fn compose_game_over(&mut self, s: &GameState) {
        let (field_h, _) = self.field_rows();
        let x = self.front.center_x(30);
        let y = FIELD_ROW + field_h.saturating_sub(6) / 2;
        self.front.put_box(x, y, 28, "G A M E   O V E R", RED);
        let score = format!("Final score: {}", s.score);
        self.front.put_str(self.front.center_x(score.len()), y + 4, &score, WHITE, Color::Reset);
        let hint = "ENTER: continue";
        self.front.put_str(self.front.center_x(hint.len()), y + 5, hint, DIM, Color::Reset);
    }

    // ── Compose: title ──

    fn compose_title(&mut self, menu: &TitleMenu, scores: &HighScores) {
        let x = self.front.center_x(40);
        self.front.put_box(x, 1, 38, "P I R A T E   T Y P E R", GOLD);
        self.front.put_str(x, 5, "Type the words before they hit your hull.", WHITE, Color::Reset);
        self.front.put_str(x, 6, "Green words repair your ship.", GREEN, Color::Reset);

        let cursor_bg = Color::Rgb { r: 30, g: 60, b: 30 };
        for (i, d) in Difficulty::ALL.iter().enumerate() {
            let st = d.stats();
            let line = format!(
                " {}. {:<7} health {:<4} shield {}  ",
                i + 1, d.label(), st.health, st.shield,
            );
            let row = 8 + i;
            if i == menu.cursor {
                self.front.put_str(x, row, "▸", GREEN, Color::Reset);
                self.front.put_str(x + 2, row, &line, GREEN, cursor_bg);
            } else {
                self.front.put_str(x + 2, row, &line, WHITE, Color::Reset);
            }
        }

        let top = 12;
        self.front.put_str(x, top, "── High Scores ──", GOLD, Color::Reset);
        if scores.entries.is_empty() {
            self.front.put_str(x, top + 1, "  (none yet)", DIM, Color::Reset);
        }
        for (i, e) in scores.entries.iter().enumerate() {
            let line = format!("{:>2}. {:<16} {:>6}  {}", i + 1, e.name, e.score, e.difficulty);
            self.front.put_str(x, top + 1 + i, &line, WHITE, Color::Reset);
        }

        let footer = self.front.height.saturating_sub(2);
        self.front.put_str(x, footer, "↑↓/1-3: Difficulty   ENTER: Set sail   ESC: Quit", DIM, Color::Reset);
    }

    // ── Compose: results ──

    fn compose_results(&mut self, s: &GameState, entry: &NameEntry, scores: &HighScores) {
        let x = self.front.center_x(40);
        self.front.put_box(x, 1, 38, "YOUR SHIP HAS SUNK", RED);

        if let Some(msg) = &s.message {
            self.front.put_str(x, 5, msg, WHITE, Color::Reset);
        }
        let score = format!("◈ Final score: {}   ◈ Ships sunk: {}   ◈ {}", s.score, s.ships_destroyed, s.difficulty);
        self.front.put_str(x, 6, &score, WHITE, Color::Reset);

        if entry.recorded {
            let line = match entry.rank {
                Some(rank) => format!("Recorded {} at #{}", entry.final_name(), rank),
                None => "Score didn't make the board this time.".to_string(),
            };
            self.front.put_str(x, 8, &line, GREEN, Color::Reset);
            self.front.put_str(x, 9, "▸ ENTER: Back to title   ESC: Quit", DIM, Color::Reset);
        } else {
            self.front.put_str(x, 8, &format!("Name: {}_", entry.name), GOLD, Color::Reset);
            self.front.put_str(x, 9, "▸ ENTER: Record score   ESC: Quit", DIM, Color::Reset);
        }

        let top = 11;
        self.front.put_str(x, top, "── High Scores ──", GOLD, Color::Reset);
        for (i, e) in scores.entries.iter().enumerate() {
            let mine = entry.rank == Some(i + 1);
            let line = format!("{:>2}. {:<16} {:>6}  {}", i + 1, e.name, e.score, e.difficulty);
            self.front.put_str(x, top + 1 + i, &line, if mine { GREEN } else { WHITE }, Color::Reset);
        }
    }
}

impl Present for Renderer {
    fn present(&mut self, state: &GameState) -> io::Result<()> {
        self.begin(Screen::Playing)?;
        self.compose_game(state);
        if state.is_paused() {
            self.compose_pause_overlay();
        }
        if state.is_over() {
            self.compose_game_over(state);
        }
        self.finish()
    }
}

/// Map a surface coordinate in `0..extent` onto `0..cells`.
fn scale(v: u32, extent: u32, cells: usize) -> usize {
    if extent == 0 { return 0; }
    (v as u64 * cells as u64 / extent as u64) as usize
}
