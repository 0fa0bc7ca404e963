/// Terminal front end: the cell canvas and the per-frame flush.
///
/// The simulation draws into a `Canvas`, a grid of terminal cells onto which
/// world pixels are mapped, and reports score and gauges to a `Hud`.
/// `render` then flushes both plus any overlay to the terminal in one pass.

use std::collections::BTreeMap;
use std::f32::consts::FRAC_PI_2;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::clock::Millis;
use crate::compute::{Game, GameStatus};
use crate::config::{Difficulty, DisplayConfig};
use crate::entities::{Bounds, MissileOwner, Rect};
use crate::meteorite::MeteoriteKind;
use crate::sinks::{HudSink, RenderSurface, Sprite};
use crate::upgrade::{UpgradeStat, UpgradeStatus};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_SHIELD: Color = Color::Cyan;
const C_HUD_UPGRADE: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_SHIELD: Color = Color::Cyan;
const C_MISSILE_PLAYER: Color = Color::Cyan;
const C_MISSILE_ENEMY: Color = Color::Magenta;
const C_METEORITE: Color = Color::DarkYellow;
const C_RAIDER: Color = Color::Red;
const C_BOSS: Color = Color::DarkMagenta;
const C_EXPLOSION: Color = Color::Yellow;
const C_WARNING: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

/// Rows reserved around the play field: HUD, top bar, bottom bar, hint.
const CHROME_ROWS: u16 = 4;

/// Boulder spin frames, a quarter turn each.
const SPIN_GLYPHS: [char; 4] = ['◐', '◓', '◑', '◒'];

// ── Canvas ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

const BLANK: Cell = Cell { glyph: ' ', color: Color::Reset };

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Transform {
    dx: f32,
    dy: f32,
    angle: f32,
}

/// Cell buffer for the play field.
pub struct Canvas {
    cols: u16,
    rows: u16,
    cell_width: f32,
    cell_height: f32,
    cells: Vec<Cell>,
    transform: Transform,
    saved: Vec<Transform>,
}

impl Canvas {
    /// Canvas for a terminal of `term_cols × term_rows`.
    pub fn new(term_cols: u16, term_rows: u16, config: &DisplayConfig) -> Self {
        let mut canvas = Canvas {
            cols: 0,
            rows: 0,
            cell_width: config.cell_width.max(1.0),
            cell_height: config.cell_height.max(1.0),
            cells: Vec::new(),
            transform: Transform::default(),
            saved: Vec::new(),
        };
        canvas.resize(term_cols, term_rows);
        canvas
    }

    pub fn resize(&mut self, term_cols: u16, term_rows: u16) {
        self.cols = term_cols;
        self.rows = term_rows.saturating_sub(CHROME_ROWS);
        self.cells = vec![BLANK; self.cols as usize * self.rows as usize];
    }

    /// The play field in world pixels.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(
            self.cols as f32 * self.cell_width,
            self.rows as f32 * self.cell_height,
        )
    }

    /// Map a terminal cell back to the world pixel at its centre.  `None`
    /// outside the play field.
    pub fn world_point(&self, term_col: u16, term_row: u16) -> Option<(f32, f32)> {
        let row = term_row.checked_sub(2)?;
        if term_col >= self.cols || row >= self.rows {
            return None;
        }
        Some((
            (term_col as f32 + 0.5) * self.cell_width,
            (row as f32 + 0.5) * self.cell_height,
        ))
    }

    fn index(&self, col: u16, row: u16) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    /// Cell span `[start, end)` covered by world interval `[from, from + len)`.
    fn span(from: f32, len: f32, cell: f32, limit: u16) -> (u16, u16) {
        let start = (from / cell).floor().max(0.0);
        let end = ((from + len) / cell).ceil().min(limit as f32);
        if end <= start {
            return (0, 0);
        }
        (start as u16, end as u16)
    }

    fn paint(&mut self, sprite: Sprite, area: Rect) {
        if area.width <= 0.0 || area.height <= 0.0 {
            return;
        }
        let (c0, c1) = Self::span(area.x, area.width, self.cell_width, self.cols);
        let (r0, r1) = Self::span(area.y, area.height, self.cell_height, self.rows);
        let (w, h) = (c1 - c0, r1 - r0);
        for row in r0..r1 {
            for col in c0..c1 {
                if let Some(cell) = sprite_cell(sprite, col - c0, row - r0, w, h, self.transform.angle) {
                    let i = self.index(col, row);
                    self.cells[i] = cell;
                }
            }
        }
    }
}

/// Glyph for one cell of a sprite `w × h` cells large.  `None` leaves the
/// cell underneath untouched.
fn sprite_cell(sprite: Sprite, col: u16, row: u16, w: u16, h: u16, angle: f32) -> Option<Cell> {
    let last_col = col + 1 == w;
    let edge = col == 0 || row == 0 || last_col || row + 1 == h;
    let (glyph, color) = match sprite {
        Sprite::Ship if last_col => ('▶', C_PLAYER),
        Sprite::Ship => ('█', C_PLAYER),
        Sprite::Shield if edge => ('░', C_SHIELD),
        Sprite::Shield => return None,
        Sprite::Missile(MissileOwner::Player) if last_col => ('>', C_MISSILE_PLAYER),
        Sprite::Missile(MissileOwner::Player) => ('─', C_MISSILE_PLAYER),
        Sprite::Missile(MissileOwner::Enemy) if col == 0 => ('<', C_MISSILE_ENEMY),
        Sprite::Missile(MissileOwner::Enemy) => ('─', C_MISSILE_ENEMY),
        Sprite::Meteorite(MeteoriteKind::Streak) => ('▒', C_METEORITE),
        Sprite::Meteorite(MeteoriteKind::Boulder) => {
            let quarter = (angle / FRAC_PI_2).floor().rem_euclid(4.0) as usize;
            (SPIN_GLYPHS[quarter], C_METEORITE)
        }
        Sprite::Raider if col == 0 => ('◀', C_RAIDER),
        Sprite::Raider => ('▓', C_RAIDER),
        Sprite::Boss if col == 0 => ('◀', C_BOSS),
        Sprite::Boss if edge => ('▓', C_BOSS),
        Sprite::Boss => ('█', C_BOSS),
        Sprite::Explosion => ('✶', C_EXPLOSION),
    };
    Some(Cell { glyph, color })
}

impl RenderSurface for Canvas {
    fn clear(&mut self, area: Rect) {
        let (c0, c1) = Self::span(area.x, area.width, self.cell_width, self.cols);
        let (r0, r1) = Self::span(area.y, area.height, self.cell_height, self.rows);
        for row in r0..r1 {
            for col in c0..c1 {
                let i = self.index(col, row);
                self.cells[i] = BLANK;
            }
        }
    }

    fn draw_sprite(&mut self, sprite: Sprite, x: f32, y: f32, width: f32, height: f32) {
        let area = Rect::new(x + self.transform.dx, y + self.transform.dy, width, height);
        self.paint(sprite, area);
    }

    fn save(&mut self) {
        self.saved.push(self.transform);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.transform.dx += dx;
        self.transform.dy += dy;
    }

    /// Cells cannot rotate; the angle only picks spin glyphs.
    fn rotate(&mut self, radians: f32) {
        self.transform.angle += radians;
    }

    fn restore(&mut self) {
        self.transform = self.saved.pop().unwrap_or_default();
    }
}

// ── HUD state ────────────────────────────────────────────────────────────────

/// Latest values pushed by the game for the HUD row.
#[derive(Debug, Default)]
pub struct Hud {
    score: u32,
    shield_energy: u32,
    upgrades: BTreeMap<UpgradeStat, UpgradeStatus>,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HudSink for Hud {
    fn score(&mut self, score: u32) {
        self.score = score;
    }

    fn shield_energy(&mut self, energy: u32) {
        self.shield_energy = energy;
    }

    fn upgrade(&mut self, stat: UpgradeStat, status: &UpgradeStatus) {
        self.upgrades.insert(stat, status.clone());
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    canvas: &Canvas,
    hud: &Hud,
    game: &Game,
    now: Millis,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_hud(out, canvas, hud, game)?;
    draw_border(out, canvas)?;
    draw_field(out, canvas)?;
    draw_controls_hint(out, canvas)?;

    match game.status {
        GameStatus::Start => draw_start_menu(out, canvas, game.difficulty)?,
        GameStatus::Paused => draw_banner(out, canvas, &[("PAUSED", Color::White), ("P / ESC or ENTER to resume", C_HINT)])?,
        GameStatus::GameOver => draw_game_over(out, canvas, hud.score)?,
        GameStatus::Playing => {}
    }
    if game.status == GameStatus::Playing && game.warning_active(now) {
        let text = "⚠  WARNING: BOSS APPROACHING  ⚠";
        centered(out, canvas.cols, 3, text, C_WARNING)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, canvas.rows + CHROME_ROWS - 1))?;
    out.flush()?;
    Ok(())
}

fn centered<W: Write>(out: &mut W, width: u16, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, canvas: &Canvas, hud: &Hud, game: &Game) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>5}", hud.score)))?;

    out.queue(style::SetForegroundColor(C_HUD_SHIELD))?;
    out.queue(Print(format!("  Shield Energy:{:>4}", hud.shield_energy)))?;

    let level = format!("[ {} ]", game.difficulty.label());
    centered(out, canvas.cols, 0, &level, difficulty_color(game.difficulty))?;

    // Upgrade panel, right-aligned
    let panel: Vec<String> = hud
        .upgrades
        .iter()
        .enumerate()
        .map(|(i, (stat, status))| {
            format!(
                "[{}] {} {} {}",
                i + 1,
                stat.label(),
                progress_bar(status.progress),
                status.cost_label
            )
        })
        .collect();
    let right = panel.join("  ");
    let rx = canvas.cols.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_UPGRADE))?;
    out.queue(Print(right))?;
    Ok(())
}

fn progress_bar(progress: f32) -> String {
    const SLOTS: usize = 5;
    let filled = (progress.clamp(0.0, 1.0) * SLOTS as f32).round() as usize;
    format!("{}{}", "■".repeat(filled), "□".repeat(SLOTS - filled))
}

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    let bar = "─".repeat(canvas.cols as usize);
    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(&bar))?;
    out.queue(cursor::MoveTo(0, canvas.rows + 2))?;
    out.queue(Print(&bar))?;
    Ok(())
}

// ── Play field ────────────────────────────────────────────────────────────────

/// Print the cell buffer row by row, switching colour only between runs.
fn draw_field<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    for row in 0..canvas.rows {
        out.queue(cursor::MoveTo(0, row + 2))?;
        let start = canvas.index(0, row);
        let cells = &canvas.cells[start..start + canvas.cols as usize];

        let mut run = String::new();
        let mut run_color = Color::Reset;
        for cell in cells {
            if cell.color != run_color && !run.is_empty() {
                out.queue(style::SetForegroundColor(run_color))?;
                out.queue(Print(&run))?;
                run.clear();
            }
            run_color = cell.color;
            run.push(cell.glyph);
        }
        if !run.is_empty() {
            out.queue(style::SetForegroundColor(run_color))?;
            out.queue(Print(&run))?;
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, canvas.rows + CHROME_ROWS - 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "←↑→↓ / WASD : Move   SPACE : Fire   E : Shield   1 2 : Upgrade   P : Pause   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(out: &mut W, canvas: &Canvas, lines: &[(&str, Color)]) -> std::io::Result<()> {
    let start_row = 2 + (canvas.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        centered(out, canvas.cols, start_row + i as u16, text, *color)?;
    }
    Ok(())
}

fn draw_start_menu<W: Write>(out: &mut W, canvas: &Canvas, selected: Difficulty) -> std::io::Result<()> {
    let options = [
        ("1", Difficulty::Easy, "Sparse meteor showers"),
        ("2", Difficulty::Medium, "Balanced challenge"),
        ("3", Difficulty::Hard, "Dense and relentless!"),
    ];
    let choices: Vec<(String, Color)> = options
        .iter()
        .map(|(key, difficulty, desc)| {
            let marker = if *difficulty == selected { '▶' } else { ' ' };
            let color = if *difficulty == selected { difficulty_color(*difficulty) } else { C_HINT };
            (format!("{} [{}] {:<6} — {}", marker, key, difficulty.label(), desc), color)
        })
        .collect();

    let mut lines: Vec<(&str, Color)> = vec![
        ("★  SPACE  SHIP  ★", Color::Cyan),
        ("", C_HINT),
        ("Select difficulty:", Color::White),
    ];
    lines.extend(choices.iter().map(|(text, color)| (text.as_str(), *color)));
    lines.push(("", C_HINT));
    lines.push(("Shoot meteorites and raiders, survive the boss.", C_HINT));
    lines.push(("Kills earn score; spend it on upgrades with 1 and 2.", C_HINT));
    lines.push(("", C_HINT));
    lines.push(("ENTER : Start", Color::White));
    draw_banner(out, canvas, &lines)
}

fn draw_game_over<W: Write>(out: &mut W, canvas: &Canvas, score: u32) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", score);
    draw_banner(
        out,
        canvas,
        &[
            ("╔════════════════════╗", Color::Red),
            ("║    GAME  OVER      ║", Color::Red),
            ("╚════════════════════╝", Color::Red),
            (score_line.as_str(), Color::Yellow),
            ("ENTER - Play Again  Q - Quit", Color::White),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        // 80 cols × 24 rows terminal → 80 × 20 cell field → 800 × 400 world px
        Canvas::new(80, 24, &DisplayConfig::default())
    }

    fn glyph_at(canvas: &Canvas, col: u16, row: u16) -> char {
        canvas.cells[canvas.index(col, row)].glyph
    }

    #[test]
    fn bounds_follow_terminal_size() {
        let c = canvas();
        assert_eq!(c.bounds(), Bounds::new(800.0, 400.0));
    }

    #[test]
    fn ship_covers_expected_cells() {
        let mut c = canvas();
        c.draw_sprite(Sprite::Ship, 0.0, 0.0, 90.0, 60.0);
        assert_eq!(glyph_at(&c, 0, 0), '█');
        assert_eq!(glyph_at(&c, 8, 2), '▶');
        assert_eq!(glyph_at(&c, 9, 0), ' ');
        assert_eq!(glyph_at(&c, 0, 3), ' ');
    }

    #[test]
    fn shield_only_paints_its_outline() {
        let mut c = canvas();
        c.draw_sprite(Sprite::Ship, 30.0, 40.0, 20.0, 20.0);
        c.draw_sprite(Sprite::Shield, 0.0, 0.0, 100.0, 100.0);
        assert_eq!(glyph_at(&c, 0, 0), '░');
        assert_eq!(glyph_at(&c, 4, 2), '▶');
    }

    #[test]
    fn translate_is_undone_by_restore() {
        let mut c = canvas();
        c.save();
        c.translate(100.0, 100.0);
        c.draw_sprite(Sprite::Explosion, -10.0, -10.0, 20.0, 20.0);
        c.restore();
        c.draw_sprite(Sprite::Explosion, 0.0, 0.0, 10.0, 20.0);
        assert_eq!(glyph_at(&c, 9, 4), '✶');
        assert_eq!(glyph_at(&c, 0, 0), '✶');
        assert_eq!(c.transform, Transform::default());
    }

    #[test]
    fn clear_blanks_the_field() {
        let mut c = canvas();
        c.draw_sprite(Sprite::Raider, 0.0, 0.0, 90.0, 60.0);
        let all = c.bounds().rect();
        c.clear(all);
        assert!(c.cells.iter().all(|cell| *cell == BLANK));
    }

    #[test]
    fn offscreen_sprites_are_clipped() {
        let mut c = canvas();
        c.draw_sprite(Sprite::Boss, 1200.0, 0.0, 300.0, 270.0);
        c.draw_sprite(Sprite::Raider, -200.0, -200.0, 90.0, 60.0);
        assert!(c.cells.iter().all(|cell| *cell == BLANK));
    }

    #[test]
    fn progress_bar_fills_by_fraction() {
        assert_eq!(progress_bar(0.0), "□□□□□");
        assert_eq!(progress_bar(0.6), "■■■□□");
        assert_eq!(progress_bar(1.0), "■■■■■");
    }

    #[test]
    fn world_point_maps_cell_centres() {
        let c = canvas();
        assert_eq!(c.world_point(0, 2), Some((5.0, 10.0)));
        assert_eq!(c.world_point(0, 1), None);
        assert_eq!(c.world_point(80, 5), None);
    }

    #[test]
    fn hud_keeps_latest_values() {
        let mut hud = Hud::new();
        hud.score(42);
        hud.score(47);
        hud.shield_energy(77);
        hud.upgrade(
            UpgradeStat::FireRate,
            &UpgradeStatus { level: 4, cost_label: "Cost: 20".into(), progress: 0.1 },
        );
        assert_eq!(hud.score, 47);
        assert_eq!(hud.shield_energy, 77);
        assert_eq!(hud.upgrades[&UpgradeStat::FireRate].level, 4);
    }
}
