/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// world. No game logic is performed; world coordinates are projected onto
/// the cell grid using the configured cell size, with the HUD on row 0.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use space_invaders::barrier::Barrier;
use space_invaders::config::DisplayTuning;
use space_invaders::entities::{Ending, Projectile, Rect, World};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_LIVES: Color = Color::Red;
const C_HUD_ENEMIES: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BULLET_PLAYER: Color = Color::Yellow;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_BARRIER: Color = Color::Grey;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Rows taken by the HUD above the play area.
pub const HUD_ROWS: u16 = 1;

/// Cell range `[start, end)` on both axes covered by a world rectangle,
/// clipped to the grid below the HUD.
struct CellSpan {
    cols: std::ops::Range<u16>,
    rows: std::ops::Range<u16>,
}

fn cell_span(area: &Rect, tuning: &DisplayTuning, grid: (u16, u16)) -> CellSpan {
    let (cols, rows) = grid;
    let play_rows = rows.saturating_sub(HUD_ROWS);
    let clip = |v: f32, limit: u16| v.max(0.0).min(limit as f32) as u16;

    let col_start = clip((area.x / tuning.cell_width).floor(), cols);
    let col_end = clip((area.right() / tuning.cell_width).ceil(), cols);
    let row_start = clip((area.y / tuning.cell_height).floor(), play_rows);
    let row_end = clip((area.bottom() / tuning.cell_height).ceil(), play_rows);

    CellSpan {
        cols: col_start..col_end,
        rows: row_start + HUD_ROWS..row_end + HUD_ROWS,
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    let grid = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_hud(out, world, grid)?;

    for barrier in &world.barriers {
        draw_barrier(out, barrier, &world.config.display, grid)?;
    }
    fill(out, &world.player.bounds(), '█', C_PLAYER, &world.config.display, grid)?;
    for enemy in &world.enemies {
        fill(out, &enemy.bounds(), '▓', C_ENEMY, &world.config.display, grid)?;
    }
    for projectile in &world.player_projectiles {
        draw_projectile(out, projectile, '║', C_BULLET_PLAYER, &world.config.display, grid)?;
    }
    for projectile in &world.enemy_projectiles {
        draw_projectile(out, projectile, '↓', C_BULLET_ENEMY, &world.config.display, grid)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, grid.1.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Title screen. `last` is shown as a reminder of how the previous run went.
pub fn render_menu<W: Write>(out: &mut W, last: Option<Ending>) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let title = "★  SPACE  INVADERS  ★";
    centred(out, title, C_TITLE, cx, cy.saturating_sub(4))?;

    if let Some(ending) = last {
        let color = match ending {
            Ending::Defeat => Color::Red,
            Ending::Victory => Color::Yellow,
        };
        centred(out, ending.message(), color, cx, cy.saturating_sub(2))?;
    }

    centred(out, "ENTER / S : Start   Q : Quit", Color::White, cx, cy)?;
    centred(out, "← → / A D : Move   Z / SPACE : Fire", C_HINT, cx, cy + 2)?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

/// Boxed end-of-run message drawn over whatever is on screen.
pub fn render_dialog<W: Write>(out: &mut W, ending: Ending) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let message = ending.message();
    let inner = message.chars().count() + 4;
    let color = match ending {
        Ending::Defeat => Color::Red,
        Ending::Victory => Color::Yellow,
    };

    let lines = [
        format!("╔{}╗", "═".repeat(inner)),
        format!("║  {}  ║", message),
        format!("╚{}╝", "═".repeat(inner)),
    ];
    for (i, line) in lines.iter().enumerate() {
        centred(out, line, color, cx, cy.saturating_sub(1) + i as u16)?;
    }
    centred(out, "ENTER : Back to menu", C_HINT, cx, cy + 3)?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, world: &World, grid: (u16, u16)) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(world.player.readout()))?;

    let enemies = format!("Enemies: {}", world.enemies.len());
    let rx = grid.0.saturating_sub(enemies.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_ENEMIES))?;
    out.queue(Print(enemies))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn fill<W: Write>(
    out: &mut W,
    area: &Rect,
    glyph: char,
    color: Color,
    tuning: &DisplayTuning,
    grid: (u16, u16),
) -> std::io::Result<()> {
    let span = cell_span(area, tuning, grid);
    out.queue(style::SetForegroundColor(color))?;
    for row in span.rows {
        for col in span.cols.clone() {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

/// Projectiles are thinner than a cell; draw one glyph at their position.
fn draw_projectile<W: Write>(
    out: &mut W,
    projectile: &Projectile,
    glyph: char,
    color: Color,
    tuning: &DisplayTuning,
    grid: (u16, u16),
) -> std::io::Result<()> {
    let col = (projectile.x / tuning.cell_width) as u16;
    let row = (projectile.y / tuning.cell_height) as u16 + HUD_ROWS;
    if col >= grid.0 || row >= grid.1 {
        return Ok(());
    }
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// Shade each cell by how much of the mask under it is still intact.
fn draw_barrier<W: Write>(
    out: &mut W,
    barrier: &Barrier,
    tuning: &DisplayTuning,
    grid: (u16, u16),
) -> std::io::Result<()> {
    let span = cell_span(&barrier.bounds(), tuning, grid);
    out.queue(style::SetForegroundColor(C_BARRIER))?;
    for row in span.rows {
        for col in span.cols.clone() {
            let cell = Rect::new(
                col as f32 * tuning.cell_width,
                (row - HUD_ROWS) as f32 * tuning.cell_height,
                tuning.cell_width,
                tuning.cell_height,
            );
            let glyph = match barrier.coverage(&cell) {
                c if c > 0.75 => '█',
                c if c > 0.5 => '▓',
                c if c > 0.25 => '▒',
                c if c > 0.0 => '░',
                _ => continue,
            };
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

fn centred<W: Write>(
    out: &mut W,
    text: &str,
    color: Color,
    cx: u16,
    row: u16,
) -> std::io::Result<()> {
    let col = cx.saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}
