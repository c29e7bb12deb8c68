//! A [`Surface`] backed by a grid of terminal cells.
//!
//! Drawing happens in logical pixels and is scaled onto the grid; `present`
//! pushes the whole grid to the terminal in one flush.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use super::{Rect, Surface};
use crate::assets::Sprite;
use crate::entities::{SCREEN_HEIGHT, SCREEN_WIDTH};

const FILL: char = ' ';

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols as usize * rows as usize],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        *self = Self::new(cols, rows);
    }

    pub fn dimensions(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn cell_w(&self) -> f32 {
        SCREEN_WIDTH / self.cols as f32
    }

    fn cell_h(&self) -> f32 {
        SCREEN_HEIGHT / self.rows as f32
    }

    /// Logical pixel → grid cell (may lie outside the grid).
    pub fn to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        ((x / self.cell_w()).floor() as i32, (y / self.cell_h()).floor() as i32)
    }

    /// Centre of a grid cell in logical pixels.
    pub fn to_logical(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.cell_w(),
            (row as f32 + 0.5) * self.cell_h(),
        )
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        self.cells.get_mut(row as usize * self.cols as usize + col as usize)
    }

    /// The characters of one row, for inspection.
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.cell(col, row).map(|c| c.ch))
            .collect()
    }

    /// Inclusive cell span touched by `rect`; always at least one cell.
    fn span(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let c0 = (rect.x / self.cell_w()).floor() as i32;
        let r0 = (rect.y / self.cell_h()).floor() as i32;
        let c1 = (((rect.x + rect.w) / self.cell_w()).ceil() as i32 - 1).max(c0);
        let r1 = (((rect.y + rect.h) / self.cell_h()).ceil() as i32 - 1).max(r0);
        (c0, r0, c1, r1)
    }

    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let mut fg = None;
            let mut bg = None;
            for col in 0..self.cols {
                let Some(cell) = self.cell(col, row) else { continue };
                if fg != Some(cell.fg) {
                    out.queue(style::SetForegroundColor(cell.fg))?;
                    fg = Some(cell.fg);
                }
                if bg != Some(cell.bg) {
                    out.queue(style::SetBackgroundColor(cell.bg))?;
                    bg = Some(cell.bg);
                }
                out.queue(Print(cell.ch))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()
    }
}

impl Surface for TerminalSurface {
    fn clear(&mut self, color: Color) {
        self.cells.fill(Cell {
            ch: ' ',
            fg: Color::Reset,
            bg: color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (c0, r0, c1, r1) = self.span(&rect);
        for row in r0..=r1 {
            for col in c0..=c1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ch = FILL;
                    cell.bg = color;
                }
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        let (c0, r0, c1, r1) = self.span(&rect);
        for row in r0..=r1 {
            for col in c0..=c1 {
                let ch = match (row == r0, row == r1, col == c0, col == c1) {
                    // Single-row boxes become brackets so the fill stays visible.
                    _ if r0 == r1 && col == c0 => '[',
                    _ if r0 == r1 && col == c1 => ']',
                    _ if r0 == r1 => continue,
                    (true, _, true, _) => '┌',
                    (true, _, _, true) => '┐',
                    (_, true, true, _) => '└',
                    (_, true, _, true) => '┘',
                    (true, _, _, _) | (_, true, _, _) => '─',
                    (_, _, true, _) | (_, _, _, true) => '│',
                    _ => continue,
                };
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ch = ch;
                    cell.fg = color;
                }
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let (c0, r0, c1, r1) = self.span(&Rect::new(cx - radius, cy - radius, radius * 2.0, radius * 2.0));
        let mut painted = false;
        for row in r0..=r1 {
            for col in c0..=c1 {
                let (x, y) = (
                    (col as f32 + 0.5) * self.cell_w(),
                    (row as f32 + 0.5) * self.cell_h(),
                );
                if (x - cx).hypot(y - cy) <= radius {
                    if let Some(cell) = self.cell_mut(col, row) {
                        cell.ch = FILL;
                        cell.bg = color;
                        painted = true;
                    }
                }
            }
        }
        // Circles smaller than a cell still show up.
        if !painted {
            let (col, row) = self.to_cell(cx, cy);
            if let Some(cell) = self.cell_mut(col, row) {
                cell.ch = FILL;
                cell.bg = color;
            }
        }
    }

    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        if points.len() < 3 {
            return;
        }
        let (min_x, max_x) = points.iter().fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.0), hi.max(p.0)));
        let (min_y, max_y) = points.iter().fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.1), hi.max(p.1)));
        let (c0, r0, c1, r1) = self.span(&Rect::new(min_x, min_y, max_x - min_x, max_y - min_y));
        for row in r0..=r1 {
            for col in c0..=c1 {
                let (x, y) = (
                    (col as f32 + 0.5) * self.cell_w(),
                    (row as f32 + 0.5) * self.cell_h(),
                );
                if point_in_polygon(x, y, points) {
                    if let Some(cell) = self.cell_mut(col, row) {
                        cell.ch = FILL;
                        cell.bg = color;
                    }
                }
            }
        }
    }

    fn blit(&mut self, sprite: &Sprite, x: f32, y: f32) {
        let rect = Rect::new(x, y, sprite.width, sprite.height);
        if sprite.is_placeholder() {
            self.fill_rect(rect, sprite.color);
            return;
        }
        let (c0, r0, c1, r1) = self.span(&rect);
        let (w, h) = ((c1 - c0 + 1) as f32, (r1 - r0 + 1) as f32);
        for row in r0..=r1 {
            for col in c0..=c1 {
                let u = (col - c0) as f32 / w;
                let v = (row - r0) as f32 / h;
                let Some(ch) = sprite.sample(u, v) else { continue };
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ch = ch;
                    cell.fg = sprite.color;
                }
            }
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        let (col, row) = self.to_cell(x, y);
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(col + i as i32, row) {
                cell.ch = ch;
                cell.fg = color;
            }
        }
    }

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.cell_w()
    }
}

/// Even-odd rule.
fn point_in_polygon(x: f32, y: f32, points: &[(f32, f32)]) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_contains_its_centroid_only() {
        let tri = [(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)];
        assert!(point_in_polygon(5.0, 3.0, &tri));
        assert!(!point_in_polygon(0.5, 9.0, &tri));
    }

    #[test]
    fn tiny_rect_still_covers_one_cell() {
        let surface = TerminalSurface::new(80, 24);
        let (c0, r0, c1, r1) = surface.span(&Rect::new(401.0, 300.0, 1.0, 1.0));
        assert_eq!((c0, r0), (40, 12));
        assert_eq!((c1, r1), (40, 12));
    }
}
