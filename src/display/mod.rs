//! Rendering layer.
//!
//! Each function receives a mutable [`Surface`] and an immutable view of the
//! game state. No game logic is performed; this module only translates
//! state into draw calls.

pub mod terminal;

pub use terminal::TerminalSurface;

use crossterm::style::Color;

use crate::assets::{Assets, Sprite};
use crate::compute::EXPLOSION_LIFETIME;
use crate::entities::{
    Boss, Difficulty, Explosion, MatchState, Phase, BULLET_HEIGHT, BULLET_WIDTH, MAX_HP, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
use crate::menu::{item_rect, Menu, MenuItem, Screen};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::Black;
const C_MENU_BG: Color = Color::Rgb { r: 5, g: 5, b: 30 };
const C_SUBMENU_BG: Color = Color::Rgb { r: 10, g: 10, b: 40 };
const C_TEXT: Color = Color::White;
const C_SELECTED: Color = Color::Rgb { r: 255, g: 255, b: 0 };
const C_GOLD: Color = Color::Rgb { r: 255, g: 215, b: 0 };
const C_BULLET: Color = Color::Rgb { r: 255, g: 255, b: 0 };
const C_HEART: Color = Color::Rgb { r: 220, g: 20, b: 60 };
const C_BAR_BG: Color = Color::Rgb { r: 80, g: 80, b: 80 };
const C_BOSS_BAR_BG: Color = Color::Rgb { r: 100, g: 100, b: 100 };
const C_BOSS_BAR: Color = Color::Rgb { r: 200, g: 0, b: 0 };
const C_BUTTON: Color = Color::Rgb { r: 70, g: 130, b: 180 };
const C_BUTTON_HOVER: Color = Color::Rgb { r: 100, g: 149, b: 237 };

const INSTRUCTIONS: [&str; 7] = [
    "Move: Left / Right arrows (or A / D)",
    "Shoot: SPACE (limited by difficulty)",
    "HP: If HP reaches 0 you lose 1 life (HP resets to 100)",
    "Lives: Lose all lives and it is Game Over",
    "Enemies that reach low screen also cost a life",
    "Boss appears every 20 points; beat it for +10 points",
    "Use arrow keys + Enter in menu to change difficulty",
];

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    pub fn centre(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

// ── Drawing surface ───────────────────────────────────────────────────────────

/// What the renderers need from the screen. Coordinates are logical pixels
/// on the 800×600 play field.
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color);
    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color);
    fn blit(&mut self, sprite: &Sprite, x: f32, y: f32);
    fn text(&mut self, x: f32, y: f32, text: &str, color: Color);
    /// Drawn width of `text`, used for centring.
    fn text_width(&self, text: &str) -> f32;
}

fn centred_text<S: Surface>(s: &mut S, y: f32, text: &str, color: Color) {
    let x = (SCREEN_WIDTH - s.text_width(text)) / 2.0;
    s.text(x.max(0.0), y, text, color);
}

// ── Buttons ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Button {
    pub rect: Rect,
    pub label: &'static str,
}

impl Button {
    /// The game-over screen's way back to the menu.
    pub fn restart() -> Self {
        Self {
            rect: Rect::new((SCREEN_WIDTH - 200.0) / 2.0, SCREEN_HEIGHT / 2.0 + 50.0, 200.0, 50.0),
            label: "Restart",
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.rect.contains(x, y)
    }

    /// Draw highlighted when the mouse hovers over it.
    pub fn draw<S: Surface>(&self, s: &mut S, mouse: (f32, f32)) {
        let color = if self.contains(mouse.0, mouse.1) {
            C_BUTTON_HOVER
        } else {
            C_BUTTON
        };
        s.fill_rect(self.rect, color);
        let (_, cy) = self.rect.centre();
        let x = self.rect.x + (self.rect.w - s.text_width(self.label)) / 2.0;
        s.text(x, cy, self.label, C_TEXT);
    }
}

// ── Menu screens ──────────────────────────────────────────────────────────────

pub fn render_menu<S: Surface>(s: &mut S, menu: &Menu, state: &MatchState, high_score: u32) {
    match menu.screen() {
        Screen::Main => draw_main_menu(s, menu, state, high_score),
        Screen::DifficultySelect => draw_difficulty_select(s, menu),
        Screen::Instructions => draw_instructions(s),
    }
}

fn draw_main_menu<S: Surface>(s: &mut S, menu: &Menu, state: &MatchState, high_score: u32) {
    s.clear(C_MENU_BG);
    centred_text(s, 60.0, "SPACE INVADERS", C_TEXT);

    for (i, item) in MenuItem::ALL.iter().enumerate() {
        let color = if i == menu.selected { C_SELECTED } else { C_TEXT };
        let rect = item_rect(i);
        s.text(rect.x, rect.y, item.label(), color);
    }

    let difficulty = format!("Difficulty: {}", state.difficulty.name());
    s.text(300.0, 420.0, &difficulty, C_TEXT);
    s.text(10.0, SCREEN_HEIGHT - 40.0, &format!("High Score: {high_score}"), C_GOLD);
}

fn draw_difficulty_select<S: Surface>(s: &mut S, menu: &Menu) {
    s.clear(C_SUBMENU_BG);
    centred_text(s, 80.0, "Select Difficulty", C_TEXT);
    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        let color = if i == menu.difficulty_selected {
            C_SELECTED
        } else {
            C_TEXT
        };
        s.text(SCREEN_WIDTH / 2.0 - 60.0, 200.0 + i as f32 * 50.0, difficulty.name(), color);
    }
    centred_text(s, 420.0, "Enter=select, Esc=back", C_TEXT);
}

fn draw_instructions<S: Surface>(s: &mut S) {
    s.clear(C_BACKGROUND);
    centred_text(s, 40.0, "INSTRUCTIONS", C_TEXT);
    for (i, line) in INSTRUCTIONS.iter().enumerate() {
        s.text(60.0, 160.0 + i as f32 * 36.0, line, C_TEXT);
    }
    centred_text(s, 520.0, "Press any key or click to return", C_TEXT);
}

// ── Match ─────────────────────────────────────────────────────────────────────

/// Render one frame of an active match.
pub fn render_match<S: Surface>(s: &mut S, state: &MatchState, assets: &Assets) {
    s.clear(C_BACKGROUND);

    for bullet in &state.bullets {
        s.fill_rect(Rect::new(bullet.x, bullet.y, BULLET_WIDTH, BULLET_HEIGHT), C_BULLET);
    }

    match (&state.phase, &state.boss) {
        (Phase::Boss, Some(boss)) => draw_boss(s, boss, assets),
        _ => {
            for enemy in &state.enemies {
                s.blit(assets.alien(enemy.sprite), enemy.x, enemy.y);
            }
        }
    }

    s.blit(&assets.player, state.player.x, state.player.y);
    draw_hud(s, state);

    for explosion in &state.explosions {
        draw_explosion(s, explosion);
    }
}

fn draw_boss<S: Surface>(s: &mut S, boss: &Boss, assets: &Assets) {
    s.blit(&assets.boss(boss.sprite), boss.x, boss.y);

    let bar = Rect::new(SCREEN_WIDTH / 2.0 - 100.0, boss.y - 20.0, 200.0, 12.0);
    let pct = boss.hp as f32 / boss.max_hp.max(1) as f32;
    s.fill_rect(bar, C_BOSS_BAR_BG);
    if boss.hp > 0 {
        s.fill_rect(Rect { w: bar.w * pct, ..bar }, C_BOSS_BAR);
    }
    s.stroke_rect(bar, C_TEXT);
}

fn draw_hud<S: Surface>(s: &mut S, state: &MatchState) {
    s.text(10.0, 10.0, &format!("Score: {}", state.score), C_TEXT);
    draw_health_bar(s, Rect::new(160.0, 10.0, 220.0, 20.0), state.player.hp);
    draw_lives(s, 10.0, 50.0, state.player.lives);
}

/// Green above 70, yellow above 30, red otherwise.
pub fn health_color(hp: u32) -> Color {
    if hp > 70 {
        Color::Rgb { r: 0, g: 200, b: 0 }
    } else if hp > 30 {
        Color::Rgb { r: 240, g: 200, b: 0 }
    } else {
        Color::Rgb { r: 200, g: 0, b: 0 }
    }
}

fn draw_health_bar<S: Surface>(s: &mut S, bar: Rect, hp: u32) {
    let pct = hp.min(MAX_HP) as f32 / MAX_HP as f32;
    s.fill_rect(bar, C_BAR_BG);
    if hp > 0 {
        s.fill_rect(Rect { w: bar.w * pct, ..bar }, health_color(hp));
    }
    s.stroke_rect(bar, C_TEXT);
    s.text(bar.x + bar.w + 8.0, bar.y, &format!("HP: {hp}"), C_TEXT);
}

fn draw_lives<S: Surface>(s: &mut S, x: f32, y: f32, count: u32) {
    // Two circles over a triangle.
    for i in 0..count {
        let hx = x + i as f32 * 34.0;
        s.fill_circle(hx + 8.0, y + 8.0, 7.0, C_HEART);
        s.fill_circle(hx + 16.0, y + 8.0, 7.0, C_HEART);
        s.fill_polygon(&[(hx, y + 12.0), (hx + 24.0, y + 12.0), (hx + 12.0, y + 24.0)], C_HEART);
    }
    s.text(x + count as f32 * 34.0 + 8.0, y, &format!(" x {count}"), C_TEXT);
}

fn draw_explosion<S: Surface>(s: &mut S, explosion: &Explosion) {
    const RINGS: u32 = 6;
    const MAX_RADIUS: f32 = 40.0;
    let t = explosion.age.min(EXPLOSION_LIFETIME);
    // Outer rings first so the hot core stays on top.
    for k in (0..RINGS).rev() {
        let radius = (t as f32 / 6.0) * MAX_RADIUS * (1.0 + k as f32 * 0.12);
        let alpha = 220_i32 - t as i32 * 30 - k as i32 * 20;
        if radius <= 0.0 || alpha <= 0 {
            continue;
        }
        let color = Color::Rgb {
            r: 255,
            g: (160 - k * 20) as u8,
            b: 60,
        };
        s.fill_circle(explosion.x + 16.0, explosion.y + 8.0, radius, color);
    }
}

// ── Game over ─────────────────────────────────────────────────────────────────

pub fn render_game_over<S: Surface>(s: &mut S, state: &MatchState, high_score: u32, mouse: (f32, f32)) {
    s.clear(C_BACKGROUND);
    let mid = SCREEN_HEIGHT / 2.0;
    centred_text(s, mid - 80.0, "GAME OVER", C_TEXT);
    centred_text(s, mid - 10.0, &format!("Final Score: {}", state.score), C_TEXT);
    centred_text(
        s,
        mid + 30.0,
        &format!("High Score: {}", state.score.max(high_score)),
        C_GOLD,
    );
    Button::restart().draw(s, mouse);
    centred_text(s, mid + 120.0, "R / Enter: Menu   Q: Quit", C_TEXT);
}
