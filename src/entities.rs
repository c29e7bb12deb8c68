//! All game entity types: pure data, no logic.

// ── Screen geometry (logical pixels) ─────────────────────────────────────────

pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 600.0;

pub const PLAYER_WIDTH: f32 = 60.0;
pub const PLAYER_HEIGHT: f32 = 40.0;
pub const ENEMY_WIDTH: f32 = 48.0;
pub const ENEMY_HEIGHT: f32 = 36.0;
pub const BOSS_WIDTH: f32 = 140.0;
pub const BOSS_HEIGHT: f32 = 100.0;
pub const BULLET_WIDTH: f32 = 7.0;
pub const BULLET_HEIGHT: f32 = 18.0;

/// Full health; restored whenever a life is lost.
pub const MAX_HP: u32 = 100;
pub const START_LIVES: u32 = 3;

// ── Enumerations ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Next difficulty in menu order, wrapping Hard back to Easy.
    pub fn cycle(self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

/// Top-level mode of a match. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    Boss,
    GameOver,
}

/// One of the three alien bitmaps. Bosses reuse them at a larger scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlienSprite {
    Alien1,
    Alien2,
    Alien3,
}

impl AlienSprite {
    pub const ALL: [AlienSprite; 3] = [AlienSprite::Alien1, AlienSprite::Alien2, AlienSprite::Alien3];
}

/// Things that happened during a single update step. The frame loop turns
/// these into sounds; tests use them to observe transitions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    Shot,
    Explosion { x: f32, y: f32 },
    BossSpawned { hp: u32 },
    BossDefeated,
    LifeLost,
    GameOver,
}

// ── Projectiles & effects ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
}

/// A short procedural burst drawn for a few frames after a hit.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    /// Frames since the explosion started.
    pub age: u32,
}

// ── Player, enemies & boss ────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Health points in `0..=MAX_HP`.
    pub hp: u32,
    pub lives: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    /// Horizontal speed; the sign is the direction of travel.
    pub speed: f32,
    pub sprite: AlienSprite,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub hp: u32,
    /// Hit points at spawn, kept for the HP bar.
    pub max_hp: u32,
    pub sprite: AlienSprite,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire match state. Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct MatchState {
    pub player: Player,
    pub bullets: Vec<Bullet>,
    /// The current wave.
    pub enemies: Vec<Enemy>,
    /// Present exactly when `phase == Phase::Boss`.
    pub boss: Option<Boss>,
    pub explosions: Vec<Explosion>,
    pub score: u32,
    /// Score at which the next boss appears.
    pub next_boss_score: u32,
    pub difficulty: Difficulty,
    pub phase: Phase,
    /// Events produced by the most recent update step.
    pub events: Vec<GameEvent>,
    pub frame: u64,
}
