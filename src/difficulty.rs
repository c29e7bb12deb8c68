//! Static difficulty tuning, read-only for the life of a match.

use crate::entities::Difficulty;

/// Tuning values bundled under a difficulty name.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyProfile {
    /// Scales enemy and boss horizontal speed.
    pub speed_mul: f32,
    /// Size of each enemy wave.
    pub enemy_count: usize,
    /// Maximum bullets in flight at once.
    pub bullet_limit: usize,
    pub boss_hp: u32,
}

const EASY: DifficultyProfile = DifficultyProfile {
    speed_mul: 0.75,
    enemy_count: 6,
    bullet_limit: 7,
    boss_hp: 10,
};

const MEDIUM: DifficultyProfile = DifficultyProfile {
    speed_mul: 1.0,
    enemy_count: 8,
    bullet_limit: 5,
    boss_hp: 12,
};

const HARD: DifficultyProfile = DifficultyProfile {
    speed_mul: 1.4,
    enemy_count: 10,
    bullet_limit: 4,
    boss_hp: 16,
};

impl Difficulty {
    pub fn profile(self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
        }
    }
}
