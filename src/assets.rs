//! Sprites and sounds, looked up by logical name in the asset directory.
//!
//! Loading never fails: a missing or unreadable sprite becomes a solid
//! placeholder rectangle and a missing or corrupt sound becomes
//! [`NullSound`].

use std::fs;
use std::path::{Path, PathBuf};

use crossterm::style::Color;

use crate::audio::{effect_or_silence, music_or_silence, AudioOutput, Music, NullSound, Sound};
use crate::entities::{
    AlienSprite, BOSS_HEIGHT, BOSS_WIDTH, ENEMY_HEIGHT, ENEMY_WIDTH, PLAYER_HEIGHT, PLAYER_WIDTH,
};
use crate::error::AssetError;

pub const PLACEHOLDER_COLOR: Color = Color::Rgb { r: 100, g: 100, b: 120 };

// ── Sprites ──────────────────────────────────────────────────────────────────

/// A bitmap with a logical size. Text-art rows are stretched to fit that size
/// when drawn; `art == None` draws a solid rectangle instead.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub art: Option<Vec<Vec<char>>>,
}

impl Sprite {
    pub fn placeholder(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            color: PLACEHOLDER_COLOR,
            art: None,
        }
    }

    /// Parse text art. Trailing blank lines are dropped; rows are padded to
    /// the widest one so sampling stays rectangular.
    pub fn from_art(text: &str, width: f32, height: f32, color: Color) -> Option<Self> {
        let mut rows: Vec<Vec<char>> = text.lines().map(|l| l.trim_end().chars().collect()).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        if cols == 0 {
            return None;
        }
        for row in &mut rows {
            row.resize(cols, ' ');
        }
        Some(Self {
            width,
            height,
            color,
            art: Some(rows),
        })
    }

    /// Same picture at a different logical size.
    pub fn scaled(&self, width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.art.is_none()
    }

    /// Character at normalised coordinates `u, v` in `[0, 1)`. `None` means
    /// transparent.
    pub fn sample(&self, u: f32, v: f32) -> Option<char> {
        let rows = self.art.as_ref()?;
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let r = ((v.clamp(0.0, 1.0) * rows.len() as f32) as usize).min(rows.len().checked_sub(1)?);
        let c = ((u.clamp(0.0, 1.0) * cols as f32) as usize).min(cols.checked_sub(1)?);
        match rows[r][c] {
            ' ' => None,
            ch => Some(ch),
        }
    }
}

pub fn load_sprite(path: &Path, width: f32, height: f32, color: Color) -> Result<Sprite, AssetError> {
    let text = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Sprite::from_art(&text, width, height, color).ok_or_else(|| AssetError::EmptySprite {
        path: path.to_path_buf(),
    })
}

fn sprite_or_placeholder(dir: &Path, name: &str, width: f32, height: f32, color: Color) -> Sprite {
    let path = dir.join(format!("{name}.txt"));
    load_sprite(&path, width, height, color).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "sprite missing, using placeholder");
        Sprite::placeholder(width, height)
    })
}

// ── Music lookup ─────────────────────────────────────────────────────────────

const MUSIC_STEM: &str = "background_music";

/// First `background_music.*` in `dir`, by file name order.
pub fn find_music(dir: &Path) -> Option<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.file_stem().is_some_and(|stem| stem == MUSIC_STEM))
        .collect();
    found.sort();
    found.into_iter().next()
}

// ── Bundle ───────────────────────────────────────────────────────────────────

pub struct Assets {
    pub player: Sprite,
    pub aliens: [Sprite; 3],
    pub shoot: Box<dyn Sound>,
    pub explosion: Box<dyn Sound>,
    pub music: Box<dyn Music>,
    /// Keeps the device open for as long as the sounds live.
    _output: Option<AudioOutput>,
}

impl Assets {
    /// Load from `dir`, opening the default audio device.
    pub fn load(dir: &Path) -> Self {
        let output = AudioOutput::open()
            .map_err(|e| tracing::warn!(error = %e, "audio disabled"))
            .ok();
        Self::load_with_output(dir, output)
    }

    /// Load from `dir`; with no `output` every sound is silent.
    pub fn load_with_output(dir: &Path, output: Option<AudioOutput>) -> Self {
        let alien = |name: &str, color: Color| {
            sprite_or_placeholder(dir, name, ENEMY_WIDTH, ENEMY_HEIGHT, color)
        };
        let music_path = find_music(dir);
        let assets = Self {
            player: sprite_or_placeholder(dir, "tank", PLAYER_WIDTH, PLAYER_HEIGHT, Color::White),
            aliens: [
                alien("alien1", Color::Green),
                alien("alien2", Color::Magenta),
                alien("alien3", Color::Cyan),
            ],
            shoot: effect_or_silence(&dir.join("shoot.wav"), output.as_ref()),
            explosion: effect_or_silence(&dir.join("explosion.wav"), output.as_ref()),
            music: music_or_silence(music_path.as_deref(), output.as_ref()),
            _output: output,
        };
        tracing::info!(?dir, "assets loaded");
        assets
    }

    /// Everything as placeholders, for when no asset directory exists.
    pub fn placeholders() -> Self {
        let alien = || Sprite::placeholder(ENEMY_WIDTH, ENEMY_HEIGHT);
        Self {
            player: Sprite::placeholder(PLAYER_WIDTH, PLAYER_HEIGHT),
            aliens: [alien(), alien(), alien()],
            shoot: Box::new(NullSound),
            explosion: Box::new(NullSound),
            music: Box::new(NullSound),
            _output: None,
        }
    }

    pub fn alien(&self, sprite: AlienSprite) -> &Sprite {
        match sprite {
            AlienSprite::Alien1 => &self.aliens[0],
            AlienSprite::Alien2 => &self.aliens[1],
            AlienSprite::Alien3 => &self.aliens[2],
        }
    }

    /// The alien picture blown up to boss size.
    pub fn boss(&self, sprite: AlienSprite) -> Sprite {
        self.alien(sprite).scaled(BOSS_WIDTH, BOSS_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn art_rows_are_padded_and_trailing_blanks_dropped() {
        let sprite = Sprite::from_art(" /\\\n/__\\\n\n", 48.0, 36.0, Color::Green).unwrap();
        let rows = sprite.art.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == 4));
    }

    #[test]
    fn blank_art_is_rejected() {
        assert!(Sprite::from_art("  \n\n", 10.0, 10.0, Color::Green).is_none());
    }

    #[test]
    fn sample_maps_corners_and_treats_space_as_transparent() {
        let sprite = Sprite::from_art("ab\n c", 20.0, 20.0, Color::Green).unwrap();
        assert_eq!(sprite.sample(0.0, 0.0), Some('a'));
        assert_eq!(sprite.sample(0.99, 0.0), Some('b'));
        assert_eq!(sprite.sample(0.0, 0.99), None);
        assert_eq!(sprite.sample(0.99, 0.99), Some('c'));
    }

    #[test]
    fn placeholder_samples_nothing() {
        let sprite = Sprite::placeholder(50.0, 30.0);
        assert!(sprite.is_placeholder());
        assert_eq!(sprite.sample(0.5, 0.5), None);
    }
}
