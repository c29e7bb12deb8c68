//! Single-screen arcade shooter: waves of aliens, periodic bosses, and a
//! persisted high score, rendered to the terminal.

pub mod assets;
pub mod audio;
pub mod compute;
pub mod config;
pub mod difficulty;
pub mod display;
pub mod entities;
pub mod error;
pub mod highscore;
pub mod input;
pub mod menu;
