//! Error types for the fallible I/O edges. None of these are fatal: callers
//! log them and substitute a fallback.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("high score file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("high score file {path:?} does not hold a non-negative integer: {content:?}")]
    Parse { path: PathBuf, content: String },
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("audio {path:?} could not be decoded: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
    #[error("audio {path:?} decoded to no samples")]
    NoSamples { path: PathBuf },
    #[error("no audio output device: {0}")]
    NoOutput(#[source] rodio::StreamError),
    #[error("sprite {path:?} has no visible rows")]
    EmptySprite { path: PathBuf },
}
