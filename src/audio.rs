//! Sound effects and background music over `rodio`.
//!
//! Files are decoded once at load time so a corrupt or empty file is caught
//! up front and replaced by [`NullSound`]. Without an output device every
//! handle is a [`NullSound`].

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::AssetError;

/// Volume applied to one-shot effects.
pub const EFFECT_VOLUME: f32 = 0.6;
/// Volume applied to the background track.
pub const MUSIC_VOLUME: f32 = 0.45;

/// Anything that can play a one-shot effect.
pub trait Sound {
    fn play(&self);
    fn set_volume(&mut self, volume: f32);
    /// True when playing produces no audio.
    fn is_silent(&self) -> bool;
}

/// A track that loops until stopped.
pub trait Music {
    fn start(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn is_silent(&self) -> bool;
}

/// Stands in for a sound or track that failed to load.
#[derive(Debug, Default)]
pub struct NullSound;

impl Sound for NullSound {
    fn play(&self) {}
    fn set_volume(&mut self, _volume: f32) {}
    fn is_silent(&self) -> bool {
        true
    }
}

impl Music for NullSound {
    fn start(&mut self) {}
    fn stop(&mut self) {}
    fn set_volume(&mut self, _volume: f32) {}
    fn is_silent(&self) -> bool {
        true
    }
}

// ── Decoded clips ────────────────────────────────────────────────────────────

type ClipDecoder = Decoder<Cursor<Arc<[u8]>>>;

/// The bytes of an audio file that decoded to at least one sample.
#[derive(Clone, Debug)]
pub struct Clip {
    path: PathBuf,
    bytes: Arc<[u8]>,
}

impl Clip {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decoder(&self) -> Result<ClipDecoder, AssetError> {
        Decoder::new(Cursor::new(Arc::clone(&self.bytes))).map_err(|source| AssetError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

/// Read and decode `path`. Format is detected from the content.
pub fn load_clip(path: &Path) -> Result<Clip, AssetError> {
    let bytes: Arc<[u8]> = fs::read(path)
        .map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .into();
    let clip = Clip {
        path: path.to_path_buf(),
        bytes,
    };
    if clip.decoder()?.next().is_none() {
        return Err(AssetError::NoSamples {
            path: path.to_path_buf(),
        });
    }
    Ok(clip)
}

// ── Output ───────────────────────────────────────────────────────────────────

/// The default output device. Dropping it silences every sink.
pub struct AudioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput {
    pub fn open() -> Result<Self, AssetError> {
        let (stream, handle) = OutputStream::try_default().map_err(AssetError::NoOutput)?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    pub fn handle(&self) -> &OutputStreamHandle {
        &self.handle
    }
}

/// A decoded effect; each `play` gets its own detached sink so effects overlap.
pub struct EffectSound {
    clip: Clip,
    handle: OutputStreamHandle,
    volume: f32,
}

impl EffectSound {
    pub fn new(clip: Clip, handle: OutputStreamHandle) -> Self {
        Self {
            clip,
            handle,
            volume: 1.0,
        }
    }
}

impl Sound for EffectSound {
    fn play(&self) {
        if self.volume <= 0.0 {
            return;
        }
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return;
        };
        match self.clip.decoder() {
            Ok(source) => {
                sink.set_volume(self.volume);
                sink.append(source);
                sink.detach();
            }
            Err(e) => tracing::debug!(error = %e, "effect failed to decode on replay"),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn is_silent(&self) -> bool {
        self.volume <= 0.0
    }
}

/// Background track on its own sink, looped forever once started.
pub struct LoopingMusic {
    clip: Clip,
    handle: OutputStreamHandle,
    volume: f32,
    sink: Option<Sink>,
}

impl LoopingMusic {
    pub fn new(clip: Clip, handle: OutputStreamHandle) -> Self {
        Self {
            clip,
            handle,
            volume: 1.0,
            sink: None,
        }
    }
}

impl Music for LoopingMusic {
    fn start(&mut self) {
        if self.sink.is_some() {
            return;
        }
        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(e) => {
                tracing::warn!(error = %e, "no sink for background music");
                return;
            }
        };
        match self.clip.decoder() {
            Ok(source) => {
                sink.set_volume(self.volume);
                sink.append(source.repeat_infinite());
                tracing::info!(path = ?self.clip.path(), "background music started");
                self.sink = Some(sink);
            }
            Err(e) => tracing::warn!(error = %e, "background music failed to decode"),
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn is_silent(&self) -> bool {
        self.volume <= 0.0
    }
}

// ── Fallback constructors ────────────────────────────────────────────────────

/// Load an effect, or silence when the file is bad or there is no device.
pub fn effect_or_silence(path: &Path, output: Option<&AudioOutput>) -> Box<dyn Sound> {
    let clip = match load_clip(path) {
        Ok(clip) => clip,
        Err(e) => {
            tracing::warn!(error = %e, "sound unusable, playing silence");
            return Box::new(NullSound);
        }
    };
    let Some(output) = output else {
        return Box::new(NullSound);
    };
    let mut sound = EffectSound::new(clip, output.handle().clone());
    Sound::set_volume(&mut sound, EFFECT_VOLUME);
    Box::new(sound)
}

/// Load the background track, or silence when there is no file, the file
/// is bad, or there is no device.
pub fn music_or_silence(path: Option<&Path>, output: Option<&AudioOutput>) -> Box<dyn Music> {
    let Some(path) = path else {
        tracing::warn!("no background music found, playing silence");
        return Box::new(NullSound);
    };
    let clip = match load_clip(path) {
        Ok(clip) => clip,
        Err(e) => {
            tracing::warn!(error = %e, "background music unusable, playing silence");
            return Box::new(NullSound);
        }
    };
    let Some(output) = output else {
        return Box::new(NullSound);
    };
    let mut music = LoopingMusic::new(clip, output.handle().clone());
    Music::set_volume(&mut music, MUSIC_VOLUME);
    Box::new(music)
}
