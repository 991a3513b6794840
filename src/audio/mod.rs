//! Background audio for the showroom
//!
//! One looping track at a time, swapped with a hard cut: the previous sink
//! is stopped and released before the next track starts. The "crossfader"
//! name notwithstanding, there is no timed blend; the cut is deliberate.
//!
//! Playback is gated behind a one-time unlock latch fed by the first user
//! gesture, so sound never starts before the user has interacted. Until
//! the latch opens, `play` requests are suppressed.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, info};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::ShowroomError;

/// Owns at most one playing audio track
pub struct AudioCrossfader {
    /// Output stream and handle, opened lazily on the first real play.
    /// The stream must stay alive for the sink to keep producing sound.
    stream: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
    current_track: Option<PathBuf>,
    unlocked: bool,
}

impl AudioCrossfader {
    pub fn new() -> Self {
        Self {
            stream: None,
            sink: None,
            current_track: None,
            unlocked: false,
        }
    }

    /// Opens the unlock latch
    ///
    /// Returns true only the first time, so the caller can start the saved
    /// selection's track exactly once.
    pub fn unlock(&mut self) -> bool {
        if self.unlocked {
            return false;
        }
        info!("audio unlocked");
        self.unlocked = true;
        true
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Path of the track currently playing, if any
    pub fn current_track(&self) -> Option<&Path> {
        self.current_track.as_deref()
    }

    /// Swaps to `track` with a hard cut
    ///
    /// Stops and releases the current sink first, then starts the new
    /// track looping. Suppressed (successfully, with a debug log) while
    /// the latch is closed.
    ///
    /// # Errors
    /// Returns [`ShowroomError::AudioPlayback`] when the output device is
    /// unavailable or the file fails to open/decode. The crossfader is
    /// left silent in that case.
    pub fn play(&mut self, track: &Path) -> Result<(), ShowroomError> {
        if !self.unlocked {
            debug!("audio locked, suppressing {:?}", track);
            return Ok(());
        }

        self.stop();

        match self.start_looping(track) {
            Ok(sink) => {
                info!("audio started: {:?}", track);
                self.sink = Some(sink);
                self.current_track = Some(track.to_path_buf());
                Ok(())
            }
            Err(source) => Err(ShowroomError::AudioPlayback {
                path: track.to_path_buf(),
                source,
            }),
        }
    }

    /// Stops playback and releases the current track
    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
            debug!("previous audio stopped and released");
        }
        self.current_track = None;
    }

    fn start_looping(&mut self, track: &Path) -> anyhow::Result<Sink> {
        if self.stream.is_none() {
            let (stream, handle) =
                OutputStream::try_default().context("no audio output device")?;
            self.stream = Some((stream, handle));
        }
        let (_, handle) = self.stream.as_ref().unwrap();

        let sink = Sink::try_new(handle).context("failed to create audio sink")?;
        let file = File::open(track).with_context(|| format!("failed to open {:?}", track))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("failed to decode {:?}", track))?;

        sink.append(source.repeat_infinite());
        sink.play();
        Ok(sink)
    }
}

impl Default for AudioCrossfader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AudioCrossfader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests stay off the real output device: they only exercise the latch
    // and the suppressed path, which never open a stream.

    #[test]
    fn play_is_suppressed_before_unlock() {
        let mut audio = AudioCrossfader::new();
        let result = audio.play(Path::new("assets/sound/drift_circuit.ogg"));
        assert!(result.is_ok());
        assert!(audio.current_track().is_none());
    }

    #[test]
    fn unlock_opens_once() {
        let mut audio = AudioCrossfader::new();
        assert!(!audio.is_unlocked());
        assert!(audio.unlock());
        assert!(!audio.unlock());
        assert!(audio.is_unlocked());
    }

    #[test]
    fn stop_without_playback_is_a_noop() {
        let mut audio = AudioCrossfader::new();
        audio.stop();
        assert!(audio.current_track().is_none());
    }
}
