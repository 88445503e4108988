//! Plays cues through an output backend, honouring the mute preference.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::ClientError;
use crate::config::Preferences;

use super::cue::Cue;
use super::synth::{self, SAMPLE_RATE};

/// Somewhere rendered samples can be sent.
pub trait Output: Send {
    fn play(&self, cue: Cue, samples: Vec<f32>, sample_rate: u32);
}

/// Backend used when no audio device is compiled in.
pub struct SilentOutput;

impl Output for SilentOutput {
    fn play(&self, cue: Cue, samples: Vec<f32>, sample_rate: u32) {
        debug!(?cue, samples = samples.len(), sample_rate, "sound cue (silent)");
    }
}

#[cfg(feature = "audio")]
mod device {
    use std::sync::mpsc;
    use std::thread;

    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, Sink};
    use tracing::warn;

    use super::{Cue, Output};

    /// Plays through the default audio device.
    ///
    /// The rodio stream is not `Send`, so it lives on its own thread.
    pub struct DeviceOutput {
        tx: mpsc::Sender<(Vec<f32>, u32)>,
    }

    impl DeviceOutput {
        pub fn open() -> Option<Self> {
            let (tx, rx) = mpsc::channel::<(Vec<f32>, u32)>();
            let (ready_tx, ready_rx) = mpsc::channel::<bool>();

            thread::spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(e) => {
                        warn!(error = %e, "no audio device");
                        let _ = ready_tx.send(false);
                        return;
                    }
                };
                let _ = ready_tx.send(true);

                while let Ok((samples, rate)) = rx.recv() {
                    let Ok(sink) = Sink::try_new(&handle) else {
                        continue;
                    };
                    sink.append(SamplesBuffer::new(1, rate, samples));
                    sink.detach();
                }
            });

            match ready_rx.recv() {
                Ok(true) => Some(Self { tx }),
                _ => None,
            }
        }
    }

    impl Output for DeviceOutput {
        fn play(&self, _cue: Cue, samples: Vec<f32>, sample_rate: u32) {
            let _ = self.tx.send((samples, sample_rate));
        }
    }
}

/// Default backend: the audio device when available, otherwise silent.
#[cfg(feature = "audio")]
pub fn default_output() -> Box<dyn Output> {
    match device::DeviceOutput::open() {
        Some(device) => Box::new(device),
        None => Box::new(SilentOutput),
    }
}

#[cfg(not(feature = "audio"))]
pub fn default_output() -> Box<dyn Output> {
    Box::new(SilentOutput)
}

/// Synthesizes and plays sound effects.
pub struct SoundPlayer {
    prefs: Preferences,
    prefs_path: Option<PathBuf>,
    output: Box<dyn Output>,
}

impl SoundPlayer {
    pub fn new(prefs: Preferences, prefs_path: Option<PathBuf>, output: Box<dyn Output>) -> Self {
        Self {
            prefs,
            prefs_path,
            output,
        }
    }

    /// A muted player that never touches the disk.
    pub fn silent() -> Self {
        Self::new(Preferences { sound_muted: true }, None, Box::new(SilentOutput))
    }

    pub fn play(&self, cue: Cue) {
        if self.prefs.sound_muted {
            return;
        }
        let samples = synth::render(cue, SAMPLE_RATE);
        self.output.play(cue, samples, SAMPLE_RATE);
    }

    pub fn is_muted(&self) -> bool {
        self.prefs.sound_muted
    }

    /// Change the mute flag and persist it.
    pub fn set_muted(&mut self, muted: bool) -> Result<(), ClientError> {
        self.prefs.sound_muted = muted;
        match &self.prefs_path {
            Some(path) => self.prefs.save(path),
            None => Ok(()),
        }
    }

    /// Flip the mute flag; a failed save is logged, the toggle still applies.
    pub fn toggle_muted(&mut self) {
        let muted = !self.prefs.sound_muted;
        if let Err(e) = self.set_muted(muted) {
            warn!(error = %e, "could not save preferences");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Cue>>>);

    impl Output for Recorder {
        fn play(&self, cue: Cue, samples: Vec<f32>, _sample_rate: u32) {
            assert!(!samples.is_empty());
            self.0.lock().unwrap().push(cue);
        }
    }

    #[test]
    fn test_muted_player_renders_nothing() {
        let recorder = Recorder::default();
        let mut player = SoundPlayer::new(Preferences::default(), None, Box::new(recorder.clone()));

        player.play(Cue::Click);
        player.toggle_muted();
        player.play(Cue::Correct);

        assert_eq!(*recorder.0.lock().unwrap(), vec![Cue::Click]);
        assert!(player.is_muted());
    }

    #[test]
    fn test_mute_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");

        let mut player = SoundPlayer::new(
            Preferences::default(),
            Some(path.clone()),
            Box::new(SilentOutput),
        );
        player.set_muted(true).unwrap();

        assert!(Preferences::load(&path).unwrap().sound_muted);
    }
}
