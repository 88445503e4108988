//! The sound effects, described as oscillator voices.

/// Every sound effect the client can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Correct,
    Wrong,
    Celebration,
    Click,
    HalloweenAmbient,
    SpiderDrop,
    OceanWaves,
    MagicSparkle,
    RocketLaunch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Sawtooth,
    /// White noise shaped by `sin(i / 1000)` and a one-pole low-pass.
    Noise { cutoff_hz: f32 },
}

/// Frequency over the life of a voice.
#[derive(Debug, Clone, PartialEq)]
pub enum Pitch {
    /// Jump to each frequency at the given offset in seconds.
    Steps(Vec<(f32, f32)>),
    /// Exponential glide.
    Glide { from: f32, to: f32, over: f32 },
}

impl Pitch {
    pub fn constant(freq: f32) -> Self {
        Pitch::Steps(vec![(0.0, freq)])
    }

    /// Frequency in Hz at `t` seconds into the voice.
    pub fn at(&self, t: f32) -> f32 {
        match self {
            Pitch::Steps(steps) => steps
                .iter()
                .take_while(|(offset, _)| *offset <= t)
                .last()
                .or(steps.first())
                .map_or(0.0, |(_, freq)| *freq),
            Pitch::Glide { from, to, over } => exp_ramp(*from, *to, *over, t),
        }
    }
}

/// Gain over the life of a voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    Constant(f32),
    /// Exponential fade from `from` to `to` across `over` seconds.
    Fade { from: f32, to: f32, over: f32 },
}

impl Envelope {
    pub fn at(&self, t: f32) -> f32 {
        match *self {
            Envelope::Constant(gain) => gain,
            Envelope::Fade { from, to, over } => exp_ramp(from, to, over, t),
        }
    }
}

fn exp_ramp(from: f32, to: f32, over: f32, t: f32) -> f32 {
    if over <= 0.0 || t >= over {
        return to;
    }
    if t <= 0.0 {
        return from;
    }
    from * (to / from).powf(t / over)
}

/// A single oscillator scheduled inside a cue.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    pub wave: Waveform,
    pub start: f32,
    pub duration: f32,
    pub pitch: Pitch,
    pub gain: Envelope,
}

const C5: f32 = 523.25;
const E5: f32 = 659.25;
const G5: f32 = 783.99;
const C6: f32 = 1046.50;

impl Cue {
    /// Voices making up this cue.
    pub fn voices(self) -> Vec<Voice> {
        match self {
            Cue::Correct => vec![Voice {
                wave: Waveform::Sine,
                start: 0.0,
                duration: 0.4,
                pitch: Pitch::Steps(vec![(0.0, C5), (0.1, E5), (0.2, G5)]),
                gain: Envelope::Fade { from: 0.3, to: 0.01, over: 0.4 },
            }],
            Cue::Wrong => vec![Voice {
                wave: Waveform::Sawtooth,
                start: 0.0,
                duration: 0.3,
                pitch: Pitch::Steps(vec![(0.0, 200.0), (0.2, 100.0)]),
                gain: Envelope::Fade { from: 0.2, to: 0.01, over: 0.3 },
            }],
            Cue::Celebration => arpeggio(&[C5, E5, G5, C6], 0.1, 0.3, 0.2),
            Cue::Click => vec![Voice {
                wave: Waveform::Sine,
                start: 0.0,
                duration: 0.05,
                pitch: Pitch::constant(800.0),
                gain: Envelope::Fade { from: 0.1, to: 0.01, over: 0.05 },
            }],
            Cue::HalloweenAmbient => vec![
                Voice {
                    wave: Waveform::Sawtooth,
                    start: 0.0,
                    duration: 2.0,
                    pitch: Pitch::constant(40.0),
                    gain: Envelope::Constant(0.05),
                },
                Voice {
                    wave: Waveform::Sine,
                    start: 0.5,
                    duration: 1.0,
                    pitch: Pitch::Glide { from: 200.0, to: 600.0, over: 1.0 },
                    gain: Envelope::Fade { from: 0.1, to: 0.01, over: 1.0 },
                },
            ],
            Cue::SpiderDrop => vec![Voice {
                wave: Waveform::Sine,
                start: 0.0,
                duration: 0.3,
                pitch: Pitch::Glide { from: 800.0, to: 200.0, over: 0.3 },
                gain: Envelope::Fade { from: 0.15, to: 0.01, over: 0.3 },
            }],
            Cue::OceanWaves => vec![Voice {
                wave: Waveform::Noise { cutoff_hz: 300.0 },
                start: 0.0,
                duration: 2.0,
                pitch: Pitch::constant(0.0),
                gain: Envelope::Constant(0.1),
            }],
            Cue::MagicSparkle => arpeggio(&[800.0, 1000.0, 1200.0, 1400.0, 1600.0], 0.05, 0.2, 0.1),
            Cue::RocketLaunch => vec![Voice {
                wave: Waveform::Sawtooth,
                start: 0.0,
                duration: 1.5,
                pitch: Pitch::Glide { from: 50.0, to: 800.0, over: 1.5 },
                gain: Envelope::Fade { from: 0.2, to: 0.01, over: 1.5 },
            }],
        }
    }

    /// Length of the cue in seconds.
    pub fn duration(self) -> f32 {
        self.voices()
            .iter()
            .map(|v| v.start + v.duration)
            .fold(0.0, f32::max)
    }
}

fn arpeggio(notes: &[f32], spacing: f32, length: f32, gain: f32) -> Vec<Voice> {
    notes
        .iter()
        .enumerate()
        .map(|(i, &freq)| Voice {
            wave: Waveform::Sine,
            start: i as f32 * spacing,
            duration: length,
            pitch: Pitch::constant(freq),
            gain: Envelope::Fade { from: gain, to: 0.01, over: length },
        })
        .collect()
}
