//! Sound effects, synthesized from oscillator descriptions.

mod cue;
mod player;
mod synth;

pub use cue::{Cue, Envelope, Pitch, Voice, Waveform};
pub use player::{Output, SilentOutput, SoundPlayer, default_output};
pub use synth::{SAMPLE_RATE, render};
