//! Renders cues into mono PCM samples.

use std::f32::consts::TAU;

use super::cue::{Cue, Voice, Waveform};

pub const SAMPLE_RATE: u32 = 44_100;

/// Render a cue at `sample_rate`, mixing all of its voices.
pub fn render(cue: Cue, sample_rate: u32) -> Vec<f32> {
    let voices = cue.voices();
    let total = seconds_to_samples(cue.duration(), sample_rate);
    let mut out = vec![0.0f32; total];

    // Fixed seed keeps the noise cue reproducible.
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for voice in &voices {
        mix_voice(&mut out, voice, sample_rate, &mut rng);
    }

    for sample in &mut out {
        *sample = sample.clamp(-1.0, 1.0);
    }
    out
}

fn seconds_to_samples(seconds: f32, sample_rate: u32) -> usize {
    (seconds * sample_rate as f32).round() as usize
}

fn mix_voice(out: &mut [f32], voice: &Voice, sample_rate: u32, rng: &mut fastrand::Rng) {
    let rate = sample_rate as f32;
    let first = seconds_to_samples(voice.start, sample_rate);
    let len = seconds_to_samples(voice.duration, sample_rate);

    let mut phase = 0.0f32;
    let mut lowpass = 0.0f32;

    for i in 0..len {
        let Some(slot) = out.get_mut(first + i) else {
            break;
        };
        let t = i as f32 / rate;

        let raw = match voice.wave {
            Waveform::Sine => (phase * TAU).sin(),
            Waveform::Sawtooth => 2.0 * (phase - (phase + 0.5).floor()),
            Waveform::Noise { cutoff_hz } => {
                let white = (rng.f32() * 2.0 - 1.0) * (i as f32 / 1000.0).sin();
                let alpha = 1.0 - (-TAU * cutoff_hz / rate).exp();
                lowpass += alpha * (white - lowpass);
                lowpass
            }
        };

        *slot += raw * voice.gain.at(t);

        phase += voice.pitch.at(t) / rate;
        phase -= phase.floor();
    }
}
