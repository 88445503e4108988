//! Room themes: palette overrides, ambient particles and ambient sound.

use ratatui::style::Color;
use tracing::debug;

use crate::protocol::{ThemeEffects, ThemeSpec};
use crate::sound::Cue;

/// Colours every view draws with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub bg: Color,
    pub accent: Color,
    pub good: Color,
    pub bad: Color,
    pub ink: Color,
    pub panel: Color,
    pub muted: Color,
    pub pill: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bg: Color::Rgb(0x0f, 0x13, 0x20),
            accent: Color::Rgb(0x6e, 0xe7, 0xb7),
            good: Color::Rgb(0x6e, 0xe7, 0xb7),
            bad: Color::Rgb(0xff, 0x6b, 0x6b),
            ink: Color::Rgb(0xe8, 0xeb, 0xff),
            panel: Color::Rgb(0x2b, 0x33, 0x5c),
            muted: Color::Rgb(0x4a, 0x55, 0x68),
            pill: Color::Rgb(0x9a, 0xa6, 0xff),
        }
    }
}

impl Palette {
    /// Apply the CSS variables of a theme on top of the defaults.
    pub fn from_spec(spec: &ThemeSpec) -> Self {
        let mut palette = Self::default();
        for (name, value) in &spec.vars {
            let slot = match name.as_str() {
                "--bg-color" => &mut palette.bg,
                "--accent" => &mut palette.accent,
                "--good" => &mut palette.good,
                "--ink" => &mut palette.ink,
                "--panel" => &mut palette.panel,
                "--muted" => &mut palette.muted,
                "--bg-image" => {
                    debug!(%value, "background images are not shown in the terminal");
                    continue;
                }
                _ => continue,
            };
            match parse_hex(value) {
                Some(color) => *slot = color,
                None => debug!(%name, %value, "ignoring non-hex theme colour"),
            }
        }
        palette
    }
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_hex(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = hex.chars().map(|c| channel(&format!("{c}{c}")));
            Some(Color::Rgb(rgb.next()??, rgb.next()??, rgb.next()??))
        }
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientKind {
    Bats,
    Snow,
}

impl AmbientKind {
    pub fn glyph(self) -> &'static str {
        match self {
            AmbientKind::Bats => "🦇",
            AmbientKind::Snow => "❄️",
        }
    }
}

/// One decorative particle, in fractions of the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub left: f32,
    pub top: f32,
    pub period: f32,
    pub delay: f32,
}

/// Decorative particles drawn behind the content.
#[derive(Debug, Clone, PartialEq)]
pub struct Ambient {
    pub kind: AmbientKind,
    pub particles: Vec<Particle>,
}

const BAT_COUNT: usize = 10;
const FLAKE_COUNT: usize = 40;
/// Vertical bob of a bat, as a fraction of the screen height.
const BAT_BOB: f32 = 0.02;

impl Ambient {
    /// Bats win over snow when both are set.
    pub fn from_effects(effects: &ThemeEffects, rng: &mut fastrand::Rng) -> Option<Self> {
        if effects.bats {
            let particles = (0..BAT_COUNT)
                .map(|_| Particle {
                    left: rng.f32() * 0.9,
                    top: rng.f32() * 0.8,
                    period: 8.0 + rng.f32() * 6.0,
                    delay: rng.f32() * 3.0,
                })
                .collect();
            Some(Self {
                kind: AmbientKind::Bats,
                particles,
            })
        } else if effects.snow {
            let particles = (0..FLAKE_COUNT)
                .map(|_| Particle {
                    left: rng.f32(),
                    top: -0.05,
                    period: 6.0 + rng.f32() * 8.0,
                    delay: rng.f32() * 4.0,
                })
                .collect();
            Some(Self {
                kind: AmbientKind::Snow,
                particles,
            })
        } else {
            None
        }
    }

    /// On-screen positions `(x, y)` in `[0, 1)` at `elapsed` seconds.
    pub fn positions(&self, elapsed: f32) -> Vec<(f32, f32)> {
        self.particles
            .iter()
            .map(|p| (p.left, self.vertical(p, elapsed)))
            .filter(|(x, y)| (0.0..1.0).contains(x) && (0.0..1.0).contains(y))
            .collect()
    }

    fn vertical(&self, p: &Particle, elapsed: f32) -> f32 {
        let t = elapsed - p.delay;
        match self.kind {
            AmbientKind::Bats => {
                if t < 0.0 {
                    return p.top;
                }
                // Alternating: up over one period, back down over the next.
                let cycle = (t / p.period) % 2.0;
                let phase = if cycle < 1.0 { cycle } else { 2.0 - cycle };
                let eased = (1.0 - (phase * std::f32::consts::PI).cos()) / 2.0;
                p.top + BAT_BOB * (2.0 * eased - 1.0)
            }
            AmbientKind::Snow => {
                if t < 0.0 {
                    return p.top;
                }
                let progress = (t % p.period) / p.period;
                p.top + progress * 1.10
            }
        }
    }
}

/// Everything derived from a room's theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: Option<String>,
    pub palette: Palette,
    pub ambient: Option<Ambient>,
}

impl Theme {
    pub fn from_spec(spec: &ThemeSpec, rng: &mut fastrand::Rng) -> Self {
        Self {
            name: spec.name.clone(),
            palette: Palette::from_spec(spec),
            ambient: spec
                .effects
                .as_ref()
                .and_then(|effects| Ambient::from_effects(effects, rng)),
        }
    }
}

/// Ambient sound matching a theme, if any.
pub fn ambient_cue(spec: &ThemeSpec) -> Option<Cue> {
    let effects = spec.effects.clone().unwrap_or_default();
    let name = spec.name.as_deref().unwrap_or_default().to_lowercase();

    if effects.bats {
        Some(Cue::HalloweenAmbient)
    } else if effects.snow {
        Some(Cue::MagicSparkle)
    } else if name.contains("ocean") {
        Some(Cue::OceanWaves)
    } else if name.contains("space") {
        Some(Cue::RocketLaunch)
    } else {
        None
    }
}
