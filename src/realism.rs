//! Random perturbation primitives for handwriting realism
//!
//! Every realism feature is gated by its toggle in [`Settings`]; with the
//! toggle off the base value passes through unchanged. Randomness comes from
//! an explicit seedable source so tests can assert deterministic output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::*;
use crate::settings::{Color, Settings};

/// Samples realism perturbations for one generation request.
///
/// Cloning a sampler replays the same random sequence, which lets a caller
/// reproduce a layout exactly from a fixed seed.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
    jitter: bool,
    jitter_strength: f32,
    spacing_variation: bool,
    ink_variation: bool,
    word_size_variation: bool,
    baseline_shift: bool,
    ink_flow: bool,
    gel_pen: bool,
}

impl Sampler {
    /// Sampler seeded from OS entropy; every generation differs.
    pub fn new(settings: &Settings) -> Self {
        Self::from_rng(settings, StdRng::from_os_rng())
    }

    /// Sampler with a fixed seed; identical seeds produce identical documents.
    pub fn seeded(settings: &Settings, seed: u64) -> Self {
        Self::from_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn from_rng(settings: &Settings, rng: StdRng) -> Self {
        Self {
            rng,
            jitter: settings.jitter,
            jitter_strength: settings.jitter_strength,
            spacing_variation: settings.spacing_variation,
            ink_variation: settings.ink_variation,
            word_size_variation: settings.word_size_variation,
            baseline_shift: settings.baseline_shift,
            ink_flow: settings.ink_flow,
            gel_pen: settings.gel_pen,
        }
    }

    fn perturb(&mut self, base: f32, spread: f32, enabled: bool) -> f32 {
        if enabled && spread > 0.0 {
            base + self.rng.random_range(-spread..=spread)
        } else {
            base
        }
    }

    /// Horizontal offset for a glyph or word
    pub fn jitter_x(&mut self, spread: f32) -> f32 {
        self.perturb(0.0, spread, self.jitter)
    }

    /// Vertical offset for a glyph or word
    pub fn jitter_y(&mut self, spread: f32) -> f32 {
        self.perturb(0.0, spread, self.jitter)
    }

    /// Baseline-to-baseline advance for one display line
    pub fn line_advance(&mut self, base: f32) -> f32 {
        self.perturb(base, 2.0, self.spacing_variation)
    }

    /// Per-word font size, clamped to [base-1, base+2]
    pub fn word_size(&mut self, base: f32) -> f32 {
        if self.word_size_variation {
            self.perturb(base, WORD_SIZE_SPREAD, true)
                .clamp(base - 1.0, base + 2.0)
        } else {
            base
        }
    }

    /// Per-word vertical baseline shift scaled by jitter strength
    pub fn baseline_shift(&mut self) -> f32 {
        if self.baseline_shift {
            self.perturb(0.0, BASELINE_SPREAD, true) * self.jitter_strength
        } else {
            0.0
        }
    }

    /// Extra advance slack between glyphs on the densest drawing path
    pub fn glyph_advance_slack(&mut self) -> f32 {
        if self.jitter && self.spacing_variation {
            self.rng.random_range(-0.2..=0.3)
        } else {
            0.0
        }
    }

    /// Whether the per-glyph scatter path should be used for body text
    pub fn scatter_glyphs(&self) -> bool {
        self.jitter && self.spacing_variation
    }

    /// Sub-point (dx, dy) offset for a single glyph on the scatter path
    pub fn glyph_scatter(&mut self) -> (f32, f32) {
        (
            self.rng.random_range(-0.4..=0.4),
            self.rng.random_range(-0.5..=0.5),
        )
    }

    /// Ink color for one word: drift each channel, fade with the word's
    /// position in its line, then apply the gel-pen tint.
    pub fn word_ink(&mut self, base: Color, position_ratio: f32) -> Color {
        let mut color = if self.ink_variation {
            Color::rgb(
                base.r + self.rng.random_range(-INK_DRIFT..=INK_DRIFT),
                base.g + self.rng.random_range(-INK_DRIFT..=INK_DRIFT),
                base.b + self.rng.random_range(-INK_DRIFT..=INK_DRIFT),
            )
        } else {
            base
        };

        if self.ink_flow {
            let ratio = position_ratio.clamp(0.0, 1.0);
            let factor = 1.0 - (1.0 - INK_FLOW_FLOOR) * ratio;
            color = Color::rgb(color.r * factor, color.g * factor, color.b * factor);
        }

        if self.gel_pen {
            color = Color::rgb(
                (color.r * GEL_TINT_R).min(1.0),
                (color.g * GEL_TINT_G).min(1.0),
                (color.b * GEL_TINT_B).min(1.0),
            );
        }

        color
    }
}
