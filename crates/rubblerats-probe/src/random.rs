//! Injectable randomness.
//!
//! The probe model only ever asks for a uniform float in `[lo, hi)` or a
//! biased coin flip. Any `rand::Rng` satisfies this, so the driver passes
//! its seeded generator straight through; tests can script the draws.

use rand::Rng;

/// Source of the two kinds of random draw the probe model needs.
pub trait RandomSource {
    /// Uniform float in `[lo, hi)`. A degenerate range yields `lo`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;

    /// `true` with probability `p` (clamped to `[0, 1]`).
    fn chance(&mut self, p: f64) -> bool;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if lo < hi {
            self.gen_range(lo..hi)
        } else {
            lo
        }
    }

    fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 || p.is_nan() {
            false
        } else if p >= 1.0 {
            true
        } else {
            self.gen_bool(p)
        }
    }
}
