//! Noise sources selectable per octave.

use noise::{NoiseFn, OpenSimplex, Perlin, Simplex, SuperSimplex, Value};
use serde::{Deserialize, Serialize};

use crate::engine_state::config::NoiseOctaveSettings;

/// The noise algorithm of one octave or of the domain warp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoiseKind {
    /// Classic gradient noise
    Perlin,
    /// Simplex gradient noise
    Simplex,
    /// OpenSimplex noise
    OpenSimplex,
    /// OpenSimplex2 "super simplex" noise
    SuperSimplex,
    /// Value noise
    Value,
}

/// A seeded noise source of one kind.
enum Source {
    Perlin(Perlin),
    Simplex(Simplex),
    OpenSimplex(OpenSimplex),
    SuperSimplex(SuperSimplex),
    Value(Value),
}

/// A noise source with its frequency applied: `sample(x, y)` reads the
/// underlying noise at `(x * frequency, y * frequency)`.
pub struct Sampler {
    source: Source,
    frequency: f64,
    amplitude: f64,
}

impl Sampler {
    /// Builds a sampler from octave settings and a seed.
    pub fn new(settings: &NoiseOctaveSettings, seed: u32) -> Self {
        let source = match settings.kind {
            NoiseKind::Perlin => Source::Perlin(Perlin::new(seed)),
            NoiseKind::Simplex => Source::Simplex(Simplex::new(seed)),
            NoiseKind::OpenSimplex => Source::OpenSimplex(OpenSimplex::new(seed)),
            NoiseKind::SuperSimplex => Source::SuperSimplex(SuperSimplex::new(seed)),
            NoiseKind::Value => Source::Value(Value::new(seed)),
        };
        Sampler {
            source,
            frequency: settings.frequency,
            amplitude: settings.amplitude,
        }
    }

    /// Raw noise in roughly `[-1, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let point = [x * self.frequency, y * self.frequency];
        match &self.source {
            Source::Perlin(noise) => noise.get(point),
            Source::Simplex(noise) => noise.get(point),
            Source::OpenSimplex(noise) => noise.get(point),
            Source::SuperSimplex(noise) => noise.get(point),
            Source::Value(noise) => noise.get(point),
        }
    }

    /// The configured amplitude.
    #[inline]
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [NoiseKind; 5] = [
        NoiseKind::Perlin,
        NoiseKind::Simplex,
        NoiseKind::OpenSimplex,
        NoiseKind::SuperSimplex,
        NoiseKind::Value,
    ];

    #[test]
    fn same_seed_same_samples() {
        for kind in KINDS {
            let settings = NoiseOctaveSettings {
                kind,
                frequency: 0.13,
                amplitude: 1.0,
            };
            let a = Sampler::new(&settings, 7);
            let b = Sampler::new(&settings, 7);
            for i in 0..32 {
                let (x, y) = (i as f64 * 1.7 - 20.0, i as f64 * -0.9 + 3.0);
                assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
            }
        }
    }

    #[test]
    fn samples_are_bounded() {
        for kind in KINDS {
            let settings = NoiseOctaveSettings {
                kind,
                frequency: 0.071,
                amplitude: 1.0,
            };
            let sampler = Sampler::new(&settings, 3);
            for i in 0..256 {
                let v = sampler.sample(i as f64 * 0.37, i as f64 * 1.13);
                assert!(v.is_finite() && v.abs() <= 2.0, "{:?} produced {}", kind, v);
            }
        }
    }
}
