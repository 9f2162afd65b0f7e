//! Fractal value noise for terrain displacement.
//!
//! Deterministic and seedable: the lattice hash folds the seed into integer
//! coordinates, so the same seed always reproduces the same terrain on any
//! platform.

use glam::Vec3;

/// Multi-octave value noise.
///
/// Each octave samples smoothstep-interpolated lattice noise, with frequency
/// scaled by `lacunarity` and amplitude by `persistence` per octave. Output
/// is roughly in `[-1, 1]` before octave summation widens it slightly.
#[derive(Clone, Copy, Debug)]
pub struct FractalNoise {
  /// Base spatial frequency of the first octave.
  pub frequency: f32,
  /// Number of octaves to accumulate.
  pub octaves: u32,
  /// Frequency multiplier per octave.
  pub lacunarity: f32,
  /// Amplitude multiplier per octave.
  pub persistence: f32,
  /// Hash seed.
  pub seed: i32,
}

impl Default for FractalNoise {
  fn default() -> Self {
    Self {
      frequency: 0.01,
      octaves: 4,
      lacunarity: 2.0,
      persistence: 0.5,
      seed: 1337,
    }
  }
}

impl FractalNoise {
  pub fn new(frequency: f32, octaves: u32) -> Self {
    Self {
      frequency,
      octaves,
      ..Self::default()
    }
  }

  pub fn with_seed(mut self, seed: i32) -> Self {
    self.seed = seed;
    self
  }

  /// Accumulate all octaves at a world position.
  pub fn sample(&self, position: Vec3) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = self.frequency;

    for _ in 0..self.octaves {
      value += self.value_noise(position * frequency) * amplitude;
      frequency *= self.lacunarity;
      amplitude *= self.persistence;
    }

    value
  }

  /// Single octave: hash the surrounding lattice cell and interpolate.
  fn value_noise(&self, p: Vec3) -> f32 {
    let x0 = p.x.floor() as i32;
    let y0 = p.y.floor() as i32;
    let z0 = p.z.floor() as i32;
    let (x1, y1, z1) = (x0.wrapping_add(1), y0.wrapping_add(1), z0.wrapping_add(1));

    let sx = smoothstep(p.x - x0 as f32);
    let sy = smoothstep(p.y - y0 as f32);
    let sz = smoothstep(p.z - z0 as f32);

    let n000 = self.hash(x0, y0, z0);
    let n001 = self.hash(x0, y0, z1);
    let n010 = self.hash(x0, y1, z0);
    let n011 = self.hash(x0, y1, z1);
    let n100 = self.hash(x1, y0, z0);
    let n101 = self.hash(x1, y0, z1);
    let n110 = self.hash(x1, y1, z0);
    let n111 = self.hash(x1, y1, z1);

    let ix00 = lerp(n000, n100, sx);
    let ix01 = lerp(n001, n101, sx);
    let ix10 = lerp(n010, n110, sx);
    let ix11 = lerp(n011, n111, sx);

    let ixy0 = lerp(ix00, ix10, sy);
    let ixy1 = lerp(ix01, ix11, sy);

    lerp(ixy0, ixy1, sz)
  }

  /// Integer lattice hash, output in `[-1, 1)`.
  fn hash(&self, x: i32, y: i32, z: i32) -> f32 {
    let mut n = x
      .wrapping_mul(374_761_393)
      .wrapping_add(y.wrapping_mul(668_265_263))
      .wrapping_add(z.wrapping_mul(1_013_904_223))
      .wrapping_add(self.seed);
    n = (n << 13) ^ n;
    n = n
      .wrapping_mul(
        n.wrapping_mul(n)
          .wrapping_mul(15_731)
          .wrapping_add(789_221),
      )
      .wrapping_add(1_376_312_589)
      & 0x7fff_ffff;
    n as f32 / 1_073_741_824.0 - 1.0
  }
}

#[inline]
fn smoothstep(t: f32) -> f32 {
  t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
  a + t * (b - a)
}
