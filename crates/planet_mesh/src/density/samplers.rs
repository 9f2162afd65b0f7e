//! Built-in density functions.
//!
//! Deterministic analytic fields that are easy to verify: use them to test
//! chunk tiling coherency before reaching for real terrain noise.

use glam::Vec3;

use super::noise::FractalNoise;
use super::DensityFunction;

/// Sphere of a given radius: `|p - center| - radius`.
#[derive(Clone, Copy, Debug)]
pub struct SphereDensity {
  /// Center in world coordinates.
  pub center: Vec3,
  /// Surface radius.
  pub radius: f32,
}

impl SphereDensity {
  pub fn new(radius: f32) -> Self {
    Self {
      center: Vec3::ZERO,
      radius,
    }
  }

  pub fn with_center(mut self, center: Vec3) -> Self {
    self.center = center;
    self
  }
}

impl DensityFunction for SphereDensity {
  fn sample(&self, position: Vec3) -> f32 {
    (position - self.center).length() - self.radius
  }
}

/// Horizontal plane at a given height: `p.z - height`.
///
/// Negative (inside) below the plane, positive above. Good baseline test -
/// the surface crosses every chunk column at a predictable position.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaneDensity {
  /// Height of the surface along +Z.
  pub height: f32,
}

impl PlaneDensity {
  pub fn new(height: f32) -> Self {
    Self { height }
  }
}

impl DensityFunction for PlaneDensity {
  fn sample(&self, position: Vec3) -> f32 {
    position.z - self.height
  }
}

/// Planet shell: sphere displaced by fractal terrain noise.
#[derive(Clone, Copy, Debug)]
pub struct NoisySphereDensity {
  /// Planet center in world coordinates.
  pub center: Vec3,
  /// Base planet radius.
  pub radius: f32,
  /// Terrain noise field.
  pub noise: FractalNoise,
  /// Terrain height scale in world units.
  pub amplitude: f32,
}

impl NoisySphereDensity {
  pub fn new(radius: f32) -> Self {
    Self {
      center: Vec3::ZERO,
      radius,
      noise: FractalNoise::default(),
      amplitude: radius * 0.1,
    }
  }

  pub fn with_center(mut self, center: Vec3) -> Self {
    self.center = center;
    self
  }

  pub fn with_noise(mut self, noise: FractalNoise) -> Self {
    self.noise = noise;
    self
  }

  pub fn with_amplitude(mut self, amplitude: f32) -> Self {
    self.amplitude = amplitude;
    self
  }
}

impl DensityFunction for NoisySphereDensity {
  fn sample(&self, position: Vec3) -> f32 {
    let shell = (position - self.center).length() - self.radius;
    shell + self.noise.sample(position) * self.amplitude
  }
}
