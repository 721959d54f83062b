use std::f64::consts::{FRAC_PI_2, PI};

use rand::{distributions::Distribution, Rng};

use crate::Vec3;

/// Uniformly distributed point on the unit sphere.
///
/// Latitude is sampled through the inverse CDF `acos(2u - 1) - π/2`, longitude uniformly in `[0, 2π)`.
/// Consumes exactly two `f64` draws per sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitSphere;

impl Distribution<Vec3> for UnitSphere {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let r1: f64 = rng.gen();
        let r2: f64 = rng.gen();
        let lat = (2.0 * r1 - 1.0).acos() - FRAC_PI_2;
        let lon = 2.0 * PI * r2;

        Vec3::new(
            (lat.cos() * lon.cos()) as f32,
            (lat.cos() * lon.sin()) as f32,
            lat.sin() as f32,
        )
    }
}
