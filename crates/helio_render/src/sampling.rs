//! Random sampling helpers.
//!
//! Generators are threaded explicitly as `&mut dyn RngCore` so every caller
//! controls seeding; the renderer hands each scanline its own seeded StdRng.

use crate::Vec3;
use rand::{Rng, RngCore};

/// Generate a random f64 in [0.0, 1.0).
#[inline]
pub fn gen_f64(rng: &mut dyn RngCore) -> f64 {
    rng.gen::<f64>()
}

/// Generate a random f64 in [min, max).
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f64, max: f64) -> f64 {
    min + (max - min) * gen_f64(rng)
}

/// Generate a random vector inside the unit sphere.
///
/// Rejection sampling; the distribution is uniform over the ball's volume.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Generate a random unit vector, uniform over the sphere's surface.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        // Guard against normalizing a vanishingly small sample
        if len_sq > 1e-160 {
            return p / len_sq.sqrt();
        }
    }
}

/// Generate a random point inside the unit disk in the XY plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
