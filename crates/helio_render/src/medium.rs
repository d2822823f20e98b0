//! Participating medium with a constant scattering probability per unit length.

use crate::hittable::{HitRecord, Hittable};
use crate::material::Isotropic;
use crate::sampling::gen_f64;
use crate::texture::Texture;
use crate::{Color, Ray};
use helio_math::{Aabb, Interval, Vec3};
use std::sync::Arc;

/// A volume of fog or smoke bounded by another hittable.
///
/// Rays entering the boundary scatter after an exponentially distributed
/// free path instead of at the surface. The boundary must be a convex closed
/// shape: the hit test probes one entry point and one exit point only.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f64,
    phase_function: Isotropic,
}

impl ConstantMedium {
    /// Create a medium of the given density with a uniform albedo.
    pub fn new(boundary: Arc<dyn Hittable>, density: f64, albedo: Color) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(albedo),
        }
    }

    /// Create a medium whose albedo varies over a texture.
    pub fn with_texture(
        boundary: Arc<dyn Hittable>,
        density: f64,
        texture: Arc<dyn Texture>,
    ) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::with_texture(texture),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        // Find where the ray enters and leaves the boundary, searching the
        // whole line first so an origin inside the volume still works.
        let mut entry = HitRecord::default();
        let mut exit = HitRecord::default();

        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut entry) {
            return false;
        }

        // The exit search starts just past the entry, always forward along
        // the ray.
        if !self
            .boundary
            .hit(ray, Interval::new(entry.t + 0.001, f64::INFINITY), &mut exit)
        {
            return false;
        }

        // Crop the traversal to the queried window
        if entry.t < ray_t.min {
            entry.t = ray_t.min;
        }
        if exit.t > ray_t.max {
            exit.t = ray_t.max;
        }

        // After cropping, a medium entirely behind the ray inverts the points
        if entry.t >= exit.t {
            return false;
        }

        if entry.t < 0.0 {
            entry.t = 0.0;
        }

        let ray_length = ray.direction().length();
        let distance_inside = (exit.t - entry.t) * ray_length;

        // Exponential free path; the hit test itself is probabilistic, so the
        // generator lives in thread-local state rather than the signature.
        let mut rng = rand::thread_rng();
        let hit_distance = self.neg_inv_density * gen_f64(&mut rng).ln();

        if hit_distance > distance_inside {
            return false;
        }

        rec.t = entry.t + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        // Direction-free scattering: the normal and face are meaningless here
        rec.normal = Vec3::ZERO;
        rec.front_face = true;
        rec.u = 0.0;
        rec.v = 0.0;
        rec.material = &self.phase_function;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
