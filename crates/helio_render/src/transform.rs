//! Instance decorators: translation and rotation about the Y axis.
//!
//! Instead of moving the wrapped object, the incoming ray is moved into the
//! object's space, intersected there, and the hit is mapped back out. The
//! wrapped object never knows it was transformed.

use crate::hittable::{HitRecord, Hittable};
use crate::Ray;
use helio_math::{Aabb, Interval, Point3, Vec3};
use std::sync::Arc;

/// Moves a hittable by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    /// Wrap an object so it appears shifted by `offset`.
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        // Move the ray backwards by the offset instead of moving the object
        let offset_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        if !self.object.hit(&offset_ray, ray_t, rec) {
            return false;
        }

        // Move the intersection point forwards by the offset
        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rotates a hittable about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f64,
    cos_theta: f64,
    bbox: Aabb,
}

impl RotateY {
    /// Wrap an object so it appears rotated by `angle` degrees about Y.
    pub fn new(object: Arc<dyn Hittable>, angle: f64) -> Self {
        let radians = angle.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // The rotated bounding box is the componentwise hull of the eight
        // rotated corners of the original box. Y is unchanged.
        let bbox = object.bounding_box();
        let mut min = Point3::splat(f64::INFINITY);
        let mut max = Point3::splat(f64::NEG_INFINITY);

        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let x = if i == 0 { bbox.x.min } else { bbox.x.max };
                    let y = if j == 0 { bbox.y.min } else { bbox.y.max };
                    let z = if k == 0 { bbox.z.min } else { bbox.z.max };

                    let newx = cos_theta * x + sin_theta * z;
                    let newz = -sin_theta * x + cos_theta * z;

                    let corner = Vec3::new(newx, y, newz);
                    min = min.min(corner);
                    max = max.max(corner);
                }
            }
        }

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox: Aabb::from_points(min, max),
        }
    }

    /// Rotate a vector from world space into object space (by -theta).
    fn to_object(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    /// Rotate a vector from object space back into world space (by +theta).
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        // Rotate the ray into object space
        let rotated = Ray::new(
            self.to_object(ray.origin()),
            self.to_object(ray.direction()),
            ray.time(),
        );

        if !self.object.hit(&rotated, ray_t, rec) {
            return false;
        }

        // Rotate the hit back into world space
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
