//! Planar quadrilateral primitive, and the six-quad box builder.

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    Material, Ray,
};
use helio_math::{Aabb, Interval, Point3, Vec3};
use std::sync::Arc;

/// A parallelogram defined by a corner Q and two edge vectors u and v.
///
/// Q is one corner; Q+u and Q+v are the adjacent corners and Q+u+v the
/// opposite one. The plane data (normal, D, w) is precomputed so a hit costs
/// one plane intersection plus two dot products for the inside test.
pub struct Quad {
    q: Point3,
    u: Vec3,
    v: Vec3,
    material: Arc<dyn Material>,
    bbox: Aabb,
    normal: Vec3,
    /// Constant D of the plane equation normal . p = D
    d: f64,
    /// Cached (u x v) / |u x v|^2, used to solve for the planar coordinates
    w: Vec3,
}

impl Quad {
    /// Create a quad from a corner point and two edge vectors.
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();

        Self {
            q,
            u,
            v,
            material,
            bbox: Aabb::from_points(q, q + u + v),
            normal,
            d: normal.dot(q),
            w: n / n.dot(n),
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let denom = self.normal.dot(ray.direction());

        // Ray parallel (or nearly so) to the plane
        if denom.abs() < 1e-8 {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        // Solve p = alpha*u + beta*v for the planar coordinates of the hit
        let intersection = ray.at(t);
        let planar_hit = intersection - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return false;
        }

        rec.t = t;
        rec.p = intersection;
        rec.u = alpha;
        rec.v = beta;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Build an axis-aligned box from two opposite corners as six quads.
///
/// A box is not a primitive; it is a list of its faces, all sharing one
/// material.
pub fn make_box(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let min = Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
    let max = Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    // front
    sides.add(Arc::new(Quad::new(
        Point3::new(min.x, min.y, max.z),
        dx,
        dy,
        material.clone(),
    )));
    // right
    sides.add(Arc::new(Quad::new(
        Point3::new(max.x, min.y, max.z),
        -dz,
        dy,
        material.clone(),
    )));
    // back
    sides.add(Arc::new(Quad::new(
        Point3::new(max.x, min.y, min.z),
        -dx,
        dy,
        material.clone(),
    )));
    // left
    sides.add(Arc::new(Quad::new(
        Point3::new(min.x, min.y, min.z),
        dz,
        dy,
        material.clone(),
    )));
    // top
    sides.add(Arc::new(Quad::new(
        Point3::new(min.x, max.y, max.z),
        dx,
        -dz,
        material.clone(),
    )));
    // bottom
    sides.add(Arc::new(Quad::new(
        Point3::new(min.x, min.y, min.z),
        dx,
        dz,
        material,
    )));

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Lambertian};

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_quad_center_hit() {
        let quad = Quad::new(
            Point3::new(-2.0, -2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            gray(),
        );

        let ray = Ray::new_simple(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(quad.hit(&ray, Interval::new(0.00001, f64::INFINITY), &mut rec));
        assert!((rec.t - 5.0).abs() < 1e-9);
        assert!(rec.p.length() < 1e-9);
        assert!((rec.u - 0.5).abs() < 1e-9);
        assert!((rec.v - 0.5).abs() < 1e-9);
        // Normal faces back toward the ray
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_quad_outside_bounds_rejected() {
        let quad = Quad::new(
            Point3::new(-2.0, -2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            gray(),
        );

        // Hits the plane at x=3, outside the quad
        let ray = Ray::new_simple(Point3::new(3.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(!quad.hit(&ray, Interval::new(0.00001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn test_quad_parallel_ray_rejected() {
        let quad = Quad::new(
            Point3::new(-2.0, -2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            gray(),
        );

        let ray = Ray::new_simple(Point3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 0.0));
        let mut rec = HitRecord::default();
        assert!(!quad.hit(&ray, Interval::new(0.00001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn test_quad_corner_uv() {
        let quad = Quad::new(
            Point3::new(-2.0, -2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            gray(),
        );

        // Aim near the Q+u+v corner
        let ray = Ray::new_simple(Point3::new(1.9, 1.9, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(quad.hit(&ray, Interval::new(0.00001, f64::INFINITY), &mut rec));
        assert!(rec.u > 0.9 && rec.v > 0.9);
    }

    #[test]
    fn test_quad_bbox_is_padded() {
        // The quad lies in the z=0 plane; its box must still have depth
        let quad = Quad::new(
            Point3::new(-2.0, -2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            gray(),
        );
        assert!(quad.bounding_box().z.size() >= 0.0001);
    }

    #[test]
    fn test_make_box_has_six_faces() {
        let b = make_box(Point3::ZERO, Point3::new(1.0, 2.0, 3.0), gray());
        assert_eq!(b.len(), 6);

        let bbox = b.bounding_box();
        assert!(bbox.x.contains(0.5) && bbox.y.contains(1.9) && bbox.z.contains(2.9));
    }

    #[test]
    fn test_make_box_hit_all_axes() {
        let b = make_box(
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, 1.0),
            gray(),
        );

        for dir in [Vec3::X, Vec3::Y, Vec3::Z, -Vec3::X, -Vec3::Y, -Vec3::Z] {
            let ray = Ray::new_simple(Point3::ZERO + 5.0 * dir, -dir);
            let mut rec = HitRecord::default();
            assert!(b.hit(&ray, Interval::new(0.00001, f64::INFINITY), &mut rec));
            assert!((rec.t - 4.0).abs() < 1e-9);
            // Normals always face the incoming ray
            assert!(rec.normal.dot(ray.direction()) < 0.0);
        }
    }
}
