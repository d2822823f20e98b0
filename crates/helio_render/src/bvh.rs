//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Built once per scene over the final primitive list, then read-only during
//! rendering. Expected intersection cost is logarithmic in the number of
//! primitives.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::Ray;
use helio_math::{Aabb, Interval};
use std::sync::Arc;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
///
/// Using an enum keeps leaf dispatch cheap and avoids boxing every interior
/// node behind a trait object.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf {
        objects: Vec<Arc<dyn Hittable>>,
        bbox: Aabb,
    },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects)
    }

    /// Create a BVH over the contents of a hittable list.
    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    /// Recursive BVH construction.
    ///
    /// Median-split approach: sort objects by centroid on the axis with the
    /// widest centroid spread, split in half, recurse.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let n = objects.len();

        // Bounding box of all objects
        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        // Compute centroid bounds to choose the split axis
        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val
                .partial_cmp(&b_val)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Split at the midpoint
        let mid = n / 2;
        let right_objects = objects.split_off(mid);
        let left_objects = objects;

        BvhNode::Branch {
            left: Box::new(Self::build(left_objects)),
            right: Box::new(Self::build(right_objects)),
            bbox: bounds,
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;

                for obj in objects {
                    let interval = Interval::new(ray_t.min, closest);
                    if obj.hit(ray, interval, rec) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                // Subtrees may overlap, so the right child must be tried even
                // after a left hit; only the t window is tightened.
                let hit_left = left.hit(ray, ray_t, rec);
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Color, Lambertian};
    use crate::sampling::gen_range;
    use crate::{Material, Sphere, Vec3};
    use helio_math::Point3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));

        let ray = Ray::new_simple(Point3::ZERO, Vec3::Z);
        let mut rec = HitRecord::default();
        assert!(!bvh.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
    }

    #[test]
    fn test_bvh_single_sphere() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, gray());
        let objects: Vec<Arc<dyn Hittable>> = vec![Arc::new(sphere)];
        let bvh = BvhNode::new(objects);

        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));
        assert!((rec.t - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Arc<dyn Hittable>> = (0..10)
            .map(|i| {
                Arc::new(Sphere::new(Point3::new(i as f64, 0.0, -5.0), 0.5, gray()))
                    as Arc<dyn Hittable>
            })
            .collect();

        let bvh = BvhNode::new(spheres);

        let ray = Ray::new_simple(Point3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec));

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.p.z - (-4.5)).abs() < 1e-9);
    }

    #[test]
    fn test_bvh_agrees_with_linear_scan() {
        // Property check: traversal returns the same closest hit as brute force
        let mut rng = StdRng::seed_from_u64(2024);
        let material = gray();

        let objects: Vec<Arc<dyn Hittable>> = (0..64)
            .map(|_| {
                let center = Point3::new(
                    gen_range(&mut rng, -10.0, 10.0),
                    gen_range(&mut rng, -10.0, 10.0),
                    gen_range(&mut rng, -10.0, 10.0),
                );
                let radius = gen_range(&mut rng, 0.1, 2.0);
                Arc::new(Sphere::new(center, radius, material.clone())) as Arc<dyn Hittable>
            })
            .collect();

        let mut list = HittableList::new();
        for obj in &objects {
            list.add(obj.clone());
        }
        let bvh = BvhNode::new(objects);

        for _ in 0..200 {
            let origin = Point3::new(
                gen_range(&mut rng, -15.0, 15.0),
                gen_range(&mut rng, -15.0, 15.0),
                gen_range(&mut rng, -15.0, 15.0),
            );
            let direction = Vec3::new(
                gen_range(&mut rng, -1.0, 1.0),
                gen_range(&mut rng, -1.0, 1.0),
                gen_range(&mut rng, -1.0, 1.0),
            );
            if direction.length_squared() < 1e-6 {
                continue;
            }
            let ray = Ray::new_simple(origin, direction);

            let mut bvh_rec = HitRecord::default();
            let mut scan_rec = HitRecord::default();
            let window = Interval::new(0.001, f64::INFINITY);

            let bvh_hit = bvh.hit(&ray, window, &mut bvh_rec);
            let scan_hit = list.hit(&ray, window, &mut scan_rec);

            assert_eq!(bvh_hit, scan_hit);
            if bvh_hit {
                assert!((bvh_rec.t - scan_rec.t).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_bvh_bbox_encloses_children() {
        let spheres: Vec<Arc<dyn Hittable>> = (0..8)
            .map(|i| {
                Arc::new(Sphere::new(Point3::new(i as f64 * 3.0, 0.0, 0.0), 1.0, gray()))
                    as Arc<dyn Hittable>
            })
            .collect();

        let bounds: Vec<Aabb> = spheres.iter().map(|s| s.bounding_box()).collect();
        let bvh = BvhNode::new(spheres);
        let bbox = bvh.bounding_box();

        for b in bounds {
            assert!(bbox.x.contains(b.x.min) && bbox.x.contains(b.x.max));
            assert!(bbox.y.contains(b.y.min) && bbox.y.contains(b.y.max));
            assert!(bbox.z.contains(b.z.min) && bbox.z.contains(b.z.max));
        }
    }
}
