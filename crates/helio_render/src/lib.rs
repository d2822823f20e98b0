//! Helio render core - CPU path tracing.
//!
//! A Monte Carlo path tracer: rays are generated by a thin-lens camera,
//! intersected against a BVH-indexed scene of spheres, quads, transformed
//! objects and participating media, and shaded by recursively sampling
//! material scattering and emission.

mod bvh;
mod camera;
mod hittable;
mod material;
mod medium;
mod ppm;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod texture;
mod transform;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use medium::ConstantMedium;
pub use ppm::write_ppm;
pub use quad::{make_box, Quad};
pub use renderer::{linear_to_gamma, ray_color, render, render_pixel, Framebuffer};
pub use sampling::{gen_f64, gen_range, random_in_unit_disk, random_in_unit_sphere, random_unit_vector};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, SolidColor, Texture, TextureError};
pub use transform::{RotateY, Translate};

/// Re-export the shared math types.
pub use helio_math::{Aabb, Interval, Point3, Ray, Vec3};
