//! Math primitives for the Helio path tracer.
//!
//! All geometry is double precision: `Vec3` is an alias of `glam::DVec3`.

pub use glam::DVec3;

/// 3D vector type used for directions, offsets and colors.
pub type Vec3 = DVec3;
/// Alias used where a value denotes a position rather than a direction.
pub type Point3 = DVec3;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
