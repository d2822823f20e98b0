//! Core path tracing renderer.
//!
//! Recursive Monte Carlo integration over camera rays, parallelized across
//! scanlines with rayon. Each scanline owns a deterministically seeded
//! generator, so a fixed seed reproduces the image bit-for-bit regardless of
//! thread count.

use crate::hittable::{HitRecord, Hittable};
use crate::{Camera, Color, Ray};
use helio_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};

/// Lower bound of the hit window, eliminating self-intersection of a bounced
/// ray with the surface it just left ("shadow acne").
const HIT_EPSILON: f64 = 0.00001;

/// Compute the color seen by a ray.
///
/// This is the core path tracing function: it composes emission and
/// attenuation along a random walk until the ray escapes, is absorbed, or the
/// bounce budget runs out.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    // Bounce budget exhausted: no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();

    if !world.hit(ray, Interval::new(HIT_EPSILON, f64::INFINITY), &mut rec) {
        return background;
    }

    // Lights contribute even when the path ends here
    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        None => emission,
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Render a single pixel with multi-sampling.
///
/// j counts scanlines from the bottom of the image, matching the camera.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        let ray = camera.get_ray(i, j, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, camera.background, rng);
    }

    pixel_color / camera.samples_per_pixel as f64
}

/// Image buffer of linear RGB values; row 0 is the top of the image.
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl Framebuffer {
    /// Create a new framebuffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y), y counted from the top.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y), y counted from the top.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }
}

/// Render the scene seen by the camera into a framebuffer.
///
/// Scanlines are distributed over rayon workers; every row derives its own
/// StdRng from the base seed, so each pixel is accumulated by exactly one
/// worker and the output is independent of scheduling.
pub fn render(camera: &mut Camera, world: &dyn Hittable, seed: u64) -> Framebuffer {
    camera.initialize();
    let camera: &Camera = camera;

    let width = camera.image_width;
    let height = camera.image_height();
    let mut image = Framebuffer::new(width, height);

    log::info!(
        "Rendering {}x{} at {} spp on {} threads",
        width,
        height,
        camera.samples_per_pixel,
        rayon::current_num_threads()
    );
    let start = std::time::Instant::now();
    let remaining = AtomicU32::new(height);

    image
        .pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(row, out)| {
            let mut rng =
                StdRng::seed_from_u64(seed ^ (row as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15));

            // Row 0 of the buffer is the top scanline; the camera counts
            // scanlines from the bottom
            let j = height - 1 - row as u32;
            for (i, pixel) in out.iter_mut().enumerate() {
                *pixel = render_pixel(camera, world, i as u32, j, &mut rng);
            }

            let left = remaining.fetch_sub(1, Ordering::SeqCst) - 1;
            eprint!("\rScanlines remaining: {left} ");
        });

    eprintln!();
    log::info!("Image generated in {:.2?}", start.elapsed());

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{DiffuseLight, Lambertian};
    use crate::{BvhNode, HittableList, Quad, Sphere};
    use helio_math::{Point3, Vec3};
    use std::sync::Arc;

    #[test]
    fn test_depth_zero_is_black() {
        let world = HittableList::new();
        let ray = Ray::new_simple(Point3::ZERO, Vec3::Z);
        let mut rng = StdRng::seed_from_u64(1);

        let c = ray_color(&ray, &world, 0, Color::ONE, &mut rng);
        assert_eq!(c, Color::ZERO);
    }

    #[test]
    fn test_miss_returns_background() {
        let world = HittableList::new();
        let ray = Ray::new_simple(Point3::ZERO, Vec3::Z);
        let mut rng = StdRng::seed_from_u64(1);

        let background = Color::new(0.25, 0.5, 0.75);
        let c = ray_color(&ray, &world, 10, background, &mut rng);
        assert_eq!(c, background);
    }

    #[test]
    fn test_light_emission_reaches_ray() {
        let mut world = HittableList::new();
        world.add(Arc::new(Quad::new(
            Point3::new(-1.0, -1.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Arc::new(DiffuseLight::new(Color::new(4.0, 3.0, 2.0))),
        )));

        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(1);

        // The light absorbs the path, leaving pure emission
        let c = ray_color(&ray, &world, 10, Color::ZERO, &mut rng);
        assert_eq!(c, Color::new(4.0, 3.0, 2.0));
    }

    #[test]
    fn test_attenuated_bounce_stays_bounded() {
        let mut world = HittableList::new();
        world.add(Arc::new(Sphere::new(
            Point3::new(0.0, 0.0, -2.0),
            0.5,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        )));

        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(1);

        let c = ray_color(&ray, &world, 20, Color::ONE, &mut rng);
        for component in [c.x, c.y, c.z] {
            assert!(component.is_finite());
            assert!((0.0..=1.0).contains(&component));
        }
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_framebuffer_roundtrip() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set(2, 1, Color::new(0.1, 0.2, 0.3));
        assert_eq!(fb.get(2, 1), Color::new(0.1, 0.2, 0.3));
        assert_eq!(fb.get(0, 0), Color::ZERO);
        assert_eq!(fb.pixels.len(), 12);
    }

    #[test]
    fn test_empty_world_renders_background() {
        let mut camera = Camera::new()
            .with_image(1.0, 4)
            .with_quality(2, 5)
            .with_background(Color::ZERO);
        let world = HittableList::new();

        let image = render(&mut camera, &world, 0);
        assert_eq!(image.width, 4);
        assert_eq!(image.height, 4);
        for pixel in &image.pixels {
            assert_eq!(*pixel, Color::ZERO);
        }
    }

    #[test]
    fn test_render_is_deterministic_for_seed() {
        let build_world = || {
            let mut list = HittableList::new();
            list.add(Arc::new(Sphere::new(
                Point3::new(0.0, 0.0, -2.0),
                0.5,
                Arc::new(Lambertian::new(Color::splat(0.5))),
            )));
            BvhNode::from_list(list)
        };

        let mut camera_a = Camera::new()
            .with_image(1.0, 8)
            .with_quality(4, 8)
            .with_background(Color::new(0.7, 0.8, 1.0));
        let mut camera_b = camera_a.clone();

        let first = render(&mut camera_a, &build_world(), 99);
        let second = render(&mut camera_b, &build_world(), 99);

        assert_eq!(first.pixels, second.pixels);
    }
}
