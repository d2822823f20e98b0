//! Thin-lens camera for primary ray generation.

use crate::sampling::{gen_f64, gen_range, random_in_unit_disk};
use crate::{Color, Ray};
use helio_math::{Point3, Vec3};
use rand::RngCore;

/// Camera generating rays through a viewport centered on the focus plane.
///
/// Configure the public fields (or use the with_* helpers), then call
/// `initialize` before asking for rays. The focus distance is the distance
/// from the camera to `look_at`, so the look target is always in perfect
/// focus when depth of field is enabled.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixel count
    pub image_width: u32,
    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Point the camera is looking from
    pub look_from: Point3,
    /// Point the camera is looking at (on the focus plane)
    pub look_at: Point3,
    /// Camera-relative "up" direction
    pub vup: Vec3,
    /// Lens diameter; 0 disables depth of field
    pub aperture: f64,
    /// Number of random samples for each pixel (anti-aliasing)
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Color returned by rays that escape the scene
    pub background: Color,

    // Cached values computed by initialize()
    image_height: u32,
    lens_radius: f64,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    lower_left_corner: Point3,
    initialized: bool,
}

impl Camera {
    /// Create a camera with default settings.
    pub fn new() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            vfov: 90.0,
            look_from: Point3::ZERO,
            look_at: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            aperture: 0.0,
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            image_height: 0,
            lens_radius: 0.0,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            lower_left_corner: Point3::ZERO,
            initialized: false,
        }
    }

    /// Set image shape.
    pub fn with_image(mut self, aspect_ratio: f64, image_width: u32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.image_width = image_width;
        self
    }

    /// Set camera position and orientation.
    pub fn with_view(mut self, look_from: Point3, look_at: Point3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set field of view and lens aperture.
    pub fn with_lens(mut self, vfov: f64, aperture: f64) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self
    }

    /// Set sampling quality.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set the background color for escaping rays.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Image height derived from the width and aspect ratio.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Compute the camera basis and viewport from the current settings.
    ///
    /// Idempotent; must run before `get_ray`.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        self.image_height = ((self.image_width as f64 / self.aspect_ratio) as u32).max(1);

        // Camera basis: w points opposite the view direction so that u, v, w
        // stay right-handed like the world axes
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        let focus_distance = (self.look_from - self.look_at).length();

        let viewport_height = 2.0 * (self.vfov.to_radians() / 2.0).tan();
        // Recompute the aspect ratio from the integer dimensions: rounding
        // the height may have changed it slightly
        let viewport_width = (self.image_width as f64 / self.image_height as f64) * viewport_height;

        self.horizontal = viewport_width * self.u * focus_distance;
        self.vertical = viewport_height * self.v * focus_distance;
        self.lower_left_corner =
            self.look_from - self.horizontal / 2.0 - self.vertical / 2.0 - self.w * focus_distance;

        self.lens_radius = self.aperture / 2.0;
        self.initialized = true;

        log::debug!(
            "Camera initialized: {}x{}, vfov {}, focus distance {:.3}",
            self.image_width,
            self.image_height,
            self.vfov,
            focus_distance
        );
    }

    /// Generate a ray through pixel (i, j) with jittered sampling.
    ///
    /// j counts scanlines from the bottom of the image. The ray's time is
    /// drawn from U(0, 1) for motion blur.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let s = (i as f64 + gen_range(rng, 0.0, 0.9)) / (self.image_width - 1) as f64;
        let t = (j as f64 + gen_range(rng, 0.0, 0.9)) / (self.image_height - 1) as f64;

        // Depth of field: source the ray from a random point on the lens disk
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;

        Ray::new(
            self.look_from + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.look_from
                - offset,
            gen_f64(rng),
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_image_height_from_aspect_ratio() {
        let mut camera = Camera::new().with_image(16.0 / 9.0, 400);
        camera.initialize();
        assert_eq!(camera.image_height(), 225);

        let mut square = Camera::new().with_image(1.0, 600);
        square.initialize();
        assert_eq!(square.image_height(), 600);
    }

    #[test]
    fn test_camera_basis() {
        let mut camera = Camera::new().with_view(
            Point3::ZERO,
            Point3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        camera.initialize();

        assert!((camera.w - Vec3::Z).length() < 1e-12);
        assert!((camera.u - Vec3::X).length() < 1e-12);
        assert!((camera.v - Vec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let mut camera = Camera::new()
            .with_image(1.0, 101)
            .with_view(Point3::ZERO, Point3::new(0.0, 0.0, -1.0), Vec3::Y);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(5);
        let ray = camera.get_ray(50, 50, &mut rng);
        let dir = ray.direction().normalize();
        assert!(dir.z < -0.9);
        assert_eq!(ray.origin(), Point3::ZERO);
    }

    #[test]
    fn test_ray_time_in_unit_interval() {
        let mut camera = Camera::new();
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let ray = camera.get_ray(10, 10, &mut rng);
            assert!((0.0..1.0).contains(&ray.time()));
        }
    }

    #[test]
    fn test_aperture_offsets_origin() {
        let mut camera = Camera::new().with_lens(90.0, 2.0).with_view(
            Point3::new(0.0, 0.0, 5.0),
            Point3::ZERO,
            Vec3::Y,
        );
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(5);
        let mut saw_offset = false;
        for _ in 0..50 {
            let ray = camera.get_ray(10, 10, &mut rng);
            let offset = ray.origin() - Point3::new(0.0, 0.0, 5.0);
            // Lens samples stay inside the aperture disk
            assert!(offset.length() < 1.0 + 1e-9);
            if offset.length() > 1e-6 {
                saw_offset = true;
            }
        }
        assert!(saw_offset);
    }
}
