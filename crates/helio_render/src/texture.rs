//! Textures for surface and volume colors.
//!
//! A texture maps (u, v) coordinates and a world-space point to a color,
//! which lets spatial patterns (the checker) ignore UVs entirely.

use crate::Color;
use helio_math::Point3;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading an image texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for textures that can be sampled at a surface point.
pub trait Texture: Send + Sync {
    /// Color of the texture at UV coordinates (u, v) and world point p.
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// A texture with a single uniform color.
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    /// Create a solid color texture.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    /// Create a solid color texture from individual RGB components.
    pub fn from_rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.albedo
    }
}

/// A 3D checker pattern alternating between two textures.
///
/// The pattern is spatial: parity of the summed integer lattice coordinates
/// of p/scale selects the even or odd texture.
pub struct CheckerTexture {
    inv_scale: f64,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    /// Create a checker of two solid colors with the given cell scale.
    pub fn new(scale: f64, even: Color, odd: Color) -> Self {
        Self::with_textures(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }

    /// Create a checker alternating between two arbitrary textures.
    pub fn with_textures(scale: f64, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        // Signed floors, so the pattern continues across negative coordinates
        let x = (p.x * self.inv_scale).floor() as i64;
        let y = (p.y * self.inv_scale).floor() as i64;
        let z = (p.z * self.inv_scale).floor() as i64;

        if (x + y + z) % 2 == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Decoded image pixels in linear RGB.
struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl RasterImage {
    fn load(path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path)?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        let pixels = rgb
            .pixels()
            .map(|p| {
                Color::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }
}

/// A texture that samples a decoded image by UV coordinates.
///
/// Loading is best-effort: a missing or unreadable file is logged and the
/// texture then answers every lookup with a solid red fallback, so the render
/// still completes.
pub struct ImageTexture {
    image: Option<RasterImage>,
}

/// Color returned when the backing image could not be loaded.
const FALLBACK_COLOR: Color = Color::new(1.0, 0.0, 0.0);

impl ImageTexture {
    /// Load an image texture from a file path.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let image = match RasterImage::load(path) {
            Ok(image) => {
                log::debug!(
                    "Loaded texture {} ({}x{})",
                    path.display(),
                    image.width,
                    image.height
                );
                Some(image)
            }
            Err(e) => {
                log::warn!(
                    "Failed to load texture {}: {}; using fallback color",
                    path.display(),
                    e
                );
                None
            }
        };
        Self { image }
    }

    /// Whether the backing image was loaded successfully.
    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        let Some(image) = &self.image else {
            return FALLBACK_COLOR;
        };

        let u = u.clamp(0.0, 1.0);
        // Image rows run top to bottom, texture v runs bottom to top
        let v = 1.0 - v.clamp(0.0, 1.0);

        let x = (u * image.width as f64) as u32;
        let y = (v * image.height as f64) as u32;
        image.pixel(x, y)
    }
}

/// Convert an sRGB byte value to a linear float.
fn srgb_to_linear(value: u8) -> f64 {
    let v = value as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
