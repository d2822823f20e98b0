//! Plain-text PPM (P3) image output.

use crate::renderer::{linear_to_gamma, Framebuffer};
use std::io::{self, Write};

/// Convert a linear channel value to the 8-bit output range.
///
/// Gamma-2 correction followed by a clamp just below 1.0, so that 255 is as
/// likely as every other value and out-of-range radiance cannot overflow.
fn channel_to_byte(c: f64) -> u32 {
    (linear_to_gamma(c).clamp(0.0, 0.999999) * 256.0) as u32
}

/// Write the framebuffer as an ASCII P3 PPM image.
///
/// Header is `P3`, dimensions, then the 255 maximum; the body holds one
/// `R G B` line per pixel, top scanline first, left to right.
pub fn write_ppm<W: Write>(out: &mut W, image: &Framebuffer) -> io::Result<()> {
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", image.width, image.height)?;
    writeln!(out, "255")?;

    for pixel in &image.pixels {
        writeln!(
            out,
            "{} {} {}",
            channel_to_byte(pixel.x),
            channel_to_byte(pixel.y),
            channel_to_byte(pixel.z)
        )?;
    }

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn written(image: &Framebuffer) -> String {
        let mut buf = Vec::new();
        write_ppm(&mut buf, image).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_ppm_header() {
        let image = Framebuffer::new(3, 2);
        let text = written(&image);
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("P3"));
        assert_eq!(lines.next(), Some("3 2"));
        assert_eq!(lines.next(), Some("255"));
        assert_eq!(text.lines().count(), 3 + 6);
    }

    #[test]
    fn test_ppm_gamma_and_clamp() {
        let mut image = Framebuffer::new(3, 1);
        // sqrt(0.25) = 0.5 -> 128
        image.set(0, 0, Color::splat(0.25));
        // Full white clamps just below 1.0 -> 255
        image.set(1, 0, Color::ONE);
        // Out-of-range radiance clamps too
        image.set(2, 0, Color::splat(9.0));

        let text = written(&image);
        let body: Vec<&str> = text.lines().skip(3).collect();
        assert_eq!(body, vec!["128 128 128", "255 255 255", "255 255 255"]);
    }

    #[test]
    fn test_ppm_black() {
        let image = Framebuffer::new(1, 1);
        let text = written(&image);
        assert_eq!(text.lines().last(), Some("0 0 0"));
    }

    #[test]
    fn test_ppm_top_row_first() {
        let mut image = Framebuffer::new(1, 2);
        image.set(0, 0, Color::new(1.0, 0.0, 0.0)); // top pixel
        image.set(0, 1, Color::new(0.0, 1.0, 0.0)); // bottom pixel

        let text = written(&image);
        let body: Vec<&str> = text.lines().skip(3).collect();
        assert_eq!(body[0], "255 0 0");
        assert_eq!(body[1], "0 255 0");
    }
}
