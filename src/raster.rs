//! Software rasteriser backed by an [`image::RgbaImage`].
//!
//! Used for headless snapshots. Shapes are anti-aliased by pixel-centre
//! distance and composited with source-over blending, which is close enough
//! to a browser 2D canvas for the few primitives the field draws.

use std::path::Path;

use glam::{Vec2, Vec4};
use image::{Rgba, RgbaImage};

use crate::canvas::Canvas;

/// Canvas that draws into an in-memory RGBA image.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    image: RgbaImage,
    background: Rgba<u8>,
}

impl RasterCanvas {
    /// Create a canvas cleared to opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, [0.0, 0.0, 0.0])
    }

    /// Create a canvas that clears to `background` (RGB, 0.0-1.0).
    pub fn with_background(width: u32, height: u32, background: [f32; 3]) -> Self {
        let background = Rgba([
            to_u8(background[0]),
            to_u8(background[1]),
            to_u8(background[2]),
            255,
        ]);
        Self {
            image: RgbaImage::from_pixel(width, height, background),
            background,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Write the current image as a PNG.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.image.save(path)
    }

    /// Pixel bounds covering `[min, max]`, clipped to the image.
    fn region(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return None;
        }
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min((w - 1) as f32);
        let y1 = max.y.ceil().min((h - 1) as f32);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// Visit every pixel in `[min, max]` with its centre, blending `color`
    /// at the coverage `shade` returns.
    fn shade(&mut self, min: Vec2, max: Vec2, color: Vec4, shade: impl Fn(Vec2) -> f32) {
        let Some((x0, y0, x1, y1)) = self.region(min, max) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let coverage = shade(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn blend(&mut self, x: u32, y: u32, color: Vec4, coverage: f32) {
        let alpha = (color.w * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }

        let dst = self.image.get_pixel_mut(x, y);
        let dst_alpha = dst[3] as f32 / 255.0;
        let out_alpha = alpha + dst_alpha * (1.0 - alpha);

        for c in 0..3 {
            let src = color[c].clamp(0.0, 1.0);
            let prev = dst[c] as f32 / 255.0;
            dst[c] = to_u8((src * alpha + prev * dst_alpha * (1.0 - alpha)) / out_alpha);
        }
        dst[3] = to_u8(out_alpha);
    }
}

impl Canvas for RasterCanvas {
    fn clear(&mut self) {
        let background = self.background;
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
    }

    fn fill_disc(&mut self, center: Vec2, radius: f32, color: Vec4) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        let reach = Vec2::splat(radius + 1.0);
        self.shade(center - reach, center + reach, color, |p| {
            (radius + 0.5 - p.distance(center)).clamp(0.0, 1.0)
        });
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Vec4) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        let reach = Vec2::splat(radius);
        self.shade(center - reach, center + reach, color, |p| {
            (1.0 - p.distance(center) / radius).max(0.0)
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec4) {
        if width.is_nan() || width <= 0.0 {
            return;
        }
        // Hairlines are drawn one pixel wide at reduced alpha.
        let half = width.max(1.0) * 0.5;
        let thinning = width.min(1.0);
        let reach = Vec2::splat(half + 1.0);
        self.shade(from.min(to) - reach, from.max(to) + reach, color, |p| {
            (half + 0.5 - distance_to_segment(p, from, to)).clamp(0.0, 1.0) * thinning
        });
    }
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > 0.0 {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance(a + ab * t)
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

    fn red(canvas: &RasterCanvas, x: u32, y: u32) -> u8 {
        canvas.image().get_pixel(x, y)[0]
    }

    #[test]
    fn test_clear_restores_background() {
        let mut canvas = RasterCanvas::with_background(8, 8, [1.0, 0.0, 0.0]);
        canvas.fill_disc(Vec2::new(4.0, 4.0), 2.0, Vec4::new(0.0, 0.0, 1.0, 1.0));
        canvas.clear();
        assert!(canvas.image().pixels().all(|p| *p == Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn test_disc_covers_centre_not_corners() {
        let mut canvas = RasterCanvas::new(16, 16);
        canvas.fill_disc(Vec2::new(8.0, 8.0), 3.0, WHITE);

        assert_eq!(red(&canvas, 8, 8), 255);
        assert_eq!(red(&canvas, 0, 0), 0);
        assert_eq!(red(&canvas, 15, 15), 0);
    }

    #[test]
    fn test_disc_alpha_blends_over_background() {
        let mut canvas = RasterCanvas::new(8, 8);
        canvas.fill_disc(Vec2::new(4.0, 4.0), 3.0, Vec4::new(1.0, 1.0, 1.0, 0.5));
        let value = red(&canvas, 4, 4);
        assert!((126..=129).contains(&value), "got {value}");
    }

    #[test]
    fn test_glow_fades_outwards() {
        let mut canvas = RasterCanvas::new(32, 32);
        canvas.fill_glow(Vec2::new(16.0, 16.0), 12.0, WHITE);

        let centre = red(&canvas, 16, 16);
        let mid = red(&canvas, 22, 16);
        let outside = red(&canvas, 30, 16);
        assert!(centre > mid);
        assert!(mid > outside);
        assert_eq!(outside, 0);
    }

    #[test]
    fn test_line_follows_segment() {
        let mut canvas = RasterCanvas::new(32, 32);
        canvas.stroke_line(Vec2::new(2.0, 10.5), Vec2::new(30.0, 10.5), 1.0, WHITE);

        assert!(red(&canvas, 16, 10) > 200);
        assert_eq!(red(&canvas, 16, 20), 0);
    }

    #[test]
    fn test_hairline_is_dimmer() {
        let mut thick = RasterCanvas::new(32, 32);
        thick.stroke_line(Vec2::new(2.0, 10.5), Vec2::new(30.0, 10.5), 1.0, WHITE);
        let mut thin = RasterCanvas::new(32, 32);
        thin.stroke_line(Vec2::new(2.0, 10.5), Vec2::new(30.0, 10.5), 0.5, WHITE);

        assert!(red(&thin, 16, 10) < red(&thick, 16, 10));
        assert!(red(&thin, 16, 10) > 0);
    }

    #[test]
    fn test_offscreen_and_empty_are_harmless() {
        let mut canvas = RasterCanvas::new(8, 8);
        canvas.fill_disc(Vec2::new(-50.0, -50.0), 3.0, WHITE);
        canvas.stroke_line(Vec2::new(100.0, 100.0), Vec2::new(200.0, 120.0), 1.0, WHITE);
        canvas.fill_disc(Vec2::new(4.0, 4.0), f32::NAN, WHITE);
        canvas.fill_glow(Vec2::new(4.0, 4.0), -2.0, WHITE);
        canvas.stroke_line(Vec2::ZERO, Vec2::splat(8.0), f32::NAN, WHITE);
        assert!(canvas.image().pixels().all(|p| p[0] == 0));

        let mut empty = RasterCanvas::new(0, 0);
        empty.clear();
        empty.fill_glow(Vec2::ZERO, 5.0, WHITE);
        empty.stroke_line(Vec2::ZERO, Vec2::ONE, 0.5, WHITE);
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Vec2::new(-4.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Vec2::new(1.0, 1.0), a, a), 2f32.sqrt());
    }
}
