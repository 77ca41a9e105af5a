//! Procedural status bar glyphs
//!
//! Every built-in icon is drawn in code; the binary ships no image assets.
//! Glyphs are rendered as template images so the menu bar adapts them to
//! light and dark appearance.

use image::{Rgba, RgbaImage};

use super::toggle::ControllerGlyph;
use crate::animation::FRAME_SIZE;

/// Frames in one loop of the built-in pulse animation
pub const BUILTIN_FRAME_COUNT: usize = 12;

const OPAQUE_WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const DIM_WHITE: Rgba<u8> = Rgba([255, 255, 255, 170]);

/// Render the controller's static glyph: a filled dot while idle, an open
/// ring while sweeping.
pub fn controller_glyph(glyph: ControllerGlyph) -> RgbaImage {
    match glyph {
        ControllerGlyph::Idle => filled_circle(4.0),
        ControllerGlyph::Sweeping => ring(4.0, 2.2),
    }
}

/// The spacer's marker dot, smaller and dimmer than the controller's
pub fn spacer_dot() -> RgbaImage {
    circle_image(2.0, DIM_WHITE)
}

/// Frames of the built-in pulse animation, used when no GIF is selected.
/// The dot swells and settles over one loop.
pub fn builtin_frames() -> Vec<RgbaImage> {
    (0..BUILTIN_FRAME_COUNT)
        .map(|i| {
            let phase = i as f64 / BUILTIN_FRAME_COUNT as f64;
            let t = (phase * std::f64::consts::PI * 2.0).sin() * 0.5 + 0.5;
            filled_circle(3.0 + t * 2.0)
        })
        .collect()
}

fn filled_circle(radius: f64) -> RgbaImage {
    circle_image(radius, OPAQUE_WHITE)
}

fn ring(radius: f64, hole: f64) -> RgbaImage {
    let mut img = circle_image(radius, OPAQUE_WHITE);
    punch_hole(&mut img, hole);
    img
}

fn circle_image(radius: f64, color: Rgba<u8>) -> RgbaImage {
    let mut img = RgbaImage::new(FRAME_SIZE, FRAME_SIZE);
    let center = FRAME_SIZE as f64 / 2.0 - 0.5;
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as f64 - center;
        let dy = y as f64 - center;
        if (dx * dx + dy * dy).sqrt() <= radius {
            *pixel = color;
        }
    }
    img
}

fn punch_hole(img: &mut RgbaImage, hole: f64) {
    let center = FRAME_SIZE as f64 / 2.0 - 0.5;
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as f64 - center;
        let dy = y as f64 - center;
        if (dx * dx + dy * dy).sqrt() < hole {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: u32 = FRAME_SIZE / 2;

    #[test]
    fn test_idle_glyph_is_a_filled_dot() {
        let img = controller_glyph(ControllerGlyph::Idle);
        assert_eq!(img.dimensions(), (FRAME_SIZE, FRAME_SIZE));
        assert_eq!(img.get_pixel(CENTER, CENTER).0[3], 255);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_sweeping_glyph_is_an_open_ring() {
        let img = controller_glyph(ControllerGlyph::Sweeping);
        // Hollow center, solid band
        assert_eq!(img.get_pixel(CENTER, CENTER).0[3], 0);
        assert_eq!(img.get_pixel(CENTER + 3, CENTER).0[3], 255);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_glyphs_differ_by_state() {
        let idle = controller_glyph(ControllerGlyph::Idle);
        let sweeping = controller_glyph(ControllerGlyph::Sweeping);
        assert_ne!(idle.as_raw(), sweeping.as_raw());
    }

    #[test]
    fn test_spacer_dot_is_small_and_dim() {
        let img = spacer_dot();
        assert_eq!(img.get_pixel(CENTER, CENTER).0[3], 170);
        assert_eq!(img.get_pixel(CENTER + 4, CENTER).0[3], 0);
    }

    #[test]
    fn test_builtin_frames_shape() {
        let frames = builtin_frames();
        assert_eq!(frames.len(), BUILTIN_FRAME_COUNT);
        for frame in &frames {
            assert_eq!(frame.dimensions(), (FRAME_SIZE, FRAME_SIZE));
            assert_eq!(frame.get_pixel(CENTER, CENTER).0[3], 255);
        }
    }
}
