//! GIF animation decoding
//!
//! The selected GIF is decoded once at load time into fixed-size frames for
//! the controller icon. Near-white pixels become transparent, since the
//! animations this tool is typically fed are drawn on a white canvas that
//! would otherwise show up as a solid block in the menu bar.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use image::codecs::gif::GifDecoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, Rgba, RgbaImage};
use thiserror::Error;

/// Edge length of a rendered status bar icon, in points
pub const FRAME_SIZE: u32 = 22;

/// Delay between animation frames
pub const FRAME_INTERVAL: Duration = Duration::from_millis(150);

/// Channel value above which a pixel counts as white background
const WHITE_THRESHOLD: u8 = 240;

/// Animation loading errors
#[derive(Debug, Error)]
pub enum AnimationError {
    #[error("could not open animation file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode animation: {0}")]
    Decode(#[from] image::ImageError),
    #[error("animation contains no frames")]
    Empty,
}

/// A decoded animation with a cyclic frame cursor
#[derive(Debug, Clone)]
pub struct FrameSequence {
    frames: Vec<RgbaImage>,
    index: usize,
}

impl FrameSequence {
    pub fn new(frames: Vec<RgbaImage>) -> Result<Self, AnimationError> {
        if frames.is_empty() {
            return Err(AnimationError::Empty);
        }
        Ok(Self { frames, index: 0 })
    }

    /// Decode a GIF file into `FRAME_SIZE` frames
    pub fn load_gif(path: &Path) -> Result<Self, AnimationError> {
        let reader = BufReader::new(File::open(path)?);
        let decoder = GifDecoder::new(reader)?;
        let frames = decoder
            .into_frames()
            .collect_frames()?
            .into_iter()
            .map(|frame| prepare_frame(frame.into_buffer()))
            .collect();
        Self::new(frames)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The frame currently on display
    pub fn current(&self) -> &RgbaImage {
        &self.frames[self.index]
    }

    /// Advance the cursor cyclically and return the new frame
    pub fn advance(&mut self) -> &RgbaImage {
        self.index = (self.index + 1) % self.frames.len();
        &self.frames[self.index]
    }
}

/// Scale a frame to icon size and knock out the white background
fn prepare_frame(buffer: RgbaImage) -> RgbaImage {
    let mut scaled = image::imageops::resize(&buffer, FRAME_SIZE, FRAME_SIZE, FilterType::Nearest);
    for pixel in scaled.pixels_mut() {
        let Rgba([r, g, b, _]) = *pixel;
        if r > WHITE_THRESHOLD && g > WHITE_THRESHOLD && b > WHITE_THRESHOLD {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
    scaled
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::Frame;

    fn write_gif(path: &Path, colors: &[[u8; 4]]) {
        let file = File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        let frames: Vec<Frame> = colors
            .iter()
            .map(|c| Frame::new(RgbaImage::from_pixel(8, 8, Rgba(*c))))
            .collect();
        encoder.encode_frames(frames).unwrap();
    }

    #[test]
    fn test_load_gif_scales_frames_to_icon_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        write_gif(&path, &[[200, 30, 30, 255], [30, 200, 30, 255]]);

        let seq = FrameSequence::load_gif(&path).unwrap();
        assert_eq!(seq.frame_count(), 2);
        assert_eq!(seq.current().dimensions(), (FRAME_SIZE, FRAME_SIZE));
    }

    #[test]
    fn test_load_gif_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FrameSequence::load_gif(&dir.path().join("missing.gif")).unwrap_err();
        assert!(matches!(err, AnimationError::Io(_)));
    }

    #[test]
    fn test_load_gif_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.gif");
        std::fs::write(&path, b"definitely not a gif").unwrap();

        let err = FrameSequence::load_gif(&path).unwrap_err();
        assert!(matches!(err, AnimationError::Decode(_)));
    }

    #[test]
    fn test_white_background_becomes_transparent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("white.gif");
        write_gif(&path, &[[255, 255, 255, 255]]);

        let seq = FrameSequence::load_gif(&path).unwrap();
        assert!(seq.current().pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_dark_pixels_stay_opaque() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dark.gif");
        write_gif(&path, &[[40, 40, 40, 255]]);

        let seq = FrameSequence::load_gif(&path).unwrap();
        assert!(seq.current().pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_advance_wraps_cyclically() {
        let frames = vec![
            RgbaImage::from_pixel(2, 2, Rgba([1, 0, 0, 255])),
            RgbaImage::from_pixel(2, 2, Rgba([2, 0, 0, 255])),
            RgbaImage::from_pixel(2, 2, Rgba([3, 0, 0, 255])),
        ];
        let mut seq = FrameSequence::new(frames).unwrap();

        assert_eq!(seq.current().get_pixel(0, 0).0[0], 1);
        assert_eq!(seq.advance().get_pixel(0, 0).0[0], 2);
        assert_eq!(seq.advance().get_pixel(0, 0).0[0], 3);
        assert_eq!(seq.advance().get_pixel(0, 0).0[0], 1);
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        assert!(matches!(
            FrameSequence::new(Vec::new()),
            Err(AnimationError::Empty)
        ));
    }
}
