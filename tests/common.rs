#![allow(dead_code)]

use image::codecs::gif::{GifEncoder, Repeat};
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, Delay, Frame, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

pub fn write_jpg(path: &Path) {
    let img = RgbImage::from_fn(80, 60, |x, y| Rgb([(x * 3) as u8, (y * 4) as u8, 90]));
    img.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

pub fn write_png(path: &Path) {
    let img = RgbaImage::from_fn(40, 40, |x, y| Rgba([(x * 6) as u8, (y * 6) as u8, 30, 200]));
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

pub fn write_gif(path: &Path, frame_count: u8) {
    let file = File::create(path).unwrap();
    let mut encoder = GifEncoder::new(file);
    encoder.set_repeat(Repeat::Infinite).unwrap();
    let frames = (0..frame_count).map(|i| {
        let img = RgbaImage::from_fn(32, 32, |x, _| {
            if x < u32::from(i) * 8 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(80, 1))
    });
    encoder.encode_frames(frames).unwrap();
}

pub fn write_corrupt(path: &Path) {
    fs::write(path, b"this is not an image at all").unwrap();
}

/// `(is_animated, frame_count)` of a WebP file.
pub fn webp_frames(path: &Path) -> (bool, usize) {
    let reader = BufReader::new(File::open(path).unwrap());
    let decoder = WebPDecoder::new(reader).unwrap();
    if !decoder.has_animation() {
        return (false, 1);
    }
    let frames = decoder.into_frames().collect_frames().unwrap();
    (true, frames.len())
}
