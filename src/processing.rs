use crate::animation::AnimationEncoder;
use crate::constants::{
    DEFAULT_FRAME_DELAY_MS, INFINITE_LOOP, TEMP_FILE_PREFIX, TEMP_FILE_SUFFIX, WEBP_EXTENSION,
};
use crate::discovery::DiscoveredFile;
use crate::error::{ConversionError, Result};
use crate::formats::ImageKind;
use crate::options::{ConversionRequest, EncodeSettings};
use crate::verbose;
use image::codecs::gif::GifDecoder;
use image::metadata::LoopCount;
use image::{AnimationDecoder, DynamicImage, ImageReader, RgbaImage};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use webp::{Encoder, PixelLayout, WebPConfig};

/// Sizes and shape of a successfully written WebP file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertedImage {
    pub original_size: u64,
    pub converted_size: u64,
    pub animated: bool,
    pub frame_count: usize,
    pub original_deleted: bool,
}

/// The result of converting one discovered file. Built once, never mutated.
#[derive(Debug)]
pub struct ConversionOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: ImageKind,
    pub result: Result<ConvertedImage>,
    /// Set when the conversion succeeded but removing the source failed
    pub warning: Option<String>,
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&ConversionError> {
        self.result.as_ref().err()
    }

    pub fn converted(&self) -> Option<&ConvertedImage> {
        self.result.as_ref().ok()
    }

    pub fn is_animated(&self) -> bool {
        self.converted().map_or(false, |c| c.animated)
    }
}

/// One composited GIF frame and how long it stays on screen.
pub struct AnimationFrame {
    pub buffer: RgbaImage,
    pub delay_ms: u32,
}

/// A decoded source, either a single picture or a full animation.
pub enum SourceImage {
    Still(DynamicImage),
    Animation {
        frames: Vec<AnimationFrame>,
        /// Number of plays; `INFINITE_LOOP` repeats forever
        loop_count: u16,
    },
}

impl SourceImage {
    pub fn frame_count(&self) -> usize {
        match self {
            SourceImage::Still(_) => 1,
            SourceImage::Animation { frames, .. } => frames.len(),
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, SourceImage::Animation { .. })
    }
}

/// Where the WebP for `file` goes: same relative path under `output_dir`,
/// extension replaced with `.webp`.
pub fn destination_path(file: &DiscoveredFile, output_dir: &Path) -> PathBuf {
    output_dir.join(file.relative_path.with_extension(WEBP_EXTENSION))
}

/// Converts one file and captures every failure in the returned outcome.
///
/// # Arguments
/// * `file` - The discovered source image
/// * `request` - Run-wide settings
///
/// # Returns
/// * A `ConversionOutcome`; this function never fails
pub fn convert_file(file: &DiscoveredFile, request: &ConversionRequest) -> ConversionOutcome {
    let destination = destination_path(file, request.output_dir());

    let mut warning = None;
    let result = convert_to_webp(&file.path, file.kind, &destination, request).map(|mut converted| {
        if request.delete_original {
            match remove_original(&file.path, &destination) {
                Ok(()) => converted.original_deleted = true,
                Err(e) => warning = Some(format!("Failed to delete original file: {}", e)),
            }
        }
        converted
    });

    ConversionOutcome {
        source: file.path.clone(),
        destination,
        kind: file.kind,
        result,
        warning,
    }
}

/// Core conversion pipeline: stat -> decode -> encode -> write -> stat
///
/// # Returns
/// * `Ok(ConvertedImage)` - Sizes come from the filesystem, not estimates
/// * `Err(ConversionError)` - `Decode`, `Encode` or `Io`; no output file is left behind
pub fn convert_to_webp(
    source: &Path,
    kind: ImageKind,
    destination: &Path,
    request: &ConversionRequest,
) -> Result<ConvertedImage> {
    let original_size = fs::metadata(source)?.len();
    if original_size == 0 {
        return Err(ConversionError::Decode("empty file".to_string()));
    }

    let image = load_source_image(source, kind, request.preserve_animation)?;
    verbose!(
        "{}: decoded {} frame(s)",
        source.display(),
        image.frame_count()
    );

    let bytes = encode_webp(&image, &request.encode)?;
    write_atomically(destination, &bytes)?;

    let converted_size = fs::metadata(destination)?.len();

    Ok(ConvertedImage {
        original_size,
        converted_size,
        animated: image.is_animated(),
        frame_count: image.frame_count(),
        original_deleted: false,
    })
}

/// Decodes a source image.
///
/// GIFs are read frame by frame when `preserve_animation` is set; a GIF with
/// a single frame still comes back as `SourceImage::Still`. Everything else
/// decodes to its first frame. Once the file is open, any failure (including
/// a truncated stream) is a `Decode` error.
pub fn load_source_image(path: &Path, kind: ImageKind, preserve_animation: bool) -> Result<SourceImage> {
    let reader = BufReader::new(File::open(path)?);

    if kind == ImageKind::Gif && preserve_animation {
        let decoder = GifDecoder::new(reader)?;
        let loop_count = webp_loop_count(decoder.loop_count());
        let frames = decoder.into_frames().collect_frames()?;

        let mut frames: Vec<AnimationFrame> = frames
            .into_iter()
            .map(|frame| AnimationFrame {
                delay_ms: frame_delay_ms(frame.delay().numer_denom_ms()),
                buffer: frame.into_buffer(),
            })
            .collect();

        return match frames.len() {
            0 => Err(ConversionError::Decode("GIF contains no frames".to_string())),
            1 => Ok(SourceImage::Still(DynamicImage::ImageRgba8(frames.remove(0).buffer))),
            _ => Ok(SourceImage::Animation { frames, loop_count }),
        };
    }

    let img = ImageReader::with_format(reader, kind.to_image_format()).decode()?;
    Ok(SourceImage::Still(img))
}

/// Rounds a GIF delay to whole milliseconds; zero becomes the default delay.
fn frame_delay_ms((numer, denom): (u32, u32)) -> u32 {
    let delay_ms = if denom == 0 {
        0
    } else {
        ((u64::from(numer) + u64::from(denom) / 2) / u64::from(denom)) as u32
    };
    if delay_ms == 0 {
        DEFAULT_FRAME_DELAY_MS
    } else {
        delay_ms
    }
}

fn webp_loop_count(loop_count: LoopCount) -> u16 {
    match loop_count {
        LoopCount::Infinite => INFINITE_LOOP,
        LoopCount::Finite(n) => u16::try_from(n.get()).unwrap_or(u16::MAX),
    }
}

fn webp_config(settings: &EncodeSettings) -> Result<WebPConfig> {
    let mut config = WebPConfig::new()
        .map_err(|_| ConversionError::Encode("failed to initialise WebP encoder config".to_string()))?;
    config.lossless = i32::from(settings.lossless);
    config.quality = f32::from(settings.quality);
    config.method = i32::from(settings.method);
    Ok(config)
}

/// Encodes a decoded source to WebP bytes using `settings`.
pub fn encode_webp(image: &SourceImage, settings: &EncodeSettings) -> Result<Vec<u8>> {
    let config = webp_config(settings)?;

    match image {
        SourceImage::Still(img) => encode_still(img, &config),
        SourceImage::Animation { frames, loop_count } => encode_animation(frames, *loop_count, &config),
    }
}

fn encode_still(img: &DynamicImage, config: &WebPConfig) -> Result<Vec<u8>> {
    // Alpha sources stay RGBA; everything else (JPEG in particular) is RGB.
    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        let encoder = Encoder::new(rgba.as_raw(), PixelLayout::Rgba, rgba.width(), rgba.height());
        encoder.encode_advanced(config)
    } else {
        let rgb = img.to_rgb8();
        let encoder = Encoder::new(rgb.as_raw(), PixelLayout::Rgb, rgb.width(), rgb.height());
        encoder.encode_advanced(config)
    };

    encoded
        .map(|memory| memory.to_vec())
        .map_err(|e| ConversionError::Encode(format!("{:?}", e)))
}

fn encode_animation(frames: &[AnimationFrame], loop_count: u16, config: &WebPConfig) -> Result<Vec<u8>> {
    let (width, height) = frames
        .first()
        .map(|frame| frame.buffer.dimensions())
        .ok_or_else(|| ConversionError::Encode("animation has no frames".to_string()))?;

    let mut encoder = AnimationEncoder::new(width, height, loop_count)?;

    // Timestamps are frame start times; the final one closes the last frame.
    let mut timestamp_ms: i32 = 0;
    for frame in frames {
        encoder.add_frame(frame.buffer.as_raw(), timestamp_ms, config)?;
        let delay_ms = i32::try_from(frame.delay_ms).unwrap_or(i32::MAX);
        timestamp_ms = timestamp_ms.saturating_add(delay_ms);
    }

    encoder.finish(timestamp_ms)
}

/// Writes `bytes` to a hidden temporary file next to `destination` and
/// renames it into place. The temporary file is removed on any failure.
pub fn write_atomically(destination: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .suffix(TEMP_FILE_SUFFIX)
        .tempfile_in(parent)?;
    temp.write_all(bytes)?;
    temp.persist(destination)?;

    Ok(())
}

fn remove_original(source: &Path, destination: &Path) -> std::io::Result<()> {
    if source == destination {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "source and destination are the same file",
        ));
    }
    fs::remove_file(source)
}
