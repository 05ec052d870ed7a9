//! Animated WebP assembly on top of libwebp's `WebPAnimEncoder`.
//!
//! Frames are added with their start time; `finish` takes the end time of
//! the last frame so its duration survives into the file.

use crate::error::{ConversionError, Result};
use libwebp_sys::{
    WebPAnimEncoder, WebPAnimEncoderAdd, WebPAnimEncoderAssemble, WebPAnimEncoderDelete,
    WebPAnimEncoderGetError, WebPAnimEncoderNewInternal, WebPAnimEncoderOptions,
    WebPAnimEncoderOptionsInitInternal, WebPData, WebPDataClear, WebPGetMuxABIVersion,
    WebPPicture, WebPPictureFree, WebPPictureImportRGBA,
};
use std::ffi::CStr;
use std::mem::MaybeUninit;
use std::os::raw::c_int;
use std::ptr;
use webp::WebPConfig;

fn encode_error(message: impl Into<String>) -> ConversionError {
    ConversionError::Encode(message.into())
}

/// An RGBA picture owned by libwebp, freed on drop.
struct Picture(WebPPicture);

impl Picture {
    fn from_rgba(rgba: &[u8], width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(encode_error(format!(
                "frame buffer holds {} bytes, expected {}",
                rgba.len(),
                expected
            )));
        }

        let mut raw = WebPPicture::new().map_err(|_| encode_error("failed to initialise WebP picture"))?;
        raw.use_argb = 1;
        raw.width = width as c_int;
        raw.height = height as c_int;

        let mut picture = Picture(raw);
        // SAFETY: `rgba` is exactly width * height RGBA pixels, checked above.
        let ok = unsafe { WebPPictureImportRGBA(&mut picture.0, rgba.as_ptr(), (width * 4) as c_int) };
        if ok == 0 {
            return Err(encode_error("failed to import frame pixels"));
        }
        Ok(picture)
    }
}

impl Drop for Picture {
    fn drop(&mut self) {
        // SAFETY: the picture was initialised by `WebPPicture::new`.
        unsafe { WebPPictureFree(&mut self.0) };
    }
}

/// Builds an animated WebP one frame at a time.
pub struct AnimationEncoder {
    raw: *mut WebPAnimEncoder,
    width: u32,
    height: u32,
    last_timestamp_ms: i32,
}

impl AnimationEncoder {
    /// Creates an encoder for a `width` x `height` canvas.
    ///
    /// `loop_count` is written to the ANIM chunk; `0` loops forever.
    pub fn new(width: u32, height: u32, loop_count: u16) -> Result<Self> {
        let mut options = MaybeUninit::<WebPAnimEncoderOptions>::uninit();
        // SAFETY: the init call fills every field of `options`.
        let mut options = unsafe {
            if WebPAnimEncoderOptionsInitInternal(options.as_mut_ptr(), WebPGetMuxABIVersion()) == 0 {
                return Err(encode_error("libwebp mux ABI mismatch"));
            }
            options.assume_init()
        };
        options.anim_params.loop_count = c_int::from(loop_count);

        // SAFETY: `options` is initialised and outlives the call.
        let raw = unsafe {
            WebPAnimEncoderNewInternal(width as c_int, height as c_int, &options, WebPGetMuxABIVersion())
        };
        if raw.is_null() {
            return Err(encode_error(format!(
                "failed to create animation encoder for {}x{}",
                width, height
            )));
        }

        Ok(Self {
            raw,
            width,
            height,
            last_timestamp_ms: 0,
        })
    }

    /// Adds a frame shown from `timestamp_ms` until the next frame's timestamp.
    pub fn add_frame(&mut self, rgba: &[u8], timestamp_ms: i32, config: &WebPConfig) -> Result<()> {
        let mut picture = Picture::from_rgba(rgba, self.width, self.height)?;
        // SAFETY: `self.raw` is live until drop; libwebp copies the picture.
        let ok = unsafe { WebPAnimEncoderAdd(self.raw, &mut picture.0, timestamp_ms, config) };
        if ok == 0 {
            return Err(self.last_error());
        }
        self.last_timestamp_ms = timestamp_ms;
        Ok(())
    }

    /// Closes the animation at `end_timestamp_ms` and returns the file bytes.
    pub fn finish(self, end_timestamp_ms: i32) -> Result<Vec<u8>> {
        if end_timestamp_ms <= self.last_timestamp_ms {
            return Err(encode_error(format!(
                "end timestamp {}ms is not after the last frame at {}ms",
                end_timestamp_ms, self.last_timestamp_ms
            )));
        }

        // SAFETY: a null frame marks the end of the animation.
        let ok = unsafe { WebPAnimEncoderAdd(self.raw, ptr::null_mut(), end_timestamp_ms, ptr::null()) };
        if ok == 0 {
            return Err(self.last_error());
        }

        let mut data = WebPData::default();
        // SAFETY: on success `data` points at a libwebp allocation we own.
        unsafe {
            if WebPAnimEncoderAssemble(self.raw, &mut data) == 0 {
                return Err(self.last_error());
            }
            let bytes = std::slice::from_raw_parts(data.bytes, data.size).to_vec();
            WebPDataClear(&mut data);
            Ok(bytes)
        }
    }

    fn last_error(&self) -> ConversionError {
        // SAFETY: the returned string is owned by the encoder and copied here.
        let message = unsafe {
            let err = WebPAnimEncoderGetError(self.raw);
            if err.is_null() {
                "unknown animation encoder error".to_string()
            } else {
                CStr::from_ptr(err).to_string_lossy().into_owned()
            }
        };
        encode_error(message)
    }
}

impl Drop for AnimationEncoder {
    fn drop(&mut self) {
        // SAFETY: `raw` came from `WebPAnimEncoderNewInternal` and is deleted once.
        unsafe { WebPAnimEncoderDelete(self.raw) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WebPConfig {
        let mut config = WebPConfig::new().unwrap();
        config.lossless = 1;
        config
    }

    fn solid(width: u32, height: u32, value: u8) -> Vec<u8> {
        [value, 255 - value, 64, 255].repeat((width * height) as usize)
    }

    #[test]
    fn test_rejects_wrong_buffer_size() {
        let mut encoder = AnimationEncoder::new(4, 4, 0).unwrap();
        let result = encoder.add_frame(&[0u8; 10], 0, &config());
        assert!(matches!(result, Err(ConversionError::Encode(_))));
    }

    #[test]
    fn test_end_must_follow_last_frame() {
        let mut encoder = AnimationEncoder::new(4, 4, 0).unwrap();
        encoder.add_frame(&solid(4, 4, 10), 0, &config()).unwrap();
        encoder.add_frame(&solid(4, 4, 200), 100, &config()).unwrap();
        assert!(matches!(encoder.finish(100), Err(ConversionError::Encode(_))));
    }

    #[test]
    fn test_produces_riff_webp() {
        let mut encoder = AnimationEncoder::new(4, 4, 3).unwrap();
        encoder.add_frame(&solid(4, 4, 10), 0, &config()).unwrap();
        encoder.add_frame(&solid(4, 4, 200), 100, &config()).unwrap();
        let bytes = encoder.finish(250).unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }
}
