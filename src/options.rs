use crate::constants::{
    DEFAULT_METHOD, DEFAULT_QUALITY, MAX_METHOD, MAX_QUALITY, MIN_METHOD, MIN_QUALITY,
};
use crate::error::{ConversionError, Result};
use crate::formats::TypeFilter;
use std::path::{Path, PathBuf};

/// libwebp encoder parameters shared by every file in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSettings {
    pub quality: u8,
    pub method: u8,
    pub lossless: bool,
}

impl EncodeSettings {
    /// Validates raw user input. Values are taken as `i64` so that negative
    /// numbers reach validation instead of failing to parse.
    pub fn new(quality: Option<i64>, method: Option<i64>, lossless: bool) -> Result<Self> {
        let quality = quality.unwrap_or(DEFAULT_QUALITY as i64);
        if !(MIN_QUALITY as i64..=MAX_QUALITY as i64).contains(&quality) {
            return Err(ConversionError::InvalidQuality(quality));
        }

        let method = method.unwrap_or(DEFAULT_METHOD as i64);
        if !(MIN_METHOD as i64..=MAX_METHOD as i64).contains(&method) {
            return Err(ConversionError::InvalidMethod(method));
        }

        Ok(Self {
            quality: quality as u8,
            method: method as u8,
            lossless,
        })
    }
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            method: DEFAULT_METHOD,
            lossless: false,
        }
    }
}

/// Everything a run needs to know, fixed before the first file is touched.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub type_filter: TypeFilter,
    pub encode: EncodeSettings,
    pub recursive: bool,
    pub delete_original: bool,
    pub preserve_animation: bool,
    pub threads: usize,
}

impl ConversionRequest {
    /// A request with default settings; the output directory is the input
    /// directory.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        Self {
            output_dir: input_dir.clone(),
            input_dir,
            type_filter: TypeFilter::All,
            encode: EncodeSettings::default(),
            recursive: false,
            delete_original: false,
            preserve_animation: true,
            threads: 1,
        }
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }

    pub fn with_type_filter(mut self, type_filter: TypeFilter) -> Self {
        self.type_filter = type_filter;
        self
    }

    pub fn with_encode(mut self, encode: EncodeSettings) -> Self {
        self.encode = encode;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn delete_original(mut self, delete_original: bool) -> Self {
        self.delete_original = delete_original;
        self
    }

    pub fn preserve_animation(mut self, preserve_animation: bool) -> Self {
        self.preserve_animation = preserve_animation;
        self
    }

    /// Worker threads; 0 means one per CPU.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = if threads == 0 { num_cpus::get() } else { threads };
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn is_parallel(&self) -> bool {
        self.threads > 1
    }
}
