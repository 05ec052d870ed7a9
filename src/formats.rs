//! Source format handling
//!
//! Every discovered file is tagged with an `ImageKind` exactly once, at
//! discovery time, and that tag is carried through conversion and reporting.

use clap::ValueEnum;
use image::ImageFormat;
use std::fmt;
use std::path::Path;

/// Source image formats that can be converted to WebP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Gif,
    Jpg,
    Png,
}

impl ImageKind {
    /// Classify a file by its extension, case-insensitively
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "gif" => Some(ImageKind::Gif),
            "jpg" | "jpeg" => Some(ImageKind::Jpg),
            "png" => Some(ImageKind::Png),
            _ => None,
        }
    }

    /// Lowercase extensions (without the dot) recognised for this kind
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ImageKind::Gif => &["gif"],
            ImageKind::Jpg => &["jpg", "jpeg"],
            ImageKind::Png => &["png"],
        }
    }

    /// Convert to the image crate's ImageFormat
    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            ImageKind::Gif => ImageFormat::Gif,
            ImageKind::Jpg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
        }
    }

    pub fn all() -> [ImageKind; 3] {
        [ImageKind::Gif, ImageKind::Jpg, ImageKind::Png]
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageKind::Gif => "gif",
            ImageKind::Jpg => "jpg",
            ImageKind::Png => "png",
        };
        write!(f, "{}", name)
    }
}

/// The subset of source formats a run should pick up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TypeFilter {
    Gif,
    Jpg,
    Png,
    #[default]
    All,
}

impl TypeFilter {
    pub fn matches(&self, kind: ImageKind) -> bool {
        match self {
            TypeFilter::Gif => kind == ImageKind::Gif,
            TypeFilter::Jpg => kind == ImageKind::Jpg,
            TypeFilter::Png => kind == ImageKind::Png,
            TypeFilter::All => true,
        }
    }

    /// Classify `path` and keep it only if this filter accepts its kind
    pub fn classify(&self, path: &Path) -> Option<ImageKind> {
        ImageKind::from_path(path).filter(|kind| self.matches(*kind))
    }

    /// Whether GIF sources can appear in this run
    pub fn includes_gif(&self) -> bool {
        self.matches(ImageKind::Gif)
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeFilter::Gif => "gif",
            TypeFilter::Jpg => "jpg",
            TypeFilter::Png => "png",
            TypeFilter::All => "all",
        };
        write!(f, "{}", name)
    }
}
