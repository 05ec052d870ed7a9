pub mod logger;

pub mod animation;
pub mod batch;
pub mod cli;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod formats;
pub mod options;
pub mod processing;
pub mod report;
pub mod utils;

pub use batch::{convert_all, run_conversion};
pub use discovery::{discover_images, DiscoveredFile, ImageFiles};
pub use error::{ConversionError, Result};
pub use formats::{ImageKind, TypeFilter};
pub use options::{ConversionRequest, EncodeSettings};
pub use processing::{
    convert_file, convert_to_webp, destination_path, encode_webp, load_source_image,
    ConversionOutcome, ConvertedImage, SourceImage,
};
pub use report::{Reporter, RunSummary};
