use crate::error::Result;
use crate::formats::TypeFilter;
use crate::options::{ConversionRequest, EncodeSettings};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "webp-squeeze",
    about = "Convert images (GIF/JPG/PNG) to WebP format (preserves GIF animation)",
    long_about = "webp-squeeze walks a directory and re-encodes every GIF, JPEG and PNG image it finds \
                  as WebP. Animated GIFs become animated WebPs with their frame timing intact. \
                  Quality, lossless mode and the libwebp compression method are configurable.",
    version,
    after_help = "EXAMPLES:\n  \
    webp-squeeze -i ./images -t gif                   # Convert only GIFs\n  \
    webp-squeeze -i ./images -t jpg -l                # Lossless JPGs\n  \
    webp-squeeze -i ./images -t all -o ./webp         # All formats, custom output\n  \
    webp-squeeze -i ./images -t png -r                # Recursive PNGs\n  \
    webp-squeeze -i ./images -t gif -q 75 -m 6        # High compression GIFs\n  \
    webp-squeeze -i ./images -t gif --no-animation    # Static GIFs only"
)]
pub struct Args {
    #[arg(short = 'i', long, help = "Input directory containing image files")]
    pub input: PathBuf,

    #[arg(
        short = 't',
        long = "type",
        value_enum,
        default_value_t = TypeFilter::All,
        help = "Image type to convert"
    )]
    pub file_type: TypeFilter,

    #[arg(
        short = 'o',
        long,
        help = "Output directory for WebP files (default: same as input)",
        long_help = "Output directory for WebP files. Created if missing. \
                     With --recursive the input's subdirectory layout is recreated under it."
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'q',
        long,
        allow_negative_numbers = true,
        help = "Quality for lossy compression (0-100, default: 80)",
        long_help = "Quality from 0 (smallest) to 100 (best). \
                     In lossless mode this controls encoding effort instead."
    )]
    pub quality: Option<i64>,

    #[arg(short = 'l', long, help = "Use lossless compression")]
    pub lossless: bool,

    #[arg(
        short = 'm',
        long,
        allow_negative_numbers = true,
        help = "Compression method (0-6, higher=slower but smaller, default: 4)"
    )]
    pub method: Option<i64>,

    #[arg(short = 'r', long, help = "Process subdirectories recursively")]
    pub recursive: bool,

    #[arg(
        short = 'd',
        long,
        help = "Delete original image files after successful conversion"
    )]
    pub delete_original: bool,

    #[arg(
        long,
        help = "Convert animated GIFs to static WebP (first frame only)"
    )]
    pub no_animation: bool,

    #[arg(
        short = 'j',
        long,
        default_value_t = 1,
        help = "Number of parallel threads (default: 1, 0 = one per CPU)",
        long_help = "Number of files converted at once. Output order and the \
                     summary are the same whatever the thread count."
    )]
    pub threads: usize,

    #[arg(long, help = "Only print the final summary")]
    pub quiet: bool,

    #[arg(short = 'v', long, help = "Print extra details about each file")]
    pub verbose: bool,
}

impl Args {
    /// Validates the arguments into an immutable request.
    pub fn into_request(self) -> Result<ConversionRequest> {
        let encode = EncodeSettings::new(self.quality, self.method, self.lossless)?;

        Ok(ConversionRequest::new(self.input)
            .with_output_dir(self.output)
            .with_type_filter(self.file_type)
            .with_encode(encode)
            .recursive(self.recursive)
            .delete_original(self.delete_original)
            .preserve_animation(!self.no_animation)
            .threads(self.threads))
    }
}
