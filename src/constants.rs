pub const DEFAULT_QUALITY: u8 = 80;
pub const MIN_QUALITY: u8 = 0;
pub const MAX_QUALITY: u8 = 100;

pub const DEFAULT_METHOD: u8 = 4;
pub const MIN_METHOD: u8 = 0;
pub const MAX_METHOD: u8 = 6;

/// Frame delay used when a GIF frame carries no timing of its own.
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;
/// WebP loop count meaning "repeat forever".
pub const INFINITE_LOOP: u16 = 0;

pub const WEBP_EXTENSION: &str = "webp";
pub const TEMP_FILE_PREFIX: &str = ".webp-squeeze-";
pub const TEMP_FILE_SUFFIX: &str = ".tmp";

pub const SUMMARY_SEPARATOR_WIDTH: usize = 60;
pub const PROGRESS_BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✓";
pub const FAILURE_PREFIX: &str = "✗";
