use anyhow::Context;
use clap::Parser;
use webp_squeeze::cli::Args;
use webp_squeeze::{logger, run_conversion};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    let request = args.into_request().context("Invalid arguments")?;
    run_conversion(&request).with_context(|| {
        format!("Failed to convert images in {}", request.input_dir().display())
    })?;

    Ok(())
}
