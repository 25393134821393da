use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hotpixel_swap::image_pipeline::{
    CorrectionConfig, CorrectionRequest, HotPixelCorrectionPipeline, OutOfFramePolicy, TiffCompression,
};
use hotpixel_swap::logger;

use tracing::{error, info};

#[derive(Parser)]
#[command(name = "hotpixel_swap")]
#[command(about = "Replace hot pixels of a primary camera image with values from a registered secondary camera")]
#[command(version)]
struct Cli {
    /// Working directory holding the images and the configuration file.
    path: PathBuf,

    /// Primary ("Master") camera image, relative to the working directory.
    master_image: PathBuf,

    /// Secondary ("Slave") camera image, relative to the working directory.
    slave_image: PathBuf,

    /// `name=value` calibration file, relative to the working directory.
    config_file: PathBuf,

    /// Whitespace separated `x y` list used instead of threshold detection.
    #[arg(long)]
    hot_pixels: Option<PathBuf>,

    /// Output file name for the corrected primary image.
    #[arg(long, default_value = "MasterCorrected.tif")]
    output: String,

    /// Also write MasterFlat.tif and SlaveFlat.tif.
    #[arg(long)]
    write_flat: bool,

    /// Leave hot pixels that fall outside the secondary image unpatched
    /// instead of failing.
    #[arg(long)]
    skip_out_of_frame: bool,

    /// Compress written TIFFs with LZW.
    #[arg(long)]
    lzw: bool,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let cli = Cli::parse();

    info!("Starting hotpixel_swap...");

    let config = CorrectionConfig::builder()
        .compression(if cli.lzw { TiffCompression::Lzw } else { TiffCompression::None })
        .output_name(cli.output)
        .write_flat_images(cli.write_flat)
        .out_of_frame(if cli.skip_out_of_frame {
            OutOfFramePolicy::Skip
        } else {
            OutOfFramePolicy::Reject
        })
        .build();
    let pipeline = HotPixelCorrectionPipeline::new(config);

    info!("Compression: {:?}", pipeline.config().output.compression);
    info!(
        "Flat images: {}",
        if pipeline.config().write_flat_images {
            "enabled"
        } else {
            "disabled"
        }
    );

    let request = CorrectionRequest {
        working_dir: cli.path,
        primary_image: cli.master_image,
        secondary_image: cli.slave_image,
        config_file: cli.config_file,
        hot_pixel_list: cli.hot_pixels,
    };

    match pipeline.correct_files(&request) {
        Ok(outcome) => {
            info!(
                "Correction successful: {} pixels replaced, {} skipped in {:?}",
                outcome.replacements.len(),
                outcome.skipped.len(),
                outcome.timings.total_duration()
            );
            Ok(())
        }
        Err(e) => {
            error!("Correction failed: {}", e);
            Err(e).with_context(|| format!("correcting {}", request.primary_image.display()))
        }
    }
}
