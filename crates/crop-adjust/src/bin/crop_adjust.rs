use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::info;

use crop_adjust::core::{CropAdjustConfig, CropAdjustIoError, ParamsError};
use crop_adjust::process::{process_image_file, ProcessError};
use crop_adjust::{CropAdjustParams, CropAdjuster, CropReport};

/// Snap rectangles listed in a text file to the dark content of an image.
///
/// Each rectangle line holds `x,y,w,h` (commas or whitespace). For every
/// rectangle the tool prints a `GIVEN` line and a `FIXED` (or `ERROR`) line.
#[derive(Debug, Parser)]
#[command(name = "crop-adjust", version, about)]
struct Cli {
    /// Input image (any format the `image` crate decodes).
    image: Option<PathBuf>,

    /// Rectangle list, one `x,y,w,h` per line.
    rects: Option<PathBuf>,

    /// JSON run configuration; command-line values take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum dark-pixel fraction for a row/column to count as content.
    #[arg(long)]
    threshold: Option<f32>,

    /// Maximum rows/columns an edge may move.
    #[arg(long)]
    search_range: Option<usize>,

    /// Intensity band half-width around the dark reference.
    #[arg(long)]
    tolerance: Option<u8>,

    /// Margin added on each side as a fraction of the snapped size.
    #[arg(long)]
    expand_ratio: Option<f32>,

    /// Also write a JSON report to this path.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("missing {0} path (pass it as an argument or in --config)")]
    MissingInput(&'static str),
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Io(#[from] CropAdjustIoError),
    #[error(transparent)]
    Process(#[from] ProcessError),
}

struct Run {
    image: PathBuf,
    rects: PathBuf,
    report_path: Option<PathBuf>,
    params: CropAdjustParams,
}

impl Cli {
    fn resolve(self) -> Result<Run, CliError> {
        let config = self
            .config
            .as_deref()
            .map(CropAdjustConfig::load_json)
            .transpose()?;

        let mut params = config.as_ref().map(|c| c.params).unwrap_or_default();
        if let Some(threshold) = self.threshold {
            params = params.with_threshold(threshold)?;
        }
        if let Some(search_range) = self.search_range {
            params = params.with_search_range(search_range);
        }
        if let Some(tolerance) = self.tolerance {
            params = params.with_tolerance(tolerance);
        }
        if let Some(expand_ratio) = self.expand_ratio {
            params = params.with_expand_ratio(expand_ratio)?;
        }

        let image = self
            .image
            .or_else(|| config.as_ref().map(|c| PathBuf::from(&c.image_path)))
            .ok_or(CliError::MissingInput("image"))?;
        let rects = self
            .rects
            .or_else(|| config.as_ref().map(|c| PathBuf::from(&c.rects_path)))
            .ok_or(CliError::MissingInput("rectangle list"))?;
        let report_path = self.json.or_else(|| {
            config
                .as_ref()
                .filter(|c| c.output_path.is_some())
                .map(CropAdjustConfig::output_path)
        });

        Ok(Run {
            image,
            rects,
            report_path,
            params,
        })
    }
}

fn init_logging(verbose: u8) {
    #[cfg(feature = "tracing")]
    {
        let _ = tracing_log::LogTracer::init();
        let directive = crop_adjust::core::level_from_verbosity(verbose).to_string();
        crop_adjust::core::init_tracing(false, &directive.to_lowercase());
    }
    #[cfg(not(feature = "tracing"))]
    {
        let level = crop_adjust::core::level_from_verbosity(verbose);
        if let Err(err) = crop_adjust::core::init_with_level(level) {
            eprintln!("warning: logger not installed: {err}");
        }
    }
}

fn print_report(report: &CropReport) {
    for entry in &report.entries {
        println!("GIVEN:\t{}", entry.given);
        match (&entry.fixed, &entry.error) {
            (Some(fixed), _) => println!("FIXED:\t{fixed}"),
            (None, Some(err)) => println!("ERROR:\t{err}"),
            (None, None) => println!("ERROR:\tno result"),
        }
    }
    println!("Processing Completed.");
}

fn run(run: Run) -> Result<(), CliError> {
    let adjuster = CropAdjuster::new(run.params)?;
    info!("params: {:?}", adjuster.params());

    let report = process_image_file(&run.image, &run.rects, &adjuster)?;
    print_report(&report);

    if let Some(path) = run.report_path.as_deref() {
        write_report(&report, path)?;
    }
    Ok(())
}

fn write_report(report: &CropReport, path: &Path) -> Result<(), CliError> {
    report.write_json(path)?;
    info!("report written to {}", path.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.resolve().and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}
