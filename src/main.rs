use indicatif::{MultiProgress, ProgressDrawTarget};
use indicatif_log_bridge::LogWrapper;
use mk_frames::{dataset, ffmpeg::FfmpegCli, process, settings::Settings, util, Error, Result};
use std::fs::DirBuilder;

#[cfg(feature = "pretty-errors")]
use snafu::ResultExt as _;

#[cfg(all(debug_assertions, feature = "pretty-errors"))]
fn _init_pretty_errors() -> Result<()> {
    if let Err(std::env::VarError::NotPresent) = std::env::var("RUST_BACKTRACE") {
        color_backtrace::BacktracePrinter::new()
            .verbosity(color_backtrace::Verbosity::Full)
            .install(color_backtrace::default_output_stream())
    } else {
        color_backtrace::install();
    }
    color_eyre::install().whatever_context::<_, Error>("could not install the error report handler")?;
    Ok(())
}

#[cfg(all(not(debug_assertions), feature = "pretty-errors"))]
fn _init_pretty_errors() -> Result<()> {
    color_backtrace::install();
    color_eyre::install().whatever_context::<_, Error>("could not install the error report handler")?;
    Ok(())
}

#[cfg(not(feature = "pretty-errors"))]
fn _init_pretty_errors() -> Result<()> {
    Ok(())
}

fn init() -> Result<()> {
    dotenv::dotenv().ok();
    _init_pretty_errors()?;
    Ok(())
}

/// Wires the logger through the progress bar set so log lines don't tear running bars.
fn init_logging(settings: &Settings) -> Result<MultiProgress> {
    let filters = if settings.verbose() {
        String::from("mk_frames=debug")
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| String::from("mk_frames=info"))
    };
    let logger = pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .build();
    let mp = if util::ENV.hide_progress_bars() {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    } else {
        MultiProgress::new()
    };
    LogWrapper::new(mp.clone(), logger).try_init()?;
    Ok(mp)
}

fn run(settings: &Settings) -> Result<()> {
    let mp = init_logging(settings)?;
    if !settings.effective_out_dir().exists() {
        log::info!(
            "Out directory {} doesn't exist. Creating...",
            settings.effective_out_dir().display()
        );
        DirBuilder::new()
            .recursive(true)
            .create(settings.effective_out_dir())?;
    }
    log::debug!("Settings: {:#?}", settings);
    let mut rng = rand::thread_rng();
    let buckets = dataset::parse_dataset(
        settings.dataset(),
        settings.effective_teams(),
        settings.sample_plan().as_ref(),
        &mut rng,
    )?;
    if settings.test() {
        println!("{}", serde_json::to_string_pretty(&buckets)?);
    }
    process::process_teams(
        &FfmpegCli::new(),
        &mp,
        &buckets,
        settings.effective_teams(),
        settings.effective_out_dir(),
        &settings.extract_options(),
    )
}

fn main() -> Result<()> {
    init()?;
    match Settings::load() {
        Ok(settings) => {
            if let Err(error) = run(&settings) {
                log::error!("{}", error);
                std::process::exit(1);
            }
            Ok(())
        }
        Err(error) => {
            if let Error::Clap { source: e } = error {
                if matches!(
                    e.kind(),
                    clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
                ) {
                    e.print()?;
                    Ok(())
                } else {
                    Err(e.into())
                }
            } else {
                Err(error)
            }
        }
    }
}
