//! cello - reference tones for tuning a cello by ear
//!
//! Run with: cargo run -- [--verbose]

mod app;
mod ui;

use std::{fs::File, path::PathBuf};

use color_eyre::eyre::{Result as EyreResult, WrapErr};

use app::App;
use cello_tuner::{
    binder::Binder,
    engine::{SystemClock, ToneEngine},
    io::CpalBackend,
    TunerConfig,
};

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(verbose: bool) -> EyreResult<PathBuf> {
    use simplelog::{Config, LevelFilter, WriteLogger};

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("cello-tuner");
    std::fs::create_dir_all(&log_dir)
        .wrap_err_with(|| format!("cannot create log directory {}", log_dir.display()))?;

    let log_path = log_dir.join("cello.log");
    let log_file = File::create(&log_path)
        .wrap_err_with(|| format!("cannot create log file {}", log_path.display()))?;

    WriteLogger::init(level, Config::default(), log_file).wrap_err("failed to initialize logger")?;
    log::info!("cello tuner starting (log level: {level:?})");

    Ok(log_path)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let verbose = std::env::args().any(|a| a == "--verbose" || a == "-v");
    let log_path = init_logging(verbose)?;

    let config = TunerConfig::default();
    let engine = ToneEngine::with_config(
        CpalBackend::new(config.queue_size),
        SystemClock::new(),
        &config,
    )?;
    let mut app = App::new(Binder::new(engine, &config));

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    log::info!("cello tuner exiting");
    result.wrap_err_with(|| format!("see {} for details", log_path.display()))
}
