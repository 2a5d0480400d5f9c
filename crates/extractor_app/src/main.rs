mod app;
mod commands;
mod effects;
mod render;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use extractor_engine::{EngineHandle, MockProvider};
use extractor_logging::{LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;

use effects::EffectRunner;

/// Queue company websites, extract profile data and export it as CSV or JSON.
#[derive(Debug, Parser)]
#[command(name = "company-extractor", version)]
struct Cli {
    /// RON settings file with the initial run configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory that receives company-data.csv / company-data.json.
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    log: LogTarget,
    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogTarget {
    Terminal,
    File,
    Both,
}

impl LogTarget {
    fn destination(self) -> LogDestination {
        match self {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::default_file(),
            LogTarget::Both => LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    extractor_logging::initialize(cli.log.destination(), level);

    let settings = settings::load_settings(cli.config.as_deref());
    let provider = Arc::new(MockProvider::new(settings.mock.to_mock_settings()));
    let engine =
        EngineHandle::new(provider.clone(), provider).context("starting extraction engine")?;

    app::run_app(settings.run, EffectRunner::new(engine, cli.output_dir))
}
