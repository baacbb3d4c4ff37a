use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tasker::{Backend, Config, SelectAction, load_programs};

/// Single-focus process launcher with a two-button menu.
#[derive(Debug, Parser)]
#[command(name = "tasker", version, about)]
struct Cli {
    /// Path to the JSON program list.
    config: PathBuf,

    /// Emulate the screen and buttons in the terminal instead of GPIO.
    #[arg(long = "virtual")]
    virtual_mode: bool,

    /// What the select button does.
    #[arg(long, value_enum, default_value_t = SelectAction::Task)]
    on_select: SelectAction,

    /// Seconds a cancelled program gets after SIGTERM before SIGKILL (0 = wait forever).
    #[arg(long, value_name = "SECS", default_value = "5", value_parser = parse_seconds)]
    terminate_grace: Duration,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{e}"))
}

fn init_tracing(log_file: Option<&Path>, backend: Backend) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match (log_file, backend) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // the terminal backend owns the screen
        (None, Backend::Terminal) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
        (None, Backend::Gpio) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let backend = Backend::from_virtual_flag(cli.virtual_mode);
    init_tracing(cli.log_file.as_deref(), backend)?;

    let programs = load_programs(&cli.config).inspect_err(|e| error!(error = %e, label = e.as_label(), "startup failed"))?;
    info!(config = %cli.config.display(), programs = programs.len(), ?backend, "loaded");

    let cfg = Config {
        terminate_grace: cli.terminate_grace,
        select_action: cli.on_select,
        ..Config::default()
    };
    let (mut display, buttons) = backend.build(&cfg);

    let token = CancellationToken::new();
    tokio::spawn(tasker::cancel_on_signal(token.clone()));

    tasker::run(programs, cfg, display.as_mut(), buttons, token)
        .await
        .inspect_err(|e| error!(error = %e, label = e.as_label(), "launcher stopped"))?;
    info!("bye");
    Ok(())
}
