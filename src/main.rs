//! an in-place cpu and memory bar dashboard.
//!
//! usage:
//!   barstat          # refresh every second
//!   barstat 0.5      # refresh twice a second
//!
//! press `q` to quit.

use {
    anyhow::Context,
    barstat::{
        App, Config,
        config::{parse_interval, parse_quit_key},
        terminal::Session,
    },
    clap::{ArgAction, Parser},
    std::{
        io,
        path::PathBuf,
        time::Duration,
    },
    tracing::{info, level_filters::LevelFilter, warn},
    tracing_subscriber::EnvFilter,
};

/// draws cpu and memory load as bars, in place.
#[derive(Parser)]
#[command(name = "barstat", version, about)]
struct Args {
    /// refresh interval, in seconds. this is also the window cpu load is measured over.
    #[arg(value_name = "INTERVAL", default_value = "1", value_parser = parse_interval)]
    interval: Duration,

    /// path to the proc filesystem.
    #[arg(long, default_value = Config::DEFAULT_PROC_PATH)]
    proc_path: PathBuf,

    /// the key that quits.
    #[arg(long, value_name = "KEY", default_value = "q", value_parser = parse_quit_key)]
    quit_key: u8,

    /// how many character cells each cpu's bar takes up.
    #[arg(
        long,
        value_name = "CELLS",
        default_value_t = Config::DEFAULT_CORE_WIDTH,
        value_parser = clap::value_parser!(u16).range(1..),
    )]
    width: u16,

    /// log more (to stderr). may be repeated.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let Args {
        interval,
        proc_path,
        quit_key,
        width,
        verbose,
    } = Args::parse();

    init_tracing(verbose);

    let config = Config {
        interval,
        proc_path,
        quit_key,
        core_width: width,
    };
    let nproc = barstat::nproc()?;
    let app = App::new(config, nproc);

    if let Err(error) = app.stop_on_signals() {
        warn!(%error, "could not install signal handler");
    }

    let session = Session::enter().context("could not enter raw terminal mode")?;
    let result = app.run(&mut io::stdin().lock(), &mut io::stdout().lock());
    // restore the terminal before any error is reported.
    drop(session);

    result?;
    info!("bye");

    Ok(())
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .parse_lossy(directives(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// returns the filter directives: `RUST_LOG` if it is set, or this crate's level otherwise.
fn directives(verbose: u8, env: Option<String>) -> String {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    env.filter(|directives| !directives.trim().is_empty())
        .unwrap_or_else(|| format!("barstat={level}"))
}
