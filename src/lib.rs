//! an in-place cpu and memory bar dashboard.
//!
//! every frame redraws two lines at the cursor position saved when the dashboard started: one
//! showing memory in use, and one showing cpu load, in aggregate and per cpu. the cpu line is
//! measured over a window of the configured interval, which is also the refresh period.

use {
    self::{
        input::drain_for_key,
        meminfo::MemInfoReadError,
        sampler::Sampler,
        source::{Clock, ProcFile, StatsSource, SystemClock},
        stat::StatReadError,
        terminal::TerminalError,
    },
    std::{
        io::{self, Read, Write},
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
    },
    tracing::{debug, info},
};

pub use self::config::Config;

pub mod config;
pub mod input;
pub mod meminfo;
pub mod meter;
pub mod sampler;
pub mod severity;
pub mod source;
pub mod terminal;

/// kernel statistics facilities.
///
/// this file provides tools to interact with `/proc/stat`.
pub mod stat;

/// drawing the dashboard.
mod window;

pub struct App<C = SystemClock, S = ProcFile, M = ProcFile> {
    sampler: Sampler<C, S, M>,
    config: Config,
    /// set when the dashboard should stop after the current frame.
    shutdown: Arc<AtomicBool>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Stat(#[from] StatReadError),
    #[error(transparent)]
    MemInfo(#[from] MemInfoReadError),
    #[error(transparent)]
    Terminal(#[from] TerminalError),
    #[error("could not read from standard input: {0}")]
    Input(#[source] io::Error),
    #[error("could not write to standard output: {0}")]
    Output(#[from] io::Error),
    #[error("could not count the online cpus")]
    NoCpus,
}

/// === impl App ===

impl App {
    /// initializes a new application, watching `nproc` cpus.
    pub fn new(config: Config, nproc: usize) -> Self {
        let sampler = Sampler::new(&config.proc_path, nproc);
        Self::with_sampler(sampler, config)
    }
}

impl<C, S, M> App<C, S, M>
where
    C: Clock,
    S: StatsSource,
    M: StatsSource,
{
    pub fn with_sampler(sampler: Sampler<C, S, M>, config: Config) -> Self {
        Self {
            sampler,
            config,
            shutdown: Arc::default(),
        }
    }

    /// returns a flag that stops the dashboard once it is set.
    ///
    /// the flag is checked between frames, alongside the quit key.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// stops the dashboard after the current frame when SIGINT, SIGTERM, or SIGHUP arrives.
    ///
    /// this may only be called once per process.
    pub fn stop_on_signals(&self) -> Result<(), ctrlc::Error> {
        let shutdown = self.shutdown_handle();
        ctrlc::set_handler(move || {
            debug!("received termination signal");
            shutdown.store(true, Ordering::SeqCst);
        })
    }

    /// runs the application, until the quit key is read from `input` or shutdown is requested.
    ///
    /// `input` is expected to be non-blocking. each frame takes the configured interval to draw.
    pub fn run(&self, input: &mut impl Read, output: &mut impl Write) -> Result<(), Error> {
        let Self {
            sampler,
            config,
            shutdown,
        } = self;

        info!(
            interval = ?config.interval,
            nproc = sampler.nproc(),
            "starting dashboard"
        );

        loop {
            let quit = drain_for_key(input, config.quit_key).map_err(Error::Input)?;
            if quit || shutdown.load(Ordering::SeqCst) {
                info!(quit, "stopping dashboard");
                return Ok(());
            }

            self.frame(output)?;
        }
    }
}

/// returns the number of online cpus.
pub fn nproc() -> Result<usize, Error> {
    // SAFETY: `sysconf` has no preconditions.
    let count = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };

    usize::try_from(count)
        .ok()
        .filter(|&n| n > 0)
        .ok_or(Error::NoCpus)
}
